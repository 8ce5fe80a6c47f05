//! Core types for EarthSim
//!
//! This crate provides the scene model the renderer draws and the input
//! layer drives:
//!
//! - [`Transform`] - Translation, spin, orientation and orbit offset
//! - [`Material`] - Phong colors and texture maps
//! - [`Node`] - A group, sphere, point light or backdrop
//! - [`SceneGraph`] - Container for all nodes and their hierarchy
//! - [`NodeKey`] - Generational key to a node in the graph
//! - [`GalaxyView`] - Interactive state of the rotatable rig
//! - [`Slider`] - On-screen depth slider
//! - [`Animation`] - Constant-rate spin tracks
//! - [`Scene`] - Loadable/saveable scene of body templates

mod transform;
mod material;
mod node;
mod graph;
mod view;
mod slider;
mod animation;
mod scene;

pub use transform::Transform;
pub use material::{Material, DEFAULT_SPECULAR_POWER};
pub use node::{Node, NodeKind, DirtyFlags};
pub use graph::{SceneGraph, NodeKey, WorldLight, SceneGraphError};
pub use view::{GalaxyView, DEFAULT_CENTER, DEFAULT_DEPTH_RANGE};
pub use slider::{Slider, Tick};
pub use animation::{Animation, SpinTrack};
pub use scene::{
    Scene, BodyTemplate, BackdropTemplate, LightTemplate, SceneLoadError, SceneSaveError,
};

// Re-export commonly used types from earthsim_math for convenience
pub use earthsim_math::{Vec3, Mat4};
