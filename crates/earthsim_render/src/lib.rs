//! EarthSim Rendering Library
//!
//! This crate provides the wgpu-based rendering for the Earth and Moon
//! scene.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::ScreenCamera`] - Perspective camera mapping Z=0 to window pixels
//! - [`texture`] - Image loading with solid-color fallbacks
//! - [`pipeline::BodyPipeline`] - Phong shading with texture maps
//! - [`pipeline::BackdropPipeline`] - Unlit background image
//! - [`pipeline::OverlayPipeline`] - 2D slider overlay
//! - [`renderable`] - Converts meshes and the slider to GPU data

pub mod context;
pub mod camera;
pub mod texture;
pub mod pipeline;
pub mod renderable;

// Re-export core types for convenience
pub use earthsim_core::{SceneGraph, Node, NodeKind, NodeKey, Material, Slider};
pub use earthsim_math::{Vec3, Mat4, SphereMesh};

pub use renderable::{GpuMesh, SliderStyle, slider_geometry, label_geometry, tick_label, mesh_vertices};
pub use texture::{MapKind, Texture, TextureError};
