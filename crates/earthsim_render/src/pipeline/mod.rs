//! Rendering pipeline components
//!
//! This module contains the render pipelines: lit bodies, the backdrop
//! image, and the 2D overlay.

pub mod types;
pub mod body_pipeline;
pub mod backdrop_pipeline;
pub mod overlay_pipeline;

// Re-export types
pub use types::{
    MeshVertex, BackdropVertex, OverlayVertex, FrameUniforms, ObjectUniforms, OverlayUniforms,
};

// Re-export pipelines
pub use body_pipeline::{BodyPipeline, BodyMaps, BodyResources, DEPTH_FORMAT};
pub use backdrop_pipeline::{BackdropPipeline, BackdropResources, backdrop_quad};
pub use overlay_pipeline::OverlayPipeline;
