//! Scene construction utilities
//!
//! This module provides a declarative API for building the viewer's scene
//! graph.

mod scene_builder;

pub use scene_builder::{SceneBuilder, BuiltScene};
