//! EarthSim - an interactive Earth and Moon viewer
//!
//! The binary wires these modules to a winit event loop; they are exposed
//! as a library so integration tests can reach them.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
