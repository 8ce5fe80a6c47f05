//! Scene Input Handling
//!
//! This crate turns mouse and keyboard events into rotations and depth
//! changes of the view rig.

mod orbit_controller;

pub use orbit_controller::{OrbitController, DragTarget, ViewControl, SliderControl};
