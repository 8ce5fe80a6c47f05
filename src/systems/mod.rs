//! Application systems
//!
//! Window, animation and rendering, kept out of main.rs for testability.

mod animation;
mod render;
mod window;

pub use animation::{AnimationResult, AnimationSystem};
pub use render::{RenderError, RenderSystem};
pub use window::{WindowError, WindowSystem};
