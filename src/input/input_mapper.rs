//! Input mapping from raw events to application actions
//!
//! Maps special keys to high-level actions like Exit or ResetView.
//! View keys (arrows, Minus, Equal), dragging and scrolling are NOT mapped
//! here - they go directly to the OrbitController.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by special keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Return the view to its starting orientation and depth (R key)
    ResetView,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Pause or resume the spin animation (P key)
    ToggleAnimation,
}

/// Maps raw key events to application actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for special keys, `None` for everything else
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyR => Some(InputAction::ResetView),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::KeyP => Some(InputAction::ToggleAnimation),
            _ => None, // View keys handled by controller
        }
    }
}
