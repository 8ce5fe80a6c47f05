//! Orbit controller for mouse/keyboard manipulation of the scene rig
//!
//! Controls:
//! - Left drag: rotate the rig (1 degree per pixel by default)
//! - Left drag on the slider: set the depth offset
//! - Scroll: move the rig towards/away from the viewer
//! - Minus/Equal: push back / pull forward by a fixed step
//! - Arrow keys: rotate the rig by a fixed step

use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

/// What the current left-button drag is manipulating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// No drag in progress
    None,
    /// Rotating the view rig
    View,
    /// Dragging the depth slider
    Slider,
}

/// Cursor and angles captured when a view drag starts
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    x: f64,
    y: f64,
    angle_x: f32,
    angle_y: f32,
}

/// Orbit controller for handling input
pub struct OrbitController {
    cursor: (f64, f64),
    target: DragTarget,
    anchor: Option<DragAnchor>,

    // Configuration
    pub drag_sensitivity: f32,
    pub scroll_pixels_per_line: f32,
    pub depth_step: f32,
    pub rotate_step: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            cursor: (0.0, 0.0),
            target: DragTarget::None,
            anchor: None,

            drag_sensitivity: 1.0,
            scroll_pixels_per_line: 40.0,
            depth_step: 50.0,
            rotate_step: 10.0,
        }
    }

    /// Process mouse button input
    ///
    /// A left press on the slider starts a slider drag and jumps the value to
    /// the cursor; anywhere else it anchors a view rotation.
    pub fn process_mouse_button<V, S>(
        &mut self,
        button: MouseButton,
        state: ElementState,
        view: &mut V,
        slider: &S,
    ) where
        V: ViewControl + ?Sized,
        S: SliderControl + ?Sized,
    {
        if button != MouseButton::Left {
            return;
        }

        match state {
            ElementState::Pressed => {
                let (x, y) = self.cursor;
                if slider.contains(x as f32, y as f32) {
                    self.target = DragTarget::Slider;
                    self.anchor = None;
                    view.set_depth(slider.value_at(x as f32));
                } else {
                    let (angle_x, angle_y) = view.drag_angles();
                    self.target = DragTarget::View;
                    self.anchor = Some(DragAnchor { x, y, angle_x, angle_y });
                }
            }
            ElementState::Released => {
                self.target = DragTarget::None;
                self.anchor = None;
            }
        }
    }

    /// Process cursor movement (window coordinates, physical pixels)
    pub fn process_cursor_moved<V, S>(&mut self, x: f64, y: f64, view: &mut V, slider: &S)
    where
        V: ViewControl + ?Sized,
        S: SliderControl + ?Sized,
    {
        self.cursor = (x, y);

        match self.target {
            DragTarget::View => {
                if let Some(anchor) = self.anchor {
                    let s = self.drag_sensitivity;
                    let angle_x = anchor.angle_x - ((anchor.y - y) as f32) * s;
                    let angle_y = anchor.angle_y + ((anchor.x - x) as f32) * s;
                    view.set_drag_angles(angle_x, angle_y);
                }
            }
            DragTarget::Slider => {
                view.set_depth(slider.value_at(x as f32));
            }
            DragTarget::None => {}
        }
    }

    /// Process scroll wheel input
    ///
    /// Scrolling up (positive delta) pushes the rig away from the viewer.
    pub fn process_scroll<V>(&mut self, delta: MouseScrollDelta, view: &mut V)
    where
        V: ViewControl + ?Sized,
    {
        let dy = match delta {
            MouseScrollDelta::LineDelta(_, y) => y * self.scroll_pixels_per_line,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
        };
        if dy != 0.0 {
            view.adjust_depth(dy);
        }
    }

    /// Process keyboard input
    ///
    /// Returns true if the key was handled.
    pub fn process_keyboard<V>(&mut self, key: KeyCode, state: ElementState, view: &mut V) -> bool
    where
        V: ViewControl + ?Sized,
    {
        if state != ElementState::Pressed {
            return false;
        }

        match key {
            KeyCode::Minus => { view.adjust_depth(self.depth_step); true }
            KeyCode::Equal => { view.adjust_depth(-self.depth_step); true }
            KeyCode::ArrowUp => { view.rotate_by_x(self.rotate_step); true }
            KeyCode::ArrowDown => { view.rotate_by_x(-self.rotate_step); true }
            KeyCode::ArrowLeft => { view.rotate_by_y(self.rotate_step); true }
            KeyCode::ArrowRight => { view.rotate_by_y(-self.rotate_step); true }
            _ => false,
        }
    }

    /// Current drag target
    pub fn drag_target(&self) -> DragTarget {
        self.target
    }

    /// Last known cursor position
    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    /// Abandon any drag in progress (e.g. on focus loss)
    pub fn cancel_drag(&mut self) {
        self.target = DragTarget::None;
        self.anchor = None;
    }

    /// Builder: set degrees of rotation per dragged pixel
    pub fn with_drag_sensitivity(mut self, sensitivity: f32) -> Self {
        self.drag_sensitivity = sensitivity;
        self
    }

    /// Builder: set pixels of depth per scroll line
    pub fn with_scroll_pixels_per_line(mut self, pixels: f32) -> Self {
        self.scroll_pixels_per_line = pixels;
        self
    }

    /// Builder: set depth change per Minus/Equal press
    pub fn with_depth_step(mut self, step: f32) -> Self {
        self.depth_step = step;
        self
    }

    /// Builder: set degrees per arrow key press
    pub fn with_rotate_step(mut self, step: f32) -> Self {
        self.rotate_step = step;
        self
    }
}

/// Trait for the rotatable, depth-movable view rig
/// Allows the controller to work with different rig implementations
pub trait ViewControl {
    fn drag_angles(&self) -> (f32, f32);
    fn set_drag_angles(&mut self, angle_x: f32, angle_y: f32);
    fn rotate_by_x(&mut self, degrees: f32);
    fn rotate_by_y(&mut self, degrees: f32);
    fn depth(&self) -> f32;
    fn adjust_depth(&mut self, delta: f32);
    fn set_depth(&mut self, depth: f32);
}

/// Trait for a horizontal value slider in window coordinates
pub trait SliderControl {
    fn contains(&self, x: f32, y: f32) -> bool;
    fn value_at(&self, x: f32) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[derive(Default)]
    struct MockView {
        angles: (f32, f32),
        x_turns: Vec<f32>,
        y_turns: Vec<f32>,
        depth: f32,
    }

    impl ViewControl for MockView {
        fn drag_angles(&self) -> (f32, f32) { self.angles }
        fn set_drag_angles(&mut self, angle_x: f32, angle_y: f32) { self.angles = (angle_x, angle_y); }
        fn rotate_by_x(&mut self, degrees: f32) { self.x_turns.push(degrees); }
        fn rotate_by_y(&mut self, degrees: f32) { self.y_turns.push(degrees); }
        fn depth(&self) -> f32 { self.depth }
        fn adjust_depth(&mut self, delta: f32) { self.depth += delta; }
        fn set_depth(&mut self, depth: f32) { self.depth = depth; }
    }

    /// Slider band from x=200..1200 at y=890..910 mapping to -1000..1000
    struct MockSlider;

    impl SliderControl for MockSlider {
        fn contains(&self, x: f32, y: f32) -> bool {
            (200.0..=1200.0).contains(&x) && (890.0..=910.0).contains(&y)
        }
        fn value_at(&self, x: f32) -> f32 {
            ((x - 200.0) / 1000.0 * 2000.0 - 1000.0).clamp(-1000.0, 1000.0)
        }
    }

    fn press(c: &mut OrbitController, view: &mut MockView) {
        c.process_mouse_button(MouseButton::Left, ElementState::Pressed, view, &MockSlider);
    }

    #[test]
    fn test_drag_rotates_view() {
        let mut c = OrbitController::new();
        let mut view = MockView::default();

        c.process_cursor_moved(100.0, 100.0, &mut view, &MockSlider);
        press(&mut c, &mut view);
        assert_eq!(c.drag_target(), DragTarget::View);

        // Move 30 px right and 20 px down
        c.process_cursor_moved(130.0, 120.0, &mut view, &MockSlider);
        // angle_x = 0 - (100 - 120) = 20, angle_y = 0 + (100 - 130) = -30
        assert_eq!(view.angles, (20.0, -30.0));
    }

    #[test]
    fn test_drag_is_relative_to_anchor_angles() {
        let mut c = OrbitController::new();
        let mut view = MockView { angles: (5.0, 7.0), ..Default::default() };

        c.process_cursor_moved(50.0, 50.0, &mut view, &MockSlider);
        press(&mut c, &mut view);
        c.process_cursor_moved(60.0, 40.0, &mut view, &MockSlider);
        c.process_cursor_moved(40.0, 60.0, &mut view, &MockSlider);

        // Only the final offset from the anchor matters
        assert_eq!(view.angles, (5.0 + 10.0, 7.0 + 10.0));
    }

    #[test]
    fn test_drag_sensitivity() {
        let mut c = OrbitController::new().with_drag_sensitivity(0.5);
        let mut view = MockView::default();

        press(&mut c, &mut view);
        c.process_cursor_moved(-20.0, 40.0, &mut view, &MockSlider);
        assert_eq!(view.angles, (20.0, 10.0));
    }

    #[test]
    fn test_motion_without_press_does_nothing() {
        let mut c = OrbitController::new();
        let mut view = MockView::default();

        c.process_cursor_moved(10.0, 10.0, &mut view, &MockSlider);
        c.process_cursor_moved(300.0, 300.0, &mut view, &MockSlider);
        assert_eq!(view.angles, (0.0, 0.0));
    }

    #[test]
    fn test_release_ends_drag() {
        let mut c = OrbitController::new();
        let mut view = MockView::default();

        press(&mut c, &mut view);
        c.process_mouse_button(MouseButton::Left, ElementState::Released, &mut view, &MockSlider);
        assert_eq!(c.drag_target(), DragTarget::None);

        c.process_cursor_moved(500.0, 500.0, &mut view, &MockSlider);
        assert_eq!(view.angles, (0.0, 0.0));
    }

    #[test]
    fn test_slider_press_sets_depth_and_drags() {
        let mut c = OrbitController::new();
        let mut view = MockView::default();

        c.process_cursor_moved(700.0, 900.0, &mut view, &MockSlider);
        press(&mut c, &mut view);
        assert_eq!(c.drag_target(), DragTarget::Slider);
        assert_eq!(view.depth, 0.0);

        // Dragging past the end clamps, and does not rotate
        c.process_cursor_moved(5000.0, 100.0, &mut view, &MockSlider);
        assert_eq!(view.depth, 1000.0);
        assert_eq!(view.angles, (0.0, 0.0));
    }

    #[test]
    fn test_scroll_adjusts_depth() {
        let mut c = OrbitController::new();
        let mut view = MockView::default();

        c.process_scroll(MouseScrollDelta::LineDelta(0.0, 1.0), &mut view);
        assert_eq!(view.depth, 40.0);

        c.process_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -15.0)), &mut view);
        assert_eq!(view.depth, 25.0);
    }

    #[test]
    fn test_depth_keys() {
        let mut c = OrbitController::new();
        let mut view = MockView::default();

        assert!(c.process_keyboard(KeyCode::Minus, ElementState::Pressed, &mut view));
        assert_eq!(view.depth, 50.0);
        assert!(c.process_keyboard(KeyCode::Equal, ElementState::Pressed, &mut view));
        assert!(c.process_keyboard(KeyCode::Equal, ElementState::Pressed, &mut view));
        assert_eq!(view.depth, -50.0);
    }

    #[test]
    fn test_arrow_keys_rotate() {
        let mut c = OrbitController::new();
        let mut view = MockView::default();

        c.process_keyboard(KeyCode::ArrowUp, ElementState::Pressed, &mut view);
        c.process_keyboard(KeyCode::ArrowDown, ElementState::Pressed, &mut view);
        c.process_keyboard(KeyCode::ArrowLeft, ElementState::Pressed, &mut view);
        c.process_keyboard(KeyCode::ArrowRight, ElementState::Pressed, &mut view);

        assert_eq!(view.x_turns, vec![10.0, -10.0]);
        assert_eq!(view.y_turns, vec![10.0, -10.0]);
    }

    #[test]
    fn test_key_release_and_unmapped_keys_ignored() {
        let mut c = OrbitController::new();
        let mut view = MockView::default();

        assert!(!c.process_keyboard(KeyCode::Minus, ElementState::Released, &mut view));
        assert!(!c.process_keyboard(KeyCode::KeyW, ElementState::Pressed, &mut view));
        assert_eq!(view.depth, 0.0);
    }

    #[test]
    fn test_cancel_drag() {
        let mut c = OrbitController::new();
        let mut view = MockView::default();

        press(&mut c, &mut view);
        c.cancel_drag();
        assert_eq!(c.drag_target(), DragTarget::None);
    }
}
