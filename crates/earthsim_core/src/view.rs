//! The galaxy view rig
//!
//! Everything the user can spin and push around lives under one group node.
//! GalaxyView holds that group's interactive state: the drag angles, the
//! rotation accumulated from arrow keys, and the depth offset shared by the
//! slider, the scroll wheel and the Minus/Equal keys.

use earthsim_input::ViewControl;
use earthsim_math::{mat4, Mat4, Vec3};
use crate::Transform;

/// Default rig center (middle of a 1400x1000 window)
pub const DEFAULT_CENTER: Vec3 = Vec3::new(700.0, 500.0, 0.0);

/// Default depth offset range
pub const DEFAULT_DEPTH_RANGE: (f32, f32) = (-1000.0, 1000.0);

/// Interactive state of the galaxy group
#[derive(Clone, Debug, PartialEq)]
pub struct GalaxyView {
    /// Rig position at zero depth
    pub center: Vec3,
    angle_x: f32,
    angle_y: f32,
    key_rotation: Mat4,
    depth: f32,
    depth_range: (f32, f32),
    changed: bool,
}

impl Default for GalaxyView {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER)
    }
}

impl GalaxyView {
    /// Create a view rig centered at `center`
    pub fn new(center: Vec3) -> Self {
        Self {
            center,
            angle_x: 0.0,
            angle_y: 0.0,
            key_rotation: mat4::IDENTITY,
            depth: 0.0,
            depth_range: DEFAULT_DEPTH_RANGE,
            changed: true,
        }
    }

    /// Builder: set the allowed depth range
    ///
    /// Reversed bounds are swapped.
    pub fn with_depth_range(mut self, min: f32, max: f32) -> Self {
        self.depth_range = if min <= max { (min, max) } else { (max, min) };
        self.depth = self.depth.clamp(self.depth_range.0, self.depth_range.1);
        self
    }

    /// Allowed depth range
    pub fn depth_range(&self) -> (f32, f32) {
        self.depth_range
    }

    /// Combined orientation: key rotation, then drag X, then drag Y
    pub fn orientation(&self) -> Mat4 {
        let rx = mat4::rotation_deg(Vec3::X, self.angle_x);
        let ry = mat4::rotation_deg(Vec3::Y, self.angle_y);
        mat4::mul(self.key_rotation, mat4::mul(rx, ry))
    }

    /// Transform for the galaxy group node
    pub fn transform(&self) -> Transform {
        Transform::from_translation(Vec3::new(self.center.x, self.center.y, self.center.z + self.depth))
            .with_rotation(self.orientation())
    }

    /// Rotation accumulated from arrow keys
    pub fn key_rotation(&self) -> Mat4 {
        self.key_rotation
    }

    /// Return to the initial orientation and depth
    pub fn reset(&mut self) {
        self.angle_x = 0.0;
        self.angle_y = 0.0;
        self.key_rotation = mat4::IDENTITY;
        self.depth = 0.0_f32.clamp(self.depth_range.0, self.depth_range.1);
        self.changed = true;
    }

    /// Whether the view changed since the last [`GalaxyView::take_changed`]
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Read and clear the change flag
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }

    fn concat_key_rotation(&mut self, axis: Vec3, degrees: f32) {
        self.key_rotation = mat4::mul(self.key_rotation, mat4::rotation_deg(axis, degrees));
        self.changed = true;
    }
}

impl ViewControl for GalaxyView {
    fn drag_angles(&self) -> (f32, f32) {
        (self.angle_x, self.angle_y)
    }

    fn set_drag_angles(&mut self, angle_x: f32, angle_y: f32) {
        self.angle_x = angle_x;
        self.angle_y = angle_y;
        self.changed = true;
    }

    fn rotate_by_x(&mut self, degrees: f32) {
        self.concat_key_rotation(Vec3::X, degrees);
    }

    fn rotate_by_y(&mut self, degrees: f32) {
        self.concat_key_rotation(Vec3::Y, degrees);
    }

    fn depth(&self) -> f32 {
        self.depth
    }

    fn adjust_depth(&mut self, delta: f32) {
        self.set_depth(self.depth + delta);
    }

    fn set_depth(&mut self, depth: f32) {
        let clamped = depth.clamp(self.depth_range.0, self.depth_range.1);
        if clamped != self.depth {
            self.depth = clamped;
            self.changed = true;
        }
    }
}
