//! Node transform (translation, spin, orientation, inner offset)
//!
//! A Transform places a node relative to its parent. The local matrix is
//!
//! ```text
//! T(translation) * R(spin_axis, spin_deg) * rotation * T(offset)
//! ```
//!
//! `spin_deg` is the animated angle, `rotation` an arbitrary orientation
//! (the view rig's drag and key rotations), and `offset` an inner
//! translation that the spin swings around the node's origin (an orbit).

use earthsim_math::{mat4, Mat4, Vec3};
use serde::{Serialize, Deserialize};

/// A node transform relative to its parent
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Outer translation
    pub translation: Vec3,
    /// Free orientation, applied inside the spin
    pub rotation: Mat4,
    /// Axis for `spin_deg`
    pub spin_axis: Vec3,
    /// Animated rotation angle in degrees
    pub spin_deg: f32,
    /// Inner translation, applied first
    pub offset: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: mat4::IDENTITY,
            spin_axis: Vec3::Y,
            spin_deg: 0.0,
            offset: Vec3::ZERO,
        }
    }

    /// Create a transform with just a translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Builder: set the spin axis
    pub fn with_spin_axis(mut self, axis: Vec3) -> Self {
        self.spin_axis = axis;
        self
    }

    /// Builder: set the inner offset
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Builder: set the free orientation
    pub fn with_rotation(mut self, rotation: Mat4) -> Self {
        self.rotation = rotation;
        self
    }

    /// Get the local-to-parent matrix
    pub fn local_matrix(&self) -> Mat4 {
        let t = mat4::translation(self.translation);
        let spin = mat4::rotation_deg(self.spin_axis, self.spin_deg);
        let offset = mat4::translation(self.offset);
        mat4::mul(t, mat4::mul(spin, mat4::mul(self.rotation, offset)))
    }

    /// Transform a point from local space to parent space
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        mat4::transform_point(self.local_matrix(), p)
    }

    /// Advance the spin angle, keeping it in [0, 360)
    pub fn spin_by(&mut self, degrees: f32) {
        self.spin_deg = (self.spin_deg + degrees).rem_euclid(360.0);
    }
}
