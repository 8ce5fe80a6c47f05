//! Screen-aligned perspective camera
//!
//! The camera sits in front of the window center looking along +Z, with Y
//! pointing down. Its distance is chosen so that the Z=0 plane maps 1:1 to
//! window pixels: a point at (px, py, 0) lands on pixel (px, py).

use earthsim_math::{mat4, Mat4, Vec3};

/// Default vertical field of view in degrees
pub const DEFAULT_FOV: f32 = 30.0;

/// Default perspective camera for a window of a given size
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    width: f32,
    height: f32,
}

impl ScreenCamera {
    /// Create a camera for a `width` x `height` window
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            fov: DEFAULT_FOV,
            near: 1.0,
            far: 20000.0,
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    /// Builder: set the field of view and clip planes
    pub fn with_projection(mut self, fov: f32, near: f32, far: f32) -> Self {
        self.fov = fov.clamp(1.0, 179.0);
        self.near = near.max(f32::EPSILON);
        self.far = far.max(self.near + 1.0);
        self
    }

    /// Follow a window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as f32;
        self.height = height.max(1) as f32;
    }

    /// Window size in pixels
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Distance from the eye to the Z=0 plane
    pub fn plane_distance(&self) -> f32 {
        (self.height / 2.0) / (self.fov.to_radians() / 2.0).tan()
    }

    /// Eye position in world space
    pub fn eye(&self) -> Vec3 {
        Vec3::new(self.width / 2.0, self.height / 2.0, -self.plane_distance())
    }

    /// World to camera space
    ///
    /// The camera axes match the world axes, so this is a translation.
    pub fn view_matrix(&self) -> Mat4 {
        mat4::translation(-self.eye())
    }

    /// Camera to clip space, depth in [0, 1]
    ///
    /// Y is flipped so that world Y down becomes clip Y down.
    pub fn projection_matrix(&self) -> Mat4 {
        let f = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let aspect = self.width / self.height;
        let a = self.far / (self.far - self.near);
        let b = -self.near * self.far / (self.far - self.near);

        [
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, -f, 0.0, 0.0],
            [0.0, 0.0, a, 1.0],
            [0.0, 0.0, b, 0.0],
        ]
    }

    /// Projection * view
    pub fn view_projection(&self) -> Mat4 {
        mat4::mul(self.projection_matrix(), self.view_matrix())
    }

    /// Project a world point to window pixels and depth
    ///
    /// Returns None for points behind the eye.
    pub fn project(&self, p: Vec3) -> Option<(f32, f32, f32)> {
        let m = self.view_projection();
        let v = [p.x, p.y, p.z, 1.0];
        let mut clip = [0.0f32; 4];
        for (row, out) in clip.iter_mut().enumerate() {
            *out = (0..4).map(|col| m[col][row] * v[col]).sum();
        }
        if clip[3] <= 0.0 {
            return None;
        }
        let ndc = [clip[0] / clip[3], clip[1] / clip[3], clip[2] / clip[3]];
        Some((
            (ndc[0] + 1.0) / 2.0 * self.width,
            (1.0 - ndc[1]) / 2.0 * self.height,
            ndc[2],
        ))
    }
}
