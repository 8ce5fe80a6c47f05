//! GPU-compatible data types for the body, backdrop and overlay pipelines
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use earthsim_math::{mat4, Mat4, SphereVertex};

/// A sphere mesh vertex
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Unit surface normal
    pub normal: [f32; 3],
    /// Texture coordinate, v = 0 at the top
    pub uv: [f32; 2],
    /// Unit tangent along +u, w = bitangent sign
    pub tangent: [f32; 4],
}

impl From<&SphereVertex> for MeshVertex {
    fn from(v: &SphereVertex) -> Self {
        Self {
            position: v.position.to_array(),
            normal: v.normal.to_array(),
            uv: v.uv,
            tangent: v.tangent,
        }
    }
}

/// A textured backdrop vertex in world space
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BackdropVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// A 2D overlay vertex in window pixels
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct OverlayVertex {
    pub position: [f32; 2],
    /// Linear RGBA color
    pub color: [f32; 4],
}

/// Per-frame uniforms shared by the body and backdrop pipelines
/// Layout: 112 bytes total (must match FrameUniforms in body.wgsl and backdrop.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    /// Projection * view (64 bytes)
    pub view_proj: [[f32; 4]; 4],
    /// Camera position, w unused (16 bytes)
    pub camera_pos: [f32; 4],
    /// Point light position, w = 1 when a light is present (16 bytes)
    pub light_pos: [f32; 4],
    /// Point light color, w unused (16 bytes)
    pub light_color: [f32; 4],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view_proj: mat4::IDENTITY,
            camera_pos: [0.0, 0.0, 0.0, 1.0],
            light_pos: [0.0; 4],
            light_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl FrameUniforms {
    /// Set the point light, or clear it so the camera acts as a headlight
    pub fn set_light(&mut self, light: Option<([f32; 3], [f32; 3])>) {
        match light {
            Some((p, c)) => {
                self.light_pos = [p[0], p[1], p[2], 1.0];
                self.light_color = [c[0], c[1], c[2], 1.0];
            }
            None => {
                self.light_pos = [0.0; 4];
                self.light_color = [1.0, 1.0, 1.0, 1.0];
            }
        }
    }
}

/// Per-body uniforms
/// Layout: 176 bytes total (must match ObjectUniforms in body.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    /// Model-to-world matrix (64 bytes)
    pub model: [[f32; 4]; 4],
    /// Matrix for normals and tangents (64 bytes)
    pub normal_matrix: [[f32; 4]; 4],
    /// Diffuse RGBA (16 bytes)
    pub diffuse_color: [f32; 4],
    /// Specular RGB + Phong exponent (16 bytes)
    pub specular: [f32; 4],
    /// Diffuse, specular, bump, self-illumination: 1.0 where bound (16 bytes)
    pub map_flags: [f32; 4],
}

impl Default for ObjectUniforms {
    fn default() -> Self {
        Self {
            model: mat4::IDENTITY,
            normal_matrix: mat4::IDENTITY,
            diffuse_color: [1.0; 4],
            specular: [0.0, 0.0, 0.0, 32.0],
            map_flags: [0.0; 4],
        }
    }
}

impl ObjectUniforms {
    /// Build uniforms from a world matrix
    ///
    /// World matrices in the scene are rigid (rotation and translation), so
    /// the rotation part serves as the normal matrix.
    pub fn from_world(model: Mat4) -> Self {
        Self {
            model,
            normal_matrix: mat4::rotation_part(model),
            ..Self::default()
        }
    }
}

/// Overlay uniforms
/// Layout: 16 bytes total (must match overlay.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct OverlayUniforms {
    /// Window size in pixels
    pub screen_size: [f32; 2],
    pub _padding: [f32; 2],
}

impl OverlayUniforms {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            screen_size: [width, height],
            _padding: [0.0; 2],
        }
    }
}
