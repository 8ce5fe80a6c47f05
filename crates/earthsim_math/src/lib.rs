//! Mathematics for EarthSim
//!
//! This crate provides the vector, matrix and mesh types used by the scene
//! graph and renderer.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector in screen-space convention (Y down)
//! - [`Mat4`] - column-major 4x4 matrix for affine transforms
//! - [`SphereMesh`] - indexed UV sphere with normals, UVs and tangents

mod vec3;
pub mod mat4;
pub mod sphere;

pub use vec3::Vec3;
pub use mat4::Mat4;
pub use sphere::{SphereMesh, SphereVertex};
