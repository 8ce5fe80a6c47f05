//! 4x4 Matrix utilities for 3D affine transforms
//!
//! Matrices are column-major (`m[column][row]`) so they can be uploaded to
//! WGSL `mat4x4<f32>` uniforms without transposing. Rotation angles are in
//! degrees, matching the scene description.

use crate::Vec3;

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Create a translation matrix
pub fn translation(v: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = v.x;
    m[3][1] = v.y;
    m[3][2] = v.z;
    m
}

/// Create a rotation of `degrees` about `axis`
///
/// Uses the right-handed axis-angle formula. The axis is normalized; a zero
/// axis yields the identity.
///
/// # Example
/// ```
/// use earthsim_math::{Vec3, mat4};
/// // Quarter turn about X sends +Y to +Z
/// let m = mat4::rotation_deg(Vec3::X, 90.0);
/// let v = mat4::transform_vector(m, Vec3::Y);
/// assert!((v.z - 1.0).abs() < 1e-5);
/// ```
pub fn rotation_deg(axis: Vec3, degrees: f32) -> Mat4 {
    let a = axis.normalized();
    if a == Vec3::ZERO {
        return IDENTITY;
    }

    let (sn, cs) = degrees.to_radians().sin_cos();
    let t = 1.0 - cs;
    let (x, y, z) = (a.x, a.y, a.z);

    [
        [cs + x * x * t, y * x * t + z * sn, z * x * t - y * sn, 0.0],
        [x * y * t - z * sn, cs + y * y * t, z * y * t + x * sn, 0.0],
        [x * z * t + y * sn, y * z * t - x * sn, cs + z * z * t, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Transform a point (w = 1) by a matrix
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
        m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
        m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
    )
}

/// Transform a direction (w = 0) by a matrix, ignoring translation
pub fn transform_vector(m: Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
        m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
        m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
    )
}

/// Transpose a matrix
pub fn transpose(m: Mat4) -> Mat4 {
    [
        [m[0][0], m[1][0], m[2][0], m[3][0]],
        [m[0][1], m[1][1], m[2][1], m[3][1]],
        [m[0][2], m[1][2], m[2][2], m[3][2]],
        [m[0][3], m[1][3], m[2][3], m[3][3]],
    ]
}

/// Strip the translation, keeping the upper 3x3 block
///
/// Scene transforms are rigid (rotations and translations only), so this is
/// also the normal matrix.
pub fn rotation_part(m: Mat4) -> Mat4 {
    let mut r = m;
    r[3] = [0.0, 0.0, 0.0, 1.0];
    r[0][3] = 0.0;
    r[1][3] = 0.0;
    r[2][3] = 0.0;
    r
}

/// Get the translation column of a matrix
pub fn get_translation(m: Mat4) -> Vec3 {
    Vec3::new(m[3][0], m[3][1], m[3][2])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn mat_approx_eq(a: Mat4, b: Mat4) -> bool {
        for i in 0..4 {
            for j in 0..4 {
                if !approx_eq(a[i][j], b[i][j]) {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_identity() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(transform_point(IDENTITY, p), p));
    }

    #[test]
    fn test_translation_moves_points_not_vectors() {
        let m = translation(Vec3::new(10.0, -5.0, 2.0));
        let p = transform_point(m, Vec3::new(1.0, 1.0, 1.0));
        assert!(vec_approx_eq(p, Vec3::new(11.0, -4.0, 3.0)));

        let v = transform_vector(m, Vec3::new(1.0, 1.0, 1.0));
        assert!(vec_approx_eq(v, Vec3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_rotation_x_quarter_turn() {
        let m = rotation_deg(Vec3::X, 90.0);

        // Y should go to Z
        let result = transform_vector(m, Vec3::Y);
        assert!(vec_approx_eq(result, Vec3::Z), "Y should become Z, got {:?}", result);

        // Z should go to -Y
        let result = transform_vector(m, Vec3::Z);
        assert!(vec_approx_eq(result, -Vec3::Y), "Z should become -Y, got {:?}", result);

        // X should be unchanged
        let result = transform_vector(m, Vec3::X);
        assert!(vec_approx_eq(result, Vec3::X));
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        // Z goes to X under a right-handed Y rotation
        let m = rotation_deg(Vec3::Y, 90.0);
        let result = transform_vector(m, Vec3::Z);
        assert!(vec_approx_eq(result, Vec3::X), "Z should become X, got {:?}", result);
    }

    #[test]
    fn test_rotation_zero_axis_is_identity() {
        assert!(mat_approx_eq(rotation_deg(Vec3::ZERO, 45.0), IDENTITY));
    }

    #[test]
    fn test_rotation_axis_is_normalized() {
        let a = rotation_deg(Vec3::new(0.0, 5.0, 0.0), 30.0);
        let b = rotation_deg(Vec3::Y, 30.0);
        assert!(mat_approx_eq(a, b));
    }

    #[test]
    fn test_mul_identity() {
        let a = rotation_deg(Vec3::Z, 30.0);
        assert!(mat_approx_eq(mul(IDENTITY, a), a));
        assert!(mat_approx_eq(mul(a, IDENTITY), a));
    }

    #[test]
    fn test_mul_composition() {
        // Two 45° rotations should equal one 90° rotation
        let r45 = rotation_deg(Vec3::Y, 45.0);
        let r90 = rotation_deg(Vec3::Y, 90.0);
        assert!(mat_approx_eq(mul(r45, r45), r90));
    }

    #[test]
    fn test_mul_applies_right_operand_first() {
        // Translate then rotate: rotate(translate(p))
        let t = translation(Vec3::new(0.0, 0.0, -500.0));
        let r = rotation_deg(Vec3::Y, 90.0);
        let p = transform_point(mul(r, t), Vec3::ZERO);
        // (0, 0, -500) rotated a quarter turn about Y lands on -X
        assert!(vec_approx_eq(p, Vec3::new(-500.0, 0.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn test_transpose_of_rotation_is_inverse() {
        let r = rotation_deg(Vec3::new(1.0, 2.0, 3.0), 37.0);
        assert!(mat_approx_eq(mul(r, transpose(r)), IDENTITY));
    }

    #[test]
    fn test_rotation_part_drops_translation() {
        let m = mul(translation(Vec3::new(4.0, 5.0, 6.0)), rotation_deg(Vec3::X, 20.0));
        let r = rotation_part(m);
        assert_eq!(get_translation(r), Vec3::ZERO);
        assert!(mat_approx_eq(r, rotation_deg(Vec3::X, 20.0)));
        assert_eq!(get_translation(m), Vec3::new(4.0, 5.0, 6.0));
    }
}
