//! Matrix builders shared by transforms, bones and the skinning pass.
//!
//! Vectors and matrices are plain `glam` types. Rotations are stored as
//! Euler angles in radians and always expand to `Rx * Ry * Rz`, the same
//! order the renderer applies them in.

use glam::{Mat3, Mat4, Vec3};

/// Determinant magnitude below which a matrix is treated as singular.
pub const SINGULAR_EPSILON: f32 = 1e-8;

/// Builds `Rx * Ry * Rz` from Euler angles in radians.
#[inline]
#[must_use]
pub fn rotation_matrix(euler: Vec3) -> Mat4 {
    Mat4::from_rotation_x(euler.x) * Mat4::from_rotation_y(euler.y) * Mat4::from_rotation_z(euler.z)
}

/// Local matrix of a scene transform: `T * S * R`.
#[inline]
#[must_use]
pub fn trs_matrix(translation: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(translation) * Mat4::from_scale(scale) * rotation_matrix(rotation)
}

/// Pose matrix of a bone in its parent space: `T * R`.
#[inline]
#[must_use]
pub fn pose_matrix(translation: Vec3, rotation: Vec3) -> Mat4 {
    Mat4::from_translation(translation) * rotation_matrix(rotation)
}

/// Inverse-transpose of the upper 3x3 block, used to carry normals.
///
/// The result is not normalized; callers renormalize transformed normals.
/// A singular or non-finite upper block yields `None`.
#[must_use]
pub fn normal_matrix(m: &Mat4) -> Option<Mat3> {
    let upper = Mat3::from_mat4(*m);
    let det = upper.determinant();
    if !(det.is_finite() && det.abs() >= SINGULAR_EPSILON) {
        return None;
    }
    Some(upper.inverse().transpose())
}

/// Returns `true` when `m` can be inverted safely.
#[inline]
#[must_use]
pub fn is_invertible(m: &Mat4) -> bool {
    let det = m.determinant();
    det.is_finite() && det.abs() >= SINGULAR_EPSILON
}

/// Normalizes `v`, leaving zero-length vectors untouched.
#[inline]
#[must_use]
pub fn normalize_or_keep(v: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotation_order_is_x_then_y_then_z() {
        let euler = Vec3::new(0.3, -0.7, 1.1);
        let expected =
            Mat4::from_rotation_x(0.3) * Mat4::from_rotation_y(-0.7) * Mat4::from_rotation_z(1.1);
        assert!(rotation_matrix(euler).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn normal_matrix_of_rotation_is_rotation() {
        let m = pose_matrix(Vec3::new(4.0, 5.0, 6.0), Vec3::new(0.0, FRAC_PI_2, 0.0));
        let nm = normal_matrix(&m).unwrap();
        assert!(nm.abs_diff_eq(Mat3::from_mat4(m), 1e-5));
    }

    #[test]
    fn normal_matrix_rejects_flattened_scale() {
        let m = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(normal_matrix(&m).is_none());
        assert!(!is_invertible(&m));
    }

    #[test]
    fn normal_matrix_rejects_nan() {
        let m = pose_matrix(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(normal_matrix(&m).is_none());
    }
}
