//! Transform matrix utilities for snapshot poses
//!
//! Converts the position + quaternion pairs carried by snapshots into
//! column-major 4x4 matrices, the form a scene graph applies to its visuals.

use glam::{Mat4, Quat, Vec3};

use crate::types::Pose;

/// Rigid transform of a pose.
pub fn to_transform_matrix(position: Vec3, orientation: Quat) -> [[f32; 4]; 4] {
    Mat4::from_rotation_translation(orientation, position).to_cols_array_2d()
}

/// Rigid transform followed by a uniform or per-axis visual scale.
pub fn to_transform_matrix_scaled(position: Vec3, orientation: Quat, scale: Vec3) -> [[f32; 4]; 4] {
    Mat4::from_scale_rotation_translation(scale, orientation, position).to_cols_array_2d()
}

/// Transform of a visual whose mesh origin sits at `offset` in the body frame.
///
/// Applied as `T(position) * R(orientation) * T(offset)`.
pub fn to_transform_matrix_with_offset(position: Vec3, orientation: Quat, offset: &Pose) -> [[f32; 4]; 4] {
    let transform = Mat4::from_translation(position)
        * Mat4::from_quat(orientation)
        * Mat4::from_rotation_translation(offset.orientation, offset.position);
    transform.to_cols_array_2d()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let transform = to_transform_matrix(Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(transform[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(transform[1], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(transform[2], [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(transform[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_translation_only() {
        let transform = to_transform_matrix(Vec3::new(-4.5, 1.0, 0.0), Quat::IDENTITY);
        // Translation lives in the last column
        assert_eq!(transform[3], [-4.5, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_ball_visual_scale() {
        let transform = to_transform_matrix_scaled(Vec3::Y, Quat::IDENTITY, Vec3::splat(0.29));
        assert!((transform[0][0] - 0.29).abs() < 1e-6);
        assert!((transform[1][1] - 0.29).abs() < 1e-6);
        assert_eq!(transform[3], [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_offset_is_rotated_with_body() {
        let offset = Pose::from_position(Vec3::new(-0.4, 0.36, 0.0));
        let half_turn = Quat::from_rotation_y(std::f32::consts::PI);
        let transform = to_transform_matrix_with_offset(Vec3::new(-7.5, 3.0, 0.0), half_turn, &offset);
        assert!((transform[3][0] - (-7.1)).abs() < 1e-5);
        assert!((transform[3][1] - 3.36).abs() < 1e-5);
    }
}
