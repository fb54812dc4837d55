//! Box-plane collision detection

use glam::Vec3;

use super::ContactPoint;
use crate::types::Pose;

/// Push one contact per box corner below the plane. Normals point from the
/// box into the plane.
pub fn detect_box_plane(
    box_pose: &Pose,
    half_extents: Vec3,
    plane: &Pose,
    out: &mut Vec<ContactPoint>,
) {
    let normal = plane.orientation * Vec3::Z;

    for i in 0..8 {
        let corner = Vec3::new(
            if i & 1 == 0 { -half_extents.x } else { half_extents.x },
            if i & 2 == 0 { -half_extents.y } else { half_extents.y },
            if i & 4 == 0 { -half_extents.z } else { half_extents.z },
        );
        let world = box_pose.transform_point(corner);
        let distance = (world - plane.position).dot(normal);
        if distance < 0.0 {
            out.push(ContactPoint {
                point: world,
                normal: -normal,
                depth: -distance,
            });
        }
    }
}
