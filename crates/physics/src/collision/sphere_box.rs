//! Sphere-box collision detection against an oriented box

use glam::Vec3;

use super::ContactPoint;
use crate::types::Pose;

/// Detect a sphere touching an oriented box. The normal points from the
/// sphere into the box.
pub fn detect_sphere_box(
    center: Vec3,
    radius: f32,
    box_pose: &Pose,
    half_extents: Vec3,
) -> Option<ContactPoint> {
    let local = box_pose.inverse_transform_point(center);
    let closest = local.clamp(-half_extents, half_extents);
    let delta = local - closest;
    let distance_squared = delta.length_squared();

    if distance_squared >= radius * radius {
        return None;
    }

    let (outward, depth) = if distance_squared > 1e-12 {
        let distance = distance_squared.sqrt();
        (delta / distance, radius - distance)
    } else {
        // Centre inside the box: push out through the nearest face.
        let (face, distance) = closest_face(local, half_extents);
        (face, radius + distance)
    };

    let outward = box_pose.orientation * outward;
    Some(ContactPoint {
        point: center - outward * radius,
        normal: -outward,
        depth,
    })
}

/// Outward normal of the face nearest to an interior point, and the distance to it.
fn closest_face(local: Vec3, half_extents: Vec3) -> (Vec3, f32) {
    let gaps = half_extents - local.abs();
    if gaps.x <= gaps.y && gaps.x <= gaps.z {
        (Vec3::new(local.x.signum(), 0.0, 0.0), gaps.x)
    } else if gaps.y <= gaps.z {
        (Vec3::new(0.0, local.y.signum(), 0.0), gaps.y)
    } else {
        (Vec3::new(0.0, 0.0, local.z.signum()), gaps.z)
    }
}
