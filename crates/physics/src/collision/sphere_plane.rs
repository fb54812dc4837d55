//! Sphere-plane collision detection

use glam::Vec3;

use super::ContactPoint;
use crate::types::Pose;

/// Detect a sphere resting on or sunk into a plane.
///
/// The plane's outward normal is the local `+Z` axis of `plane`. The returned
/// normal points from the sphere into the plane.
pub fn detect_sphere_plane(center: Vec3, radius: f32, plane: &Pose) -> Option<ContactPoint> {
    let normal = plane.orientation * Vec3::Z;
    let distance = (center - plane.position).dot(normal);

    if distance < radius {
        Some(ContactPoint {
            point: center - normal * radius,
            normal: -normal,
            depth: radius - distance,
        })
    } else {
        None
    }
}
