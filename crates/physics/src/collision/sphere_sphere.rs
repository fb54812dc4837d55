//! Sphere-sphere collision detection

use glam::Vec3;

use super::ContactPoint;

/// Detect overlap between two spheres. The normal points from `a` to `b`.
pub fn detect_sphere_sphere(
    center_a: Vec3,
    radius_a: f32,
    center_b: Vec3,
    radius_b: f32,
) -> Option<ContactPoint> {
    let delta = center_b - center_a;
    let distance_squared = delta.length_squared();
    let radius_sum = radius_a + radius_b;

    if distance_squared >= radius_sum * radius_sum {
        return None;
    }

    let distance = distance_squared.sqrt();
    // Coincident centres: separate along +Y.
    let normal = if distance > 1e-6 { delta / distance } else { Vec3::Y };

    Some(ContactPoint {
        point: center_a + normal * radius_a,
        normal,
        depth: radius_sum - distance,
    })
}
