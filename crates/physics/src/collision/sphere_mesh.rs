//! Sphere-triangle-mesh collision detection

use glam::Vec3;

use super::ContactPoint;
use crate::shapes::{Aabb, TriMesh};
use crate::types::Pose;

/// Detect a sphere touching a triangle mesh.
///
/// Only the deepest triangle contact is reported, which is enough for the
/// thin rim the mesh is used for. The normal points from the sphere into the
/// mesh.
pub fn detect_sphere_mesh(
    center: Vec3,
    radius: f32,
    mesh_pose: &Pose,
    mesh: &TriMesh,
) -> Option<ContactPoint> {
    let local = mesh_pose.inverse_transform_point(center);
    if !mesh.local_aabb().expanded(radius).contains_point(local) {
        return None;
    }

    let radius_squared = radius * radius;
    let mut best: Option<(Vec3, f32, [Vec3; 3])> = None;

    for tri in mesh.triangles() {
        let bounds = Aabb::from_points(&tri)?;
        if !bounds.expanded(radius).contains_point(local) {
            continue;
        }
        let closest = closest_point_on_triangle(local, tri[0], tri[1], tri[2]);
        let distance_squared = (local - closest).length_squared();
        if distance_squared < radius_squared
            && best.map_or(true, |(_, d, _)| distance_squared < d)
        {
            best = Some((closest, distance_squared, tri));
        }
    }

    let (closest, distance_squared, tri) = best?;
    let distance = distance_squared.sqrt();
    let outward = if distance > 1e-6 {
        (local - closest) / distance
    } else {
        // Centre lies on the triangle itself.
        (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero()
    };
    if outward == Vec3::ZERO {
        return None;
    }

    let outward = mesh_pose.orientation * outward;
    Some(ContactPoint {
        point: mesh_pose.transform_point(closest),
        normal: -outward,
        depth: radius - distance,
    })
}

/// Closest point to `p` on triangle `abc` (Voronoi region walk).
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }

    let sum = va + vb + vc;
    if sum.abs() < f32::EPSILON {
        return a;
    }
    a + ab * (vb / sum) + ac * (vc / sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn closest_point_regions() {
        let (a, b, c) = (Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(closest_point_on_triangle(Vec3::new(-1.0, -1.0, 0.0), a, b, c), a);
        assert_eq!(closest_point_on_triangle(Vec3::new(2.0, -0.5, 0.0), a, b, c), b);
        let edge = closest_point_on_triangle(Vec3::new(0.5, -1.0, 0.0), a, b, c);
        assert!((edge - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
        let face = closest_point_on_triangle(Vec3::new(0.2, 0.2, 3.0), a, b, c);
        assert!((face - Vec3::new(0.2, 0.2, 0.0)).length() < 1e-6);
    }

    #[test]
    fn ball_resting_on_horizontal_rim() {
        let rim = TriMesh::torus(0.35, 0.025, 16, 75, TAU).unwrap();
        // Lay the torus flat at y = 3.
        let pose = Pose::new(
            Vec3::new(0.0, 3.0, 0.0),
            Quat::from_axis_angle(Vec3::NEG_X, FRAC_PI_2),
        );
        // Ball just above the rim tube on the +X side.
        let center = Vec3::new(0.35, 3.0 + 0.025 + 0.2, 0.0);
        let c = detect_sphere_mesh(center, 0.24, &pose, &rim).unwrap();
        assert!(c.normal.y < -0.9, "normal {:?}", c.normal);
        assert!(c.depth > 0.0 && c.depth < 0.05, "depth {}", c.depth);
    }

    #[test]
    fn ball_through_the_middle_misses() {
        let rim = TriMesh::torus(0.35, 0.025, 16, 75, TAU).unwrap();
        let pose = Pose::from_orientation(Quat::from_axis_angle(Vec3::NEG_X, FRAC_PI_2));
        assert!(detect_sphere_mesh(Vec3::ZERO, 0.24, &pose, &rim).is_none());
        assert!(detect_sphere_mesh(Vec3::new(0.0, 2.0, 0.0), 0.24, &pose, &rim).is_none());
    }
}
