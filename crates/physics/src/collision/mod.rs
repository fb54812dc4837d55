//! # Collision Detection
//!
//! Broad phase pair pruning and per-shape-pair narrow phase. Detectors work
//! on world-space shape placements and append [`ContactPoint`]s whose normal
//! points from the first shape towards the second.

mod box_plane;
mod broad_phase;
mod sphere_box;
mod sphere_mesh;
mod sphere_plane;
mod sphere_sphere;

pub use box_plane::detect_box_plane;
pub use broad_phase::{choose_axis, sweep_and_prune, Proxy};
pub use sphere_box::detect_sphere_box;
pub use sphere_mesh::{closest_point_on_triangle, detect_sphere_mesh};
pub use sphere_plane::detect_sphere_plane;
pub use sphere_sphere::detect_sphere_sphere;

use glam::Vec3;

use crate::registry::RigidBody;
use crate::shapes::Shape;
use crate::types::{BodyHandle, Pose};

/// Contact between two shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// Contact point in world space
    pub point: Vec3,
    /// Unit normal from the first shape towards the second
    pub normal: Vec3,
    /// Penetration depth (positive when overlapping)
    pub depth: f32,
}

impl ContactPoint {
    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Contact between two bodies, ready for the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub point: Vec3,
    /// From `body_a` towards `body_b`.
    pub normal: Vec3,
    pub depth: f32,
}

/// Dispatch on the shape pair. Unsupported pairs produce no contacts.
pub fn collide_shapes(
    shape_a: &Shape,
    pose_a: &Pose,
    shape_b: &Shape,
    pose_b: &Pose,
    out: &mut Vec<ContactPoint>,
) {
    match (shape_a, shape_b) {
        (Shape::Sphere { radius }, Shape::Plane) => {
            out.extend(detect_sphere_plane(pose_a.position, *radius, pose_b));
        }
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => {
            out.extend(detect_sphere_sphere(pose_a.position, *ra, pose_b.position, *rb));
        }
        (Shape::Sphere { radius }, Shape::Box { half_extents }) => {
            out.extend(detect_sphere_box(pose_a.position, *radius, pose_b, *half_extents));
        }
        (Shape::Sphere { radius }, Shape::TriangleMesh(mesh)) => {
            out.extend(detect_sphere_mesh(pose_a.position, *radius, pose_b, mesh));
        }
        (Shape::Box { half_extents }, Shape::Plane) => {
            detect_box_plane(pose_a, *half_extents, pose_b, out);
        }
        (Shape::Plane, Shape::Sphere { .. } | Shape::Box { .. })
        | (Shape::Box { .. } | Shape::TriangleMesh(_), Shape::Sphere { .. }) => {
            let start = out.len();
            collide_shapes(shape_b, pose_b, shape_a, pose_a, out);
            for contact in &mut out[start..] {
                *contact = contact.flipped();
            }
        }
        _ => {}
    }
}

/// Narrow phase for one body pair: every shape of `a` against every shape of `b`.
pub fn collide_bodies(
    a: &RigidBody,
    b: &RigidBody,
    scratch: &mut Vec<ContactPoint>,
    out: &mut Vec<Contact>,
) {
    scratch.clear();
    for shape_a in a.shapes() {
        let pose_a = shape_a.world_pose(&a.pose());
        for shape_b in b.shapes() {
            let pose_b = shape_b.world_pose(&b.pose());
            collide_shapes(&shape_a.shape, &pose_a, &shape_b.shape, &pose_b, scratch);
        }
    }
    out.extend(scratch.drain(..).map(|c| Contact {
        body_a: a.handle(),
        body_b: b.handle(),
        point: c.point,
        normal: c.normal,
        depth: c.depth,
    }));
}
