//! # Collision Shapes
//!
//! The closed set of shapes the world can collide: infinite planes, spheres,
//! oriented boxes and triangle meshes. Shapes are validated once, when they are
//! constructed, so the step never sees non-physical geometry.

use std::f32::consts::TAU;

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::types::Pose;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Infinite half-space bounded by the local XY plane; the outward normal
    /// is local `+Z`.
    Plane,
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    TriangleMesh(TriMesh),
}

impl Shape {
    pub fn sphere(radius: f32) -> Result<Self> {
        let shape = Shape::Sphere { radius };
        shape.validate()?;
        Ok(shape)
    }

    pub fn cuboid(half_extents: Vec3) -> Result<Self> {
        let shape = Shape::Box { half_extents };
        shape.validate()?;
        Ok(shape)
    }

    pub fn mesh(mesh: TriMesh) -> Self {
        Shape::TriangleMesh(mesh)
    }

    /// Reject geometry that cannot be simulated.
    pub fn validate(&self) -> Result<()> {
        match self {
            Shape::Plane => Ok(()),
            Shape::Sphere { radius } => {
                if radius.is_finite() && *radius > 0.0 {
                    Ok(())
                } else {
                    Err(PhysicsError::InvalidShapeParameters(format!(
                        "sphere radius must be positive and finite, got {radius}"
                    )))
                }
            }
            Shape::Box { half_extents } => {
                if half_extents.is_finite() && half_extents.min_element() > 0.0 {
                    Ok(())
                } else {
                    Err(PhysicsError::InvalidShapeParameters(format!(
                        "box half extents must be positive and finite, got {half_extents}"
                    )))
                }
            }
            Shape::TriangleMesh(mesh) => mesh.validate(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Shape::Plane)
    }

    /// World-space bounds of the shape placed at `pose`; `None` for planes.
    pub fn world_aabb(&self, pose: &Pose) -> Option<Aabb> {
        match self {
            Shape::Plane => None,
            Shape::Sphere { radius } => Some(Aabb::from_center_half_extents(
                pose.position,
                Vec3::splat(*radius),
            )),
            Shape::Box { half_extents } => Some(Aabb::from_center_half_extents(
                pose.position,
                rotated_half_extents(pose, *half_extents),
            )),
            Shape::TriangleMesh(mesh) => {
                let local = mesh.local_aabb();
                let center = pose.transform_point(local.center());
                Some(Aabb::from_center_half_extents(
                    center,
                    rotated_half_extents(pose, local.half_extents()),
                ))
            }
        }
    }

    /// Principal moments of inertia for a body of `mass` made of this shape.
    pub fn principal_inertia(&self, mass: f32) -> Vec3 {
        match self {
            Shape::Plane => Vec3::ZERO,
            Shape::Sphere { radius } => Vec3::splat(0.4 * mass * radius * radius),
            Shape::Box { half_extents } => box_inertia(mass, *half_extents),
            Shape::TriangleMesh(mesh) => box_inertia(mass, mesh.local_aabb().half_extents()),
        }
    }
}

fn box_inertia(mass: f32, half_extents: Vec3) -> Vec3 {
    let size = half_extents * 2.0;
    let sq = size * size;
    Vec3::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) * (mass / 12.0)
}

fn rotated_half_extents(pose: &Pose, half_extents: Vec3) -> Vec3 {
    let rot = Mat3::from_quat(pose.orientation);
    let abs = Mat3::from_cols(rot.x_axis.abs(), rot.y_axis.abs(), rot.z_axis.abs());
    abs * half_extents
}

/// A shape attached to a body with a local offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeInstance {
    pub shape: Shape,
    pub offset: Pose,
}

impl ShapeInstance {
    pub fn new(shape: Shape, offset: Pose) -> Self {
        Self { shape, offset }
    }

    pub fn world_pose(&self, body: &Pose) -> Pose {
        body.compose(&self.offset)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::new(*first, *first), |acc, p| Self {
            min: acc.min.min(*p),
            max: acc.max.max(*p),
        }))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn expanded(&self, margin: f32) -> Aabb {
        Aabb {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Indexed triangle mesh with a cached local bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriMesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    local_aabb: Aabb,
}

impl TriMesh {
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Result<Self> {
        let local_aabb = Aabb::from_points(&vertices).ok_or_else(|| {
            PhysicsError::InvalidShapeParameters("triangle mesh has no vertices".into())
        })?;
        let mesh = Self {
            vertices,
            indices,
            local_aabb,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Build a torus lying in the local XY plane, centred on the origin.
    ///
    /// `radius` is the distance from the centre to the middle of the tube and
    /// `tube` the tube radius. Vertices run ring by ring around the tube
    /// (`radial_segments + 1` rings of `tubular_segments + 1` vertices), two
    /// triangles per quad.
    pub fn torus(
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
        arc: f32,
    ) -> Result<Self> {
        if !(radius > 0.0 && tube > 0.0 && arc > 0.0 && arc <= TAU) {
            return Err(PhysicsError::InvalidShapeParameters(format!(
                "torus needs positive radius/tube and arc in (0, 2pi], got {radius}/{tube}/{arc}"
            )));
        }
        if radial_segments == 0 || tubular_segments == 0 {
            return Err(PhysicsError::InvalidShapeParameters(
                "torus needs at least one radial and tubular segment".into(),
            ));
        }

        let row = tubular_segments.checked_add(1);
        let counts = row.and_then(|row| {
            let vertex_count = radial_segments.checked_add(1)?.checked_mul(row)?;
            let index_count = radial_segments.checked_mul(tubular_segments)?.checked_mul(6)?;
            Some((row, vertex_count, index_count))
        });
        let Some((row, vertex_count, index_count)) = counts else {
            return Err(PhysicsError::InvalidShapeParameters(format!(
                "torus with {radial_segments}x{tubular_segments} segments is too large"
            )));
        };

        let mut vertices = Vec::with_capacity(vertex_count as usize);
        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32 * TAU;
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * arc;
                let ring = radius + tube * v.cos();
                vertices.push(Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin()));
            }
        }

        let mut indices = Vec::with_capacity(index_count as usize);
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self::new(vertices, indices)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn local_aabb(&self) -> &Aabb {
        &self.local_aabb
    }

    /// Iterate the triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    fn validate(&self) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(PhysicsError::InvalidShapeParameters(
                "triangle mesh has no vertices".into(),
            ));
        }
        if self.indices.is_empty() || self.indices.len() % 3 != 0 {
            return Err(PhysicsError::InvalidShapeParameters(format!(
                "triangle mesh index count must be a positive multiple of three, got {}",
                self.indices.len()
            )));
        }
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= self.vertices.len()) {
            return Err(PhysicsError::InvalidShapeParameters(format!(
                "triangle mesh index {bad} out of range for {} vertices",
                self.vertices.len()
            )));
        }
        if !self.vertices.iter().all(|v| v.is_finite()) {
            return Err(PhysicsError::InvalidShapeParameters(
                "triangle mesh has non-finite vertices".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn rejects_non_physical_spheres() {
        assert!(Shape::sphere(0.24).is_ok());
        for bad in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            assert!(
                matches!(Shape::sphere(bad), Err(PhysicsError::InvalidShapeParameters(_))),
                "radius {bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_flat_boxes() {
        assert!(Shape::cuboid(Vec3::new(0.9, 0.6, 0.015)).is_ok());
        assert!(Shape::cuboid(Vec3::new(0.9, 0.0, 0.015)).is_err());
    }

    #[test]
    fn torus_layout_matches_segment_counts() {
        let mesh = TriMesh::torus(0.35, 0.025, 16, 75, TAU).expect("valid torus");
        assert_eq!(mesh.vertices().len(), 17 * 76);
        assert_eq!(mesh.triangle_count(), 16 * 75 * 2);

        let aabb = mesh.local_aabb();
        assert!((aabb.max.x - 0.375).abs() < 1e-4, "outer radius {}", aabb.max.x);
        assert!((aabb.max.z - 0.025).abs() < 1e-4, "tube radius {}", aabb.max.z);
    }

    #[test]
    fn torus_rejects_degenerate_parameters() {
        assert!(TriMesh::torus(0.35, 0.025, 0, 75, TAU).is_err());
        assert!(TriMesh::torus(-1.0, 0.025, 16, 75, TAU).is_err());
    }

    #[test]
    fn torus_rejects_segment_counts_that_overflow() {
        for (radial, tubular) in [(u32::MAX, 2), (2, u32::MAX), (70_000, 70_000)] {
            let err = TriMesh::torus(0.35, 0.025, radial, tubular, TAU).unwrap_err();
            assert!(matches!(err, PhysicsError::InvalidShapeParameters(_)));
        }
    }

    #[test]
    fn mesh_rejects_bad_indices() {
        let verts = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!(TriMesh::new(verts.clone(), vec![0, 1, 2]).is_ok());
        assert!(TriMesh::new(verts.clone(), vec![0, 1]).is_err());
        assert!(TriMesh::new(verts, vec![0, 1, 3]).is_err());
        assert!(TriMesh::new(Vec::new(), vec![0, 1, 2]).is_err());
    }

    #[test]
    fn rotated_box_bounds_grow() {
        let shape = Shape::cuboid(Vec3::new(1.0, 0.1, 0.1)).expect("valid box");
        let pose = Pose::from_orientation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let aabb = shape.world_aabb(&pose).expect("bounded");
        assert!((aabb.max.y - 1.0).abs() < 1e-5);
        assert!((aabb.max.x - 0.1).abs() < 1e-5);
    }

    #[test]
    fn planes_are_unbounded() {
        assert!(Shape::Plane.world_aabb(&Pose::IDENTITY).is_none());
        assert!(Shape::Plane.is_unbounded());
    }

    #[test]
    fn sphere_inertia() {
        let i = Shape::Sphere { radius: 0.5 }.principal_inertia(2.0);
        assert!((i.x - 0.2).abs() < 1e-6);
    }
}
