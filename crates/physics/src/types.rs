//! # Core Types
//!
//! Small value types shared by the registry, the world and the channel
//! protocol. All of them are plain data and cheap to copy or clone.

use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of a rigid body inside one [`crate::World`].
///
/// Handles are dense arena indices that are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

impl BodyHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// World-space placement of a body, or a shape's offset relative to its body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    pub fn from_orientation(orientation: Quat) -> Self {
        Self::new(Vec3::ZERO, orientation)
    }

    /// Transform a point from this pose's local frame into the parent frame.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    /// Transform a point from the parent frame into this pose's local frame.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.orientation.inverse() * (world - self.position)
    }

    /// Compose `self` (parent) with a child pose expressed in the parent's frame.
    pub fn compose(&self, child: &Pose) -> Pose {
        Pose {
            position: self.transform_point(child.position),
            orientation: (self.orientation * child.orientation).normalize(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Surface material used by the contact solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub friction: f32,
    pub restitution: f32,
}

impl Material {
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self { friction, restitution }
    }

    /// Check that friction is finite and non-negative and restitution lies
    /// in `[0, 1]`. The error names the offending coefficient.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(format!("friction must be non-negative, got {}", self.friction));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(format!("restitution must lie in [0, 1], got {}", self.restitution));
        }
        Ok(())
    }

    /// Combine two surfaces using the geometric mean of each coefficient.
    pub fn combine(&self, other: &Material) -> Material {
        Material {
            friction: (self.friction * other.friction).sqrt(),
            restitution: (self.restitution * other.restitution).sqrt(),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Immovable; infinite mass. Floor, walls and hoop frame.
    Static,
    /// Finite positive mass, integrated every awake step.
    Dynamic,
}

/// Classification carried by collision events emitted for a body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImpactTag(pub String);

impl ImpactTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImpactTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bitmask filter: two bodies may collide only when each one's group
/// intersects the other's mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub group: u32,
    pub mask: u32,
}

impl CollisionFilter {
    pub const ALL: Self = Self {
        group: 1,
        mask: u32::MAX,
    };
    pub const NONE: Self = Self { group: 0, mask: 0 };

    pub fn new(group: u32, mask: u32) -> Self {
        Self { group, mask }
    }

    pub fn allows(&self, other: &CollisionFilter) -> bool {
        (self.group & other.mask) != 0 && (other.group & self.mask) != 0
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepState {
    Awake,
    /// Below the speed limit, waiting out the time limit.
    Sleepy,
    Asleep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_filter_never_collides() {
        assert!(!CollisionFilter::NONE.allows(&CollisionFilter::ALL));
        assert!(!CollisionFilter::ALL.allows(&CollisionFilter::NONE));
        assert!(CollisionFilter::ALL.allows(&CollisionFilter::ALL));
    }

    #[test]
    fn filter_requires_both_directions() {
        let a = CollisionFilter::new(0b01, 0b10);
        let b = CollisionFilter::new(0b10, 0b00);
        assert!(!a.allows(&b));
        let c = CollisionFilter::new(0b10, 0b01);
        assert!(a.allows(&c));
    }

    #[test]
    fn pose_round_trips_points() {
        let pose = Pose::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(Vec3::Y, std::f32::consts::FRAC_PI_2),
        );
        let local = Vec3::new(0.5, -0.25, 1.0);
        let back = pose.inverse_transform_point(pose.transform_point(local));
        assert!((back - local).length() < 1e-5, "got {back:?}");
    }

    #[test]
    fn material_combine_is_geometric_mean() {
        let m = Material::new(0.25, 1.0).combine(&Material::new(1.0, 0.49));
        assert!((m.friction - 0.5).abs() < 1e-6);
        assert!((m.restitution - 0.7).abs() < 1e-6);
    }
}
