//! # Body Builder
//!
//! [`BodyDesc`] describes a body before it exists. It is plain data so it can
//! be shipped to the simulation thread inside a create command; validation
//! happens when the registry turns it into a [`RigidBody`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::registry::RigidBody;
use crate::shapes::{Shape, ShapeInstance};
use crate::types::{BodyHandle, BodyKind, CollisionFilter, ImpactTag, Material, Pose, SleepState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub mass: f32,
    pub shapes: Vec<ShapeInstance>,
    pub pose: Pose,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub material: Option<Material>,
    pub impact_tag: Option<ImpactTag>,
    pub filter: CollisionFilter,
    pub tracked: bool,
    pub asleep: bool,
}

impl BodyDesc {
    fn new(kind: BodyKind, mass: f32, tracked: bool) -> Self {
        Self {
            kind,
            mass,
            shapes: Vec::new(),
            pose: Pose::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            material: None,
            impact_tag: None,
            filter: CollisionFilter::default(),
            tracked,
            asleep: false,
        }
    }

    /// An immovable body. Not tracked unless asked for.
    pub fn fixed() -> Self {
        Self::new(BodyKind::Static, 0.0, false)
    }

    /// A simulated body of the given mass. Tracked by default.
    pub fn dynamic(mass: f32) -> Self {
        Self::new(BodyKind::Dynamic, mass, true)
    }

    #[must_use]
    pub fn with_shape(self, shape: Shape) -> Self {
        self.with_shape_offset(shape, Pose::IDENTITY)
    }

    #[must_use]
    pub fn with_shape_offset(mut self, shape: Shape, offset: Pose) -> Self {
        self.shapes.push(ShapeInstance::new(shape, offset));
        self
    }

    #[must_use]
    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    #[must_use]
    pub fn with_velocity(mut self, linear: Vec3, angular: Vec3) -> Self {
        self.linear_velocity = linear;
        self.angular_velocity = angular;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    #[must_use]
    pub fn with_impact_tag(mut self, tag: impl Into<String>) -> Self {
        self.impact_tag = Some(ImpactTag::new(tag));
        self
    }

    #[must_use]
    pub fn with_collision_filter(mut self, group: u32, mask: u32) -> Self {
        self.filter = CollisionFilter::new(group, mask);
        self
    }

    #[must_use]
    pub fn tracked(mut self, tracked: bool) -> Self {
        self.tracked = tracked;
        self
    }

    /// Start asleep: the body hangs in place until something wakes it.
    #[must_use]
    pub fn asleep(mut self) -> Self {
        self.asleep = true;
        self
    }

    pub(crate) fn build(self, handle: BodyHandle) -> Result<RigidBody> {
        if self.shapes.is_empty() {
            return Err(invalid("a body needs at least one shape".into()));
        }
        for instance in &self.shapes {
            instance.shape.validate()?;
            if !instance.offset.is_finite() {
                return Err(invalid("shape offset must be finite".into()));
            }
        }
        if !self.pose.is_finite() || self.pose.orientation.length_squared() < 1e-12 {
            return Err(invalid(format!("invalid body pose {:?}", self.pose)));
        }
        if !self.linear_velocity.is_finite() || !self.angular_velocity.is_finite() {
            return Err(invalid("initial velocity must be finite".into()));
        }
        if let Some(material) = &self.material {
            material.validate().map_err(invalid)?;
        }

        let pose = Pose::new(self.pose.position, self.pose.orientation.normalize());
        let (mass, inv_mass, inv_inertia_local, linear_velocity, angular_velocity) =
            match self.kind {
                BodyKind::Static => (0.0, 0.0, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO),
                BodyKind::Dynamic => {
                    if !(self.mass.is_finite() && self.mass > 0.0) {
                        return Err(invalid(format!(
                            "dynamic mass must be positive and finite, got {}",
                            self.mass
                        )));
                    }
                    if self.shapes.iter().any(|s| s.shape.is_unbounded()) {
                        return Err(invalid("planes can only belong to static bodies".into()));
                    }
                    let inertia = self.shapes[0].shape.principal_inertia(self.mass);
                    (
                        self.mass,
                        1.0 / self.mass,
                        inertia.recip(),
                        self.linear_velocity,
                        self.angular_velocity,
                    )
                }
            };

        Ok(RigidBody {
            handle,
            kind: self.kind,
            shapes: self.shapes,
            pose,
            linear_velocity,
            angular_velocity,
            mass,
            inv_mass,
            inv_inertia_local,
            material: self.material,
            filter: self.filter,
            impact_tag: self.impact_tag,
            tracked: self.tracked,
            sleep_state: if self.asleep && self.kind == BodyKind::Dynamic {
                SleepState::Asleep
            } else {
                SleepState::Awake
            },
            sleepy_since: 0.0,
        })
    }
}

fn invalid(message: String) -> PhysicsError {
    PhysicsError::InvalidShapeParameters(message)
}
