//! # Body Registry
//!
//! Owns every rigid body in a world. Bodies live in a dense arena indexed by
//! [`BodyHandle`]; iteration order is creation order. Tracked bodies are also
//! assigned a dense snapshot slot, again in creation order, which is the index
//! the presentation side uses to match snapshot entries with visuals.

use glam::{Mat3, Quat, Vec3};
use tracing::info;

use crate::builder::BodyDesc;
use crate::error::{PhysicsError, Result};
use crate::shapes::{Aabb, ShapeInstance};
use crate::types::{BodyHandle, BodyKind, CollisionFilter, ImpactTag, Material, Pose, SleepState};

#[derive(Debug, Clone)]
pub struct RigidBody {
    pub(crate) handle: BodyHandle,
    pub(crate) kind: BodyKind,
    pub(crate) shapes: Vec<ShapeInstance>,
    pub(crate) pose: Pose,
    pub(crate) linear_velocity: Vec3,
    pub(crate) angular_velocity: Vec3,
    pub(crate) mass: f32,
    pub(crate) inv_mass: f32,
    pub(crate) inv_inertia_local: Vec3,
    pub(crate) material: Option<Material>,
    pub(crate) filter: CollisionFilter,
    pub(crate) impact_tag: Option<ImpactTag>,
    pub(crate) tracked: bool,
    pub(crate) sleep_state: SleepState,
    pub(crate) sleepy_since: f64,
}

impl RigidBody {
    /// The massless, shapeless body the drag constraint pulls towards.
    pub(crate) fn anchor(handle: BodyHandle) -> Self {
        Self {
            handle,
            kind: BodyKind::Static,
            shapes: Vec::new(),
            pose: Pose::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 0.0,
            inv_mass: 0.0,
            inv_inertia_local: Vec3::ZERO,
            material: None,
            filter: CollisionFilter::NONE,
            impact_tag: None,
            tracked: false,
            sleep_state: SleepState::Awake,
            sleepy_since: 0.0,
        }
    }

    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    pub fn shapes(&self) -> &[ShapeInstance] {
        &self.shapes
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn orientation(&self) -> Quat {
        self.pose.orientation
    }

    pub fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Per-body material override; `None` means the world default applies.
    pub fn material(&self) -> Option<Material> {
        self.material
    }

    pub fn collision_filter(&self) -> CollisionFilter {
        self.filter
    }

    pub fn impact_tag(&self) -> Option<&ImpactTag> {
        self.impact_tag.as_ref()
    }

    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    pub fn sleep_state(&self) -> SleepState {
        self.sleep_state
    }

    pub fn is_asleep(&self) -> bool {
        self.sleep_state == SleepState::Asleep
    }

    /// Dynamic and not asleep: integrated and solved this step.
    pub fn is_active(&self) -> bool {
        self.is_dynamic() && !self.is_asleep()
    }

    /// Inverse inertia tensor in world space.
    pub fn inv_inertia_world(&self) -> Mat3 {
        let rot = Mat3::from_quat(self.pose.orientation);
        rot * Mat3::from_diagonal(self.inv_inertia_local) * rot.transpose()
    }

    /// Union of the shapes' world bounds; `None` if the body has no shapes or
    /// any of them is unbounded.
    pub fn world_aabb(&self) -> Option<Aabb> {
        let mut bounds: Option<Aabb> = None;
        for instance in &self.shapes {
            let aabb = instance.shape.world_aabb(&instance.world_pose(&self.pose))?;
            bounds = Some(bounds.map_or(aabb, |b| b.union(&aabb)));
        }
        bounds
    }

    pub(crate) fn speed_squared(&self) -> f32 {
        self.linear_velocity.length_squared() + self.angular_velocity.length_squared()
    }

    /// Apply an impulse at a world-space point. Static bodies ignore it.
    pub(crate) fn apply_impulse(&mut self, impulse: Vec3, world_point: Vec3) {
        if !self.is_dynamic() {
            return;
        }
        self.linear_velocity += impulse * self.inv_mass;
        let r = world_point - self.pose.position;
        self.angular_velocity += self.inv_inertia_world() * r.cross(impulse);
    }

    pub(crate) fn wake(&mut self) {
        if self.is_dynamic() {
            self.sleep_state = SleepState::Awake;
        }
    }

    pub(crate) fn sleep(&mut self) {
        self.sleep_state = SleepState::Asleep;
        self.linear_velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }
}

#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<RigidBody>,
    tracked: Vec<BodyHandle>,
    slots: Vec<Option<usize>>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_anchor(&mut self) -> BodyHandle {
        let handle = self.next_handle();
        self.push(RigidBody::anchor(handle));
        handle
    }

    /// Validate `desc` and register the body. Nothing is registered on error.
    pub fn create_body(&mut self, desc: BodyDesc) -> Result<BodyHandle> {
        let handle = self.next_handle();
        let body = desc.build(handle)?;
        info!(
            body = %handle,
            kind = ?body.kind,
            shapes = body.shapes.len(),
            tracked = body.tracked,
            "created body"
        );
        self.push(body);
        Ok(handle)
    }

    fn next_handle(&self) -> BodyHandle {
        BodyHandle(self.bodies.len() as u32)
    }

    fn push(&mut self, body: RigidBody) {
        let slot = if body.tracked {
            self.tracked.push(body.handle);
            Some(self.tracked.len() - 1)
        } else {
            None
        };
        self.slots.push(slot);
        self.bodies.push(body);
    }

    pub fn get(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies
            .get(handle.index())
            .ok_or(PhysicsError::InvalidHandle(handle))
    }

    pub(crate) fn get_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies
            .get_mut(handle.index())
            .ok_or(PhysicsError::InvalidHandle(handle))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RigidBody> {
        self.bodies.iter()
    }

    pub(crate) fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [RigidBody] {
        &mut self.bodies
    }

    /// Tracked handles in snapshot order.
    pub fn tracked_handles(&self) -> &[BodyHandle] {
        &self.tracked
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Snapshot slot of a tracked body.
    pub fn tracked_slot(&self, handle: BodyHandle) -> Option<usize> {
        self.slots.get(handle.index()).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;

    fn ball() -> BodyDesc {
        BodyDesc::dynamic(1.0).with_shape(Shape::Sphere { radius: 0.24 })
    }

    #[test]
    fn handles_are_dense_and_slots_follow_tracked_order() {
        let mut registry = BodyRegistry::new();
        let floor = registry
            .create_body(BodyDesc::fixed().with_shape(Shape::Plane))
            .unwrap();
        let a = registry.create_body(ball()).unwrap();
        let b = registry.create_body(ball()).unwrap();

        assert_eq!(floor, BodyHandle(0));
        assert_eq!(a, BodyHandle(1));
        assert_eq!(b, BodyHandle(2));
        assert_eq!(registry.tracked_slot(floor), None);
        assert_eq!(registry.tracked_slot(a), Some(0));
        assert_eq!(registry.tracked_slot(b), Some(1));
        assert_eq!(registry.tracked_handles(), &[a, b]);
    }

    #[test]
    fn failed_creation_registers_nothing() {
        let mut registry = BodyRegistry::new();
        let err = registry
            .create_body(BodyDesc::dynamic(1.0).with_shape(Shape::Sphere { radius: -1.0 }))
            .unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidShapeParameters(_)));
        assert!(registry.is_empty());
        assert_eq!(registry.tracked_count(), 0);
    }

    #[test]
    fn impulse_at_offset_spins_body() {
        let mut registry = BodyRegistry::new();
        let h = registry.create_body(ball()).unwrap();
        let body = registry.get_mut(h).unwrap();
        body.apply_impulse(Vec3::X, Vec3::new(0.0, 0.24, 0.0));
        assert!((body.linear_velocity().x - 1.0).abs() < 1e-6);
        assert!(body.angular_velocity().z < 0.0);
    }
}
