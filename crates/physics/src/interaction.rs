//! # Pointer Interaction
//!
//! Grab, drag and throw a dynamic body through a point-to-point joint to the
//! world's anchor body. At most one drag is active at a time. The joint is
//! solved together with the contacts, so a held body still collides with the
//! floor and hoop instead of being teleported through them.

use glam::Vec3;
use tracing::{info, warn};

use crate::error::{PhysicsError, Result};
use crate::simulation::World;
use crate::steps::contact::SolverBody;
use crate::steps::joint::DragConstraint;
use crate::types::BodyHandle;

impl World {
    /// Attach the drag joint to `body`, with the anchor placed at `point`.
    ///
    /// The body's spin is cleared so it does not twist away on pickup.
    pub fn begin_drag(&mut self, body: BodyHandle, point: Vec3) -> Result<()> {
        if let Some(active) = self.drag {
            warn!(requested = %body, active = %active.body, "drag already active");
            return Err(PhysicsError::AlreadyDragging);
        }
        if body == self.anchor {
            return Err(PhysicsError::InvalidHandle(body));
        }
        let target = self.registry.get_mut(body)?;
        if !target.is_dynamic() {
            return Err(PhysicsError::InvalidHandle(body));
        }
        target.angular_velocity = Vec3::ZERO;
        target.wake();

        self.move_anchor(point);
        self.drag = Some(DragConstraint::centered(body));
        info!(body = %body, point = %point, "drag started");
        Ok(())
    }

    /// Move the anchor to `point` and re-solve the joint right away, so the
    /// held body already moves towards the pointer before the next step.
    pub fn update_drag(&mut self, point: Vec3) -> Result<()> {
        let joint = self.drag.ok_or(PhysicsError::NoActiveDrag)?;
        self.move_anchor(point);

        let anchor = self.anchor_point(&joint);
        let (stiffness, dt) = (self.config.drag_stiffness, self.config.timestep);
        let body = self.registry.get_mut(joint.body)?;
        body.wake();
        let mut solved = SolverBody::from_body(body);
        joint.solve(&mut solved, anchor, stiffness, dt);
        body.linear_velocity = solved.linear_velocity;
        body.angular_velocity = solved.angular_velocity;
        Ok(())
    }

    /// Remove the joint. With `throw`, the released body keeps the direction
    /// of its current velocity but its speed is clamped to
    /// [`crate::WorldConfig::max_throw_speed`]; the change is applied as an
    /// impulse through the centre of mass.
    pub fn end_drag(&mut self, throw: bool) -> Result<()> {
        let joint = self.drag.take().ok_or(PhysicsError::NoActiveDrag)?;
        let max_speed = self.config.max_throw_speed;
        let body = self.registry.get_mut(joint.body)?;

        if throw {
            let velocity = body.linear_velocity;
            let released = velocity.clamp_length_max(max_speed);
            let impulse = (released - velocity) * body.mass;
            let centre = body.position();
            body.apply_impulse(impulse, centre);
            info!(
                body = %joint.body,
                speed = body.linear_velocity.length(),
                "drag released with throw"
            );
        } else {
            info!(body = %joint.body, "drag released");
        }
        Ok(())
    }

    /// Body currently held by the drag joint.
    pub fn dragged(&self) -> Option<BodyHandle> {
        self.drag.map(|joint| joint.body)
    }

    fn move_anchor(&mut self, point: Vec3) {
        if let Ok(anchor) = self.registry.get_mut(self.anchor) {
            anchor.pose.position = point;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{BodyDesc, BodyHandle, NullSink, PhysicsError, Pose, Shape, World, WorldConfig};
    use glam::Vec3;

    fn world_with_ball(at: Vec3) -> (World, BodyHandle) {
        let mut world = World::new(WorldConfig::default()).unwrap();
        let ball = world
            .create_body(
                BodyDesc::dynamic(1.0)
                    .with_shape(Shape::Sphere { radius: 0.24 })
                    .with_pose(Pose::from_position(at))
                    .with_velocity(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0)),
            )
            .unwrap();
        (world, ball)
    }

    #[test]
    fn grab_clears_spin_and_moves_anchor() {
        let (mut world, ball) = world_with_ball(Vec3::Y);
        world.begin_drag(ball, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(world.dragged(), Some(ball));
        assert_eq!(world.body(ball).unwrap().angular_velocity(), Vec3::ZERO);
        assert_eq!(world.body(world.anchor()).unwrap().position(), Vec3::Y);
    }

    #[test]
    fn second_grab_is_rejected_without_side_effects() {
        let (mut world, ball) = world_with_ball(Vec3::Y);
        world.begin_drag(ball, Vec3::Y).unwrap();
        let err = world.begin_drag(ball, Vec3::new(5.0, 5.0, 5.0)).unwrap_err();
        assert_eq!(err, PhysicsError::AlreadyDragging);
        assert_eq!(world.dragged(), Some(ball));
        assert_eq!(world.body(world.anchor()).unwrap().position(), Vec3::Y);
    }

    #[test]
    fn drag_needs_a_dynamic_target() {
        let (mut world, _) = world_with_ball(Vec3::Y);
        let anchor = world.anchor();
        assert_eq!(
            world.begin_drag(anchor, Vec3::ZERO),
            Err(PhysicsError::InvalidHandle(anchor))
        );
        assert_eq!(
            world.begin_drag(BodyHandle(42), Vec3::ZERO),
            Err(PhysicsError::InvalidHandle(BodyHandle(42)))
        );
        let wall = world
            .create_body(BodyDesc::fixed().with_shape(Shape::Plane))
            .unwrap();
        assert!(world.begin_drag(wall, Vec3::ZERO).is_err());
        assert_eq!(world.dragged(), None);
    }

    #[test]
    fn updates_and_release_need_an_active_drag() {
        let (mut world, _) = world_with_ball(Vec3::Y);
        assert_eq!(world.update_drag(Vec3::ZERO), Err(PhysicsError::NoActiveDrag));
        assert_eq!(world.end_drag(true), Err(PhysicsError::NoActiveDrag));
    }

    #[test]
    fn throw_speed_is_clamped() {
        let (mut world, ball) = world_with_ball(Vec3::Y);
        world.begin_drag(ball, Vec3::Y).unwrap();
        world.update_drag(Vec3::new(0.0, 2.0, 0.0)).unwrap();
        let before = world.body(ball).unwrap().linear_velocity();
        assert!(before.y > 4.0, "drag should pull hard: {before:?}");

        world.end_drag(true).unwrap();
        let after = world.body(ball).unwrap().linear_velocity();
        println!("release velocity {after:?}");
        assert!(after.length() <= 4.0 + 1e-4);
        assert!(after.y > 0.0);
        assert_eq!(world.dragged(), None);
    }

    #[test]
    fn slow_release_is_not_changed() {
        let (mut world, ball) = world_with_ball(Vec3::Y);
        world.begin_drag(ball, Vec3::Y).unwrap();
        world.update_drag(Vec3::new(0.0, 1.05, 0.0)).unwrap();
        let before = world.body(ball).unwrap().linear_velocity();
        world.end_drag(true).unwrap();
        assert_eq!(world.body(ball).unwrap().linear_velocity(), before);
    }

    #[test]
    fn held_body_follows_the_anchor_and_stays_awake() {
        let (mut world, ball) = world_with_ball(Vec3::Y);
        world.begin_drag(ball, Vec3::Y).unwrap();
        for i in 0..120 {
            world.update_drag(Vec3::new(0.0, 1.0 + 0.005 * i as f32, 0.0)).unwrap();
            world.step(&mut NullSink);
        }
        let body = world.body(ball).unwrap();
        assert!(!body.is_asleep());
        assert!((body.position().y - 1.6).abs() < 0.1, "y = {}", body.position().y);
    }
}
