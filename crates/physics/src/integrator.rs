//! # Physics Integration
//!
//! Semi-implicit Euler, split in two halves around the solver: gravity and
//! damping update the velocities before contacts are solved, and the solved
//! velocities then move the pose.

use glam::{Quat, Vec3};

use crate::config::DampingConfig;
use crate::registry::RigidBody;

/// Apply gravity and damping to one body. Static and sleeping bodies are
/// left untouched.
pub fn integrate_velocity(body: &mut RigidBody, gravity: Vec3, damping: &DampingConfig, dt: f32) {
    if !body.is_active() {
        return;
    }
    body.linear_velocity += gravity * dt;
    body.linear_velocity *= (1.0 - damping.linear).powf(dt);
    body.angular_velocity *= (1.0 - damping.angular).powf(dt);
}

/// Move one body along its current velocities.
pub fn integrate_pose(body: &mut RigidBody, dt: f32) {
    if !body.is_active() {
        return;
    }
    body.pose.position += body.linear_velocity * dt;
    body.pose.orientation = integrate_orientation(body.pose.orientation, body.angular_velocity, dt);
}

/// First-order quaternion update `q += 0.5 * dt * w * q`, re-normalised.
pub fn integrate_orientation(orientation: Quat, angular_velocity: Vec3, dt: f32) -> Quat {
    if angular_velocity == Vec3::ZERO {
        return orientation;
    }
    let w = Quat::from_xyzw(angular_velocity.x, angular_velocity.y, angular_velocity.z, 0.0);
    let spin = w * orientation;
    (orientation + spin * (0.5 * dt)).normalize()
}
