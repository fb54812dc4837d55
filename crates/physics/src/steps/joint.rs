//! Point-to-point drag joint.
//!
//! Ties a pivot on the dragged body to a pivot on the world's anchor body.
//! The anchor never moves under the solver, so only the dragged body
//! receives impulses; each solve drives the pivot velocity towards closing a
//! fixed share of the remaining gap in one step.

use glam::{Mat3, Vec3};

use super::contact::SolverBody;
use crate::types::BodyHandle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConstraint {
    pub body: BodyHandle,
    /// Pivot on the dragged body, in its local frame.
    pub pivot_body: Vec3,
    /// Pivot on the anchor body, in its local frame.
    pub pivot_anchor: Vec3,
}

impl DragConstraint {
    /// Joint through the body's centre and the anchor's origin.
    pub fn centered(body: BodyHandle) -> Self {
        Self {
            body,
            pivot_body: Vec3::ZERO,
            pivot_anchor: Vec3::ZERO,
        }
    }

    /// Apply one velocity correction to the dragged body.
    ///
    /// `anchor` is the world position of the anchor's pivot. `stiffness` is the
    /// fraction of the gap to close within `dt`.
    pub fn solve(&self, body: &mut SolverBody, anchor: Vec3, stiffness: f32, dt: f32) {
        if !body.is_movable() {
            return;
        }
        let r = body.orientation * self.pivot_body;
        let error = anchor - (body.position + r);
        let target = error * (stiffness / dt);
        let velocity_error = target - body.velocity_at(r);

        let skew = skew(r);
        let k = Mat3::from_diagonal(Vec3::splat(body.inv_mass)) - skew * body.inv_inertia * skew;
        if k.determinant().abs() < f32::EPSILON {
            return;
        }
        body.apply_impulse(k.inverse() * velocity_error, r);
    }
}

/// Cross-product matrix: `skew(r) * v == r.cross(v)`.
fn skew(r: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, r.z, -r.y),
        Vec3::new(-r.z, 0.0, r.x),
        Vec3::new(r.y, -r.x, 0.0),
    )
}
