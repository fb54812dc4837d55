//! Sequential-impulse contact solver.
//!
//! Contacts are turned into [`ContactConstraint`]s once per step, then solved
//! iteratively against a scratch copy of the body velocities
//! ([`SolverBody`]). Accumulated impulses are clamped so the normal impulse
//! never pulls and friction stays inside the Coulomb cone.

use glam::{Mat3, Quat, Vec3};

use crate::collision::Contact;
use crate::config::SolverConfig;
use crate::registry::RigidBody;
use crate::types::Material;

/// Velocity state of one body during the solve. Static and sleeping bodies
/// get zero inverse mass and act as immovable.
#[derive(Debug, Clone, Copy)]
pub struct SolverBody {
    pub position: Vec3,
    pub orientation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub inv_mass: f32,
    pub inv_inertia: Mat3,
}

impl SolverBody {
    pub fn from_body(body: &RigidBody) -> Self {
        let active = body.is_active();
        Self {
            position: body.position(),
            orientation: body.orientation(),
            linear_velocity: body.linear_velocity(),
            angular_velocity: body.angular_velocity(),
            inv_mass: if active { body.inv_mass() } else { 0.0 },
            inv_inertia: if active { body.inv_inertia_world() } else { Mat3::ZERO },
        }
    }

    pub fn is_movable(&self) -> bool {
        self.inv_mass > 0.0
    }

    /// Velocity of the material point at offset `r` from the centre.
    pub fn velocity_at(&self, r: Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(r)
    }

    pub fn apply_impulse(&mut self, impulse: Vec3, r: Vec3) {
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_inertia * r.cross(impulse);
    }

    /// Inverse effective mass of the point at `r` along `dir`.
    fn inverse_mass_along(&self, r: Vec3, dir: Vec3) -> f32 {
        let rn = r.cross(dir);
        self.inv_mass + (self.inv_inertia * rn).dot(rn)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContactConstraint {
    pub a: usize,
    pub b: usize,
    /// From `a` towards `b`.
    pub normal: Vec3,
    pub depth: f32,
    /// Closing speed along the normal before the solve, never negative.
    pub approach_speed: f32,
    ra: Vec3,
    rb: Vec3,
    tangents: [Vec3; 2],
    normal_mass: f32,
    tangent_mass: [f32; 2],
    friction: f32,
    target_velocity: f32,
    normal_impulse: f32,
    tangent_impulse: [f32; 2],
}

fn effective_mass(a: &SolverBody, ra: Vec3, b: &SolverBody, rb: Vec3, dir: Vec3) -> f32 {
    let k = a.inverse_mass_along(ra, dir) + b.inverse_mass_along(rb, dir);
    if k > 0.0 {
        1.0 / k
    } else {
        0.0
    }
}

impl ContactConstraint {
    /// `gravity_step` is the velocity gravity added to every movable body
    /// this step. It does not count towards the restitution threshold.
    pub fn new(
        contact: &Contact,
        bodies: &[SolverBody],
        material: Material,
        solver: &SolverConfig,
        gravity_step: Vec3,
    ) -> Self {
        let (ia, ib) = (contact.body_a.index(), contact.body_b.index());
        let (a, b) = (&bodies[ia], &bodies[ib]);
        let normal = contact.normal;
        let ra = contact.point - a.position;
        let rb = contact.point - b.position;
        let (t1, t2) = normal.any_orthonormal_pair();

        let normal_velocity = (b.velocity_at(rb) - a.velocity_at(ra)).dot(normal);
        let approach_speed = (-normal_velocity).max(0.0);
        let mut carried_velocity = normal_velocity;
        if b.is_movable() {
            carried_velocity -= gravity_step.dot(normal);
        }
        if a.is_movable() {
            carried_velocity += gravity_step.dot(normal);
        }
        let target_velocity = if -carried_velocity > solver.restitution_threshold {
            material.restitution * approach_speed
        } else {
            0.0
        };

        Self {
            a: ia,
            b: ib,
            normal,
            depth: contact.depth,
            approach_speed,
            ra,
            rb,
            tangents: [t1, t2],
            normal_mass: effective_mass(a, ra, b, rb, normal),
            tangent_mass: [
                effective_mass(a, ra, b, rb, t1),
                effective_mass(a, ra, b, rb, t2),
            ],
            friction: material.friction,
            target_velocity,
            normal_impulse: 0.0,
            tangent_impulse: [0.0; 2],
        }
    }

    /// Accumulated normal impulse so far.
    pub fn normal_impulse(&self) -> f32 {
        self.normal_impulse
    }

    /// One Gauss-Seidel pass over this contact: friction, then the normal.
    pub fn solve(&mut self, bodies: &mut [SolverBody]) {
        let mut a = bodies[self.a];
        let mut b = bodies[self.b];

        let limit = self.friction * self.normal_impulse;
        let tangents = self.tangents.iter().zip(self.tangent_mass);
        for ((&tangent, mass), accumulated) in tangents.zip(self.tangent_impulse.iter_mut()) {
            let dv = b.velocity_at(self.rb) - a.velocity_at(self.ra);
            let lambda = -dv.dot(tangent) * mass;
            let total = (*accumulated + lambda).clamp(-limit, limit);
            let applied = total - *accumulated;
            *accumulated = total;
            a.apply_impulse(-tangent * applied, self.ra);
            b.apply_impulse(tangent * applied, self.rb);
        }

        let dv = b.velocity_at(self.rb) - a.velocity_at(self.ra);
        let lambda = (self.target_velocity - dv.dot(self.normal)) * self.normal_mass;
        let total = (self.normal_impulse + lambda).max(0.0);
        let applied = total - self.normal_impulse;
        self.normal_impulse = total;
        a.apply_impulse(-self.normal * applied, self.ra);
        b.apply_impulse(self.normal * applied, self.rb);

        bodies[self.a] = a;
        bodies[self.b] = b;
    }
}

/// Push overlapping bodies apart along the contact normals.
///
/// Each contact sees the shift already applied by earlier contacts, so a box
/// resting on several corners is not over-corrected.
pub fn correct_positions(
    constraints: &[ContactConstraint],
    bodies: &mut [SolverBody],
    solver: &SolverConfig,
) {
    let mut shift = vec![Vec3::ZERO; bodies.len()];
    for c in constraints {
        let (ima, imb) = (bodies[c.a].inv_mass, bodies[c.b].inv_mass);
        let total = ima + imb;
        if total <= 0.0 {
            continue;
        }
        let depth = c.depth - (shift[c.b] - shift[c.a]).dot(c.normal);
        let correction = (depth - solver.slop).max(0.0) * solver.position_correction;
        if correction <= 0.0 {
            continue;
        }
        shift[c.a] -= c.normal * (correction * ima / total);
        shift[c.b] += c.normal * (correction * imb / total);
    }
    for (body, delta) in bodies.iter_mut().zip(shift) {
        body.position += delta;
    }
}
