//! # Simulation World
//!
//! [`World`] owns the body registry, the optional drag constraint and the
//! simulation clock. Each call to [`World::step`] advances exactly one fixed
//! timestep, independent of wall-clock time:
//!
//! 1. apply gravity and damping to awake dynamic bodies,
//! 2. sweep-and-prune broad phase,
//! 3. narrow phase per shape pair,
//! 4. wake sleepers hit by moving bodies,
//! 5. emit collision events for pairs that just started touching,
//! 6. sequential-impulse velocity solve (drag joint, then contacts),
//! 7. position correction,
//! 8. integrate poses with the solved velocities,
//! 9. sleep bookkeeping.
//!
//! Everything iterates in handle order and no randomness is involved, so two
//! worlds fed the same commands produce identical snapshots.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use tracing::{debug, info};

use crate::builder::BodyDesc;
use crate::collision::{choose_axis, collide_bodies, sweep_and_prune, Contact, ContactPoint, Proxy};
use crate::config::WorldConfig;
use crate::error::Result;
use crate::events::{CollisionEvent, EventSink};
use crate::integrator::{integrate_pose, integrate_velocity};
use crate::registry::{BodyRegistry, RigidBody};
use crate::snapshot::TransformSnapshot;
use crate::steps::contact::{correct_positions, ContactConstraint, SolverBody};
use crate::steps::joint::DragConstraint;
use crate::steps::sleep::{update_sleep, wakes_on_contact};
use crate::types::{BodyHandle, Material};

/// Summary of one [`World::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Step counter after this step (the first step reports 1).
    pub step: u64,
    /// Candidate pairs that survived the broad phase.
    pub pairs: usize,
    pub contacts: usize,
    pub events: usize,
    /// Dynamic bodies still awake at the end of the step.
    pub awake: usize,
}

type BodyPair = (BodyHandle, BodyHandle);

pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) registry: BodyRegistry,
    pub(crate) anchor: BodyHandle,
    pub(crate) drag: Option<DragConstraint>,
    /// Pairs touching at the end of the previous step.
    touching: BTreeSet<BodyPair>,
    time: f64,
    steps: u64,

    proxies: Vec<Proxy>,
    pairs: Vec<BodyPair>,
    contacts: Vec<Contact>,
    scratch: Vec<ContactPoint>,
}

impl World {
    /// Create an empty world. The interaction anchor is registered first, so
    /// it always holds handle 0.
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let mut registry = BodyRegistry::new();
        let anchor = registry.insert_anchor();
        info!(
            timestep = config.timestep,
            gravity = %config.gravity,
            iterations = config.solver.iterations,
            "world created"
        );
        Ok(Self {
            config,
            registry,
            anchor,
            drag: None,
            touching: BTreeSet::new(),
            time: 0.0,
            steps: 0,
            proxies: Vec::new(),
            pairs: Vec::new(),
            contacts: Vec::new(),
            scratch: Vec::new(),
        })
    }

    pub fn create_body(&mut self, desc: BodyDesc) -> Result<BodyHandle> {
        self.registry.create_body(desc)
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.registry.get(handle)
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The massless body the drag joint pulls towards.
    pub fn anchor(&self) -> BodyHandle {
        self.anchor
    }

    /// Simulated seconds elapsed.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Apply an impulse at a world point and wake the body. Static bodies
    /// ignore impulses.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3, world_point: Vec3) -> Result<()> {
        let body = self.registry.get_mut(handle)?;
        if body.is_dynamic() {
            body.wake();
            body.apply_impulse(impulse, world_point);
        }
        Ok(())
    }

    /// Current poses of all tracked bodies, in slot order.
    pub fn snapshot(&self) -> TransformSnapshot {
        TransformSnapshot::capture(&self.registry, self.steps)
    }

    /// Advance the world by one fixed timestep.
    pub fn step<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> StepReport {
        let dt = self.config.timestep;
        self.steps += 1;

        for body in self.registry.bodies_mut() {
            integrate_velocity(body, self.config.gravity, &self.config.damping, dt);
        }

        self.find_pairs();

        self.contacts.clear();
        let bodies = self.registry.bodies();
        for &(a, b) in &self.pairs {
            collide_bodies(
                &bodies[a.index()],
                &bodies[b.index()],
                &mut self.scratch,
                &mut self.contacts,
            );
        }

        self.wake_touched();

        let mut solver_bodies: Vec<SolverBody> =
            self.registry.iter().map(SolverBody::from_body).collect();
        let gravity_step = self.config.gravity * dt;
        let mut constraints: Vec<ContactConstraint> = self
            .contacts
            .iter()
            .map(|contact| {
                let material = self.contact_material(contact);
                ContactConstraint::new(
                    contact,
                    &solver_bodies,
                    material,
                    &self.config.solver,
                    gravity_step,
                )
            })
            .collect();

        let events = self.emit_events(&constraints, sink);

        let drag = self.drag.map(|joint| (joint, self.anchor_point(&joint)));
        // Contacts go last in every pass so a dragged body cannot be pulled
        // through geometry.
        for _ in 0..self.config.solver.iterations {
            if let Some((joint, anchor)) = drag {
                joint.solve(
                    &mut solver_bodies[joint.body.index()],
                    anchor,
                    self.config.drag_stiffness,
                    dt,
                );
            }
            for constraint in &mut constraints {
                constraint.solve(&mut solver_bodies);
            }
        }
        correct_positions(&constraints, &mut solver_bodies, &self.config.solver);

        for (body, solved) in self.registry.bodies_mut().iter_mut().zip(&solver_bodies) {
            if body.is_active() {
                body.linear_velocity = solved.linear_velocity;
                body.angular_velocity = solved.angular_velocity;
                body.pose.position = solved.position;
            }
            integrate_pose(body, dt);
        }

        self.time += f64::from(dt);
        let dragged = self.dragged();
        for body in self.registry.bodies_mut() {
            if Some(body.handle) == dragged {
                body.wake();
                continue;
            }
            if update_sleep(body, self.time, &self.config.sleep) {
                debug!(body = %body.handle, time = self.time, "body fell asleep");
            }
        }

        let report = StepReport {
            step: self.steps,
            pairs: self.pairs.len(),
            contacts: self.contacts.len(),
            events,
            awake: self.registry.iter().filter(|b| b.is_active()).count(),
        };
        debug!(
            step = report.step,
            pairs = report.pairs,
            contacts = report.contacts,
            events = report.events,
            awake = report.awake,
            "stepped"
        );
        report
    }

    fn find_pairs(&mut self) {
        self.proxies.clear();
        self.proxies.extend(
            self.registry
                .iter()
                .filter(|body| !body.shapes().is_empty())
                .map(|body| Proxy {
                    handle: body.handle(),
                    aabb: body.world_aabb(),
                }),
        );

        let axis = choose_axis(self.config.broad_phase_axis, &self.proxies);
        let bodies = self.registry.bodies();
        sweep_and_prune(
            &self.proxies,
            axis,
            |a, b| pair_is_live(&bodies[a.index()], &bodies[b.index()]),
            &mut self.pairs,
        );
    }

    fn wake_touched(&mut self) {
        let bodies = self.registry.bodies();
        let sleep = &self.config.sleep;
        let mut woken = Vec::new();
        for contact in &self.contacts {
            let a = &bodies[contact.body_a.index()];
            let b = &bodies[contact.body_b.index()];
            if wakes_on_contact(a, b, sleep) {
                woken.push(a.handle());
            }
            if wakes_on_contact(b, a, sleep) {
                woken.push(b.handle());
            }
        }
        for handle in woken {
            if let Ok(body) = self.registry.get_mut(handle) {
                body.wake();
                debug!(body = %handle, "woken by contact");
            }
        }
    }

    fn contact_material(&self, contact: &Contact) -> Material {
        let default = self.config.default_material;
        let bodies = self.registry.bodies();
        let a = bodies[contact.body_a.index()].material();
        let b = bodies[contact.body_b.index()].material();
        if a.is_none() && b.is_none() {
            default
        } else {
            a.unwrap_or(default).combine(&b.unwrap_or(default))
        }
    }

    /// Report pairs that touch now but did not at the end of the last step.
    fn emit_events<S: EventSink + ?Sized>(
        &mut self,
        constraints: &[ContactConstraint],
        sink: &mut S,
    ) -> usize {
        let mut current: BTreeMap<BodyPair, f32> = BTreeMap::new();
        for (contact, constraint) in self.contacts.iter().zip(constraints) {
            let speed = current.entry((contact.body_a, contact.body_b)).or_insert(0.0);
            *speed = speed.max(constraint.approach_speed);
        }

        let bodies = self.registry.bodies();
        let mut emitted = 0;
        for (&(a, b), &impact_speed) in &current {
            if self.touching.contains(&(a, b)) {
                continue;
            }
            for (body, other) in [(a, b), (b, a)] {
                if let Some(tag) = bodies[body.index()].impact_tag() {
                    sink.emit(CollisionEvent {
                        body,
                        other,
                        tag: tag.clone(),
                        impact_speed,
                        step: self.steps,
                    });
                    emitted += 1;
                }
            }
        }

        // Pairs skipped by the broad phase because nothing in them moves are
        // still touching.
        self.touching
            .retain(|&(a, b)| !pair_is_live(&bodies[a.index()], &bodies[b.index()]));
        self.touching.extend(current.into_keys());
        emitted
    }

    pub(crate) fn anchor_point(&self, joint: &DragConstraint) -> Vec3 {
        self.registry
            .get(self.anchor)
            .map_or(Vec3::ZERO, |anchor| anchor.pose().transform_point(joint.pivot_anchor))
    }
}

/// Broad-phase admission: something in the pair moves and the filters agree.
fn pair_is_live(a: &RigidBody, b: &RigidBody) -> bool {
    (a.is_active() || b.is_active()) && a.collision_filter().allows(&b.collision_filter())
}
