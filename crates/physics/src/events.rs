//! Collision notifications emitted while a step runs.

use serde::{Deserialize, Serialize};

use crate::types::{BodyHandle, ImpactTag};

/// A pair of bodies started touching.
///
/// One event is emitted per tagged body of the pair, so a ball hitting the
/// hoop yields both a `"bounce"` and a `"hoop_hit"` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// The tagged body this event is reported for.
    pub body: BodyHandle,
    pub other: BodyHandle,
    pub tag: ImpactTag,
    /// Closing speed along the contact normal, m/s, measured before the
    /// impact was resolved.
    pub impact_speed: f32,
    /// Step counter of the step that produced the event.
    pub step: u64,
}

/// Destination for collision events.
pub trait EventSink {
    fn emit(&mut self, event: CollisionEvent);
}

impl EventSink for Vec<CollisionEvent> {
    fn emit(&mut self, event: CollisionEvent) {
        self.push(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: CollisionEvent) {}
}
