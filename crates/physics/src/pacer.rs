//! Credit-based step pacing for the presentation side.
//!
//! The presentation loop holds a single credit: it may request a step only
//! when no step is in flight and the previous request is at least one
//! timestep old. When a snapshot arrives the next request is scheduled after
//! `max(0, timestep - elapsed_since_last_request)`, so the long-run rate
//! tracks the fixed timestep while a stalled consumer never queues work.

use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone)]
pub struct StepPacer {
    timestep: Duration,
    in_flight: bool,
    last_request: Option<Instant>,
    next_due: Option<Instant>,
    requests: u64,
}

impl StepPacer {
    pub fn new(timestep: Duration) -> Self {
        Self {
            timestep,
            in_flight: false,
            last_request: None,
            next_due: None,
            requests: 0,
        }
    }

    pub fn from_secs(timestep: f32) -> Self {
        Self::new(Duration::from_secs_f32(timestep))
    }

    /// Whether a step request should be sent at `now`. Returns `true` at most
    /// once per acknowledged snapshot.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.in_flight || self.next_due.is_some_and(|due| now < due) {
            return false;
        }
        self.in_flight = true;
        self.last_request = Some(now);
        self.requests += 1;
        true
    }

    /// Record the snapshot reply at `now` and return the delay before the
    /// next request becomes due.
    pub fn acknowledge(&mut self, now: Instant) -> Duration {
        if !self.in_flight {
            debug!("snapshot acknowledged with no step in flight");
            return Duration::ZERO;
        }
        self.in_flight = false;
        let elapsed = self
            .last_request
            .map_or(Duration::ZERO, |sent| now.saturating_duration_since(sent));
        let delay = self.timestep.saturating_sub(elapsed);
        self.next_due = Some(now + delay);
        delay
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Step requests issued so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn timestep(&self) -> Duration {
        self.timestep
    }
}
