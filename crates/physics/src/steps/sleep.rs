//! Sleep bookkeeping: awake bodies that stay slow long enough are frozen.

use crate::config::SleepConfig;
use crate::registry::RigidBody;
use crate::types::SleepState;

/// Advance one dynamic body's sleep state at world time `time`.
///
/// Returns `true` when the body falls asleep on this call.
pub fn update_sleep(body: &mut RigidBody, time: f64, config: &SleepConfig) -> bool {
    if !config.allow_sleep || !body.is_dynamic() {
        return false;
    }

    let limit_squared = config.speed_limit * config.speed_limit;
    let slow = body.speed_squared() < limit_squared;
    match body.sleep_state {
        SleepState::Awake if slow => {
            body.sleep_state = SleepState::Sleepy;
            body.sleepy_since = time;
            false
        }
        SleepState::Sleepy if !slow => {
            body.sleep_state = SleepState::Awake;
            false
        }
        SleepState::Sleepy if time - body.sleepy_since > f64::from(config.time_limit) => {
            body.sleep();
            true
        }
        _ => false,
    }
}

/// Whether a sleeping body should be woken by contact with `other`.
pub fn wakes_on_contact(sleeper: &RigidBody, other: &RigidBody, config: &SleepConfig) -> bool {
    sleeper.is_dynamic()
        && sleeper.is_asleep()
        && other.is_active()
        && other.speed_squared() >= 2.0 * config.speed_limit * config.speed_limit
}
