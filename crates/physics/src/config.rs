//! # World Configuration
//!
//! Every tunable of the simulation in one serde-friendly struct. Missing
//! fields fall back to the defaults, so a JSON file only needs to name what it
//! changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::types::Material;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: Vec3,
    /// Fixed step length in seconds.
    pub timestep: f32,
    /// Contact material used when neither body overrides it.
    pub default_material: Material,
    pub solver: SolverConfig,
    pub broad_phase_axis: SweepAxis,
    pub sleep: SleepConfig,
    pub damping: DampingConfig,
    /// Fraction of the anchor error the drag constraint closes per step.
    pub drag_stiffness: f32,
    /// Upper bound on the speed of a thrown body.
    pub max_throw_speed: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.82, 0.0),
            timestep: 1.0 / 60.0,
            default_material: Material::default(),
            solver: SolverConfig::default(),
            broad_phase_axis: SweepAxis::X,
            sleep: SleepConfig::default(),
            damping: DampingConfig::default(),
            drag_stiffness: 0.5,
            max_throw_speed: 4.0,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(invalid(format!("gravity must be finite, got {}", self.gravity)));
        }
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(invalid(format!("timestep must be positive, got {}", self.timestep)));
        }
        if self.solver.iterations == 0 {
            return Err(invalid("solver needs at least one iteration".into()));
        }
        self.default_material.validate().map_err(invalid)?;
        self.solver.validate()?;
        self.sleep.validate()?;
        if !(self.max_throw_speed.is_finite() && self.max_throw_speed > 0.0) {
            return Err(invalid(format!(
                "max throw speed must be positive, got {}",
                self.max_throw_speed
            )));
        }
        if !(self.drag_stiffness > 0.0 && self.drag_stiffness <= 1.0) {
            return Err(invalid(format!(
                "drag stiffness must lie in (0, 1], got {}",
                self.drag_stiffness
            )));
        }
        if !(0.0..1.0).contains(&self.damping.linear) || !(0.0..1.0).contains(&self.damping.angular) {
            return Err(invalid("damping must lie in [0, 1)".into()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> PhysicsError {
    PhysicsError::InvalidConfig(message)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub iterations: u32,
    /// Approach speeds below this do not bounce.
    pub restitution_threshold: f32,
    /// Penetration left uncorrected.
    pub slop: f32,
    /// Share of the remaining penetration removed each step.
    pub position_correction: f32,
}

impl SolverConfig {
    fn validate(&self) -> Result<()> {
        if !(self.slop.is_finite() && self.slop >= 0.0) {
            return Err(invalid(format!("solver slop must be non-negative, got {}", self.slop)));
        }
        if !(0.0..=1.0).contains(&self.position_correction) {
            return Err(invalid(format!(
                "position correction must lie in [0, 1], got {}",
                self.position_correction
            )));
        }
        if !(self.restitution_threshold.is_finite() && self.restitution_threshold >= 0.0) {
            return Err(invalid(format!(
                "restitution threshold must be non-negative, got {}",
                self.restitution_threshold
            )));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            restitution_threshold: 0.5,
            slop: 0.005,
            position_correction: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepConfig {
    pub allow_sleep: bool,
    pub speed_limit: f32,
    /// Seconds a body must stay below the speed limit before it sleeps.
    pub time_limit: f32,
}

impl SleepConfig {
    fn validate(&self) -> Result<()> {
        if !(self.speed_limit.is_finite() && self.speed_limit >= 0.0) {
            return Err(invalid(format!(
                "sleep speed limit must be non-negative, got {}",
                self.speed_limit
            )));
        }
        if !(self.time_limit.is_finite() && self.time_limit >= 0.0) {
            return Err(invalid(format!(
                "sleep time limit must be non-negative, got {}",
                self.time_limit
            )));
        }
        Ok(())
    }
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            allow_sleep: true,
            speed_limit: 0.1,
            time_limit: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampingConfig {
    pub linear: f32,
    pub angular: f32,
}

impl Default for DampingConfig {
    fn default() -> Self {
        Self {
            linear: 0.01,
            angular: 0.01,
        }
    }
}

/// Axis the broad phase sorts along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepAxis {
    X,
    Y,
    Z,
    /// Re-pick every step: the axis along which body centres vary most.
    Auto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        WorldConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "timestep": 0.01, "solver": { "iterations": 4 } }"#).unwrap();
        assert!((config.timestep - 0.01).abs() < f32::EPSILON);
        assert_eq!(config.solver.iterations, 4);
        assert!((config.solver.slop - 0.005).abs() < f32::EPSILON);
        assert_eq!(config.gravity, Vec3::new(0.0, -9.82, 0.0));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = WorldConfig::default();
        config.timestep = 0.0;
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidConfig(_))));

        let mut config = WorldConfig::default();
        config.default_material.restitution = 1.5;
        assert!(config.validate().is_err());

        let mut config = WorldConfig::default();
        config.max_throw_speed = -1.0;
        assert!(config.validate().is_err());

        let mut config = WorldConfig::default();
        config.solver.iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_solver_tuning() {
        let cases: [fn(&mut SolverConfig); 5] = [
            |s| s.slop = -0.01,
            |s| s.slop = f32::NAN,
            |s| s.position_correction = 1.5,
            |s| s.position_correction = f32::NAN,
            |s| s.restitution_threshold = -1.0,
        ];
        for edit in cases {
            let mut config = WorldConfig::default();
            edit(&mut config.solver);
            assert!(
                matches!(config.validate(), Err(PhysicsError::InvalidConfig(_))),
                "{:?}",
                config.solver
            );
        }
    }

    #[test]
    fn rejects_bad_sleep_limits() {
        let cases: [fn(&mut SleepConfig); 4] = [
            |s| s.speed_limit = -0.1,
            |s| s.speed_limit = f32::INFINITY,
            |s| s.time_limit = -1.0,
            |s| s.time_limit = f32::NAN,
        ];
        for edit in cases {
            let mut config = WorldConfig::default();
            edit(&mut config.sleep);
            assert!(
                matches!(config.validate(), Err(PhysicsError::InvalidConfig(_))),
                "{:?}",
                config.sleep
            );
        }
    }

    #[test]
    fn json_with_negative_slop_is_rejected() {
        let config: WorldConfig = serde_json::from_str(r#"{ "solver": { "slop": -1.0 } }"#).unwrap();
        assert!(config.validate().is_err());
    }
}
