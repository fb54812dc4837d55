use thiserror::Error;

use crate::types::BodyHandle;

/// Errors raised by the simulation core.
///
/// The enum is `Clone` so rejected commands can travel back over the update
/// channel to the presentation side.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("unknown body handle {0}")]
    InvalidHandle(BodyHandle),
    #[error("invalid shape parameters: {0}")]
    InvalidShapeParameters(String),
    #[error("a drag constraint is already active")]
    AlreadyDragging,
    #[error("no drag constraint is active")]
    NoActiveDrag,
    #[error(
        "malformed snapshot: expected {expected} tracked bodies, got {positions} position and {orientations} orientation floats"
    )]
    MalformedSnapshot {
        expected: usize,
        positions: usize,
        orientations: usize,
    },
    #[error("invalid world configuration: {0}")]
    InvalidConfig(String),
    #[error("simulation channel disconnected")]
    Disconnected,
    #[error("failed to start simulation thread: {0}")]
    ThreadSpawn(String),
}

pub type Result<T, E = PhysicsError> = std::result::Result<T, E>;
