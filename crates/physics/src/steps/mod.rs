//! Per-step solver stages run by [`crate::World::step`] after the narrow phase.

pub mod contact;
pub mod joint;
pub mod sleep;

pub use contact::{ContactConstraint, SolverBody};
pub use joint::DragConstraint;
