//! Positional ordering engine
//!
//! Lists within a board and tasks within a list keep a dense, zero-based order.
//! [`reconcile`] computes the range shifts for a move without touching storage;
//! [`MoveOrchestrator`] applies them inside one store transaction; the
//! [`positions`] helpers keep the order dense on create and delete.

mod orchestrator;
pub mod positions;
mod reconcile;

pub use orchestrator::{MoveOrchestrator, MoveOutcome, MoveRequest};
pub use reconcile::{
    clamp_index, reconcile, Delta, PositionRange, PositionShift, ReconcileInput, Reconciliation,
};
