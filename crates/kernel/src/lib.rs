//! Grid kernel: authoritative cell state, the movement rule, and the turn journal.
//!
//! # Invariants
//! - Every cell mutation goes through [`GridState::apply_turn`] or [`GridState::revert_turn`].
//! - A turn is applied atomically: all of its changes are checked against the grid first.
//! - Exactly one cell holds the controlled entity.

pub mod grid;
pub mod journal;
pub mod turn;

pub use grid::{GridError, GridState, LAYER_ABOVE, LAYER_BELOW};
pub use journal::TurnJournal;
pub use turn::{Change, MoveKind, Turn};

pub fn crate_info() -> &'static str {
    "stockroom-kernel v0.1.0"
}
