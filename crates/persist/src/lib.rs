//! Persistence: append-only checkpoint files and the high-score table.
//!
//! # Invariants
//! - A checkpoint file is written once and never opened for writing again.
//! - Every write lands in a temporary sibling first and is renamed into place.
//! - Checkpoints are content-hashed and verified on read.

mod checkpoint;
mod scores;
mod store;

pub use checkpoint::{Checkpoint, CheckpointRef};
pub use scores::HighScoreTable;
pub use store::{CheckpointStore, StoreError};

pub fn crate_info() -> &'static str {
    "stockroom-persist v0.1.0"
}
