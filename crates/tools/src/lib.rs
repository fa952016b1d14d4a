//! Developer tooling: session inspector and checkpoint listing.
//!
//! # Invariants
//! - Tools only read; nothing here mutates a session or the save directory.

pub mod inspector;

pub use inspector::{CheckpointInfo, SessionInspector, SessionSummary};

pub fn crate_info() -> &'static str {
    "stockroom-tools v0.1.0"
}
