//! Game session: owns the loaded level, its turn journal, the checkpoint chain cursor
//! and the high-score table, and exposes the command and query surfaces.
//!
//! # Invariants
//! - Leaving a level always writes a checkpoint first; checkpoints are never edited.
//! - Committing a turn or leaving a level outside the redo path clears the redo cache.
//! - Undo never triggers level completion.

mod config;
mod redo_cache;
mod session;

pub use config::SessionConfig;
pub use redo_cache::RedoCache;
pub use session::{GameSession, Outcome, SessionError};

pub fn crate_info() -> &'static str {
    "stockroom-session v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("session"));
    }
}
