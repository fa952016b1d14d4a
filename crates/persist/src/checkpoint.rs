use serde::{Deserialize, Serialize};
use std::fmt;
use stockroom_common::LevelId;
use stockroom_kernel::Turn;

/// Stable reference to a checkpoint file: its name inside the checkpoint directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckpointRef(pub String);

impl CheckpointRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durable record of a level the player left: which level, its full turn history,
/// and the checkpoint that was active before it.
///
/// Checkpoints form a backward chain through `previous`. The grid is not stored;
/// it is rebuilt by loading the level and replaying `turns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub level: LevelId,
    pub turns: Vec<Turn>,
    pub previous: Option<CheckpointRef>,
}

impl Checkpoint {
    pub fn new(level: LevelId, turns: Vec<Turn>, previous: Option<CheckpointRef>) -> Self {
        Self {
            level,
            turns,
            previous,
        }
    }

    /// Index of the first turn that violates the `Turn` invariants, if any.
    pub fn first_malformed_turn(&self) -> Option<usize> {
        self.turns.iter().position(|turn| !turn.is_well_formed())
    }
}
