use glam::IVec3;
use stockroom_common::LevelId;
use stockroom_persist::{CheckpointRef, CheckpointStore, StoreError};
use stockroom_session::GameSession;

/// Session inspector for developer tooling.
///
/// Provides read-only queries against a running session and its save directory for
/// debugging and the CLI.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &GameSession) -> SessionSummary {
        let journal = session.journal();
        SessionSummary {
            level: session.level(),
            level_count: session.level_count(),
            cursor: journal.cursor(),
            turns: journal.len(),
            redo_depth: session.redo_cache().len(),
            best: session.high_scores().get(session.level()),
            player: session.grid().controlled_position(),
            solved: session.grid().is_solved(),
            state_hash: session.grid().state_hash(),
        }
    }

    /// Describe every checkpoint file in `store`, oldest first.
    pub fn list_checkpoints(store: &CheckpointStore) -> Result<Vec<CheckpointInfo>, StoreError> {
        store
            .list()?
            .into_iter()
            .map(|reference| {
                let checkpoint = store.read(&reference)?;
                Ok(CheckpointInfo {
                    reference,
                    level: checkpoint.level,
                    turns: checkpoint.turns.len(),
                    previous: checkpoint.previous,
                })
            })
            .collect()
    }
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub level: LevelId,
    pub level_count: usize,
    pub cursor: usize,
    pub turns: usize,
    pub redo_depth: usize,
    pub best: Option<u32>,
    pub player: IVec3,
    pub solved: bool,
    pub state_hash: u64,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let best = match self.best {
            Some(turns) => turns.to_string(),
            None => "-".to_string(),
        };
        write!(
            f,
            "Level {}/{}: turn {}/{} redo_depth={} best={} player=({}, {}) solved={} hash={:#018x}",
            self.level.index() + 1,
            self.level_count,
            self.cursor,
            self.turns,
            self.redo_depth,
            best,
            self.player.x,
            self.player.z,
            self.solved,
            self.state_hash,
        )
    }
}

/// One checkpoint file as seen by the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointInfo {
    pub reference: CheckpointRef,
    pub level: LevelId,
    pub turns: usize,
    pub previous: Option<CheckpointRef>,
}

impl std::fmt::Display for CheckpointInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} level={} turns={}",
            self.reference, self.level, self.turns
        )?;
        if let Some(previous) = &self.previous {
            write!(f, " previous={previous}")?;
        }
        Ok(())
    }
}
