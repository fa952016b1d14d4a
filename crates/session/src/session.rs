use std::path::{Path, PathBuf};
use stockroom_common::{Direction, Entity, GridPos, LevelId};
use stockroom_input::Command;
use stockroom_kernel::{GridError, GridState, MoveKind, TurnJournal};
use stockroom_levels::{LevelCatalog, LevelError};
use stockroom_persist::{Checkpoint, CheckpointRef, CheckpointStore, HighScoreTable, StoreError};
use stockroom_render::GridView;

use crate::config::SessionConfig;
use crate::redo_cache::RedoCache;

/// Errors that abort a session operation.
///
/// None of these are user mistakes: they mean the level data, the save directory or
/// the journal can no longer be trusted. The session should not be used afterwards.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("level {level} is outside the catalog ({count} levels)")]
    LevelOutOfRange { level: LevelId, count: usize },
    #[error("redo chain broken: left {left}, but {loaded} points back to {found:?}")]
    RedoChainBroken {
        left: CheckpointRef,
        loaded: CheckpointRef,
        found: Option<CheckpointRef>,
    },
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed: illegal move, or nothing to undo/redo/reload.
    Ignored,
    Moved(MoveKind),
    Undone,
    Redone,
    /// The level was solved in `turns` turns. The session has already moved on to the
    /// next level unless this was the last one.
    Solved {
        level: LevelId,
        turns: u32,
        new_best: bool,
    },
    /// A different level (or a fresh copy of the same one) is now loaded.
    LevelChanged { from: LevelId, to: LevelId },
}

/// One game: the loaded level, its journal, the checkpoint chain and the high scores.
///
/// Constructed once by the entry point and driven by a single control loop.
pub struct GameSession {
    catalog: LevelCatalog,
    level: LevelId,
    grid: GridState,
    journal: TurnJournal,
    store: CheckpointStore,
    /// Checkpoint of the level the player was in before this one.
    previous: Option<CheckpointRef>,
    redo_cache: RedoCache,
    scores: HighScoreTable,
    scores_path: PathBuf,
}

impl GameSession {
    /// Load the catalog named by `config` and start a session.
    pub fn start(config: &SessionConfig) -> Result<Self, SessionError> {
        let catalog = LevelCatalog::load(&config.levels_path)?;
        Self::with_catalog(catalog, &config.save_dir, LevelId(config.start_level))
    }

    /// Start a session over an already-parsed catalog.
    pub fn with_catalog(
        catalog: LevelCatalog,
        save_dir: impl AsRef<Path>,
        start: LevelId,
    ) -> Result<Self, SessionError> {
        if catalog.is_empty() {
            return Err(LevelError::Empty.into());
        }
        let save_dir = save_dir.as_ref();
        std::fs::create_dir_all(save_dir)?;
        let store = CheckpointStore::open(save_dir)?;
        let scores_path = HighScoreTable::path_in(save_dir);
        let scores = HighScoreTable::load(&scores_path, catalog.len())?;

        let grid = build_grid(&catalog, start)?;
        tracing::info!(level = %start, levels = catalog.len(), "session started");
        Ok(Self {
            catalog,
            level: start,
            grid,
            journal: TurnJournal::new(),
            store,
            previous: None,
            redo_cache: RedoCache::new(),
            scores,
            scores_path,
        })
    }

    // ---- queries ----

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn level_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn journal(&self) -> &TurnJournal {
        &self.journal
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.scores
    }

    pub fn previous_checkpoint(&self) -> Option<&CheckpointRef> {
        self.previous.as_ref()
    }

    pub fn redo_cache(&self) -> &RedoCache {
        &self.redo_cache
    }

    pub fn checkpoint_store(&self) -> &CheckpointStore {
        &self.store
    }

    // ---- commands ----

    /// Dispatch one command.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, SessionError> {
        match command {
            Command::Move(direction) => self.move_player(direction),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Reload => self.reload_current_level(),
            Command::NextLevel => self.goto_next_level(),
            Command::PreviousLevel => self.goto_previous_level(),
        }
    }

    /// Move or push in `direction`. Illegal moves are ignored.
    pub fn move_player(&mut self, direction: Direction) -> Result<Outcome, SessionError> {
        let Some(turn) = self.grid.plan_move(direction) else {
            return Ok(Outcome::Ignored);
        };
        let kind = turn.kind();
        self.journal.commit(&mut self.grid, turn)?;
        self.redo_cache.clear();
        self.after_forward_turn(Outcome::Moved(kind))
    }

    /// Undo one turn; at the start of the level, step back into the previous checkpoint.
    pub fn undo(&mut self) -> Result<Outcome, SessionError> {
        if self.journal.undo(&mut self.grid)? {
            tracing::debug!(cursor = self.journal.cursor(), "undo");
            return Ok(Outcome::Undone);
        }
        self.revert_to_previous_checkpoint()
    }

    /// Redo one turn; at the end of the level, step forward into the cached checkpoint.
    pub fn redo(&mut self) -> Result<Outcome, SessionError> {
        if self.journal.redo(&mut self.grid)? {
            tracing::debug!(cursor = self.journal.cursor(), "redo");
            return self.after_forward_turn(Outcome::Redone);
        }
        self.forward_to_cached_checkpoint()
    }

    /// Restart the current level. Ignored if no turn has been taken.
    pub fn reload_current_level(&mut self) -> Result<Outcome, SessionError> {
        if !self.journal.can_undo() {
            return Ok(Outcome::Ignored);
        }
        self.transition_to(self.level)
    }

    pub fn goto_next_level(&mut self) -> Result<Outcome, SessionError> {
        let next = self.level.index() + 1;
        if next >= self.catalog.len() {
            return Ok(Outcome::Ignored);
        }
        self.transition_to(LevelId(next))
    }

    pub fn goto_previous_level(&mut self) -> Result<Outcome, SessionError> {
        let Some(previous) = self.level.index().checked_sub(1) else {
            return Ok(Outcome::Ignored);
        };
        self.transition_to(LevelId(previous))
    }

    /// Persist the high-score table. Call on normal teardown.
    pub fn flush_scores(&self) -> Result<(), SessionError> {
        self.scores.save(&self.scores_path)?;
        tracing::debug!(path = %self.scores_path.display(), "high scores saved");
        Ok(())
    }

    /// End the session, flushing high scores.
    pub fn shutdown(self) -> Result<(), SessionError> {
        self.flush_scores()?;
        tracing::info!(level = %self.level, "session ended");
        Ok(())
    }

    // ---- internals ----

    fn after_forward_turn(&mut self, outcome: Outcome) -> Result<Outcome, SessionError> {
        if !self.grid.is_solved() {
            return Ok(outcome);
        }
        let level = self.level;
        let turns = u32::try_from(self.journal.cursor()).unwrap_or(u32::MAX);
        let previous_best = self.scores.get(level);
        let new_best = self.scores.record(level, turns);
        if new_best {
            tracing::info!(%level, turns, ?previous_best, "new high score");
        }
        tracing::info!(%level, turns, "level solved");

        if level.index() + 1 < self.catalog.len() {
            // The checkpoint keeps the history up to the solving move, so stepping back
            // into this level lands just before the solution.
            self.journal.undo(&mut self.grid)?;
            self.transition_to(LevelId(level.index() + 1))?;
        }
        Ok(Outcome::Solved {
            level,
            turns,
            new_best,
        })
    }

    /// Leave the current level for `to`, checkpointing what the player did here.
    fn transition_to(&mut self, to: LevelId) -> Result<Outcome, SessionError> {
        let grid = build_grid(&self.catalog, to)?;
        self.journal.truncate_to_cursor();
        self.redo_cache.clear();
        let reference = self.write_current_checkpoint()?;

        let from = self.level;
        self.previous = Some(reference);
        self.install(to, grid, TurnJournal::new());
        tracing::info!(%from, %to, "level transition");
        Ok(Outcome::LevelChanged { from, to })
    }

    fn revert_to_previous_checkpoint(&mut self) -> Result<Outcome, SessionError> {
        let Some(previous) = self.previous.clone() else {
            return Ok(Outcome::Ignored);
        };
        let checkpoint = self.store.read(&previous)?;
        let grid = build_grid(&self.catalog, checkpoint.level)?;

        if self.redo_cache.is_empty() {
            let current = self.write_current_checkpoint()?;
            self.redo_cache.push(current);
        }
        self.redo_cache.push(previous);

        let from = self.level;
        self.restore(checkpoint, grid, true)?;
        Ok(Outcome::LevelChanged {
            from,
            to: self.level,
        })
    }

    fn forward_to_cached_checkpoint(&mut self) -> Result<Outcome, SessionError> {
        if self.redo_cache.len() < 2 {
            return Ok(Outcome::Ignored);
        }
        let Some(left) = self.redo_cache.pop() else {
            return Ok(Outcome::Ignored);
        };
        let Some(target) = self.redo_cache.top().cloned() else {
            return Ok(Outcome::Ignored);
        };
        let checkpoint = self.store.read(&target)?;
        if checkpoint.previous.as_ref() != Some(&left) {
            return Err(SessionError::RedoChainBroken {
                left,
                loaded: target,
                found: checkpoint.previous,
            });
        }
        let grid = build_grid(&self.catalog, checkpoint.level)?;

        let from = self.level;
        self.restore(checkpoint, grid, false)?;
        Ok(Outcome::LevelChanged {
            from,
            to: self.level,
        })
    }

    /// Load a checkpoint's level with its history. With `replay`, every turn is applied
    /// to reach the state the player left; otherwise they stay pending redo.
    fn restore(
        &mut self,
        checkpoint: Checkpoint,
        grid: GridState,
        replay: bool,
    ) -> Result<(), SessionError> {
        let Checkpoint {
            level,
            turns,
            previous,
        } = checkpoint;
        self.install(level, grid, TurnJournal::with_pending(turns));
        self.previous = previous;
        if replay {
            let _span = tracing::info_span!("checkpoint_replay", %level).entered();
            let applied = self.journal.replay(&mut self.grid)?;
            tracing::debug!(applied, "replayed checkpoint");
        }
        Ok(())
    }

    fn write_current_checkpoint(&mut self) -> Result<CheckpointRef, SessionError> {
        let checkpoint = Checkpoint::new(
            self.level,
            self.journal.turns().to_vec(),
            self.previous.clone(),
        );
        Ok(self.store.write(&checkpoint)?)
    }

    fn install(&mut self, level: LevelId, grid: GridState, journal: TurnJournal) {
        self.level = level;
        self.grid = grid;
        self.journal = journal;
        tracing::info!(
            %level,
            rows = self.grid.bounds().0,
            goals = self.grid.goal_positions().len(),
            "level loaded"
        );
    }
}

impl GridView for GameSession {
    fn entity_at(&self, pos: GridPos) -> Entity {
        self.grid.entity_at(pos)
    }

    fn grid_bounds(&self) -> (usize, usize, usize) {
        self.grid.bounds()
    }

    fn controlled_position(&self) -> GridPos {
        self.grid.controlled_position()
    }

    fn is_in_bounds(&self, pos: GridPos) -> bool {
        self.grid.is_in_bounds(pos)
    }
}

fn build_grid(catalog: &LevelCatalog, level: LevelId) -> Result<GridState, SessionError> {
    let blueprint = catalog
        .get(level)
        .ok_or(SessionError::LevelOutOfRange {
            level,
            count: catalog.len(),
        })?;
    Ok(GridState::from_blueprint(blueprint)?)
}
