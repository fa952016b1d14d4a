use crate::store::{StoreError, write_atomic};
use std::path::{Path, PathBuf};
use stockroom_common::LevelId;

/// Best (fewest-turn) completion per level, index-aligned with the level catalog.
///
/// Persisted as a JSON array of `u32 | null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreTable {
    slots: Vec<Option<u32>>,
}

impl HighScoreTable {
    /// File name of the table inside a save directory.
    pub const FILE_NAME: &'static str = "high_scores.json";

    /// Where the table lives for `save_dir`.
    pub fn path_in(save_dir: impl AsRef<Path>) -> PathBuf {
        save_dir.as_ref().join(Self::FILE_NAME)
    }

    /// All-unset table for `levels` levels.
    pub fn new(levels: usize) -> Self {
        Self {
            slots: vec![None; levels],
        }
    }

    /// Load the table at `path`.
    ///
    /// A missing file yields an all-unset table. A table whose length does not match
    /// `levels` belongs to a different collection and is rebuilt all-unset.
    pub fn load(path: impl AsRef<Path>, levels: usize) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no high-score file, starting fresh");
            return Ok(Self::new(levels));
        }
        let slots: Vec<Option<u32>> = serde_json::from_reader(std::fs::File::open(path)?)?;
        if slots.len() != levels {
            tracing::warn!(
                path = %path.display(),
                stored = slots.len(),
                expected = levels,
                "high-score table does not match level count, rebuilding"
            );
            return Ok(Self::new(levels));
        }
        Ok(Self { slots })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(&self.slots)?;
        write_atomic(path.as_ref(), &data)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, level: LevelId) -> Option<u32> {
        self.slots.get(level.index()).copied().flatten()
    }

    /// Record a completion. Keeps the minimum; returns true if `turns` is a new best.
    ///
    /// Levels outside the table are ignored.
    pub fn record(&mut self, level: LevelId, turns: u32) -> bool {
        let Some(slot) = self.slots.get_mut(level.index()) else {
            return false;
        };
        match *slot {
            Some(best) if best <= turns => false,
            _ => {
                *slot = Some(turns);
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (LevelId, Option<u32>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, best)| (LevelId(i), *best))
    }
}
