use crate::grid::{GridError, GridState};
use crate::turn::Turn;

/// Cursor-addressed turn history of the currently loaded level.
///
/// Turns before the cursor are applied to the grid; turns at or after it are pending
/// redo. Committing a new turn drops everything pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnJournal {
    turns: Vec<Turn>,
    cursor: usize,
}

impl TurnJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// A journal holding `turns` with none of them applied yet.
    pub fn with_pending(turns: Vec<Turn>) -> Self {
        Self { turns, cursor: 0 }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns currently applied to the grid.
    pub fn applied(&self) -> &[Turn] {
        &self.turns[..self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.turns.len()
    }

    /// Drop the pending redo turns.
    pub fn truncate_to_cursor(&mut self) {
        self.turns.truncate(self.cursor);
    }

    /// Append `turn` after the cursor and apply it.
    pub fn commit(&mut self, grid: &mut GridState, turn: Turn) -> Result<(), GridError> {
        grid.apply_turn(&turn)?;
        self.truncate_to_cursor();
        self.turns.push(turn);
        self.cursor = self.turns.len();
        tracing::trace!(cursor = self.cursor, "turn committed");
        Ok(())
    }

    /// Re-apply the turn at the cursor. Returns false if nothing is pending.
    pub fn redo(&mut self, grid: &mut GridState) -> Result<bool, GridError> {
        let Some(turn) = self.turns.get(self.cursor) else {
            return Ok(false);
        };
        grid.apply_turn(turn)?;
        self.cursor += 1;
        Ok(true)
    }

    /// Revert the turn before the cursor. Returns false at the start of history.
    pub fn undo(&mut self, grid: &mut GridState) -> Result<bool, GridError> {
        let Some(index) = self.cursor.checked_sub(1) else {
            return Ok(false);
        };
        grid.revert_turn(&self.turns[index])?;
        self.cursor = index;
        Ok(true)
    }

    /// Redo every pending turn. Returns how many were applied.
    pub fn replay(&mut self, grid: &mut GridState) -> Result<usize, GridError> {
        let mut applied = 0;
        while self.redo(grid)? {
            applied += 1;
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_common::Direction;
    use stockroom_levels::Blueprint;

    const OPEN_ROOM: &str = "\
######
#    #
# $ .#
# @  #
######";

    fn setup() -> (GridState, TurnJournal) {
        let grid = GridState::from_blueprint(&Blueprint::from_text(OPEN_ROOM)).unwrap();
        (grid, TurnJournal::new())
    }

    fn step(grid: &mut GridState, journal: &mut TurnJournal, dir: Direction) {
        let turn = grid.plan_move(dir).unwrap();
        journal.commit(grid, turn).unwrap();
    }

    #[test]
    fn commit_applies_and_advances() {
        let (mut grid, mut journal) = setup();
        let start = grid.controlled_position();
        step(&mut grid, &mut journal, Direction::Right);
        assert_eq!(journal.cursor(), 1);
        assert_eq!(journal.len(), 1);
        assert_eq!(grid.controlled_position(), start + Direction::Right.delta());
    }

    #[test]
    fn undo_after_move_restores_exactly() {
        let (mut grid, mut journal) = setup();
        let before = grid.clone();
        step(&mut grid, &mut journal, Direction::Up);
        assert!(journal.undo(&mut grid).unwrap());
        assert_eq!(grid, before);
        assert_eq!(journal.cursor(), 0);
        assert!(journal.can_redo());
    }

    #[test]
    fn undo_redo_roundtrip_over_many_turns() {
        let (mut grid, mut journal) = setup();
        let start = grid.clone();
        for dir in [Direction::Right, Direction::Up, Direction::Left, Direction::Up] {
            step(&mut grid, &mut journal, dir);
        }
        let end = grid.clone();

        while journal.undo(&mut grid).unwrap() {}
        assert_eq!(grid, start);

        assert_eq!(journal.replay(&mut grid).unwrap(), 4);
        assert_eq!(grid, end);
    }

    #[test]
    fn undo_on_empty_is_noop() {
        let (mut grid, mut journal) = setup();
        let before = grid.clone();
        assert!(!journal.undo(&mut grid).unwrap());
        assert_eq!(grid, before);
    }

    #[test]
    fn redo_at_end_is_noop() {
        let (mut grid, mut journal) = setup();
        step(&mut grid, &mut journal, Direction::Right);
        let before = grid.clone();
        assert!(!journal.redo(&mut grid).unwrap());
        assert_eq!(grid, before);
        assert_eq!(journal.cursor(), 1);
    }

    #[test]
    fn new_commit_discards_redo() {
        let (mut grid, mut journal) = setup();
        step(&mut grid, &mut journal, Direction::Right);
        step(&mut grid, &mut journal, Direction::Right);
        journal.undo(&mut grid).unwrap();
        assert!(journal.can_redo());

        step(&mut grid, &mut journal, Direction::Up);
        assert!(!journal.can_redo());
        assert_eq!(journal.len(), 2);
        assert!(!journal.redo(&mut grid).unwrap());
    }

    #[test]
    fn failed_commit_leaves_journal_untouched() {
        let (mut grid, mut journal) = setup();
        let turn = grid.plan_move(Direction::Right).unwrap();
        journal.commit(&mut grid, turn.clone()).unwrap();
        journal.undo(&mut grid).unwrap();
        step(&mut grid, &mut journal, Direction::Left);

        // Stale turn planned from the old position.
        assert!(journal.commit(&mut grid, turn).is_err());
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.cursor(), 1);
    }

    #[test]
    fn with_pending_starts_at_zero() {
        let (mut grid, mut journal) = setup();
        step(&mut grid, &mut journal, Direction::Right);
        step(&mut grid, &mut journal, Direction::Up);
        let turns = journal.turns().to_vec();

        let (mut fresh, _) = setup();
        let mut restored = TurnJournal::with_pending(turns);
        assert_eq!(restored.cursor(), 0);
        assert!(restored.applied().is_empty());
        restored.replay(&mut fresh).unwrap();
        assert_eq!(fresh, grid);
    }
}
