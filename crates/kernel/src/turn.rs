use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stockroom_common::{Entity, GridPos};

/// One cell's atomic mutation.
///
/// The record carries enough information to reverse itself: reverting a change is
/// applying it with `before` and `after` swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pos: GridPos,
    before: Entity,
    after: Entity,
}

impl Change {
    /// Panics if `before == after`; such a change would not be a mutation.
    pub fn new(pos: GridPos, before: Entity, after: Entity) -> Self {
        assert_ne!(before, after, "change at {pos} mutates nothing");
        Self { pos, before, after }
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    pub fn before(&self) -> Entity {
        self.before
    }

    pub fn after(&self) -> Entity {
        self.after
    }

    /// The change that undoes this one.
    pub fn inverse(&self) -> Self {
        Self {
            pos: self.pos,
            before: self.after,
            after: self.before,
        }
    }
}

/// Whether a turn was a plain step or a box push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Step,
    Push,
}

/// One user action: an ordered set of cell changes plus the controlled entity's
/// displacement. The unit of undo/redo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    changes: Vec<Change>,
    controlled_before: GridPos,
    controlled_after: GridPos,
}

impl Turn {
    /// Panics if two changes touch the same cell or the controlled entity does not move.
    pub fn new(changes: Vec<Change>, controlled_before: GridPos, controlled_after: GridPos) -> Self {
        let turn = Self {
            changes,
            controlled_before,
            controlled_after,
        };
        assert!(turn.is_well_formed(), "malformed turn: {turn:?}");
        turn
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn controlled_before(&self) -> GridPos {
        self.controlled_before
    }

    pub fn controlled_after(&self) -> GridPos {
        self.controlled_after
    }

    pub fn kind(&self) -> MoveKind {
        if self.changes.len() > 2 {
            MoveKind::Push
        } else {
            MoveKind::Step
        }
    }

    /// Check the invariants `new` enforces. Turns read back from storage bypass `new`.
    pub fn is_well_formed(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.changes.len());
        !self.changes.is_empty()
            && self.controlled_before != self.controlled_after
            && self
                .changes
                .iter()
                .all(|c| c.before != c.after && seen.insert(c.pos.to_array()))
    }
}
