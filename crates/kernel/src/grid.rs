use glam::IVec3;
use stockroom_common::{Direction, Entity, GridPos};
use stockroom_levels::{Blueprint, Piece};

use crate::turn::{Change, Turn};

/// Layer holding ground, goal plates and the lower half of walls.
pub const LAYER_BELOW: i32 = 0;
/// Layer holding the dynamic content: player, boxes, the upper half of walls.
pub const LAYER_ABOVE: i32 = 1;

/// Errors from building or mutating a grid.
///
/// All of these are fatal: they mean the level data is unusable or the journal no
/// longer describes the grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("level has no player")]
    NoPlayer,
    #[error("level has {0} players, expected exactly one")]
    MultiplePlayers(usize),
    #[error("level is already solved when loaded")]
    AlreadySolved,
    #[error("position {0} is outside the grid")]
    OutOfBounds(GridPos),
    #[error("journal desync at {pos}: expected {expected:?}, found {found:?}")]
    Desync {
        pos: GridPos,
        expected: Entity,
        found: Entity,
    },
    #[error("controlled entity is at {found}, turn expects {expected}")]
    ControlledMismatch { expected: GridPos, found: GridPos },
}

/// Mutable 3-D cell grid of one loaded level.
///
/// Indexed `[x][y][z]`. Every `(x, z)` column has exactly two layers. Rows may be
/// ragged, so the `z` extent is checked per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    cells: Vec<[Vec<Entity>; 2]>,
    controlled: GridPos,
    goals: Vec<GridPos>,
}

impl GridState {
    /// Build the grid for a blueprint.
    ///
    /// Blueprint row `r` of `R` becomes `x = R - 1 - r`, so the first written row has
    /// the highest `x`.
    pub fn from_blueprint(blueprint: &Blueprint) -> Result<Self, GridError> {
        let players = blueprint.player_count();
        match players {
            0 => return Err(GridError::NoPlayer),
            1 => {}
            n => return Err(GridError::MultiplePlayers(n)),
        }

        let rows = blueprint.rows();
        let mut cells = Vec::with_capacity(rows.len());
        let mut controlled = IVec3::NEG_ONE;
        let mut goals = Vec::new();

        for (x, row) in rows.iter().rev().enumerate() {
            let mut below = Vec::with_capacity(row.len());
            let mut above = Vec::with_capacity(row.len());
            for (z, piece) in row.iter().enumerate() {
                let above_pos = IVec3::new(x as i32, LAYER_ABOVE, z as i32);
                let (lower, upper) = match piece {
                    Piece::Wall => (Entity::Wall, Entity::Wall),
                    Piece::Player => (Entity::Ground, Entity::Player),
                    Piece::PlayerAndGoal => (Entity::Goal, Entity::Player),
                    Piece::Box => (Entity::Ground, Entity::Box),
                    Piece::BoxAndGoal => (Entity::Goal, Entity::Box),
                    Piece::Goal => (Entity::Goal, Entity::Nothing),
                    Piece::Floor => (Entity::Ground, Entity::Nothing),
                    Piece::Nothing => (Entity::Nothing, Entity::Nothing),
                };
                if piece.is_player() {
                    controlled = above_pos;
                }
                if lower == Entity::Goal {
                    goals.push(above_pos);
                }
                below.push(lower);
                above.push(upper);
            }
            cells.push([below, above]);
        }

        let grid = Self {
            cells,
            controlled,
            goals,
        };
        if grid.is_solved() {
            return Err(GridError::AlreadySolved);
        }
        tracing::debug!(
            rows = grid.cells.len(),
            goals = grid.goals.len(),
            controlled = %grid.controlled,
            "built grid"
        );
        Ok(grid)
    }

    /// `(x extent, layers per column, longest row)`.
    pub fn bounds(&self) -> (usize, usize, usize) {
        let z = self
            .cells
            .iter()
            .map(|layers| layers[0].len())
            .max()
            .unwrap_or(0);
        (self.cells.len(), 2, z)
    }

    pub fn is_in_bounds(&self, pos: GridPos) -> bool {
        self.index(pos).is_some()
    }

    /// Entity at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: GridPos) -> Option<Entity> {
        self.index(pos).map(|(x, y, z)| self.cells[x][y][z])
    }

    /// Entity at `pos`; anything outside the grid reads as `Nothing`.
    pub fn entity_at(&self, pos: GridPos) -> Entity {
        self.get(pos).unwrap_or(Entity::Nothing)
    }

    pub fn controlled_position(&self) -> GridPos {
        self.controlled
    }

    /// Goal cells on the above layer, fixed for the level.
    pub fn goal_positions(&self) -> &[GridPos] {
        &self.goals
    }

    /// True iff every goal cell holds a box.
    pub fn is_solved(&self) -> bool {
        self.goals
            .iter()
            .all(|goal| self.get(*goal) == Some(Entity::Box))
    }

    /// Compute the turn a move in `direction` would commit, without mutating anything.
    ///
    /// Returns `None` for every illegal move: off the grid, into a wall or goal plate,
    /// or pushing a box into anything but an empty cell.
    pub fn plan_move(&self, direction: Direction) -> Option<Turn> {
        let delta = direction.delta();
        let from = self.controlled;
        let target = from + delta;
        let me = self.get(from)?;

        match self.get(target)? {
            Entity::Box => {
                let beyond = target + delta;
                if self.get(beyond)? != Entity::Nothing {
                    return None;
                }
                Some(Turn::new(
                    vec![
                        Change::new(target, Entity::Box, me),
                        Change::new(from, me, Entity::Nothing),
                        Change::new(beyond, Entity::Nothing, Entity::Box),
                    ],
                    from,
                    target,
                ))
            }
            Entity::Nothing => Some(Turn::new(
                vec![
                    Change::new(target, Entity::Nothing, me),
                    Change::new(from, me, Entity::Nothing),
                ],
                from,
                target,
            )),
            _ => None,
        }
    }

    /// Apply a turn forward. Checks every change before mutating, so a failing turn
    /// leaves the grid untouched.
    pub fn apply_turn(&mut self, turn: &Turn) -> Result<(), GridError> {
        self.expect_controlled(turn.controlled_before())?;
        self.check_changes(turn.changes().iter().copied())?;
        for change in turn.changes() {
            self.write(*change);
        }
        self.controlled = turn.controlled_after();
        Ok(())
    }

    /// Apply a turn backward: changes in reverse order, each inverted.
    pub fn revert_turn(&mut self, turn: &Turn) -> Result<(), GridError> {
        self.expect_controlled(turn.controlled_after())?;
        self.check_changes(turn.changes().iter().rev().map(Change::inverse))?;
        for change in turn.changes().iter().rev() {
            self.write(change.inverse());
        }
        self.controlled = turn.controlled_before();
        Ok(())
    }

    /// FNV-1a over the cell contents and controlled position, in index order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for layers in &self.cells {
            for layer in layers {
                mix(&(layer.len() as u32).to_le_bytes());
                for entity in layer {
                    mix(&[*entity as u8]);
                }
            }
        }
        for coord in self.controlled.to_array() {
            mix(&coord.to_le_bytes());
        }
        h
    }

    fn expect_controlled(&self, expected: GridPos) -> Result<(), GridError> {
        if self.controlled != expected {
            return Err(GridError::ControlledMismatch {
                expected,
                found: self.controlled,
            });
        }
        Ok(())
    }

    fn check_changes(&self, changes: impl Iterator<Item = Change>) -> Result<(), GridError> {
        for change in changes {
            let found = self
                .get(change.pos())
                .ok_or(GridError::OutOfBounds(change.pos()))?;
            if found != change.before() {
                return Err(GridError::Desync {
                    pos: change.pos(),
                    expected: change.before(),
                    found,
                });
            }
        }
        Ok(())
    }

    /// The single write path into `cells`. Callers have validated the change.
    fn write(&mut self, change: Change) {
        if let Some((x, y, z)) = self.index(change.pos()) {
            self.cells[x][y][z] = change.after();
        }
    }

    fn index(&self, pos: GridPos) -> Option<(usize, usize, usize)> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        let z = usize::try_from(pos.z).ok()?;
        let layer = self.cells.get(x)?.get(y)?;
        (z < layer.len()).then_some((x, y, z))
    }
}
