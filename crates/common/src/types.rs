use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate in the level grid.
///
/// `x` runs along the blueprint rows, `y` selects the layer (0 = below, 1 = above)
/// and `z` runs along a row.
pub type GridPos = IVec3;

/// Contents of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Entity {
    #[default]
    Nothing,
    Wall,
    Ground,
    Player,
    Goal,
    Box,
}

/// Index of a level inside the loaded catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct LevelId(pub usize);

impl LevelId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the four horizontal moves the player can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards the first row of the blueprint (+x).
    Up,
    /// -x
    Down,
    /// -z
    Left,
    /// +z
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid offset of a single step in this direction. Never touches the y layer.
    pub fn delta(self) -> GridPos {
        match self {
            Direction::Up => IVec3::X,
            Direction::Down => IVec3::NEG_X,
            Direction::Left => IVec3::NEG_Z,
            Direction::Right => IVec3::Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_default_is_nothing() {
        assert_eq!(Entity::default(), Entity::Nothing);
    }

    #[test]
    fn directions_stay_on_layer() {
        for dir in Direction::ALL {
            assert_eq!(dir.delta().y, 0);
            assert_eq!(dir.delta().abs().element_sum(), 1);
        }
    }

    #[test]
    fn level_id_display() {
        assert_eq!(LevelId(7).to_string(), "7");
        assert_eq!(LevelId(7).index(), 7);
    }
}
