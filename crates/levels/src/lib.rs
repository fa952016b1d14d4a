//! Level catalog: parses a Sokoban level collection into immutable blueprints.
//!
//! A collection is plain text. Every line made only of `# @ + $ * .` and spaces is a
//! level row; a maximal run of such rows is one level. Any other line (blank lines,
//! titles, comments) ends the current run and is otherwise ignored.
//!
//! # Invariants
//! - The catalog is never mutated after parsing.
//! - Cells before the first wall of a row are `Piece::Nothing`, never `Piece::Floor`.

use std::path::Path;
use stockroom_common::LevelId;

/// Abstract symbol of one blueprint cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Wall,
    Player,
    PlayerAndGoal,
    Box,
    BoxAndGoal,
    Goal,
    Floor,
    /// Outside the playfield.
    Nothing,
}

impl Piece {
    /// Map a collection character to its piece, if it is one.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '#' => Some(Piece::Wall),
            '@' => Some(Piece::Player),
            '+' => Some(Piece::PlayerAndGoal),
            '$' => Some(Piece::Box),
            '*' => Some(Piece::BoxAndGoal),
            '.' => Some(Piece::Goal),
            ' ' => Some(Piece::Floor),
            _ => None,
        }
    }

    pub fn is_player(self) -> bool {
        matches!(self, Piece::Player | Piece::PlayerAndGoal)
    }
}

/// One level as read from the collection: rows in file order, possibly ragged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blueprint {
    rows: Vec<Vec<Piece>>,
}

impl Blueprint {
    /// Parse a blueprint from text, one row per line. Unrecognized lines are skipped.
    pub fn from_text(text: &str) -> Self {
        Self {
            rows: text.lines().filter_map(parse_row).collect(),
        }
    }

    /// Rows in file order (the first row is the top of the level as written).
    pub fn rows(&self) -> &[Vec<Piece>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn max_width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Number of cells that hold the player.
    pub fn player_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|piece| piece.is_player())
            .count()
    }
}

/// Errors from loading a level collection.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("level collection contains no levels")]
    Empty,
}

/// Parse a single line into a level row.
///
/// Returns `None` if the line contains any character that is not a piece symbol, or
/// if it is empty. A trailing `\r` is ignored.
pub fn parse_row(line: &str) -> Option<Vec<Piece>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut row = Vec::with_capacity(line.len());
    let mut outside = true;
    for c in line.chars() {
        let piece = Piece::from_symbol(c)?;
        if outside && piece != Piece::Wall {
            row.push(Piece::Nothing);
            continue;
        }
        outside = false;
        row.push(piece);
    }
    if row.is_empty() { None } else { Some(row) }
}

/// Ordered, immutable sequence of level blueprints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: Vec<Blueprint>,
}

impl LevelCatalog {
    /// Split a collection into levels. Never fails; text without rows yields an empty catalog.
    pub fn parse(text: &str) -> Self {
        let mut levels: Vec<Blueprint> = Vec::new();
        let mut in_level = false;
        for line in text.lines() {
            match parse_row(line) {
                Some(row) => {
                    if !in_level {
                        levels.push(Blueprint::default());
                        in_level = true;
                    }
                    if let Some(level) = levels.last_mut() {
                        level.rows.push(row);
                    }
                }
                None => in_level = false,
            }
        }
        Self { levels }
    }

    /// Read and parse a collection file. An unreadable or level-less file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::parse(&text);
        if catalog.is_empty() {
            return Err(LevelError::Empty);
        }
        tracing::info!(path = %path.display(), levels = catalog.len(), "parsed level collection");
        Ok(catalog)
    }

    pub fn get(&self, id: LevelId) -> Option<&Blueprint> {
        self.levels.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn contains(&self, id: LevelId) -> bool {
        id.index() < self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LevelId, &Blueprint)> {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, level)| (LevelId(i), level))
    }
}

pub fn crate_info() -> &'static str {
    "stockroom-levels v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_LEVELS: &str = "\
; first
#####
#@$.#
#####

#####
#.$@#
#####
";

    #[test]
    fn parse_row_maps_every_symbol() {
        let row = parse_row("#@  $.#").unwrap();
        assert_eq!(
            row,
            vec![
                Piece::Wall,
                Piece::Player,
                Piece::Floor,
                Piece::Floor,
                Piece::Box,
                Piece::Goal,
                Piece::Wall
            ]
        );
        assert_eq!(parse_row("#+*#").unwrap()[1..3], [Piece::PlayerAndGoal, Piece::BoxAndGoal]);
    }

    #[test]
    fn leading_cells_before_wall_are_nothing() {
        let row = parse_row("  # .#").unwrap();
        assert_eq!(
            row,
            vec![
                Piece::Nothing,
                Piece::Nothing,
                Piece::Wall,
                Piece::Floor,
                Piece::Goal,
                Piece::Wall
            ]
        );
    }

    #[test]
    fn unknown_symbol_rejects_line() {
        assert!(parse_row("#@?#").is_none());
        assert!(parse_row("Title: Homz").is_none());
    }

    #[test]
    fn empty_line_is_not_a_row() {
        assert!(parse_row("").is_none());
        assert!(parse_row("\r").is_none());
    }

    #[test]
    fn carriage_return_is_stripped() {
        assert_eq!(parse_row("##\r").unwrap(), vec![Piece::Wall, Piece::Wall]);
    }

    #[test]
    fn blank_line_separates_levels() {
        let catalog = LevelCatalog::parse("#@  $.#\n\n#@  $.#\n");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn comment_lines_separate_and_are_skipped() {
        let catalog = LevelCatalog::parse(TWO_LEVELS);
        assert_eq!(catalog.len(), 2);
        let first = catalog.get(LevelId(0)).unwrap();
        assert_eq!(first.row_count(), 3);
        assert_eq!(first.max_width(), 5);
        assert_eq!(first.player_count(), 1);
    }

    #[test]
    fn question_mark_line_does_not_start_or_extend_level() {
        let catalog = LevelCatalog::parse("?\n#@$.#\n#?#\n#####\n");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(LevelId(0)).unwrap().row_count(), 1);
        assert_eq!(catalog.get(LevelId(1)).unwrap().row_count(), 1);
    }

    #[test]
    fn ragged_rows_are_kept() {
        let catalog = LevelCatalog::parse("####\n#@.###\n#$  #\n######\n");
        let level = catalog.get(LevelId(0)).unwrap();
        let widths: Vec<usize> = level.rows().iter().map(Vec::len).collect();
        assert_eq!(widths, vec![4, 6, 5, 6]);
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(TWO_LEVELS.as_bytes()).unwrap();
        let catalog = LevelCatalog::load(tmp.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(LevelId(1)));
        assert!(!catalog.contains(LevelId(2)));
    }

    #[test]
    fn load_empty_collection_fails() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"no levels in here\n").unwrap();
        assert!(matches!(LevelCatalog::load(tmp.path()), Err(LevelError::Empty)));
    }

    #[test]
    fn load_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let result = LevelCatalog::load(tmp.path().join("missing.txt"));
        assert!(matches!(result, Err(LevelError::Io(_))));
    }

    #[test]
    fn blueprint_from_text() {
        let bp = Blueprint::from_text("###\n#@#\n###");
        assert_eq!(bp.row_count(), 3);
        assert_eq!(bp.rows()[1][1], Piece::Player);
    }
}
