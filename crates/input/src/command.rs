use std::fmt;
use stockroom_common::Direction;

/// A discrete player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move (or push) one cell.
    Move(Direction),
    /// Undo the last turn, crossing back into the previous level if needed.
    Undo,
    /// Redo the next turn, crossing forward into a cached level if needed.
    Redo,
    /// Restart the current level.
    Reload,
    NextLevel,
    PreviousLevel,
}

impl Command {
    /// Map a script character to its command.
    ///
    /// Moves use the usual Sokoban LURD letters in either case.
    pub fn from_token(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'u' => Some(Command::Move(Direction::Up)),
            'd' => Some(Command::Move(Direction::Down)),
            'l' => Some(Command::Move(Direction::Left)),
            'r' => Some(Command::Move(Direction::Right)),
            'z' => Some(Command::Undo),
            'y' => Some(Command::Redo),
            '!' => Some(Command::Reload),
            '>' => Some(Command::NextLevel),
            '<' => Some(Command::PreviousLevel),
            _ => None,
        }
    }

    pub fn token(self) -> char {
        match self {
            Command::Move(Direction::Up) => 'u',
            Command::Move(Direction::Down) => 'd',
            Command::Move(Direction::Left) => 'l',
            Command::Move(Direction::Right) => 'r',
            Command::Undo => 'z',
            Command::Redo => 'y',
            Command::Reload => '!',
            Command::NextLevel => '>',
            Command::PreviousLevel => '<',
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Errors from parsing a command script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command {token:?} at position {index}")]
    UnknownToken { index: usize, token: char },
}

/// Parse a whole script. Whitespace is ignored.
pub fn parse_script(script: &str) -> Result<Vec<Command>, InputError> {
    script
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_ascii_whitespace())
        .map(|(index, token)| {
            Command::from_token(token).ok_or(InputError::UnknownToken { index, token })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lurd_moves_either_case() {
        assert_eq!(
            parse_script("luRD").unwrap(),
            vec![
                Command::Move(Direction::Left),
                Command::Move(Direction::Up),
                Command::Move(Direction::Right),
                Command::Move(Direction::Down),
            ]
        );
    }

    #[test]
    fn control_tokens_and_whitespace() {
        assert_eq!(
            parse_script("z y\n! > <").unwrap(),
            vec![
                Command::Undo,
                Command::Redo,
                Command::Reload,
                Command::NextLevel,
                Command::PreviousLevel,
            ]
        );
    }

    #[test]
    fn unknown_token_reports_position() {
        assert_eq!(
            parse_script("rr?"),
            Err(InputError::UnknownToken {
                index: 2,
                token: '?'
            })
        );
    }

    #[test]
    fn token_roundtrip() {
        for c in "udlrzy!><".chars() {
            assert_eq!(Command::from_token(c).unwrap().token(), c);
        }
    }
}
