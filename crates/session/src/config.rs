use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::session::SessionError;

/// Where the session reads levels from and writes saves to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Level collection file.
    pub levels_path: PathBuf,
    /// Directory for checkpoints and the high-score table. Created if missing.
    pub save_dir: PathBuf,
    /// Level loaded when the session starts.
    pub start_level: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            levels_path: PathBuf::from("levels.txt"),
            save_dir: PathBuf::from("saves"),
            start_level: 0,
        }
    }
}

impl SessionConfig {
    /// Load a config from JSON. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.levels_path, PathBuf::from("levels.txt"));
        assert_eq!(config.start_level, 0);
        assert_eq!(config.save_dir, PathBuf::from("saves"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), r#"{ "start_level": 3, "save_dir": "/tmp/sr" }"#).unwrap();
        let config = SessionConfig::from_json_file(tmp.path()).unwrap();
        assert_eq!(config.start_level, 3);
        assert_eq!(config.save_dir, PathBuf::from("/tmp/sr"));
        assert_eq!(config.levels_path, PathBuf::from("levels.txt"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "{ start_level: ").unwrap();
        assert!(matches!(
            SessionConfig::from_json_file(tmp.path()),
            Err(SessionError::Config(_))
        ));
    }
}
