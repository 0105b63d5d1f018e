//! Levels module - ordered level progression
//!
//! A level list is plain data: board size, symbol count and shift mode per
//! level. Lookups wrap around, so play can continue past the last entry.
//!
//! Level files are JSON:
//!
//! ```json
//! { "levels": [ { "width": 6, "height": 4, "symbol_count": 6, "shift_mode": "up" } ] }
//! ```

use std::fs;
use std::io;
use std::path::Path;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::types::{ConfigError, LevelConfig, ShiftMode};

/// Failure to load a level list
#[derive(Debug, Display, Error)]
pub enum LevelsError {
    #[display("failed to read level file: {source}")]
    Io { source: io::Error },
    #[display("malformed level file: {source}")]
    Json { source: serde_json::Error },
    #[display("level {index} is invalid: {source}")]
    InvalidLevel { index: usize, source: ConfigError },
    #[display("level list is empty")]
    Empty,
}

impl From<io::Error> for LevelsError {
    fn from(source: io::Error) -> Self {
        Self::Io { source }
    }
}

impl From<serde_json::Error> for LevelsError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

/// Validated, non-empty list of levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDatabase {
    levels: Vec<LevelConfig>,
}

impl LevelDatabase {
    /// Build a database, checking every level.
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, LevelsError> {
        if levels.is_empty() {
            return Err(LevelsError::Empty);
        }
        for (index, level) in levels.iter().enumerate() {
            level
                .validate()
                .map_err(|source| LevelsError::InvalidLevel { index, source })?;
        }
        Ok(Self { levels })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LevelsError> {
        let raw: LevelDatabase = serde_json::from_str(json)?;
        Self::new(raw.levels)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Config for `level` (0-based), wrapping past the last level
    pub fn get(&self, level: usize) -> &LevelConfig {
        &self.levels[level % self.levels.len()]
    }

    /// Number of distinct levels
    pub fn max_level(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[LevelConfig] {
        &self.levels
    }
}

impl Default for LevelDatabase {
    /// Ten levels of growing boards, one per shift mode.
    fn default() -> Self {
        let levels = [
            (6, 4, 6, ShiftMode::None),
            (8, 6, 12, ShiftMode::Up),
            (8, 6, 12, ShiftMode::Down),
            (10, 6, 15, ShiftMode::Left),
            (10, 6, 15, ShiftMode::Right),
            (10, 8, 20, ShiftMode::UpRight),
            (10, 8, 20, ShiftMode::DownLeft),
            (12, 8, 24, ShiftMode::DownRight),
            (12, 8, 24, ShiftMode::UpLeft),
            (16, 9, 36, ShiftMode::Center),
        ]
        .into_iter()
        .map(|(width, height, symbols, mode)| LevelConfig::new(width, height, symbols, mode))
        .collect();
        Self { levels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels_are_valid() {
        let db = LevelDatabase::default();
        assert_eq!(db.max_level(), 10);
        assert!(LevelDatabase::new(db.levels().to_vec()).is_ok());

        for mode in ShiftMode::ALL {
            assert!(db.levels().iter().any(|level| level.shift_mode == mode));
        }
    }

    #[test]
    fn test_get_wraps_around() {
        let db = LevelDatabase::default();
        assert_eq!(db.get(0), db.get(10));
        assert_eq!(db.get(3), db.get(23));
    }

    #[test]
    fn test_from_json_str() {
        let db = LevelDatabase::from_json_str(
            r#"{ "levels": [
                { "width": 4, "height": 4, "symbol_count": 8, "shift_mode": "up" },
                { "width": 6, "height": 4, "symbol_count": 6 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(db.max_level(), 2);
        assert_eq!(db.get(0).shift_mode, ShiftMode::Up);
        assert_eq!(db.get(1).shift_mode, ShiftMode::None);
    }

    #[test]
    fn test_rejects_bad_levels() {
        assert!(matches!(
            LevelDatabase::from_json_str(r#"{ "levels": [] }"#),
            Err(LevelsError::Empty)
        ));
        assert!(matches!(
            LevelDatabase::from_json_str("{ not json"),
            Err(LevelsError::Json { .. })
        ));

        let err = LevelDatabase::from_json_str(
            r#"{ "levels": [
                { "width": 4, "height": 4, "symbol_count": 8 },
                { "width": 3, "height": 3, "symbol_count": 2 }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LevelsError::InvalidLevel { index: 1, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = LevelDatabase::from_path("/nonexistent/levels.json").unwrap_err();
        assert!(matches!(err, LevelsError::Io { .. }));
    }
}
