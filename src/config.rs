//! Runtime configuration for the terminal game.
//!
//! Settings come from an optional JSON file; every field has a default so a
//! partial (or absent) file is fine. Command-line flags override the file,
//! and [`GameConfig::validate`] runs last.
//!
//! ```json
//! {
//!   "grid": { "width": 8, "height": 12 },
//!   "seed": 42,
//!   "timing": { "tick_ms": 16, "fall_interval_ms": 500 },
//!   "log": { "file": "tetris2048.log", "level": "debug" }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use thiserror::Error;

use crate::core::GameSettings;
use crate::types::{MAX_GRID_DIM, MIN_GRID_DIM};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub grid: Grid,
    /// Fixed RNG seed; derived from the clock when absent
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub log: Log,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct Grid {
    #[serde(default = "defaults::width")]
    pub width: u8,
    #[serde(default = "defaults::height")]
    pub height: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct Timing {
    #[serde(default = "defaults::tick_ms")]
    pub tick_ms: u32,
    #[serde(default = "defaults::fall_interval_ms")]
    pub fall_interval_ms: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct Log {
    #[serde(default = "defaults::log_file")]
    pub file: PathBuf,
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            seed: None,
            timing: Timing::default(),
            log: Log::default(),
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            width: defaults::width(),
            height: defaults::height(),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick_ms: defaults::tick_ms(),
            fall_interval_ms: defaults::fall_interval_ms(),
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self {
            file: defaults::log_file(),
            level: defaults::log_level(),
        }
    }
}

/// Command-line values that take precedence over the config file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub seed: Option<u32>,
    pub width: Option<u8>,
    pub height: Option<u8>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl GameConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Load the file (if any), apply overrides and validate
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let mut cfg = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        cfg.apply(overrides);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(width) = overrides.width {
            self.grid.width = width;
        }
        if let Some(height) = overrides.height {
            self.grid.height = height;
        }
        if let Some(file) = overrides.log_file {
            self.log.file = file;
        }
        if let Some(level) = overrides.log_level {
            self.log.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = MIN_GRID_DIM..=MAX_GRID_DIM;
        if !dims.contains(&self.grid.width) || !dims.contains(&self.grid.height) {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} outside {}..={}",
                self.grid.width, self.grid.height, MIN_GRID_DIM, MAX_GRID_DIM
            )));
        }
        if self.timing.tick_ms == 0 || self.timing.fall_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "timing intervals must be positive".to_string(),
            ));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log.level)
            .map_err(|_| ConfigError::Invalid(format!("unknown log level `{}`", self.log.level)))
    }

    /// The configured seed, or one derived from the clock
    pub fn seed_or_clock(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u32)
                .unwrap_or(1)
        })
    }

    pub fn settings(&self) -> GameSettings {
        GameSettings {
            width: self.grid.width,
            height: self.grid.height,
            fall_interval_ms: self.timing.fall_interval_ms,
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use crate::types::{FALL_INTERVAL_MS, GRID_HEIGHT, GRID_WIDTH, TICK_MS};

    pub fn width() -> u8 { GRID_WIDTH }
    pub fn height() -> u8 { GRID_HEIGHT }
    pub fn tick_ms() -> u32 { TICK_MS }
    pub fn fall_interval_ms() -> u32 { FALL_INTERVAL_MS }
    pub fn log_file() -> PathBuf { PathBuf::from("tetris2048.log") }
    pub fn log_level() -> String { "info".to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = GameConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.settings(), GameSettings::default());
        assert_eq!(cfg.log_level().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let cfg = GameConfig::from_json_str(
            r#"{ "grid": { "width": 10 }, "seed": 7, "log": { "level": "debug" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.grid.width, 10);
        assert_eq!(cfg.grid.height, 12);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.seed_or_clock(), 7);
        assert_eq!(cfg.timing.fall_interval_ms, 500);
        assert_eq!(cfg.log.file, PathBuf::from("tetris2048.log"));
        assert_eq!(cfg.log_level().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn overrides_beat_file_values() {
        let mut cfg = GameConfig::from_json_str(r#"{ "grid": { "width": 10, "height": 20 } }"#)
            .unwrap();
        cfg.apply(Overrides {
            height: Some(6),
            seed: Some(3),
            ..Overrides::default()
        });
        assert_eq!((cfg.grid.width, cfg.grid.height), (10, 6));
        assert_eq!(cfg.seed, Some(3));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = GameConfig::from_json_str(r#"{ "grid": { "width": "wide" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut cfg = GameConfig::default();
        cfg.grid.width = MIN_GRID_DIM - 1;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = GameConfig::default();
        cfg.timing.fall_interval_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = GameConfig::default();
        cfg.log.level = "chatty".to_string();
        assert!(cfg.validate().is_err());

        let overrides = Overrides {
            width: Some(MAX_GRID_DIM + 1),
            ..Overrides::default()
        };
        assert!(GameConfig::load(None, overrides).is_err());
    }
}
