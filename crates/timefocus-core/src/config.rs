//! Configuration loading for TimeFocus
//!
//! Read from `~/.config/timefocus/config.toml`. Every key is optional and a
//! missing file means "all defaults".

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Longest session the timer will run, one day
pub const MAX_SESSION_MINUTES: u32 = 24 * 60;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config from {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// TimeFocus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Length of a pomodoro in minutes
    pub work_minutes: u32,
    /// Length of a short break in minutes
    pub short_break_minutes: u32,
    /// Length of a long break in minutes
    pub long_break_minutes: u32,
    /// Completed pomodoros between long breaks
    pub cycles_before_long: u32,
    /// First day of the week for weekly statistics
    pub week_start: Weekday,
    /// Ring the terminal bell when a countdown finishes
    pub bell: bool,
    /// Override for the history file location
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            cycles_before_long: 4,
            week_start: Weekday::Mon,
            bell: true,
            data_file: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or defaults when it doesn't exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("work_minutes", self.work_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ] {
            if !(1..=MAX_SESSION_MINUTES).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 1 and {}",
                    key, MAX_SESSION_MINUTES
                )));
            }
        }
        if self.cycles_before_long == 0 {
            return Err(ConfigError::Invalid(
                "cycles_before_long must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the break after `completed_today` finished pomodoros should be long
    pub fn long_break_due(&self, completed_today: u32) -> bool {
        completed_today > 0 && completed_today % self.cycles_before_long == 0
    }
}
