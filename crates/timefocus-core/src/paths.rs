//! Standard paths used by TimeFocus

use std::path::{Path, PathBuf};

/// Environment variable that overrides the history file location
pub const DATA_ENV: &str = "TIMEFOCUS_DATA";

/// Standard TimeFocus paths
pub struct Paths {
    /// Data directory (~/.local/share/timefocus)
    pub data: PathBuf,
    /// Config directory (~/.config/timefocus)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("timefocus");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("timefocus");

        Self { data, config }
    }

    /// Rooted somewhere other than the user's home, mostly for tests
    pub fn with_root(root: &Path) -> Self {
        Self {
            data: root.join("data"),
            config: root.join("config"),
        }
    }

    /// Default session history file
    pub fn history_file(&self) -> PathBuf {
        self.data.join("timefocus.json")
    }

    /// Default config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.toml")
    }

    /// Resolve the history file, in increasing priority:
    /// default location, config `data_file`, `$TIMEFOCUS_DATA`, `--data`.
    pub fn resolve_history_file(
        &self,
        from_config: Option<&Path>,
        from_env: Option<&Path>,
        from_flag: Option<&Path>,
    ) -> PathBuf {
        from_flag
            .or(from_env)
            .or(from_config)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.history_file())
    }
}
