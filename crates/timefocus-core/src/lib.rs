//! TimeFocus Core - Shared functionality for the TimeFocus timer
//!
//! Where things live on disk, how the timer is configured, and how minutes
//! are rendered for humans.

pub mod config;
pub mod format;
pub mod paths;

pub use config::{Config, ConfigError, MAX_SESSION_MINUTES};
pub use paths::Paths;
