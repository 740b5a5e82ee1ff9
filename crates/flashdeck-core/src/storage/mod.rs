//! Local persistence: the SQLite deck store and the TOML config file.

mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, LogConfig, StudyConfig};
pub use database::{Database, DeckSummary};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Directory holding `config.toml` and `flashdeck.db`, created on demand.
///
/// `~/.config/flashdeck/`, or `~/.config/flashdeck-dev/` when
/// `FLASHDECK_ENV=dev`.
///
/// # Errors
/// Returns `ConfigError::DataDir` if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let name = match std::env::var("FLASHDECK_ENV").as_deref() {
        Ok("dev") => "flashdeck-dev",
        _ => "flashdeck",
    };
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(name);

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
