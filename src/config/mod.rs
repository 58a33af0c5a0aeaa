mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub storage_dir: Option<PathBuf>,
    pub playback_poll_interval_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            storage_dir: None,
            playback_poll_interval_ms: 200,
        }
    }
}

/// Resolved application configuration. The database path and the content
/// store root are always injected from here, never hard-coded at the call
/// sites.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub storage_dir: PathBuf,
    pub playback_poll_interval: Duration,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from("song_storage.db"));

        if db_path.is_dir() {
            bail!("db_path is a directory, expected a file path: {:?}", db_path);
        }
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                bail!("Parent directory of db_path does not exist: {:?}", parent);
            }
        }

        let storage_dir = file
            .storage_dir
            .map(PathBuf::from)
            .or_else(|| cli.storage_dir.clone())
            .unwrap_or_else(|| PathBuf::from("Storage"));

        if storage_dir.is_file() {
            bail!("storage_dir is not a directory: {:?}", storage_dir);
        }

        let poll_ms = file
            .playback_poll_interval_ms
            .unwrap_or(cli.playback_poll_interval_ms);
        if poll_ms == 0 {
            bail!("playback_poll_interval_ms must be greater than zero");
        }

        Ok(Self {
            db_path,
            storage_dir,
            playback_poll_interval: Duration::from_millis(poll_ms),
        })
    }
}
