// src/config.rs

use std::env;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "GAMIFY_DB";
pub const DEFAULT_DATA_DIR: &str = ".gamify";
pub const DEFAULT_DB_FILE: &str = "xp.db";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl TrackerConfig {
    /// `GAMIFY_DB` overrides the database path, `RUST_LOG` the log filter.
    pub fn from_env() -> Self {
        let db_path = env::var_os(DB_PATH_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        let log_filter = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
        TrackerConfig { db_path, log_filter }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            db_path: default_db_path(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// ~/.gamify/xp.db, or ./.gamify/xp.db when no home directory is known.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DATA_DIR)
        .join(DEFAULT_DB_FILE)
}
