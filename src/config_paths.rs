//! Where rowgrid keeps its config and logs
//!
//! ```text
//! <config root>/rowgrid/
//!     config.yaml
//!     logs/rowgrid.log.YYYY-MM-DD
//! ```
//!
//! The config root is `$XDG_CONFIG_HOME` or `~/.config` on Unix/macOS and
//! `%APPDATA%` on Windows.

use std::env;
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "rowgrid";

/// Prefix of the daily-rolled log files under [`logs_dir`]
pub const LOG_FILE_PREFIX: &str = "rowgrid.log";

fn config_root() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        return env::var_os("APPDATA").map(PathBuf::from);
    }
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

/// `<config root>/rowgrid`
pub fn config_dir() -> Option<PathBuf> {
    config_root().map(|root| root.join(APP_DIR))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs directory and its parents, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create directory {}: {}", logs.display(), e))?;
    Ok(logs)
}
