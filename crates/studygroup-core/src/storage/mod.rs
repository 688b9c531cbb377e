mod config;

pub use config::Config;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/studygroup[-dev]/` based on STUDYGROUP_ENV, without
/// touching the filesystem.
///
/// Set STUDYGROUP_ENV=dev to use the development directory.
pub fn data_dir_path() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYGROUP_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("studygroup-dev")
    } else {
        base_dir.join("studygroup")
    }
}

/// Like [`data_dir_path`], creating the directory if needed.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = data_dir_path();
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
