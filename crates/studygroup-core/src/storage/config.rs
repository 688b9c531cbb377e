//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Subgoals attached to every new group
//! - How far ahead a session triggers a reminder
//! - Default log filter for the CLI
//!
//! Configuration is stored at `~/.config/studygroup/config.toml`. Matching
//! thresholds and the streak award are fixed and deliberately absent here.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{data_dir, data_dir_path};
use crate::error::ConfigError;
use crate::progress::DEFAULT_SUBGOALS;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_subgoals")]
    pub subgoals: Vec<String>,
    #[serde(default = "default_reminder_lead_secs")]
    pub reminder_lead_secs: i64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_subgoals() -> Vec<String> {
    DEFAULT_SUBGOALS.iter().map(|s| s.to_string()).collect()
}
fn default_reminder_lead_secs() -> i64 {
    300
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subgoals: default_subgoals(),
            reminder_lead_secs: default_reminder_lead_secs(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<i64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?
                        .into(),
                ),
                serde_json::Value::Array(_) => {
                    // JSON array, or a comma-separated shorthand.
                    if value.trim_start().starts_with('[') {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    } else {
                        serde_json::Value::Array(
                            value
                                .split(',')
                                .map(|s| serde_json::Value::String(s.trim().to_string()))
                                .collect(),
                        )
                    }
                }
                serde_json::Value::Object(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location, `<data_dir>/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Read the config without creating anything on disk. A missing file
    /// yields the defaults.
    pub fn read() -> Result<Self, ConfigError> {
        Self::read_from(&data_dir_path().join("config.toml"))
    }

    pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value in memory by key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Subgoals for new groups: blank names dropped, defaults if none remain.
    pub fn effective_subgoals(&self) -> Vec<String> {
        let names: Vec<String> = self
            .subgoals
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if names.is_empty() {
            default_subgoals()
        } else {
            names
        }
    }

    pub fn reminder_lead(&self) -> Duration {
        Duration::seconds(self.reminder_lead_secs.max(0))
    }
}
