//! Configuration file handling for Hibox
//!
//! The config file is plain JSON with a single `customCommand` section.
//! Parsing happens in two stages: serde decodes the raw camelCase shape,
//! then the raw structs convert into the domain types in [`crate::commands`]
//! with shape validation along the way.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::commands::{CommandStep, CustomCommandSpec};

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config file found at {0}")]
    ConfigNotFound(PathBuf),
    #[error("Config file {0} is empty")]
    EmptyConfig(PathBuf),
    #[error("Unable to parse JSON config file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("Config file {0} has no customCommand section")]
    MissingCustomCommand(PathBuf),
    #[error("Invalid customCommand: {0}")]
    InvalidShape(String),
}

/// Raw form of a single step, as written in `hibox.json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommandConfig {
    pub exec_directory: String,
    pub switch_directory: Option<String>,
    pub script: String,
    pub min_second: Option<u64>,
}

/// Raw `customCommand` section. `list` stays untyped until its shape is
/// checked, so a malformed list reports as `InvalidShape` rather than a
/// generic JSON error.
#[derive(Debug, Deserialize)]
pub struct RawCustomCommand {
    pub model: Option<String>,
    pub list: Option<serde_json::Value>,
}

/// Root configuration structure for Hibox
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(rename = "customCommand")]
    pub custom_command: Option<RawCustomCommand>,
}

impl From<RawCommandConfig> for CommandStep {
    fn from(raw: RawCommandConfig) -> Self {
        // An empty switchDirectory means "no directory change"
        let switch_directory = raw
            .switch_directory
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        CommandStep {
            exec_directory: PathBuf::from(raw.exec_directory),
            switch_directory,
            script: raw.script,
            min_second: raw.min_second,
        }
    }
}

impl TryFrom<RawCustomCommand> for CustomCommandSpec {
    type Error = ConfigError;

    fn try_from(raw: RawCustomCommand) -> Result<Self, Self::Error> {
        let entries = match raw.list {
            Some(serde_json::Value::Array(entries)) if !entries.is_empty() => entries,
            Some(serde_json::Value::Array(_)) => {
                return Err(ConfigError::InvalidShape(
                    "list must contain at least one step".to_string(),
                ));
            }
            Some(other) => {
                return Err(ConfigError::InvalidShape(format!(
                    "list must be an array, got {}",
                    json_type_name(&other)
                )));
            }
            None => {
                return Err(ConfigError::InvalidShape(
                    "customCommand has no list".to_string(),
                ));
            }
        };
        let mut list = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let step: RawCommandConfig = serde_json::from_value(entry)
                .map_err(|e| ConfigError::InvalidShape(format!("list[{index}]: {e}")))?;
            list.push(step.into());
        }
        Ok(CustomCommandSpec {
            model: raw.model.unwrap_or_default(),
            list,
        })
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl Config {
    /// Loads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file cannot be read,
    /// `ConfigError::EmptyConfig` if it has no content, or
    /// `ConfigError::Json` if parsing fails.
    pub fn from_file(file: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(file)
            .map_err(|_| ConfigError::ConfigNotFound(file.to_path_buf()))?;
        if contents.trim().is_empty() {
            return Err(ConfigError::EmptyConfig(file.to_path_buf()));
        }
        serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
            source: e,
            path: file.to_path_buf(),
        })
    }
}
