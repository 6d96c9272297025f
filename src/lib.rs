//! Core implementation of the Hibox step sequencer
//!
//! Hibox executes a declarative list of command steps against persistent
//! shell sessions. The step list and execution model come from a
//! `hibox.json` file at the triggering location. Under the `serial` model
//! adjacent steps share one session; under `parallel` every step opens its
//! own. A step may pause the sequence a fixed number of seconds before the
//! next one starts, which keeps watch-style commands running in their
//! session while the list advances past them.

use std::path::Path;

use log::debug;

use crate::commands::CustomCommandSpec;
use crate::config_file::{Config, ConfigError};

pub mod commands;
pub mod config_file;
pub mod pty;
pub mod runner;
pub mod workspace;

/// Load the `customCommand` spec from a config file.
///
/// # Errors
///
/// Returns `ConfigError` if the file is missing or empty, cannot be parsed
/// as JSON, has no `customCommand` section, or carries a malformed step
/// list.
pub fn load_custom_command(config_path: &Path) -> Result<CustomCommandSpec, ConfigError> {
    let config = Config::from_file(config_path)?;
    let custom = config
        .custom_command
        .ok_or_else(|| ConfigError::MissingCustomCommand(config_path.to_path_buf()))?;
    let spec: CustomCommandSpec = custom.try_into()?;
    debug!(
        "Loaded {} steps from {} (model: '{}')",
        spec.list.len(),
        config_path.display(),
        spec.model
    );
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hibox.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_custom_command() {
        let (_dir, path) = write_config(
            r#"{
                "customCommand": {
                    "model": "serial",
                    "list": [
                        {"execDirectory": "a", "script": "build"},
                        {"execDirectory": "b", "script": "test", "minSecond": 2}
                    ]
                }
            }"#,
        );
        let spec = load_custom_command(&path).unwrap();
        assert_eq!(spec.model, "serial");
        assert_eq!(spec.list.len(), 2);
        assert_eq!(spec.list[1].min_second, Some(2));
    }

    #[test]
    fn test_missing_custom_command_section() {
        let (_dir, path) = write_config(r#"{"other": true}"#);
        match load_custom_command(&path) {
            Err(ConfigError::MissingCustomCommand(p)) => assert_eq!(p, path),
            other => panic!("Expected MissingCustomCommand, got: {other:?}"),
        }
    }
}
