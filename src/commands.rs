//! Step and execution-model domain types
//!
//! A command invocation is described by a `CustomCommandSpec`: an execution
//! model name plus an ordered list of steps. The list order is the execution
//! order.

use std::path::PathBuf;

/// A single configured step: what to send into a session, and where
#[derive(Debug, Clone, Default)]
pub struct CommandStep {
    /// Working directory (relative to the project root) for a session
    /// created on behalf of this step
    pub exec_directory: PathBuf,
    /// Optional directory to `cd` into before the script is sent
    pub switch_directory: Option<PathBuf>,
    /// The command text sent into the session
    pub script: String,
    /// Seconds to pause before the next step. `None` or zero advances
    /// immediately.
    pub min_second: Option<u64>,
}

/// The validated `customCommand` section of a config file
#[derive(Debug, Clone)]
pub struct CustomCommandSpec {
    /// Execution model name, fixed for the whole run. Kept as the raw
    /// config string; unknown names are not an error, they just produce no
    /// sessions.
    pub model: String,
    /// Ordered steps, never empty
    pub list: Vec<CommandStep>,
}

/// How sessions are assigned to steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionModel {
    /// Adjacent steps share one session, until a timed step clears it
    Serial,
    /// Every step opens its own session
    Parallel,
}

impl ExecutionModel {
    /// Parse a model name from config. Unknown names map to `None`, which
    /// the session provider treats as "no session available".
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "serial" => Some(Self::Serial),
            "parallel" => Some(Self::Parallel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_model_names() {
        assert_eq!(ExecutionModel::from_name("serial"), Some(ExecutionModel::Serial));
        assert_eq!(
            ExecutionModel::from_name("parallel"),
            Some(ExecutionModel::Parallel)
        );
    }

    #[test]
    fn test_unknown_model_names() {
        assert_eq!(ExecutionModel::from_name(""), None);
        assert_eq!(ExecutionModel::from_name("Serial"), None);
        assert_eq!(ExecutionModel::from_name("batch"), None);
    }
}
