//! Project and config path resolution for a command invocation
//!
//! An invocation starts from a trigger location: either an explicit path
//! (the directory the user invoked the command on) or the workspace's single
//! ambient root folder. From that location the project root and the config
//! file path are derived.

use std::path::{Component, Path, PathBuf};

use log::debug;
use thiserror::Error;

/// Path segment marking the project root within a trigger path
pub const PROJECT_MARKER: &str = "jxapp";

/// Name of the config file expected at the trigger location
pub const CONFIG_FILENAME: &str = "hibox.json";

/// Errors resolving the invocation paths
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("No project open in the workspace")]
    NoProject,
    #[error("Workspace has {0} root folders, only one is supported")]
    TooManyRoots(usize),
}

/// Paths derived from one command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// The triggering location: an explicit trigger or the sole workspace root
    pub page_path: PathBuf,
    /// The project root, the trigger path truncated at the marker segment
    pub project_path: PathBuf,
    /// Where the config file is expected
    pub config_path: PathBuf,
}

/// Resolve the page, project, and config paths for an invocation.
///
/// An explicit trigger location wins; otherwise the workspace must have
/// exactly one root folder.
///
/// # Errors
///
/// Returns `WorkspaceError::NoProject` when there is neither a trigger nor a
/// workspace root, and `WorkspaceError::TooManyRoots` when more than one
/// root is open.
pub fn resolve(
    trigger: Option<&Path>,
    workspace_roots: &[PathBuf],
) -> Result<ProjectPaths, WorkspaceError> {
    let page_path = match trigger {
        Some(path) => path.to_path_buf(),
        None => match workspace_roots {
            [] => return Err(WorkspaceError::NoProject),
            [root] => root.clone(),
            roots => return Err(WorkspaceError::TooManyRoots(roots.len())),
        },
    };
    let project_path = project_root(&page_path);
    let config_path = page_path.join(CONFIG_FILENAME);
    debug!(
        "Resolved invocation paths (page: {}, project: {})",
        page_path.display(),
        project_path.display()
    );
    Ok(ProjectPaths {
        page_path,
        project_path,
        config_path,
    })
}

/// Truncate a path at the project marker segment, keeping the marker. A path
/// without the marker is its own project root.
fn project_root(page_path: &Path) -> PathBuf {
    let mut root = PathBuf::new();
    for component in page_path.components() {
        root.push(component);
        if matches!(component, Component::Normal(name) if name == PROJECT_MARKER) {
            return root;
        }
    }
    page_path.to_path_buf()
}
