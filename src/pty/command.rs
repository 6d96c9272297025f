use std::path::Path;

use log::debug;
use portable_pty::CommandBuilder;

/// Build the interactive shell invocation for a new session
pub(crate) fn interactive_shell(cwd: &Path) -> CommandBuilder {
    debug!("Opening shell session in {}", cwd.display());
    let mut command_builder = CommandBuilder::new("sh");
    for (key, value) in std::env::vars() {
        command_builder.env(key, value);
    }
    command_builder.env("TERM", "xterm-256color");
    command_builder.cwd(cwd.to_path_buf());
    command_builder
}
