//! Session acquisition policy

use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};

use crate::commands::ExecutionModel;
use crate::pty::terminal::ProcessError;

/// Display label given to every session created by the provider
pub const SESSION_LABEL: &str = "Hibox";

/// A live interactive session that can receive text.
///
/// Sends are fire-and-forget: the session does not report whether the text
/// reached a running process, and nothing here can close it.
pub trait Session {
    /// Send a line of text into the session, as if typed by the user
    fn send_text(&self, text: &str);
    /// Bring the session to the foreground
    fn show(&self);
}

/// Creates sessions on behalf of the provider
pub trait SessionHost {
    type Session: Session;

    /// Open a new session with the given working directory and display label.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError` if the session cannot be spawned.
    fn create(&self, cwd: &Path, label: &str) -> Result<Self::Session, ProcessError>;
}

/// Hands out sessions according to the execution model.
///
/// Owns the single shared-session slot used by the serial model. One
/// provider exists per runner invocation, so two concurrent invocations
/// never contend for the same slot.
pub struct SessionProvider<H: SessionHost> {
    host: H,
    shared: Option<Arc<H::Session>>,
}

impl<H: SessionHost> SessionProvider<H> {
    pub fn new(host: H) -> Self {
        Self { host, shared: None }
    }

    /// Produce a session for one step.
    ///
    /// The parallel model always opens a fresh session. The serial model
    /// reuses the shared session when one exists, keeping its original
    /// working directory, and opens a new one otherwise. `None` as model
    /// yields no session; the caller must skip sending text for that step.
    pub fn acquire(
        &mut self,
        model: Option<ExecutionModel>,
        cwd: &Path,
    ) -> Option<Arc<H::Session>> {
        match model? {
            ExecutionModel::Parallel => self.create(cwd),
            ExecutionModel::Serial => {
                if let Some(shared) = &self.shared {
                    debug!("Reusing the shared session");
                    return Some(Arc::clone(shared));
                }
                let session = self.create(cwd)?;
                self.shared = Some(Arc::clone(&session));
                Some(session)
            }
        }
    }

    /// Drop the shared-session reference so the next serial acquisition
    /// opens a fresh session. The session itself stays alive.
    pub fn clear_shared(&mut self) {
        self.shared = None;
    }

    fn create(&self, cwd: &Path) -> Option<Arc<H::Session>> {
        match self.host.create(cwd, SESSION_LABEL) {
            Ok(session) => Some(Arc::new(session)),
            Err(e) => {
                warn!("Failed to open session in {}: {e}", cwd.display());
                None
            }
        }
    }
}
