use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread::spawn;

use log::{debug, error, warn};
use parking_lot::Mutex;
use portable_pty::{Child, MasterPty, PtySize, native_pty_system};
use uuid::Uuid;

use crate::pty::command::interactive_shell;
use crate::pty::messages::format_focus_banner;
use crate::runner::provider::{Session, SessionHost};

const SCROLLBACK_LIMIT: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Writer disconnected")]
    WriterDisconnected,
    #[error("Unable to open PTY: {0}")]
    PtyError(String),
    #[error("Process error: {0}")]
    Process(String),
}

/// PTY dimensions in columns and rows
#[derive(Debug, Clone, Copy)]
pub struct TerminalSize {
    cols: u16,
    rows: u16,
}

impl TerminalSize {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self::new(120, 40)
    }
}

impl From<TerminalSize> for PtySize {
    fn from(size: TerminalSize) -> Self {
        Self {
            cols: size.cols,
            rows: size.rows,
            pixel_width: 0,
            pixel_height: 0,
        }
    }
}

/// Which session currently owns stdout, shared by all sessions of one host
type FocusSlot = Arc<Mutex<Option<Uuid>>>;

type SpawnedPty = (Box<dyn Child + Send + Sync>, Box<dyn MasterPty + Send>);

fn spawn_pty(cwd: &Path, size: TerminalSize) -> Result<SpawnedPty, ProcessError> {
    let pty_system = native_pty_system();
    let pair = pty_system
        .openpty(size.into())
        .map_err(|e| ProcessError::PtyError(e.to_string()))?;

    let child = pair
        .slave
        .spawn_command(interactive_shell(cwd))
        .map_err(|e| ProcessError::Process(e.to_string()))?;

    drop(pair.slave); // This will make the reader close when the shell exits

    Ok((child, pair.master))
}

/// Read PTY output into the scrollback buffer, mirroring the foreground
/// session to stdout, and reap the shell process on EOF.
///
/// Lock order is focus before scrollback, matching `ShellSession::show`, so
/// a replay never interleaves with a live chunk.
fn spawn_session_reader(
    mut reader: Box<dyn Read + Send>,
    mut process: Box<dyn Child + Send + Sync>,
    id: Uuid,
    scrollback: Arc<Mutex<Vec<u8>>>,
    focus: FocusSlot,
    label: String,
) {
    spawn(move || {
        loop {
            let mut buf = [0u8; 1024];
            match reader.read(&mut buf) {
                Ok(0) => {
                    debug!("PTY reader EOF for session '{label}'");
                    break;
                }
                Ok(n) => {
                    let focus = focus.lock();
                    let mut scrollback = scrollback.lock();
                    scrollback.extend_from_slice(&buf[..n]);
                    if scrollback.len() > SCROLLBACK_LIMIT {
                        let excess = scrollback.len() - SCROLLBACK_LIMIT;
                        scrollback.drain(..excess);
                    }
                    if *focus == Some(id) {
                        let mut stdout = std::io::stdout().lock();
                        let _ = stdout.write_all(&buf[..n]);
                        let _ = stdout.flush();
                    }
                }
                Err(e) => {
                    error!("PTY reader thread error: {e:?}");
                    break;
                }
            }
        }

        match process.wait() {
            Ok(status) => debug!("Shell session '{label}' exited: {status:?}"),
            Err(e) => error!("Failed to wait for shell process: {e:?}"),
        }
    });
}

fn spawn_session_writer(
    mut writer: Box<dyn Write + Send>,
    master: Box<dyn MasterPty + Send>,
) -> crossbeam_channel::Sender<Vec<u8>> {
    let (pty_tx, pty_rx) = crossbeam_channel::bounded::<Vec<u8>>(1000);

    spawn(move || {
        // Dropping the master half hangs up the PTY, keep it with the writer
        let _master = master;
        while let Ok(input) = pty_rx.recv() {
            if let Err(e) = writer.write_all(&input) {
                error!("Failed to write to PTY: {e:?}");
            }
        }
        debug!("PTY writer thread EOF");
    });

    pty_tx
}

/// A persistent interactive shell running in a pseudo-terminal.
///
/// The session outlives the step runner; nothing here closes the shell. It
/// ends when the shell exits or the host process is torn down.
pub struct ShellSession {
    id: Uuid,
    label: String,
    pty_tx: crossbeam_channel::Sender<Vec<u8>>,
    scrollback: Arc<Mutex<Vec<u8>>>,
    focus: FocusSlot,
}

impl ShellSession {
    fn spawn(
        cwd: &Path,
        label: &str,
        size: TerminalSize,
        focus: FocusSlot,
    ) -> Result<Self, ProcessError> {
        let (process, master) = spawn_pty(cwd, size)?;
        let reader = master
            .try_clone_reader()
            .map_err(|e| ProcessError::PtyError(format!("Failed to clone PTY reader: {e}")))?;
        let writer = master
            .take_writer()
            .map_err(|e| ProcessError::PtyError(format!("Failed to take PTY writer: {e}")))?;

        let id = Uuid::new_v4();
        let scrollback = Arc::new(Mutex::new(Vec::new()));
        spawn_session_reader(
            reader,
            process,
            id,
            Arc::clone(&scrollback),
            Arc::clone(&focus),
            label.to_string(),
        );
        let pty_tx = spawn_session_writer(writer, master);

        Ok(Self {
            id,
            label: label.to_string(),
            pty_tx,
            scrollback,
            focus,
        })
    }

    fn write(&self, input: Vec<u8>) -> Result<(), ProcessError> {
        self.pty_tx
            .send(input)
            .map_err(|_| ProcessError::WriterDisconnected)
    }
}

impl Session for ShellSession {
    fn send_text(&self, text: &str) {
        let mut input = text.as_bytes().to_vec();
        input.push(b'\n');
        if let Err(e) = self.write(input) {
            warn!("Failed to send text to session '{}': {e}", self.label);
        }
    }

    fn show(&self) {
        let mut focus = self.focus.lock();
        if *focus == Some(self.id) {
            return;
        }
        *focus = Some(self.id);

        // Replay what the session has produced so far, then the reader
        // thread streams the rest
        let scrollback = self.scrollback.lock();
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(&format_focus_banner(&self.label));
        let _ = stdout.write_all(&scrollback);
        let _ = stdout.flush();
    }
}

/// Opens PTY-backed shell sessions and tracks the foreground session
pub struct ShellHost {
    size: TerminalSize,
    focus: FocusSlot,
}

impl ShellHost {
    #[must_use]
    pub fn new(size: TerminalSize) -> Self {
        Self {
            size,
            focus: Arc::new(Mutex::new(None)),
        }
    }
}

impl Default for ShellHost {
    fn default() -> Self {
        Self::new(TerminalSize::default())
    }
}

impl SessionHost for ShellHost {
    type Session = ShellSession;

    fn create(&self, cwd: &Path, label: &str) -> Result<ShellSession, ProcessError> {
        ShellSession::spawn(cwd, label, self.size, Arc::clone(&self.focus))
    }
}
