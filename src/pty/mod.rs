//! Persistent shell sessions backed by a PTY
//!
//! Each session is an interactive shell running in its own pseudo-terminal.
//! Text sent into a session behaves as if the user typed it, and the session
//! stays alive after the step list finishes so its output can be inspected.
//! One session at a time is the foreground session; its output is mirrored
//! to stdout.

pub mod command;
pub mod messages;
pub mod terminal;

pub use terminal::{ProcessError, ShellHost, ShellSession, TerminalSize};
