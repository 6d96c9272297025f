//! Step scheduling over shell sessions
//!
//! The runner walks an ordered list of command steps. For every step it asks
//! the session provider for a session (the provider implements the
//! serial-reuse vs parallel-fresh policy), sends the step's script into it,
//! and either advances immediately or after a fixed pause. The pause exists
//! for watch-style commands that never exit on their own: the session keeps
//! running while the list moves past it, and the next serial step gets a
//! fresh session.

pub mod provider;
pub mod step;

pub use provider::{Session, SessionHost, SessionProvider};
pub use step::StepRunner;
