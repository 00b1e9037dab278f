//! Parley Chat: session wiring and command-line front end.
//!
//! Re-exports the session and CLI configuration for embedding in other
//! front ends.

pub mod config;
pub mod session;

pub use session::Session;
