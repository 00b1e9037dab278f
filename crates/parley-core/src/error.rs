//! Error types for Parley

use thiserror::Error;

/// Errors related to user identity
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Identity must not be empty")]
    Empty,

    #[error("Invalid identity format: {0}")]
    InvalidFormat(String),
}

/// Errors related to the message channel
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The relay behind the channel has shut down
    #[error("Channel closed")]
    Closed,
}
