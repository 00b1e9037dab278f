//! Error types for parley-conversations

use parley_core::IdentityError;
use parley_storage::StorageError;
use thiserror::Error;

/// Errors that can occur while managing conversations
///
/// Lookups never fail: unknown contacts, a missing channel, and an
/// out-of-range selection all degrade to fallback values instead. Only
/// persistence and input validation surface here.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// Persisting state failed; in-memory state was still updated
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid identity supplied
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),
}

/// Result type for conversation operations
pub type ConversationResult<T> = Result<T, ConversationError>;
