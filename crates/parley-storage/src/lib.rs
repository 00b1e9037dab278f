//! # Parley Storage
//!
//! Key-value persistence for the Parley chat client.
//!
//! The client keeps a small amount of state (its own id, the contact list,
//! the conversation list) under fixed string keys, much like browser local
//! storage. Values are JSON text so anything written through one store can
//! be read back through the same store.
//!
//! ## Features
//!
//! - **KeyValueStore trait**: The persistence seam used by the rest of Parley
//! - **InMemoryStore**: `DashMap`-backed store for tests and ephemeral sessions
//! - **FileStore**: One JSON file per key under a data directory
//! - **Typed helpers**: [`load_or_default`] treats missing or malformed values
//!   as the type's default, [`save`] serializes and writes
//!
//! ## Example
//!
//! ```rust,ignore
//! use parley_storage::{FileStore, KeyValueStore, load_or_default, save};
//!
//! let store = FileStore::open("./parley-data")?;
//! let mut names: Vec<String> = load_or_default(&store, "names");
//! names.push("alice".into());
//! save(&store, "names", &names)?;
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod typed;

// Re-exports
pub use error::StorageError;
pub use file::{FileStore, StoreConfig};
pub use memory::InMemoryStore;
pub use typed::{load, load_or_default, save};

/// Persistence collaborator: a string key-value store
///
/// Reads of absent keys return `Ok(None)`. Implementations must make a
/// value written by [`set`](KeyValueStore::set) visible to every later
/// [`get`](KeyValueStore::get) on the same store.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`, returning whether it was present
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}
