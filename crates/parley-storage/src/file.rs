//! File-backed key-value store
//!
//! Each key is stored as `<directory>/<prefix><key>.json`. Every write goes
//! to its own uniquely named temporary file in the same directory and is
//! renamed into place, so a crash mid-write leaves the previous value
//! intact and concurrent writers to one key never share a temporary file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::KeyValueStore;
use crate::error::StorageError;

/// Default key namespace
pub const DEFAULT_KEY_PREFIX: &str = "parley-";

/// Configuration for a [`FileStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one file per key
    pub directory: PathBuf,
    /// Prefix prepended to every key's file name
    pub key_prefix: String,
    /// Whether to fsync each write before renaming it into place
    pub sync_writes: bool,
}

impl StoreConfig {
    /// Create a config for the given directory with default options
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            sync_writes: true,
        }
    }

    /// Set the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Enable or disable fsync on write
    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }
}

/// Persistent implementation of [`KeyValueStore`]
#[derive(Debug)]
pub struct FileStore {
    config: StoreConfig,
}

impl FileStore {
    /// Open a store in `directory`, creating it if needed
    pub fn open(directory: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::with_config(StoreConfig::new(directory.as_ref()))
    }

    /// Open a store with explicit configuration
    pub fn with_config(config: StoreConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.directory)?;
        debug!(path = ?config.directory, prefix = %config.key_prefix, "Opened file store");
        Ok(Self { config })
    }

    /// Directory backing this store
    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self
            .config
            .directory
            .join(format!("{}{}.json", self.config.key_prefix, key)))
    }
}

/// Keys become file names, so they must not be able to leave the directory
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !key.starts_with('.');

    if valid {
        Ok(())
    } else {
        Err(StorageError::invalid_key(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        let mut tmp = NamedTempFile::new_in(&self.config.directory)?;
        tmp.write_all(value.as_bytes())?;
        if self.config.sync_writes {
            tmp.as_file().sync_all()?;
        }
        tmp.persist(&path).map_err(|e| e.error)?;

        trace!(key, bytes = value.len(), "Wrote value to disk");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
