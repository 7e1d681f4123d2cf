//! Cart Storage
//!
//! Durable backing for the cart store. Payloads are opaque strings under
//! a fixed key, mirroring browser local storage.

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
};

use thiserror::Error;

/// Cart Storage Errors
#[derive(Debug, Error)]
pub enum CartStorageError {
    #[error("cart storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key-value backing for cart payloads.
pub trait CartStorage {
    /// Writes the payload under `key`, replacing any previous value.
    fn persist(&mut self, key: &str, payload: &str) -> Result<(), CartStorageError>;

    /// Reads the payload stored under `key`, if any.
    fn restore(&self, key: &str) -> Result<Option<String>, CartStorageError>;
}

/// In-memory storage for tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryCartStorage {
    entries: HashMap<String, String>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryCartStorage {
    fn persist(&mut self, key: &str, payload: &str) -> Result<(), CartStorageError> {
        self.entries.insert(key.to_owned(), payload.to_owned());

        Ok(())
    }

    fn restore(&self, key: &str) -> Result<Option<String>, CartStorageError> {
        Ok(self.entries.get(key).cloned())
    }
}

/// File-backed storage keeping one JSON document per key under a
/// directory, created on first write.
#[derive(Debug, Clone)]
pub struct JsonFileCartStorage {
    root: PathBuf,
}

impl JsonFileCartStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl CartStorage for JsonFileCartStorage {
    fn persist(&mut self, key: &str, payload: &str) -> Result<(), CartStorageError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), payload)?;

        Ok(())
    }

    fn restore(&self, key: &str) -> Result<Option<String>, CartStorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }
}
