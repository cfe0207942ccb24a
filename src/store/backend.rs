//! Storage backend abstraction.
//!
//! This module defines the [`StorageBackend`] trait: a minimal key/value
//! interface shaped like browser local storage. The store keeps one JSON blob
//! under a fixed key, so backends never need to understand the content.

use crate::domain::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Durable key/value storage for the persisted state blob.
///
/// # Implementations
///
/// - [`JsonFileStorage`](crate::store::JsonFileStorage): one file per key with atomic writes
/// - [`MemoryStorage`]: process-local map, used for ephemeral runs and tests
pub trait StorageBackend {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable or the read fails.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (quota, permissions, disabled storage).
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory backend. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.entries.borrow_mut().insert(key.into(), value.into());
        storage
    }

    /// Current value under `key`, bypassing the trait.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
