//! Cache capability and in-memory implementation
//!
//! The memoization layer depends on the [`Cache`] trait rather than a
//! concrete store, so a disk-backed cache and an in-memory cache are
//! interchangeable (the latter is handy in tests).

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::fetch::FetchResponse;

/// Errors that can occur when reading or writing the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// The underlying storage could not be read or written
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded for storage
    #[error("cache entry could not be encoded: {0}")]
    Encode(serde_json::Error),

    /// A stored entry could not be decoded
    #[error("cache entry could not be decoded: {0}")]
    Decode(serde_json::Error),
}

/// A durable key-value store for fetched responses
///
/// Keys are derived from the request parameters (see
/// [`cache_key`](super::cache_key)); entries are never expired by the cache
/// itself. Implementations must tolerate concurrent lookups; concurrent
/// stores to the same key are idempotent because both writers hold the same
/// derived response.
pub trait Cache {
    /// Looks up a stored response
    ///
    /// # Returns
    /// * `Ok(Some(response))` if an entry exists for the key
    /// * `Ok(None)` if no entry exists
    /// * `Err(CacheError)` if the store could not be read
    fn lookup(&self, key: &str) -> Result<Option<FetchResponse>, CacheError>;

    /// Stores a response under the key, overwriting any existing entry
    fn store(&self, key: &str, response: &FetchResponse) -> Result<(), CacheError>;
}

impl<C: Cache + ?Sized> Cache for &C {
    fn lookup(&self, key: &str) -> Result<Option<FetchResponse>, CacheError> {
        (**self).lookup(key)
    }

    fn store(&self, key: &str, response: &FetchResponse) -> Result<(), CacheError> {
        (**self).store(key, response)
    }
}

/// An in-memory response cache
///
/// Entries live for the lifetime of the value. Mainly useful for tests and
/// for callers that want memoization without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, FetchResponse>>,
}

impl MemoryCache {
    /// Creates an empty in-memory cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn lookup(&self, key: &str) -> Result<Option<FetchResponse>, CacheError> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn store(&self, key: &str, response: &FetchResponse) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), response.clone());
        Ok(())
    }
}
