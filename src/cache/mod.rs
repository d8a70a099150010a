//! Durable key-value store for fetched responses
//!
//! This module provides the [`Cache`] capability the memoization layer
//! depends on, a file-per-key [`DiskCache`], an in-memory [`MemoryCache`]
//! for tests, and [`cache_key`] for deriving stable keys from request
//! arguments. Entries have no TTL: once stored, a response is returned
//! forever unless the cache is cleared out-of-band.

mod disk;
mod key;
mod store;

pub use disk::DiskCache;
pub use key::cache_key;
pub use store::{Cache, CacheError, MemoryCache};
