//! geturl - HTTP GET with retries and response memoization
//!
//! A small library (and CLI) for fetching URLs over HTTP with exponential
//! backoff retries, memoizing successful responses in a durable on-disk
//! cache so repeated calls with identical arguments skip the network.

pub mod cache;
pub mod cli;
pub mod fetch;
pub mod memo;

pub use cache::{cache_key, Cache, CacheError, DiskCache, MemoryCache};
pub use fetch::{FetchClient, FetchError, FetchResponse, RetryPolicy};
pub use memo::{get_with_retry, Memoized};
