//! Memoizing wrapper around the retrying fetcher
//!
//! [`Memoized`] composes a [`FetchClient`] with a [`Cache`]: before fetching
//! it derives a key from the request arguments and returns any stored
//! response without touching the network; on a miss it fetches, stores the
//! result, and returns it. Fetch failures propagate unchanged and are never
//! stored, so a later call retries the fetch rather than replaying a cached
//! failure. Cache failures in either direction are logged and fail open.

use tracing::{debug, warn};

use crate::cache::{cache_key, Cache};
use crate::fetch::{FetchClient, FetchError, FetchResponse};

/// A fetcher whose successful results are memoized in a cache
#[derive(Debug)]
pub struct Memoized<C> {
    fetcher: FetchClient,
    cache: C,
}

impl<C: Cache> Memoized<C> {
    /// Creates a memoized fetcher with the default client and policy
    pub fn new(cache: C) -> Self {
        Self {
            fetcher: FetchClient::new(),
            cache,
        }
    }

    /// Creates a memoized fetcher around a specific client
    pub fn with_fetcher(fetcher: FetchClient, cache: C) -> Self {
        Self { fetcher, cache }
    }

    /// Returns a reference to the underlying cache
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Fetches `url`, returning a previously cached response if one exists
    ///
    /// On a cache hit the stored response is returned immediately: no network
    /// I/O happens and the retry logic is never invoked. On a miss the
    /// retrying fetcher runs; its response is stored and returned. A cache
    /// read failure is logged and treated as a miss, and a cache write
    /// failure is logged without masking the fetched response, so an
    /// unhealthy cache backend degrades to plain fetching.
    pub async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<FetchResponse, FetchError> {
        let key = cache_key(url, params, self.fetcher.policy());

        match self.cache.lookup(&key) {
            Ok(Some(cached)) => {
                debug!(%url, "cache hit");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(%url, error = %err, "cache lookup failed, fetching instead");
            }
        }

        self.fetch_and_store(url, params, &key).await
    }

    /// Fetches `url` unconditionally, refreshing any cached response
    ///
    /// Skips the cache lookup but still stores the fetched response, so
    /// subsequent [`get`](Self::get) calls see the refreshed entry.
    pub async fn refresh(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<FetchResponse, FetchError> {
        let key = cache_key(url, params, self.fetcher.policy());
        self.fetch_and_store(url, params, &key).await
    }

    async fn fetch_and_store(
        &self,
        url: &str,
        params: &[(String, String)],
        key: &str,
    ) -> Result<FetchResponse, FetchError> {
        let response = self.fetcher.get(url, params).await?;

        if let Err(err) = self.cache.store(key, &response) {
            warn!(%url, error = %err, "failed to persist response to cache");
        }

        Ok(response)
    }
}

/// Performs a GET with the default retry policy, memoized in `cache`
///
/// The first successful call for a URL stores its response; subsequent calls
/// with the same URL and cache return that stored response without network
/// I/O. Use [`Memoized::with_fetcher`] to customize the retry policy or
/// attach query parameters.
///
/// # Arguments
/// * `url` - Absolute http(s) URL to fetch
/// * `cache` - Store for memoized responses
///
/// # Returns
/// * `Ok(FetchResponse)` - The cached or freshly fetched response
/// * `Err(FetchError)` - The URL was invalid or all attempts failed
pub async fn get_with_retry<C: Cache>(url: &str, cache: C) -> Result<FetchResponse, FetchError> {
    Memoized::new(cache).get(url, &[]).await
}
