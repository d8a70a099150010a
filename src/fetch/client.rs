//! Retrying HTTP GET client
//!
//! This module provides the [`FetchClient`], a thin wrapper around
//! `reqwest::Client` that validates the URL up front, merges query
//! parameters, and retries transient failures according to a
//! [`RetryPolicy`].

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, warn};

use super::policy::{classify_status, RetryPolicy, StatusAction};

/// The outcome of a GET request: the HTTP status code and the raw body
///
/// Immutable once produced. Serializable so it can be persisted by the
/// response cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// HTTP status code of the final response
    pub status: u16,
    /// Response body as raw bytes
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Returns the body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Whether the status code is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The last failure observed before giving up on a URL
#[derive(Debug)]
pub enum LastFailure {
    /// The server kept answering with a retryable status code
    Status(u16),
    /// The request never produced a response (connect, DNS, timeout, ...)
    Transport(reqwest::Error),
}

impl fmt::Display for LastFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastFailure::Status(code) => write!(f, "HTTP status {}", code),
            LastFailure::Transport(err) => write!(f, "{}", err),
        }
    }
}

/// Errors that can occur when fetching a URL
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed, or is not an absolute http(s) URL
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Every attempt failed with a transient error
    #[error("giving up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: LastFailure,
    },
}

/// Client for performing GET requests with retries
///
/// Wraps a `reqwest::Client` together with a [`RetryPolicy`]. A received
/// response with a terminal status (any 2xx, any non-retryable error code)
/// is returned as-is; network failures and retryable statuses are retried
/// with exponential backoff until the attempt budget runs out.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    policy: RetryPolicy,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Creates a new FetchClient with the default retry policy
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            policy: RetryPolicy::default(),
        }
    }

    /// Creates a new FetchClient with a custom HTTP client
    ///
    /// Useful when the caller needs specific transport settings (timeouts,
    /// proxies, user agent).
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            policy: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the retry policy this client fetches with
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Performs a GET request against `url` with the given query parameters
    ///
    /// The URL is validated and composed before any network I/O, so a
    /// malformed URL fails fast with [`FetchError::InvalidUrl`]. Transient
    /// failures (network errors, 429, 5xx other than 501) are retried with
    /// backoff; any other received response is returned immediately, whatever
    /// its status code.
    ///
    /// # Arguments
    /// * `url` - Absolute http(s) URL to fetch
    /// * `params` - Extra query parameters; they override duplicates already
    ///   present in the URL
    ///
    /// # Returns
    /// * `Ok(FetchResponse)` - A response was received with a terminal status
    /// * `Err(FetchError)` - The URL was invalid, or all attempts failed
    pub async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<FetchResponse, FetchError> {
        let url = compose_url(url, params)?;

        let mut backoff = self.policy.backoff();
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            let delay = backoff.next().unwrap_or(Duration::ZERO);
            if !delay.is_zero() {
                info!(%url, attempt, delay_ms = delay.as_millis() as u64, "retrying");
                sleep(delay).await;
            }

            let outcome = match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    response.bytes().await.map(|bytes| (status, bytes.to_vec()))
                }
                Err(err) => Err(err),
            };

            match outcome {
                Ok((status, mut body)) => match classify_status(status) {
                    StatusAction::Terminal => {
                        if status == 204 {
                            // No content
                            body.clear();
                        }
                        return Ok(FetchResponse { status, body });
                    }
                    StatusAction::Retry => {
                        if attempt >= self.policy.max_attempts {
                            return Err(FetchError::Exhausted {
                                url: url.to_string(),
                                attempts: attempt,
                                last: LastFailure::Status(status),
                            });
                        }
                        warn!(%url, status, attempt, "got retryable HTTP status");
                    }
                },
                Err(err) => {
                    if attempt >= self.policy.max_attempts {
                        return Err(FetchError::Exhausted {
                            url: url.to_string(),
                            attempts: attempt,
                            last: LastFailure::Transport(err),
                        });
                    }
                    warn!(%url, error = %err, attempt, "request failed");
                }
            }
        }
    }
}

/// Parses `url` and merges `params` into its query string
///
/// Parameters supplied by the caller win over parameters already present in
/// the URL under the same key; non-conflicting existing parameters are
/// preserved. An empty `params` slice leaves the URL untouched.
///
/// # Returns
/// * `Ok(Url)` - The composed absolute URL
/// * `Err(FetchError::InvalidUrl)` - The URL is malformed or not http(s)
pub fn compose_url(url: &str, params: &[(String, String)]) -> Result<Url, FetchError> {
    let mut parsed = Url::parse(url).map_err(|err| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    if params.is_empty() {
        return Ok(parsed);
    }

    let existing: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = parsed.query_pairs_mut();
        pairs.clear();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
        for (key, value) in &existing {
            if !params.iter().any(|(pk, _)| pk == key) {
                pairs.append_pair(key, value);
            }
        }
    }

    Ok(parsed)
}
