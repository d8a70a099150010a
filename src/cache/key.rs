//! Cache key derivation
//!
//! A cache key must be deterministic and canonical: the same URL, query
//! parameters, and retry policy always hash to the same key, and any change
//! to one of them produces a different key. The hex digest is also safe to
//! use as a file name.

use sha2::{Digest, Sha256};

use crate::fetch::RetryPolicy;

/// Derives a stable cache key for a GET request
///
/// The key covers every argument that selects the result: the URL, the query
/// parameters (in the order given), and the retry policy. Including the
/// policy keeps differently-parameterized calls to the same URL from
/// colliding.
pub fn cache_key(url: &str, params: &[(String, String)], policy: &RetryPolicy) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    for (key, value) in params {
        hasher.update(b"\n");
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }
    hasher.update(
        format!(
            "\n{}\n{}\n{}\n{}",
            policy.max_attempts,
            policy.initial_delay.as_millis(),
            policy.max_delay.as_millis(),
            policy.factor,
        )
        .as_bytes(),
    );
    format!("{:x}", hasher.finalize())
}
