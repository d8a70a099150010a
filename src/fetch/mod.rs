//! HTTP GET with retries and exponential backoff
//!
//! This module provides the retrying fetcher: a [`FetchClient`] that issues
//! GET requests, retries transient failures (network errors, 429, most 5xx)
//! according to a [`RetryPolicy`], and returns the final status and body as
//! a [`FetchResponse`].

mod client;
mod policy;

pub use client::{compose_url, FetchClient, FetchError, FetchResponse, LastFailure};
pub use policy::{
    classify_status, Backoff, RetryPolicy, StatusAction, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_DELAY,
};
