//! Retry policy and backoff schedule for the fetcher
//!
//! Defines how many attempts a GET is allowed, how long to wait between
//! attempts, and which HTTP status codes are worth retrying at all.

use std::time::Duration;

/// Default number of attempts before giving up on a URL.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default initial delay between attempts.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Default cap on the delay between attempts.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Configuration for the retry behavior of a [`FetchClient`](super::FetchClient)
///
/// The delay before attempt `n` (for `n >= 2`) is
/// `initial_delay * factor^(n - 2)`, capped at `max_delay`. No delay is
/// inserted before the first attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first (always at least 1)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and default delays
    ///
    /// `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Sets the initial delay between attempts
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the cap on the delay between attempts
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Returns the backoff schedule for one fetch call
    pub(crate) fn backoff(&self) -> Backoff {
        Backoff {
            next_delay: self.initial_delay,
            max_delay: self.max_delay,
            factor: self.factor,
            first: true,
        }
    }
}

/// Iterator over the delays to wait before each attempt
///
/// Yields zero first (the initial attempt is immediate), then the initial
/// delay growing geometrically, capped at the maximum delay. Never ends.
#[derive(Debug)]
pub struct Backoff {
    next_delay: Duration,
    max_delay: Duration,
    factor: f64,
    first: bool,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.first {
            self.first = false;
            return Some(Duration::ZERO);
        }
        let delay = self.next_delay;
        self.next_delay = self.next_delay.mul_f64(self.factor).min(self.max_delay);
        Some(delay)
    }
}

/// What to do with a received HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// The response is final; return it to the caller
    Terminal,
    /// The condition is transient; wait and try again
    Retry,
}

/// Classifies an HTTP status code as terminal or retryable
///
/// Retries are limited to conditions that plausibly clear up on their own:
/// 429 (rate limiting) and server errors other than 501. Everything else,
/// including client errors, is returned to the caller as-is.
pub fn classify_status(code: u16) -> StatusAction {
    match code {
        200..=299 => StatusAction::Terminal,
        429 => StatusAction::Retry,
        501 => StatusAction::Terminal,
        400..=499 => StatusAction::Terminal,
        500..=599 => StatusAction::Retry,
        _ => StatusAction::Terminal,
    }
}
