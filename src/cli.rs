//! Command-line interface parsing for geturl
//!
//! This module handles parsing of CLI arguments using clap, including
//! repeatable `--param KEY=VALUE` query parameters and the retry/backoff
//! flags, and validates them into a [`FetchSettings`].

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::fetch::RetryPolicy;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// A --param argument was not of the form KEY=VALUE
    #[error("Invalid parameter: '{0}'. Expected KEY=VALUE")]
    InvalidParam(String),

    /// --retries must allow at least one attempt
    #[error("Invalid retries: {0}. At least 1 attempt is required")]
    InvalidRetries(u32),

    /// A delay flag was negative, NaN, or too large for a Duration
    #[error("Invalid delay: {0}. Delays must be finite and non-negative")]
    InvalidDelay(f64),
}

/// geturl - fetch a URL with retries and cache the response on disk
#[derive(Parser, Debug)]
#[command(name = "geturl")]
#[command(about = "Fetch a URL with retries, memoizing the response on disk")]
#[command(version)]
pub struct Cli {
    /// URL to fetch
    pub url: String,

    /// Extra query parameter as KEY=VALUE (repeatable)
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Maximum number of attempts before giving up
    #[arg(long, default_value_t = crate::fetch::DEFAULT_MAX_ATTEMPTS)]
    pub retries: u32,

    /// Initial delay between attempts, in seconds
    #[arg(long, default_value_t = 1.0, value_name = "SECONDS")]
    pub delay: f64,

    /// Cap on the delay between attempts, in seconds
    #[arg(long, default_value_t = 30.0, value_name = "SECONDS")]
    pub max_delay: f64,

    /// Directory for the response cache (defaults to the user cache dir)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Skip the cache entirely and always hit the network
    #[arg(long)]
    pub no_cache: bool,

    /// Re-fetch even if a cached response exists, updating the cache
    #[arg(long)]
    pub refresh: bool,
}

/// Validated fetch configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Retry policy built from --retries/--delay/--max-delay
    pub policy: RetryPolicy,
}

/// Parses a KEY=VALUE argument into a query parameter pair.
///
/// # Arguments
/// * `s` - The parameter string from the CLI
///
/// # Returns
/// * `Ok((key, value))` if the string contains an '=' and a non-empty key
/// * `Err(CliError::InvalidParam)` otherwise
pub fn parse_param(s: &str) -> Result<(String, String), CliError> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(CliError::InvalidParam(s.to_string())),
    }
}

impl FetchSettings {
    /// Creates a FetchSettings from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(FetchSettings)` with the validated retry policy
    /// * `Err(CliError)` if a retry or delay flag is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.retries < 1 {
            return Err(CliError::InvalidRetries(cli.retries));
        }

        let policy = RetryPolicy::new(cli.retries)
            .with_initial_delay(parse_delay(cli.delay)?)
            .with_max_delay(parse_delay(cli.max_delay)?);

        Ok(Self { policy })
    }
}

/// Converts a delay flag into a Duration, rejecting values a Duration
/// cannot represent (negative, NaN, infinite, or absurdly large).
fn parse_delay(seconds: f64) -> Result<Duration, CliError> {
    if !seconds.is_finite() {
        return Err(CliError::InvalidDelay(seconds));
    }
    Duration::try_from_secs_f64(seconds).map_err(|_| CliError::InvalidDelay(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_key_value() {
        assert_eq!(
            parse_param("q=rust").unwrap(),
            ("q".to_string(), "rust".to_string())
        );
    }

    #[test]
    fn test_parse_param_empty_value_is_allowed() {
        assert_eq!(
            parse_param("flag=").unwrap(),
            ("flag".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_param_value_may_contain_equals() {
        assert_eq!(
            parse_param("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn test_parse_param_missing_equals_is_invalid() {
        let result = parse_param("noequals");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid parameter"));
        assert!(err.to_string().contains("noequals"));
    }

    #[test]
    fn test_parse_param_empty_key_is_invalid() {
        assert!(parse_param("=value").is_err());
    }

    #[test]
    fn test_cli_parse_url_only_uses_defaults() {
        let cli = Cli::parse_from(["geturl", "https://example.com/"]);
        assert_eq!(cli.url, "https://example.com/");
        assert!(cli.params.is_empty());
        assert_eq!(cli.retries, 10);
        assert!(!cli.no_cache);
        assert!(!cli.refresh);
        assert!(cli.cache_dir.is_none());
    }

    #[test]
    fn test_cli_parse_repeated_params() {
        let cli = Cli::parse_from([
            "geturl",
            "https://example.com/",
            "--param",
            "q=rust",
            "-p",
            "page=2",
        ]);
        assert_eq!(
            cli.params,
            vec![
                ("q".to_string(), "rust".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_cli_parse_retry_flags() {
        let cli = Cli::parse_from([
            "geturl",
            "https://example.com/",
            "--retries",
            "3",
            "--delay",
            "0.5",
            "--max-delay",
            "5",
        ]);
        assert_eq!(cli.retries, 3);
        assert!((cli.delay - 0.5).abs() < f64::EPSILON);
        assert!((cli.max_delay - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_settings_from_cli_defaults() {
        let cli = Cli::parse_from(["geturl", "https://example.com/"]);
        let settings = FetchSettings::from_cli(&cli).unwrap();
        assert_eq!(settings.policy, RetryPolicy::default());
    }

    #[test]
    fn test_settings_from_cli_custom_policy() {
        let cli = Cli::parse_from([
            "geturl",
            "https://example.com/",
            "--retries",
            "2",
            "--delay",
            "0",
        ]);
        let settings = FetchSettings::from_cli(&cli).unwrap();
        assert_eq!(settings.policy.max_attempts, 2);
        assert_eq!(settings.policy.initial_delay, Duration::ZERO);
    }

    #[test]
    fn test_settings_from_cli_zero_retries_is_invalid() {
        let cli = Cli::parse_from(["geturl", "https://example.com/", "--retries", "0"]);
        let result = FetchSettings::from_cli(&cli);
        assert!(matches!(result, Err(CliError::InvalidRetries(0))));
    }

    #[test]
    fn test_settings_from_cli_negative_delay_is_invalid() {
        // The equals syntax keeps clap from reading "-1" as a flag.
        let cli = Cli::parse_from(["geturl", "https://example.com/", "--delay=-1"]);
        let result = FetchSettings::from_cli(&cli);
        assert!(matches!(result, Err(CliError::InvalidDelay(_))));
    }

    #[test]
    fn test_settings_from_cli_nan_delay_is_invalid() {
        let cli = Cli::parse_from(["geturl", "https://example.com/", "--delay", "NaN"]);
        let result = FetchSettings::from_cli(&cli);
        assert!(matches!(result, Err(CliError::InvalidDelay(_))));
    }

    #[test]
    fn test_settings_from_cli_oversized_delay_is_invalid() {
        // Larger than any Duration can represent; must not panic.
        let cli = Cli::parse_from(["geturl", "https://example.com/", "--delay", "1e300"]);
        let result = FetchSettings::from_cli(&cli);
        assert!(matches!(result, Err(CliError::InvalidDelay(_))));
    }

    #[test]
    fn test_settings_from_cli_infinite_max_delay_is_invalid() {
        let cli = Cli::parse_from(["geturl", "https://example.com/", "--max-delay", "inf"]);
        let result = FetchSettings::from_cli(&cli);
        assert!(matches!(result, Err(CliError::InvalidDelay(_))));
    }
}
