//! geturl - fetch a URL with retries and cache the response on disk
//!
//! Prints the response body to stdout. Diagnostics (retries, cache warnings)
//! go to stderr via tracing; set RUST_LOG to control verbosity.

use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use geturl::cache::DiskCache;
use geturl::cli::{Cli, FetchSettings};
use geturl::fetch::{FetchClient, FetchResponse};
use geturl::memo::Memoized;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(response) => {
            if let Err(err) = io::stdout().write_all(&response.body) {
                eprintln!("geturl: {}", err);
                return ExitCode::FAILURE;
            }
            if response.is_success() {
                ExitCode::SUCCESS
            } else {
                eprintln!("geturl: HTTP status {}", response.status);
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("geturl: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Runs the fetch with the cache mode selected on the command line
async fn run(cli: &Cli) -> Result<FetchResponse, Box<dyn Error>> {
    let settings = FetchSettings::from_cli(cli)?;
    let fetcher = FetchClient::new().with_policy(settings.policy);

    if cli.no_cache {
        return Ok(fetcher.get(&cli.url, &cli.params).await?);
    }

    let cache = match &cli.cache_dir {
        Some(dir) => DiskCache::with_dir(dir.clone()),
        None => DiskCache::new().ok_or("could not determine a cache directory")?,
    };
    let memoized = Memoized::with_fetcher(fetcher, cache);

    let response = if cli.refresh {
        memoized.refresh(&cli.url, &cli.params).await?
    } else {
        memoized.get(&cli.url, &cli.params).await?
    };
    Ok(response)
}
