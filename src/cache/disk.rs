//! Disk-backed response cache
//!
//! Stores each response as a JSON file named after its cache key, in an
//! XDG-compliant cache directory by default. Entries carry the timestamp at
//! which they were cached but no expiry: once stored, a response is returned
//! forever unless the directory is cleared out-of-band.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

use super::store::{Cache, CacheError};
use crate::fetch::FetchResponse;

/// Wrapper struct for cached responses stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct DiskEntry {
    /// The cached response
    response: FetchResponse,
    /// When the response was cached
    cached_at: DateTime<Utc>,
}

/// A durable file-per-key response cache
///
/// Cache files are stored as JSON in a single directory
/// (`~/.cache/geturl/` on Linux by default, or equivalent XDG path on other
/// platforms). Keys are expected to be filesystem-safe; the hex digests
/// produced by [`cache_key`](super::cache_key) always are.
#[derive(Debug, Clone)]
pub struct DiskCache {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl DiskCache {
    /// Creates a DiskCache in the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "geturl")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a DiskCache rooted at a custom directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the directory this cache stores entries in
    pub fn dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Returns the path to the cache file for the given key
    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }
}

impl Cache for DiskCache {
    /// Reads a stored response from disk
    ///
    /// A missing file is an ordinary miss (`Ok(None)`). An unreadable or
    /// unparsable file is reported as an error so the caller can decide to
    /// fail open and re-fetch.
    fn lookup(&self, key: &str) -> Result<Option<FetchResponse>, CacheError> {
        let path = self.entry_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(CacheError::Io(err)),
        };

        let entry: DiskEntry = serde_json::from_str(&content).map_err(CacheError::Decode)?;
        Ok(Some(entry.response))
    }

    /// Writes a response to disk, creating the cache directory if needed
    fn store(&self, key: &str, response: &FetchResponse) -> Result<(), CacheError> {
        self.ensure_dir()?;

        let entry = DiskEntry {
            response: response.clone(),
            cached_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&entry).map_err(CacheError::Encode)?;

        fs::write(self.entry_path(key), json)?;
        Ok(())
    }
}
