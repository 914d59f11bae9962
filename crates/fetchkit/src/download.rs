//! Blocking HTTP downloads.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum download size (500 MB).
pub const MAX_DOWNLOAD_SIZE: u64 = 500 * 1024 * 1024;

/// File name used when a URL has no usable last path segment.
const FALLBACK_FILE_NAME: &str = "download";

/// HTTP downloader backed by a shared ureq agent.
///
/// # Example
///
/// ```no_run
/// use fetchkit::Downloader;
/// use std::path::Path;
///
/// let downloader = Downloader::new();
/// let saved = downloader
///     .download_into_dir("https://example.com/file.txt", Path::new("/tmp"))
///     .unwrap();
/// println!("saved to {}", saved.display());
/// ```
pub struct Downloader {
    agent: ureq::Agent,
    limit: u64,
}

impl Downloader {
    /// Create a downloader with the default size limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            limit: MAX_DOWNLOAD_SIZE,
        }
    }

    /// Override the maximum body size.
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Fetch a URL into memory.
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("GET {url}");

        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", "zztools")
            .call()
            .map_err(|e| Error::http(url, e))?;

        response
            .body_mut()
            .with_config()
            .limit(self.limit)
            .read_to_vec()
            .map_err(|e| Error::http(url, e))
    }

    /// Download a URL to an exact file path, creating parent directories.
    ///
    /// Returns the number of bytes written.
    pub fn download_to_file(&self, url: &str, dest: &Path) -> Result<u64> {
        let bytes = self.fetch(url)?;

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(dest, &bytes).map_err(|e| Error::io(dest, e))?;

        log::info!("Downloaded {} ({} bytes) to {}", url, bytes.len(), dest.display());
        Ok(bytes.len() as u64)
    }

    /// Download a URL into a directory, naming the file after the URL.
    ///
    /// Returns the path of the saved file.
    pub fn download_into_dir(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        let dest = dir.join(file_name_from_url(url));
        self.download_to_file(url, &dest)?;
        Ok(dest)
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a file name from the last path segment of a URL.
///
/// Query strings and fragments are ignored. Falls back to `download` when
/// the URL ends in a slash or has no path.
pub fn file_name_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);

    // Skip the host component
    let segment = match path.split_once('/') {
        Some((_, tail)) => tail.rsplit('/').next().unwrap_or(""),
        None => "",
    };

    if segment.is_empty() || segment == "." || segment == ".." {
        FALLBACK_FILE_NAME.to_string()
    } else {
        segment.to_string()
    }
}
