//! Toolchain download primitives
//!
//! Bootstrap fetches toolchain archives over HTTP(S) into a local cache and
//! unpacks them. Downloads go through the [`Fetcher`] trait so that tests
//! (and offline setups) can provide archives without network access.

pub mod archive;
pub mod mock;

pub use archive::{extract, strip_archive_suffix, ArchiveFormat};
pub use mock::MockFetcher;

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from validating, downloading or unpacking a toolchain archive
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("URL must start with 'http:' or 'https:': {url}")]
    UnsupportedScheme { url: String },

    #[error("URL does not name an archive file: {url}")]
    InvalidUrl { url: String },

    #[error("Unsupported archive type: {name} (supported: .tar.gz, .tgz, .tar.xz, .txz, .tar.bz2, .tbz2, .tar, .zip)")]
    UnsupportedArchive { name: String },

    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Failed to extract {}: {reason}", archive.display())]
    Extract { archive: PathBuf, reason: String },
}

impl FetchError {
    /// Whether the error comes from the configuration rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedScheme { .. } | Self::InvalidUrl { .. } | Self::UnsupportedArchive { .. }
        )
    }
}

/// Downloads a URL to a local file
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()>;
}

/// Only `http` and `https` URLs may be fetched
pub fn validate_url(url: &str) -> Result<(), FetchError> {
    let scheme = url.split_once(':').map(|(scheme, _)| scheme.to_ascii_lowercase());
    match scheme.as_deref() {
        Some("http") | Some("https") => Ok(()),
        _ => Err(FetchError::UnsupportedScheme {
            url: url.to_string(),
        }),
    }
}

/// Last path segment of a URL, without query or fragment
pub fn archive_name(url: &str) -> Result<&str, FetchError> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = path.split_once("://").map_or(path, |(_, rest)| rest);

    match path.split_once('/') {
        Some((_, rest)) => rest
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| FetchError::InvalidUrl {
                url: url.to_string(),
            }),
        None => Err(FetchError::InvalidUrl {
            url: url.to_string(),
        }),
    }
}

/// Ensures `<cache_dir>/<archive name>` exists, downloading it when missing
///
/// The scheme is checked before any network access.
pub fn ensure_archive(
    fetcher: &dyn Fetcher,
    url: &str,
    cache_dir: &Path,
) -> Result<PathBuf, FetchError> {
    let name = archive_name(url)?;
    let path = cache_dir.join(name);
    info!("Retrieving: {}", name);

    if path.exists() {
        info!("Archive found: {}", path.display());
        return Ok(path);
    }

    validate_url(url)?;
    info!("Downloading: {}", url);

    // Download next to the final location so an interrupted run never leaves
    // a truncated archive under the expected name.
    let partial = cache_dir.join(format!("{}.part", name));
    fetcher
        .fetch(url, &partial)
        .and_then(|()| {
            fs::rename(&partial, &path)
                .with_context(|| format!("Failed to move download to {}", path.display()))
        })
        .map_err(|e| {
            let _ = fs::remove_file(&partial);
            FetchError::Download {
                url: url.to_string(),
                reason: format!("{:#}", e),
            }
        })?;

    Ok(path)
}

/// Unpacks `archive` into `output_path` unless its directory already exists
pub fn ensure_extracted(archive: &Path, output_path: &Path) -> Result<PathBuf, FetchError> {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let expected = output_path.join(strip_archive_suffix(&name)?);

    if expected.exists() {
        debug!("Toolchain already extracted: {}", expected.display());
    } else {
        extract(archive, output_path)?;
    }

    Ok(expected)
}

/// Fetcher backed by a blocking `reqwest` client
#[derive(Debug, Default, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        let mut response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to download {} (check network connectivity)", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Download failed with HTTP {} from {}", response.status(), url);
        }

        let mut file = File::create(destination)
            .with_context(|| format!("Failed to create {}", destination.display()))?;
        let bytes = response
            .copy_to(&mut file)
            .context("Failed to read response body")?;

        debug!("Downloaded {} bytes to {}", bytes, destination.display());
        Ok(())
    }
}
