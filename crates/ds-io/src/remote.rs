//! Remote source download.
//!
//! Remote locations are fetched to a local temporary path first; format
//! handling then proceeds exactly as for a local file. Locality and format
//! stay orthogonal.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use ds_core::{Error, Result};

static DOWNLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

/// Whether a location string names a remote HTTP(S) source.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Download a remote source to a freshly allocated local temporary path.
pub fn download_to_temp(url: &str) -> Result<PathBuf> {
    tracing::debug!(url, "downloading remote source");
    let response = reqwest::blocking::get(url)
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|e| Error::Http(e.to_string()))?;
    let bytes = response.bytes().map_err(|e| Error::Http(e.to_string()))?;

    let path = std::env::temp_dir().join(format!(
        "ds-download-{}-{}",
        std::process::id(),
        DOWNLOAD_SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&path, &bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_remote_locations() {
        assert!(is_remote("http://example.com/data.csv"));
        assert!(is_remote("https://example.com/data.parquet"));
        assert!(!is_remote("/var/data/data.csv"));
        assert!(!is_remote("data.csv"));
    }

    #[test]
    fn unreachable_host_is_an_http_error() {
        let err = download_to_temp("http://127.0.0.1:1/never.csv").unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
