//! Remote payload fetching
//!
//! This module handles:
//! - Defaulting the scheme of scheme-less payload locations
//! - A single manual redirect hop read from the `Location` header
//! - Bounded connect and read timeouts
//! - Streaming the body to disk with cancellation checks between chunks
//!
//! There are no retries. A failed fetch is surfaced immediately and the
//! caller discards whatever was written to the destination.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::LOCATION;

use crate::cancel::CancellationToken;
use crate::error::{AppstowError, Result, fetch_failed, file_write_failed};
use crate::progress::ProgressReporter;

/// Scheme used when a payload location does not name one
pub const DEFAULT_SCHEME: &str = "http";

const CHUNK_SIZE: usize = 16 * 1024;

/// Timeouts for payload downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(180),
        }
    }
}

/// True when a payload location names a network scheme or host
pub fn has_network_scheme(location: &str) -> bool {
    let location = location.trim();
    location.contains("://") || location.starts_with("//")
}

/// Prefix the default scheme onto a location that has none
pub fn normalize_uri(location: &str) -> String {
    let location = location.trim();
    if location.contains("://") {
        location.to_string()
    } else if let Some(rest) = location.strip_prefix("//") {
        format!("{DEFAULT_SCHEME}://{rest}")
    } else {
        format!("{DEFAULT_SCHEME}://{location}")
    }
}

fn is_followable_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Blocking HTTP(S) payload downloader
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    cancel: CancellationToken,
}

impl Fetcher {
    /// Create a fetcher with the given timeouts
    pub fn new(options: FetchOptions) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.read_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("appstow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppstowError::IoError {
                message: format!("Failed to initialize HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            cancel: CancellationToken::new(),
        })
    }

    /// Use `token` to abandon downloads between chunks
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!(url, "GET");
        self.client
            .get(url)
            .send()
            .map_err(|e| fetch_failed(url, e.to_string()))
    }

    /// Download `uri` into `destination`, returning the number of bytes written
    pub fn download(
        &self,
        uri: &str,
        destination: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<u64> {
        self.cancel.check()?;
        let write_error =
            |e: std::io::Error| file_write_failed(destination.display().to_string(), e.to_string());
        let file = File::create(destination).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        let received = self.download_to(uri, &mut writer, progress)?;
        writer.flush().map_err(write_error)?;
        Ok(received)
    }

    /// Stream `uri` into `writer`, returning the number of bytes written
    pub fn download_to(
        &self,
        uri: &str,
        writer: &mut impl Write,
        progress: &dyn ProgressReporter,
    ) -> Result<u64> {
        let url = normalize_uri(uri);
        self.cancel.check()?;
        tracing::info!(url = %url, "downloading payload");

        let mut response = self.get(&url)?;
        if is_followable_redirect(response.status()) {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| fetch_failed(&url, "redirect without Location header"))?;
            let next = response
                .url()
                .join(location)
                .map_err(|e| fetch_failed(&url, format!("invalid redirect location: {e}")))?;
            tracing::debug!(from = %url, to = %next, "following redirect");
            drop(response);
            self.cancel.check()?;
            response = self.get(next.as_str())?;
            if response.status().is_redirection() {
                return Err(fetch_failed(next.as_str(), "too many redirects"));
            }
        }

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_failed(response.url().as_str(), format!("HTTP {status}")));
        }

        let total = response.content_length();
        let received = self.stream_body(&mut response, writer, total, progress)?;

        if let Some(expected) = total {
            if expected != received {
                return Err(fetch_failed(
                    &url,
                    format!("truncated body: expected {expected} bytes, got {received}"),
                ));
            }
        }

        tracing::info!(url = %url, bytes = received, "download complete");
        Ok(received)
    }

    fn stream_body(
        &self,
        response: &mut Response,
        writer: &mut impl Write,
        total: Option<u64>,
        progress: &dyn ProgressReporter,
    ) -> Result<u64> {
        let url = response.url().to_string();
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut received: u64 = 0;
        loop {
            self.cancel.check()?;
            let read = response
                .read(&mut buffer)
                .map_err(|e| fetch_failed(&url, e.to_string()))?;
            if read == 0 {
                break;
            }
            writer
                .write_all(&buffer[..read])
                .map_err(|e| fetch_failed(&url, format!("write failed: {e}")))?;
            received += read as u64;
            progress.download(received, total);
        }
        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_uri() {
        assert_eq!(normalize_uri("example.com/a.jar"), "http://example.com/a.jar");
        assert_eq!(normalize_uri("//example.com/a.jar"), "http://example.com/a.jar");
        assert_eq!(
            normalize_uri("https://example.com/a.jar"),
            "https://example.com/a.jar"
        );
        assert_eq!(normalize_uri("  ftp://x/y "), "ftp://x/y");
    }

    #[test]
    fn test_has_network_scheme() {
        assert!(has_network_scheme("http://example.com/a.jar"));
        assert!(has_network_scheme("//example.com/a.jar"));
        assert!(!has_network_scheme("a.jar"));
        assert!(!has_network_scheme("sub/dir/a.jar"));
    }

    #[test]
    fn test_default_options() {
        let options = FetchOptions::default();
        assert_eq!(options.connect_timeout, Duration::from_secs(15));
        assert_eq!(options.read_timeout, Duration::from_secs(180));
    }

    #[test]
    fn test_cancelled_before_connect() {
        let token = CancellationToken::new();
        token.cancel();
        let fetcher = Fetcher::new(FetchOptions::default())
            .unwrap()
            .with_cancellation(token);
        let temp = tempfile::TempDir::new().unwrap();
        let dest = temp.path().join("a.jar");
        let result = fetcher.download(
            "http://127.0.0.1:9/a.jar",
            &dest,
            &crate::progress::SilentProgress,
        );
        assert!(matches!(result, Err(AppstowError::Cancelled)));
        assert!(!dest.exists());
    }
}
