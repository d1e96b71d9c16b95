//! HTTP client wrapper for issuing download requests.
//!
//! A thin layer over reqwest with the timeouts this tool needs and
//! error mapping into [`DownloadError`]. The client is created once per
//! loader and reused, taking advantage of connection pooling.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;

/// HTTP client for streaming downloads.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with default timeouts (30 s connect, 5 min read).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the supplied
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Issues a plain GET request for `url` and checks the response status.
    ///
    /// No Range header is sent: the server is expected to return the full
    /// resource body from byte 0 with its total size in Content-Length.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Timeout`] when the request times out,
    /// [`DownloadError::Network`] for other transport failures, and
    /// [`DownloadError::HttpStatus`] for non-success responses.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        debug!(url = %url, "sending GET request");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}
