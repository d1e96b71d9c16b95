//! Download/resume engine.
//!
//! One engine serves both loader variants, parameterized by a
//! [`RateLimiter`]: `rate_limited` paces chunk writes against a token
//! bucket, `unthrottled` streams as fast as the transport allows. The
//! resume decision and the streaming loop are shared.
//!
//! # Resume model
//!
//! Resumability is inferred purely from the local file size versus the
//! Content-Length of a freshly fetched full response. No Range header is
//! sent; when resuming, the already-held prefix is re-fetched and
//! discarded from the stream. This re-spends bandwidth on the skipped
//! prefix and requires the server to declare Content-Length.
//!
//! # Example
//!
//! ```no_run
//! use market_data_loader::download::FileLoader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = FileLoader::rate_limited(5_000_000); // 5 MB/s
//! let outcome = loader
//!     .download(
//!         "https://data.binance.vision/data/spot/monthly/trades/BTCUSDT/BTCUSDT-trades-2017-12.zip",
//!         Path::new("."),
//!     )
//!     .await?;
//! println!("saved {} ({} bytes)", outcome.path.display(), outcome.bytes_written);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::header::CONTENT_LENGTH;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::client::HttpClient;
use super::error::DownloadError;
use super::rate_limiter::RateLimiter;
use super::{filename, probe};

/// How a completed `download` call obtained its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// No file existed; the whole body was written from offset 0.
    Fresh,
    /// The local file already matched the declared total size; nothing was
    /// read from the body.
    Skip,
    /// A shorter file existed; the missing remainder was appended.
    Resume,
}

/// Result of a successful `download` call.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    /// Final path of the destination file.
    pub path: PathBuf,
    /// Bytes written to disk by this call (0 for [`TransferMode::Skip`]).
    pub bytes_written: u64,
    /// How the transfer was carried out.
    pub mode: TransferMode,
}

/// Resumable single-file loader.
///
/// All state is scoped to one `download` call; the loader itself only
/// holds the HTTP client and the pacing strategy and can be reused across
/// calls.
#[derive(Debug)]
pub struct FileLoader {
    client: HttpClient,
    limiter: RateLimiter,
}

impl FileLoader {
    /// Creates a loader from explicit parts. Useful for tests that need
    /// custom timeouts.
    #[must_use]
    pub fn new(client: HttpClient, limiter: RateLimiter) -> Self {
        Self { client, limiter }
    }

    /// Creates a rate-limited loader with a bytes-per-second ceiling.
    ///
    /// Zero substitutes the default limit (1 MB/s) rather than disabling
    /// pacing.
    #[must_use]
    pub fn rate_limited(bytes_per_second: u64) -> Self {
        Self::new(HttpClient::new(), RateLimiter::limited(bytes_per_second))
    }

    /// Creates an unthrottled loader.
    #[must_use]
    pub fn unthrottled() -> Self {
        Self::new(HttpClient::new(), RateLimiter::unlimited())
    }

    /// Downloads `file_link` into `dest_dir`, resuming a partial file when
    /// one exists.
    ///
    /// The local file is named after the URL's final path segment. If a
    /// file of that name already holds the declared total size the call is
    /// a no-op; if it is shorter, the missing remainder is appended. A
    /// transfer that fails midway leaves the partial file in place — it
    /// becomes the resume point for the next invocation, which is the
    /// documented recovery path.
    ///
    /// `dest_dir` must already exist; the loader does not create it.
    ///
    /// # Errors
    ///
    /// The first error encountered aborts the transfer; see
    /// [`DownloadError`] for the stages.
    #[instrument(skip(self), fields(url = %file_link, dir = %dest_dir.display()))]
    pub async fn download(
        &self,
        file_link: &str,
        dest_dir: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let url =
            Url::parse(file_link).map_err(|_| DownloadError::invalid_url(file_link))?;
        let file_name =
            filename::target_name(&url).ok_or_else(|| DownloadError::invalid_url(file_link))?;

        let exists = probe::file_exists(&file_name, dest_dir).await?;
        let target = dest_dir.join(&file_name);

        let response = self.client.get(file_link).await?;

        let outcome = if exists {
            self.continue_loading(response, file_link, &target).await?
        } else {
            self.create_and_load(response, file_link, &target).await?
        };

        info!(
            path = %outcome.path.display(),
            bytes = outcome.bytes_written,
            mode = ?outcome.mode,
            "download complete"
        );
        Ok(outcome)
    }

    /// Fresh branch: create the file and stream the whole body into it.
    async fn create_and_load(
        &self,
        response: reqwest::Response,
        url: &str,
        target: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let file = File::create(target)
            .await
            .map_err(|e| DownloadError::create(target, e))?;

        let bytes_written = self.stream_body(response, file, url, target, 0).await?;

        Ok(DownloadOutcome {
            path: target.to_path_buf(),
            bytes_written,
            mode: TransferMode::Fresh,
        })
    }

    /// Existing-file branch: skip when complete, otherwise append the
    /// missing remainder.
    async fn continue_loading(
        &self,
        response: reqwest::Response,
        url: &str,
        target: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(target)
            .await
            .map_err(|e| DownloadError::open(target, e))?;

        let current_size = file
            .metadata()
            .await
            .map_err(|e| DownloadError::stat(target, e))?
            .len();

        let expected_size = declared_content_length(response.headers())?;

        if current_size == expected_size {
            // Already complete: the unread body is dropped with the response.
            debug!(path = %target.display(), size = current_size, "file already complete");
            return Ok(DownloadOutcome {
                path: target.to_path_buf(),
                bytes_written: 0,
                mode: TransferMode::Skip,
            });
        }

        debug!(
            path = %target.display(),
            current = current_size,
            expected = expected_size,
            "resuming partial file"
        );
        let bytes_written = self
            .stream_body(response, file, url, target, current_size)
            .await?;

        Ok(DownloadOutcome {
            path: target.to_path_buf(),
            bytes_written,
            mode: TransferMode::Resume,
        })
    }

    /// Streams the response body into `file`, discarding the first
    /// `discard` bytes and pacing each written chunk via the limiter.
    ///
    /// Network chunks are re-sliced to the limiter's chunk bound so byte
    /// order is preserved while pacing stays per-chunk.
    async fn stream_body(
        &self,
        response: reqwest::Response,
        file: File,
        url: &str,
        target: &Path,
        discard: u64,
    ) -> Result<u64, DownloadError> {
        let chunk_size = self.limiter.chunk_size();
        let mut writer = BufWriter::new(file);
        let mut stream = response.bytes_stream();

        let mut remaining_discard = discard;
        let mut bytes_written: u64 = 0;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| DownloadError::read(url, e))?;
            let mut data: &[u8] = &chunk;

            if remaining_discard > 0 {
                let drop_len = usize::try_from(remaining_discard.min(data.len() as u64))
                    .unwrap_or(data.len());
                remaining_discard -= drop_len as u64;
                data = &data[drop_len..];
                if data.is_empty() {
                    continue;
                }
            }

            for piece in data.chunks(chunk_size) {
                self.limiter.acquire(piece.len() as u64).await;
                writer
                    .write_all(piece)
                    .await
                    .map_err(|e| DownloadError::write(target, e))?;
                bytes_written += piece.len() as u64;
            }
        }

        if remaining_discard > 0 {
            return Err(DownloadError::stream_discard(
                discard,
                discard - remaining_discard,
            ));
        }

        writer
            .flush()
            .await
            .map_err(|e| DownloadError::write(target, e))?;

        Ok(bytes_written)
    }
}

/// Parses the declared total size from the Content-Length header as a
/// base-10 integer.
fn declared_content_length(
    headers: &reqwest::header::HeaderMap,
) -> Result<u64, DownloadError> {
    let raw = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string);

    let Some(value) = raw else {
        return Err(DownloadError::content_length(None));
    };

    value
        .parse::<u64>()
        .map_err(|_| DownloadError::content_length(Some(value)))
}
