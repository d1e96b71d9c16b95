//! Error types for the download module.
//!
//! This module defines structured errors for every stage of a transfer,
//! providing context-rich messages for debugging and user feedback.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The provided file link is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Network-level error issuing the GET request (DNS, connection refused,
    /// TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The destination directory could not be opened or listed.
    #[error("can't read destination directory {path}: {source}")]
    DirectoryAccess {
        /// The directory that could not be accessed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A fresh destination file could not be created.
    #[error("can't create file {path}: {source}")]
    Create {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// An existing partial file could not be opened for append.
    #[error("can't open file {path} to continue loading: {source}")]
    Open {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The size of an existing partial file could not be determined.
    #[error("can't read file statistics for {path}: {source}")]
    Stat {
        /// The path that could not be queried.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The Content-Length response header is absent or non-numeric.
    #[error("can't parse content length from response [value: {value:?}]")]
    ContentLength {
        /// The raw header value, if any was present.
        value: Option<String>,
    },

    /// The response stream ended before the already-loaded prefix could be
    /// discarded.
    #[error("can't skip already loaded bytes: stream ended after {skipped} of {expected}")]
    StreamDiscard {
        /// Bytes that should have been discarded.
        expected: u64,
        /// Bytes actually discarded before the stream ended.
        skipped: u64,
    },

    /// The response body failed mid-transfer.
    #[error("read error downloading {url}: {source}")]
    Read {
        /// The URL being downloaded when the stream failed.
        url: String,
        /// The underlying stream error.
        #[source]
        source: reqwest::Error,
    },

    /// Writing a chunk to the destination file failed.
    #[error("write error on {path}: {source}")]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a directory access error.
    pub fn directory_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryAccess {
            path: path.into(),
            source,
        }
    }

    /// Creates a file creation error.
    pub fn create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Create {
            path: path.into(),
            source,
        }
    }

    /// Creates a file open error.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Creates a file statistics error.
    pub fn stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    /// Creates a content length parse error.
    pub fn content_length(value: Option<String>) -> Self {
        Self::ContentLength { value }
    }

    /// Creates a stream discard error.
    pub fn stream_discard(expected: u64, skipped: u64) -> Self {
        Self::StreamDiscard { expected, skipped }
    }

    /// Creates a mid-transfer read error.
    pub fn read(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Read {
            url: url.into(),
            source,
        }
    }

    /// Creates a file write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` or
// `From<std::io::Error>` because the variants require context (url, path,
// stage) that the source errors don't carry. The helper constructors are the
// pattern here.
