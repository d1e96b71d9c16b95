//! Market Data Loader Library
//!
//! Core functionality for the market-data-loader tool, which fetches raw
//! trade archives over HTTP(S) and persists them locally, resuming
//! interrupted transfers instead of restarting them.
//!
//! # Architecture
//!
//! - [`download`] - resumable HTTP download engine with optional rate limiting
//! - [`notify`] - injected console notification capability

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod notify;

// Re-export commonly used types
pub use download::{DownloadError, DownloadOutcome, FileLoader, HttpClient, RateLimiter, TransferMode};
pub use notify::{ConsoleNotifier, Notifier};
