//! HTTP download engine with resume support.
//!
//! This module provides the resumable single-file loader: if a partial
//! file already exists at the destination, the transfer continues from
//! where it left off; a file that already holds the declared total size
//! is skipped.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large archives)
//! - Resume by local-size comparison against Content-Length
//! - Optional token-bucket rate limiting (bytes/second ceiling)
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use market_data_loader::download::FileLoader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = FileLoader::unthrottled();
//! let outcome = loader
//!     .download("https://example.test/data/2017-12.zip", Path::new("."))
//!     .await?;
//! println!("saved: {}", outcome.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod engine;
mod error;
mod filename;
mod probe;
pub mod rate_limiter;

pub use client::HttpClient;
pub use engine::{DownloadOutcome, FileLoader, TransferMode};
pub use error::DownloadError;
pub use rate_limiter::RateLimiter;
