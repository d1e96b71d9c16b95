//! Constants for the download module (timeouts, pacing, buffer sizes).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large archives).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default rate limit substituted when a caller supplies zero (1 MB/s).
pub const DEFAULT_SPEED_LIMIT: u64 = 1_000_000;

/// I/O buffer size for unthrottled transfers (64 KiB).
pub const UNTHROTTLED_CHUNK_SIZE: usize = 64 * 1024;

/// Smallest chunk a rate-limited transfer will use, so very low limits
/// still make progress. Limits below this value shrink the chunk further
/// so a single chunk never exceeds the bucket's capacity.
pub const MIN_PACED_CHUNK_SIZE: usize = 64;
