//! Token-bucket pacing for rate-limited transfers.
//!
//! The bucket's capacity and refill rate both equal the configured
//! bytes-per-second ceiling, and it starts with a single read-chunk of
//! budget so pacing applies from the first write. Each chunk acquires
//! tokens for its length before being written; when the bucket runs dry
//! the caller sleeps in short slices until enough tokens have
//! accumulated, draining requests larger than the capacity in
//! installments. This bounds average throughput to the configured rate
//! without the burstiness of a fixed-delay-per-chunk heuristic.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::constants::{DEFAULT_SPEED_LIMIT, MIN_PACED_CHUNK_SIZE, UNTHROTTLED_CHUNK_SIZE};

/// Longest single sleep while waiting for tokens. Short slices keep the
/// transfer responsive to refills at low limits.
const MAX_WAIT_SLICE: Duration = Duration::from_millis(50);

/// Pacing strategy for a transfer: either a token bucket bounded to a
/// bytes-per-second ceiling, or a no-op for unthrottled transfers.
#[derive(Debug)]
pub struct RateLimiter {
    /// `None` means unthrottled: `acquire` returns immediately.
    bucket: Option<Mutex<Bucket>>,
    /// Bytes-per-second ceiling (0 when unthrottled; informational only).
    bytes_per_second: u64,
}

#[derive(Debug)]
struct Bucket {
    /// Currently available tokens, in bytes.
    tokens: f64,
    /// Time of the last refill.
    last_refill: Instant,
}

impl RateLimiter {
    /// Creates a limiter bounded to `bytes_per_second`.
    ///
    /// Zero means "use the default limit" (1 MB/s), never "unlimited".
    #[must_use]
    pub fn limited(bytes_per_second: u64) -> Self {
        let bytes_per_second = if bytes_per_second == 0 {
            DEFAULT_SPEED_LIMIT
        } else {
            bytes_per_second
        };
        debug!(bytes_per_second, "creating rate limiter");
        Self {
            bucket: Some(Mutex::new(Bucket {
                // One read-chunk of budget, not a full second: the first
                // chunk goes out immediately, everything after is paced.
                tokens: paced_chunk(bytes_per_second) as f64,
                last_refill: Instant::now(),
            })),
            bytes_per_second,
        }
    }

    /// Creates a no-op limiter for unthrottled transfers.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            bucket: None,
            bytes_per_second: 0,
        }
    }

    /// Returns whether this limiter actually paces transfers.
    #[must_use]
    pub fn is_limited(&self) -> bool {
        self.bucket.is_some()
    }

    /// Returns the configured ceiling in bytes per second, if any.
    #[must_use]
    pub fn bytes_per_second(&self) -> Option<u64> {
        self.bucket.as_ref().map(|_| self.bytes_per_second)
    }

    /// Read-buffer bound for this limiter.
    ///
    /// Rate-limited transfers read roughly one millisecond of budget per
    /// chunk (`bytes_per_second / 1000`), never more than the bucket's
    /// capacity; unthrottled transfers use a fixed larger buffer.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        match &self.bucket {
            Some(_) => paced_chunk(self.bytes_per_second),
            None => UNTHROTTLED_CHUNK_SIZE,
        }
    }

    /// Acquires tokens for `bytes`, sleeping until the bucket allows them.
    ///
    /// Requests larger than the bucket's capacity drain it in
    /// installments, so any request size eventually completes. Returns
    /// immediately for unthrottled limiters.
    pub async fn acquire(&self, bytes: u64) {
        let Some(bucket) = &self.bucket else {
            return;
        };

        let capacity = self.bytes_per_second as f64;
        let mut remaining = bytes as f64;

        loop {
            let wait = {
                let mut state = bucket.lock().await;
                state.refill(self.bytes_per_second);

                let granted = remaining.min(state.tokens);
                state.tokens -= granted;
                remaining -= granted;
                if remaining <= 0.0 {
                    return;
                }

                let wait_secs = remaining.min(capacity) / capacity;
                Duration::from_secs_f64(wait_secs).min(MAX_WAIT_SLICE)
            };

            // Sleep outside the lock so refill timing stays accurate.
            tokio::time::sleep(wait).await;
        }
    }
}

/// Chunk bound for a paced transfer: about one millisecond of budget,
/// clamped to sane I/O sizes and never above the bucket's capacity.
#[allow(clippy::cast_possible_truncation)]
fn paced_chunk(bytes_per_second: u64) -> usize {
    let per_tick = (bytes_per_second / 1000) as usize;
    per_tick
        .clamp(MIN_PACED_CHUNK_SIZE, UNTHROTTLED_CHUNK_SIZE)
        .min(bytes_per_second as usize)
        .max(1)
}

impl Bucket {
    /// Adds tokens for the elapsed time, capped at one second of budget.
    fn refill(&mut self, bytes_per_second: u64) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            let capacity = bytes_per_second as f64;
            self.tokens = (self.tokens + elapsed * capacity).min(capacity);
            self.last_refill = now;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_chunk_is_immediate() {
        let limiter = RateLimiter::limited(1_000_000);

        let start = Instant::now();
        limiter.acquire(limiter.chunk_size() as u64).await;
        assert!(start.elapsed().as_millis() < 50);
    }

    #[tokio::test]
    async fn test_pacing_applies_within_first_second() {
        // The bucket starts with one 64-byte chunk of budget, so 500
        // bytes at 1000 B/s must wait ~0.44s for refills.
        let limiter = RateLimiter::limited(1000);

        let start = Instant::now();
        limiter.acquire(500).await;
        assert!(
            start.elapsed().as_millis() >= 400,
            "expected refill wait, elapsed {:?}",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn test_acquire_beyond_capacity_completes_in_installments() {
        // A request larger than the bucket can never be satisfied in one
        // grant; it must drain the bucket repeatedly instead of spinning.
        let limiter = RateLimiter::limited(10_000);

        let start = Instant::now();
        tokio::time::timeout(Duration::from_secs(5), limiter.acquire(15_000))
            .await
            .expect("oversized acquire never completed");
        let elapsed = start.elapsed();
        assert!(
            elapsed.as_millis() >= 1200,
            "15 KB at 10 KB/s finished too fast: {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn test_tiny_limit_chunk_fits_bucket() {
        // Limits below the usual 64-byte chunk floor shrink the chunk so
        // one chunk's worth of tokens always fits the bucket.
        let limiter = RateLimiter::limited(10);
        assert_eq!(limiter.chunk_size(), 10);

        tokio::time::timeout(
            Duration::from_secs(3),
            limiter.acquire(limiter.chunk_size() as u64),
        )
        .await
        .expect("chunk-sized acquire never completed");
    }

    #[tokio::test]
    async fn test_unlimited_never_waits() {
        let limiter = RateLimiter::unlimited();

        let start = Instant::now();
        for _ in 0..100 {
            limiter.acquire(10_000_000).await;
        }
        assert!(start.elapsed().as_millis() < 50);
    }

    #[test]
    fn test_zero_limit_substitutes_default() {
        let limiter = RateLimiter::limited(0);
        assert!(limiter.is_limited());
        assert_eq!(limiter.bytes_per_second(), Some(DEFAULT_SPEED_LIMIT));
    }

    #[test]
    fn test_chunk_size_tracks_limit() {
        // 1 MB/s -> 1000-byte chunks, one millisecond of budget.
        assert_eq!(RateLimiter::limited(1_000_000).chunk_size(), 1000);
        // Very low limits are clamped up so progress is still made.
        assert_eq!(
            RateLimiter::limited(1000).chunk_size(),
            super::MIN_PACED_CHUNK_SIZE
        );
        // Below the floor the chunk follows the limit itself.
        assert_eq!(RateLimiter::limited(10).chunk_size(), 10);
        assert_eq!(RateLimiter::limited(1).chunk_size(), 1);
        // Unthrottled uses the fixed large buffer.
        assert_eq!(
            RateLimiter::unlimited().chunk_size(),
            super::UNTHROTTLED_CHUNK_SIZE
        );
    }

    #[test]
    fn test_unlimited_reports_no_ceiling() {
        assert_eq!(RateLimiter::unlimited().bytes_per_second(), None);
        assert!(!RateLimiter::unlimited().is_limited());
    }
}
