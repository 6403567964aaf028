//! Token-bucket pacing for download streams
//!
//! Wraps any async byte stream so the long-run average read rate stays at or
//! below a configured ceiling, without altering the bytes delivered.

use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::time::{sleep, Instant, Sleep};

/// A byte stream paced by a token bucket.
///
/// The bucket holds one second's worth of tokens and starts full, so the
/// first read is never delayed. Tokens refill continuously at the configured
/// rate; each delivered byte consumes one. A read that overdraws the bucket
/// is still delivered immediately, and the deficit is paid off before the
/// next read begins.
pub struct RateLimitedReader<R> {
    inner: R,
    /// Tokens (bytes) added per second
    rate: f64,
    capacity: f64,
    tokens: f64,
    refilled_at: Instant,
    pause: Option<Pin<Box<Sleep>>>,
}

impl<R> RateLimitedReader<R> {
    /// Wrap `inner`, capping throughput at `rate` bytes per second.
    ///
    /// `rate` must be positive; callers treat a zero or absent limit as
    /// "do not wrap".
    pub fn new(inner: R, rate: f64) -> Self {
        debug_assert!(rate > 0.0);
        Self {
            inner,
            rate,
            capacity: rate,
            tokens: rate,
            refilled_at: Instant::now(),
            pause: None,
        }
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for RateLimitedReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();

        if let Some(pause) = this.pause.as_mut() {
            ready!(pause.as_mut().poll(cx));
            this.pause = None;
        }

        let now = Instant::now();
        let refill = this.rate * (now - this.refilled_at).as_secs_f64();
        this.tokens = (this.tokens + refill).min(this.capacity);
        this.refilled_at = now;

        let filled = buf.filled().len();
        ready!(Pin::new(&mut this.inner).poll_read(cx, buf))?;
        let n = buf.filled().len() - filled;

        this.tokens -= n as f64;
        if this.tokens < 0.0 {
            let debt = Duration::from_secs_f64(-this.tokens / this.rate);
            this.pause = Some(Box::pin(sleep(debt)));
        }

        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test(start_paused = true)]
    async fn test_sustained_read_is_paced_to_the_ceiling() {
        // 8 KiB through a 1 KiB/s ceiling: the 1 KiB burst is free, the
        // remaining 7 KiB must take at least 7 seconds.
        let data = vec![0xABu8; 8 * 1024];
        let mut reader = RateLimitedReader::new(&data[..], 1024.0);

        let start = Instant::now();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();

        assert_eq!(out.len(), data.len());
        assert!(start.elapsed() >= Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_read_within_burst_is_not_delayed() {
        let data = vec![0u8; 512];
        let mut reader = RateLimitedReader::new(&data[..], 1024.0);

        let start = Instant::now();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();

        assert_eq!(out.len(), 512);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chunked_source_still_meets_the_ceiling() {
        // A source that trickles out fixed chunks; pacing applies across
        // reads, not per chunk.
        let chunk = vec![0u8; 2048];
        let source = tokio_test::io::Builder::new()
            .read(&chunk)
            .read(&chunk)
            .read(&chunk)
            .build();
        let mut reader = RateLimitedReader::new(source, 2048.0);

        let start = Instant::now();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();

        assert_eq!(out.len(), 3 * 2048);
        // 6 KiB minus the 2 KiB burst at 2 KiB/s
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_stream_ends_immediately() {
        let data: Vec<u8> = Vec::new();
        let mut reader = RateLimitedReader::new(&data[..], 1024.0);

        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();
        assert!(out.is_empty());
    }
}
