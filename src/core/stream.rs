//! Streaming implementations for webgrab
//!
//! Provides the AsyncRead adapter over HTTP response bodies and the
//! per-download option set.

use std::pin::Pin;
use std::task::{Context, Poll};
use futures_util::TryStreamExt;
use tokio::io::{AsyncRead, ReadBuf};

/// A unified stream for HTTP sources
pub enum DownloadStream {
    /// HTTP stream using reqwest
    Http(Box<dyn AsyncRead + Send + Unpin>),
}

impl AsyncRead for DownloadStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match &mut *self {
            DownloadStream::Http(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

/// Options for download operations
pub struct DownloadOptions {
    /// Throughput ceiling in bytes per second; 0 disables pacing
    pub rate_limit: f64,

    /// Buffer size for streaming operations
    pub buffer_size: usize,

    /// Percentage points between progress re-renders
    pub progress_step: f64,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            rate_limit: 0.0,
            buffer_size: 64 * 1024, // 64KB
            progress_step: 5.0,
        }
    }
}

/// Creates a DownloadStream from an HTTP response
pub fn create_http_stream(response: reqwest::Response) -> DownloadStream {
    let stream = Box::new(tokio_util::io::StreamReader::new(
        response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)),
    ));
    DownloadStream::Http(stream)
}
