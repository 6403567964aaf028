//! # webgrab
//!
//! A wget-style HTTP downloader library with three loosely related pieces:
//!
//! - rate-limited streaming downloads with console progress reporting,
//! - a shallow, single-level site mirror (one page plus the assets it
//!   references directly),
//! - an offline link-rewriting pass that turns `href`/`src` values in a
//!   saved HTML document into paths relative to the file's own directory.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> webgrab::Result<()> {
//! // Download a single file with default options.
//! webgrab::download("https://example.com/file.bin", "file.bin").await?;
//!
//! // Cap the transfer at 100 KiB/s.
//! let options = webgrab::DownloadOptions {
//!     rate_limit: 100.0 * 1024.0,
//!     ..Default::default()
//! };
//! webgrab::download_with_options("https://example.com/big.iso", "big.iso", &options).await?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

mod core;
pub mod html;
pub mod mirror;

pub use crate::core::error::{Error, Result};
pub use crate::core::limiter::RateLimitedReader;
pub use crate::core::progress::{ProgressReporter, ProgressSnapshot, SizeUnit};
pub use crate::core::stream::{create_http_stream, DownloadOptions, DownloadStream};
pub use crate::core::Downloader;
pub use crate::html::rewrite_links;
pub use crate::mirror::{mirror, MirrorOptions};

/// Download `url` to `path` with default options.
pub async fn download(url: &str, path: impl AsRef<Path>) -> Result<()> {
    download_with_options(url, path, &DownloadOptions::default()).await
}

/// Download `url` to `path` with explicit options (rate limit, buffer size,
/// progress step).
pub async fn download_with_options(
    url: &str,
    path: impl AsRef<Path>,
    options: &DownloadOptions,
) -> Result<()> {
    Downloader::new()
        .download_to_file(url, path.as_ref(), options)
        .await
}
