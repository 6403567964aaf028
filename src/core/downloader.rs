//! Core download functionality for webgrab
//!
//! Streams a single HTTP resource to a local file with optional rate
//! limiting and console progress reporting.

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Local;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::core::error::{Error, Result};
use crate::core::limiter::RateLimitedReader;
use crate::core::progress::{ProgressReporter, ProgressSnapshot};
use crate::core::stream::{create_http_stream, DownloadOptions};

/// Wall-clock format used for the start/end lines
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Global HTTP client shared by every operation in the process.
///
/// No request or connect timeout is configured: a transfer runs for as long
/// as the remote keeps the connection alive.
pub(crate) static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(format!("webgrab/{}", env!("WEBGRAB_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
});

/// High-level downloader for single HTTP resources
#[derive(Default)]
pub struct Downloader;

impl Downloader {
    /// Create a new downloader
    pub fn new() -> Self {
        Self
    }

    /// Download `url` into `file_path`, creating or truncating the file.
    ///
    /// Streams the body in fixed-size chunks, pacing reads through the rate
    /// limiter when `options.rate_limit` is positive and reporting progress
    /// on stdout. A clean end of stream succeeds even when the byte count
    /// disagrees with the declared content length.
    pub async fn download_to_file(
        &self,
        url: &str,
        file_path: &Path,
        options: &DownloadOptions,
    ) -> Result<()> {
        let started = Instant::now();
        println!("Start Time: {}", Local::now().format(TIMESTAMP_FORMAT));

        let client = &*GLOBAL_CLIENT;
        let response = client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status));
        }
        println!("Status: {}", status);

        // Missing or unparseable length propagates as "unknown".
        let total_size = response.content_length();
        match total_size {
            Some(size) => {
                println!(
                    "File Size: {:.2} MB ({} bytes)",
                    size as f64 / (1024.0 * 1024.0),
                    size
                );
            }
            None => println!("File Size: unknown"),
        }

        let mut file = tokio::fs::File::create(file_path)
            .await
            .map_err(Error::IoError)?;

        if let Some(name) = file_path.file_name() {
            println!("File Name: {}", name.to_string_lossy());
        }
        let save_path = file_path
            .canonicalize()
            .unwrap_or_else(|_| file_path.to_path_buf());
        println!("Save Path: {}", save_path.display());

        let stream = create_http_stream(response);
        let mut reader: Box<dyn AsyncRead + Send + Unpin> = if options.rate_limit > 0.0 {
            Box::new(RateLimitedReader::new(stream, options.rate_limit))
        } else {
            Box::new(stream)
        };

        let mut buffer = vec![0u8; options.buffer_size];
        let mut downloaded: u64 = 0;
        let mut reporter = ProgressReporter::new(options.progress_step);

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .await
                .map_err(|e| Error::NetworkError(format!("stream read error: {}", e)))?;
            if bytes_read == 0 {
                break;
            }

            file.write_all(&buffer[..bytes_read])
                .await
                .map_err(Error::IoError)?;
            downloaded += bytes_read as u64;

            let snapshot =
                ProgressSnapshot::new(downloaded, total_size, started.elapsed().as_secs_f64());
            reporter.report(&snapshot);
        }

        file.flush().await.map_err(Error::IoError)?;
        reporter.finish();

        println!("Download Complete!");
        println!("Completion Time: {}", Local::now().format(TIMESTAMP_FORMAT));
        Ok(())
    }
}
