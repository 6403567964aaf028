//! Core library modules for webgrab
//!
//! This module contains the internal implementation details of the webgrab
//! library.

pub mod downloader;
pub mod error;
pub mod limiter;
pub mod progress;
pub mod stream;

// Re-export main types for internal use
pub use downloader::Downloader;
