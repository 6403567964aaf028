//! Error types for the webgrab library
//!
//! Provides error handling for download, mirror and link-rewrite operations.

use std::fmt;

/// Main error type for webgrab operations
#[derive(Debug)]
pub enum Error {
    /// The server answered with a non-2xx status
    HttpStatus(reqwest::StatusCode),

    /// Connection or transport failure
    NetworkError(String),

    /// File I/O error on the local filesystem
    IoError(std::io::Error),

    /// Malformed HTML or malformed URL
    ParseError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::HttpStatus(status) => {
                write!(f, "HTTP request failed with status: {}", status)
            }
            Error::NetworkError(msg) => {
                write!(f, "Network error: {}", msg)
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {}", err)
            }
            Error::ParseError(msg) => {
                write!(f, "Parse error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::HttpStatus(status),
            None => Error::NetworkError(err.to_string()),
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::ParseError(err.to_string())
    }
}

/// Convenience result type for webgrab operations
pub type Result<T> = std::result::Result<T, Error>;
