// src/error.rs

use thiserror::Error;

/// Core error types for Modsync
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Download failures (non-success status, truncated stream)
    #[error("Download error: {0}")]
    Download(String),

    /// Malformed JSON or configuration data
    #[error("Parse error: {0}")]
    Parse(String),

    /// Mods directory does not exist
    #[error("Mods path not found: {0}")]
    PathNotFound(String),
}

/// Result type alias using Modsync's Error type
pub type Result<T> = std::result::Result<T, Error>;
