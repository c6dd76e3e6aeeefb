/*!
 * Error types for the yomidict tools.
 *
 * This module contains custom error types for the dictionary fetcher and the
 * audio database bootstrapper, using the thiserror crate for ergonomic error
 * definitions.
 */

use thiserror::Error;

/// Errors that can occur while fetching release metadata or assets
#[derive(Error, Debug)]
pub enum FetchError {
    /// The latest-release query returned a non-success status
    #[error("Failed to fetch latest release for {repo}: {status}")]
    ReleaseQuery {
        /// Repository identifier (owner/name)
        repo: String,
        /// HTTP status code
        status: u16,
    },

    /// An asset download returned a non-success status
    #[error("Failed to download file from {url}: {status}")]
    Download {
        /// Download URL of the asset
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Error establishing a connection or reading a response body
    #[error("Request failed: {0}")]
    Request(String),

    /// Error parsing the release metadata
    #[error("Failed to parse release metadata: {0}")]
    Parse(String),

    /// Error writing to the local file system
    #[error("File error: {0}")]
    Io(String),
}

impl From<std::io::Error> for FetchError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Parse(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Errors that can occur while initializing the audio database
#[derive(Error, Debug)]
pub enum InitError {
    /// The audio files directory is missing or not a directory
    #[error("Audio files directory is not usable: {0}")]
    DataDir(String),

    /// The sources config file could not be read or parsed
    #[error("Invalid audio sources config {path}: {message}")]
    Config {
        /// Path of the offending config file
        path: String,
        /// Parser or reader message
        message: String,
    },

    /// Host mode requires a config file but none was found
    #[error("No audio sources config found at {0} and host defaults are unavailable")]
    HostConfigMissing(String),

    /// SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system failure
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid command line arguments
    #[error("Argument error: {0}")]
    Argument(String),

    /// Error from the dictionary fetcher
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error from the audio database initializer
    #[error("Initialization error: {0}")]
    Initialization(#[from] InitError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
