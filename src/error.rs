//! Error types for the fanbox-poller application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("GET {url} failed after {attempts} attempt(s): {reason}")]
    FetchFailed {
        url: String,
        attempts: u32,
        status: Option<u16>,
        reason: String,
    },

    #[error("Failed to decode listing page from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    // Pagination errors
    #[error("Failed on page {index}: {source}")]
    Page {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    // File system errors
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Download semaphore closed")]
    SemaphoreClosed,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Wrap an error with the index of the page it happened on.
    pub fn on_page(self, index: usize) -> Self {
        Error::Page {
            index,
            source: Box::new(self),
        }
    }

    /// HTTP status of the last attempt, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::FetchFailed { status, .. } => *status,
            Error::Page { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
