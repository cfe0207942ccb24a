//! Error types for the search shell.
//!
//! This module defines the centralized error type [`ShellError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for search shell operations.
///
/// Consolidates every failure the shell can observe: backend HTTP failures,
/// transport errors, payload decoding, persistence and configuration problems.
/// None of these are fatal to the shell; callers degrade to a fallback source
/// or an inline message.
///
/// # Examples
///
/// ```
/// use search_shell::ShellError;
///
/// let err = ShellError::Http { status: 503, status_text: "Service Unavailable".into() };
/// assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
/// ```
#[derive(Debug, Error)]
pub enum ShellError {
    /// The backend answered with a non-2xx status.
    ///
    /// Carries only the status line; response bodies are never parsed for
    /// structured error details.
    #[error("HTTP {status}: {status_text}")]
    Http {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A response or persisted blob could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Reading from or writing to the storage backend failed.
    ///
    /// The string contains a description of what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    ///
    /// Occurs when required configuration values are missing or malformed.
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ShellError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A specialized `Result` type for search shell operations.
///
/// This is a type alias for `std::result::Result<T, ShellError>` that simplifies
/// function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, ShellError>;
