//! Session storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// A result type using `SessionError`.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur while reading or writing session state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the session file failed.
    #[error("session file {path}: {source}")]
    Io {
        /// The session file being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The session file is not valid JSON or has an unexpected shape.
    #[error("invalid session data: {0}")]
    Encoding(#[from] serde_json::Error),
}
