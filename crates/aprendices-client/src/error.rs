//! Error types for dashboard client operations.

use aprendices_session::SessionError;
use thiserror::Error;

use crate::outcome::ServerError;

/// A result type using `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by [`DashboardQueryClient`](crate::DashboardQueryClient) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the session. The stored session has already been
    /// cleared and the UI notified.
    #[error("session expired")]
    AuthFailure,

    /// The server answered with an error, an unusable body, or could not be reached.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Required local state is missing; no request was sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The session could not be persisted.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Returns `true` if this error forced a logout.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailure)
    }

    /// HTTP status reported by the server, when there was one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuthFailure => Some(401),
            Self::Server(e) => e.status_code(),
            Self::Configuration(_) | Self::Session(_) => None,
        }
    }
}
