//! Response classification.
//!
//! Every call produces exactly one [`ResponseOutcome`]. Error bodies are read
//! through a fixed envelope priority: `detail` first, then `error`, then a
//! synthetic message carrying the status code.

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::error::ApiError;

/// The classified result of one API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// 2xx with a JSON body.
    Success(serde_json::Value),
    /// 204 No Content.
    EmptySuccess,
    /// 401 Unauthorized.
    AuthFailure,
    /// Any other failure.
    ServerError(ServerError),
}

impl ResponseOutcome {
    /// Classify a raw HTTP response.
    #[must_use]
    pub fn classify(status: StatusCode, body: &[u8]) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return Self::AuthFailure;
        }

        if status == StatusCode::NO_CONTENT {
            return Self::EmptySuccess;
        }

        if !status.is_success() {
            let code = status.as_u16();
            let message =
                envelope_message(body).unwrap_or_else(|| format!("server error (HTTP {code})"));
            return Self::ServerError(ServerError::status(code, message));
        }

        match serde_json::from_slice(body) {
            Ok(value) => Self::Success(value),
            Err(e) => Self::ServerError(ServerError::parse(format!(
                "invalid JSON in HTTP {} response: {e}",
                status.as_u16()
            ))),
        }
    }

    /// Returns `true` for `Success` and `EmptySuccess`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_) | Self::EmptySuccess)
    }

    /// Convert into a `Result`, with `None` standing for `EmptySuccess`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthFailure` or `ApiError::Server` for the failing variants.
    pub fn into_result(self) -> Result<Option<serde_json::Value>, ApiError> {
        match self {
            Self::Success(value) => Ok(Some(value)),
            Self::EmptySuccess => Ok(None),
            Self::AuthFailure => Err(ApiError::AuthFailure),
            Self::ServerError(e) => Err(ApiError::Server(e)),
        }
    }
}

/// What went wrong in a [`ServerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerErrorKind {
    /// The server answered with this non-2xx status.
    Status(u16),
    /// A success response whose body could not be used.
    Parse,
    /// The request never got a response (DNS, connection, TLS, ...).
    Transport,
    /// The per-call timeout expired.
    Timeout,
    /// The caller cancelled the call.
    Cancelled,
    /// The request could not be built (bad address or header).
    InvalidRequest,
}

impl fmt::Display for ServerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Parse => f.write_str("parse"),
            Self::Transport => f.write_str("transport"),
            Self::Timeout => f.write_str("timeout"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::InvalidRequest => f.write_str("invalid request"),
        }
    }
}

/// A failed call, with a message suitable for showing to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServerError {
    /// Failure classification.
    pub kind: ServerErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl ServerError {
    /// A non-2xx answer from the server.
    #[must_use]
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::Status(code), message)
    }

    /// A success answer with an unusable body.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::Parse, message)
    }

    /// A transport-level failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::Transport, message)
    }

    /// An expired timeout.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::Timeout, message)
    }

    /// A cancelled call.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ServerErrorKind::Cancelled, "request cancelled")
    }

    /// A request that could not be built.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::InvalidRequest, message)
    }

    fn new(kind: ServerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The HTTP status, for `Status` errors.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self.kind {
            ServerErrorKind::Status(code) => Some(code),
            _ => None,
        }
    }
}

/// Error envelope sent by the backend.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    detail: Option<Detail>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// `detail` is a plain message, or a list of validation issues.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Issues(Vec<DetailIssue>),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct DetailIssue {
    msg: String,
}

impl Detail {
    fn message(self) -> Option<String> {
        match self {
            Self::Message(m) => Some(m),
            Self::Issues(issues) => {
                let joined = issues
                    .into_iter()
                    .map(|i| i.msg)
                    .collect::<Vec<_>>()
                    .join("; ");
                Some(joined)
            }
            Self::Other(_) => None,
        }
    }
}

/// Extract a message from an error body: `detail`, then `error`.
fn envelope_message(body: &[u8]) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_slice(body).ok()?;

    envelope
        .detail
        .and_then(Detail::message)
        .filter(|m| !m.is_empty())
        .or_else(|| {
            envelope
                .error
                .as_ref()
                .and_then(serde_json::Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        })
}
