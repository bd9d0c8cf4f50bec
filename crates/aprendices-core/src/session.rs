//! Session values: the bearer credential and the cached user profile.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bearer token proving an authenticated session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    token: String,
    issued_at: DateTime<Utc>,
}

impl Credential {
    /// Create a credential issued now.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::issued_at(token, Utc::now())
    }

    /// Create a credential with an explicit issue time.
    #[must_use]
    pub fn issued_at(token: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            issued_at,
        }
    }

    /// The raw token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// When the login that produced this credential succeeded.
    #[must_use]
    pub const fn issued(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Training center code. The backend sends it either as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CenterCode {
    /// Numeric code.
    Number(i64),
    /// Textual code.
    Text(String),
}

impl fmt::Display for CenterCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Locally cached profile of the logged-in user.
///
/// Only `cod_centro` is interpreted; every other field is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Training center the user belongs to.
    pub cod_centro: CenterCode,
    /// Remaining profile fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// Create a profile with no extra fields.
    #[must_use]
    pub fn new(cod_centro: CenterCode) -> Self {
        Self {
            cod_centro,
            extra: serde_json::Map::new(),
        }
    }
}
