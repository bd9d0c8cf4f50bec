//! Per-call request description.

use std::time::Duration;

use reqwest::Method;
use tokio_util::sync::CancellationToken;
use url::form_urlencoded;

/// Body of an outgoing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Serialized as JSON.
    Json(serde_json::Value),
    /// Serialized as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Content type implied by the body, if any.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some("application/json"),
            Self::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }

    /// Encoded bytes to put on the wire.
    #[must_use]
    pub fn encode(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Json(value) => Some(value.to_string()),
            Self::Form(pairs) => {
                let mut serializer = form_urlencoded::Serializer::new(String::new());
                for (key, value) in pairs {
                    serializer.append_pair(key, value);
                }
                Some(serializer.finish())
            }
        }
    }
}

/// How to perform one call.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Header overrides; later entries win, and all of them win over defaults.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: RequestBody,
    /// Attach the stored credential as a bearer token.
    pub requires_credential: bool,
    /// Overrides the configured request timeout.
    pub timeout: Option<Duration>,
    /// Cancels the call when triggered.
    pub cancel: Option<CancellationToken>,
}

impl RequestSpec {
    /// A request with `method` and nothing else.
    #[must_use]
    pub const fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: RequestBody::Empty,
            requires_credential: false,
            timeout: None,
            cancel: None,
        }
    }

    /// A GET request.
    #[must_use]
    pub const fn get() -> Self {
        Self::new(Method::GET)
    }

    /// A POST request.
    #[must_use]
    pub const fn post() -> Self {
        Self::new(Method::POST)
    }

    /// Add a header override.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Send `value` as JSON.
    #[must_use]
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Send `pairs` form-encoded.
    #[must_use]
    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Attach the stored credential.
    #[must_use]
    pub fn authenticated(mut self) -> Self {
        self.requires_credential = true;
        self
    }

    /// Use `timeout` instead of the configured one.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Abort the call when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}
