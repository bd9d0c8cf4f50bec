//! Single choke point for outbound calls.
//!
//! [`RequestGateway::execute`] builds the address and headers, attaches the
//! bearer credential when asked to, sends the request and classifies the
//! answer into a [`ResponseOutcome`]. Authorization failures are handed to
//! the [`SessionPolicy`] before the outcome is returned.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

use aprendices_session::SessionPolicy;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::outcome::{ResponseOutcome, ServerError};
use crate::request::RequestSpec;

/// Executes requests against the dashboard backend.
#[derive(Debug, Clone)]
pub struct RequestGateway {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
    session: SessionPolicy,
}

impl RequestGateway {
    /// Create a gateway with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, session: SessionPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, config, session))
    }

    /// Create a gateway around an existing HTTP client.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        config: ClientConfig,
        session: SessionPolicy,
    ) -> Self {
        Self {
            client,
            config: Arc::new(config),
            session,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session policy in use.
    #[must_use]
    pub const fn session(&self) -> &SessionPolicy {
        &self.session
    }

    /// Perform one call and classify its result.
    ///
    /// Never retries. A 401 clears the session through the policy before
    /// this returns.
    pub async fn execute(&self, endpoint: &str, spec: RequestSpec) -> ResponseOutcome {
        let outcome = self.send(endpoint, &spec).await;

        match &outcome {
            ResponseOutcome::AuthFailure => {
                tracing::warn!(method = %spec.method, endpoint, "Authorization rejected by server");
                self.session.on_auth_failure();
            }
            ResponseOutcome::ServerError(e) => {
                tracing::warn!(
                    method = %spec.method,
                    endpoint,
                    kind = %e.kind,
                    error = %e.message,
                    "API call failed"
                );
            }
            ResponseOutcome::Success(_) | ResponseOutcome::EmptySuccess => {}
        }

        outcome
    }

    async fn send(&self, endpoint: &str, spec: &RequestSpec) -> ResponseOutcome {
        let url = match self.config.resolve_url(endpoint) {
            Ok(url) => url,
            Err(e) => {
                return ResponseOutcome::ServerError(ServerError::invalid_request(format!(
                    "invalid request URL for {endpoint}: {e}"
                )));
            }
        };

        let headers = match self.build_headers(spec) {
            Ok(headers) => headers,
            Err(e) => return ResponseOutcome::ServerError(e),
        };

        let timeout = spec.timeout.unwrap_or_else(|| self.config.request_timeout());

        tracing::debug!(method = %spec.method, url = %url, "Sending API request");

        let mut request = self
            .client
            .request(spec.method.clone(), url)
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = spec.body.encode() {
            request = request.body(body);
        }

        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<(StatusCode, _), reqwest::Error>((status, body))
        };

        let result = match &spec.cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    return ResponseOutcome::ServerError(ServerError::cancelled());
                }
                result = exchange => result,
            },
            None => exchange.await,
        };

        match result {
            Ok((status, body)) => {
                tracing::debug!(
                    status = status.as_u16(),
                    bytes = body.len(),
                    "Received API response"
                );
                ResponseOutcome::classify(status, &body)
            }
            Err(e) if e.is_timeout() => ResponseOutcome::ServerError(ServerError::timeout(
                format!("request timed out after {}ms", timeout.as_millis()),
            )),
            Err(e) => {
                ResponseOutcome::ServerError(ServerError::transport(format!("request failed: {e}")))
            }
        }
    }

    /// Defaults < body content type < credential < caller overrides.
    fn build_headers(&self, spec: &RequestSpec) -> std::result::Result<HeaderMap, ServerError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if self.config.json_content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(content_type) = spec.body.content_type() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }

        if let Some(credential) = self.session.credential_for(spec.requires_credential) {
            let value = HeaderValue::from_str(&credential.bearer()).map_err(|_| {
                ServerError::invalid_request("stored credential is not a valid header value")
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in &spec.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ServerError::invalid_request(format!("invalid header name {name:?}: {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ServerError::invalid_request(format!("invalid value for header {name}: {e}"))
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}
