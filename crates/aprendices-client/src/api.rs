//! Named dashboard operations.
//!
//! [`DashboardQueryClient`] only builds endpoints and parameters; everything
//! else (headers, credentials, classification, session expiry) happens in the
//! [`RequestGateway`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use aprendices_core::{Credential, DashboardPayload, FilterSet, UserProfile};
use aprendices_session::SessionPolicy;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::gateway::RequestGateway;
use crate::outcome::ServerError;
use crate::request::RequestSpec;

/// Dashboard data endpoint.
pub const DASHBOARD_PATH: &str = "/api/data";
/// Liveness probe endpoint.
pub const STATUS_PATH: &str = "/";
/// Token endpoint.
pub const LOGIN_PATH: &str = "/access/token";
/// Users-by-center endpoint.
pub const USERS_BY_CENTER_PATH: &str = "/users/get-by-centro";
/// User creation endpoint.
pub const CREATE_USER_PATH: &str = "/users/create";

/// Trait over the dashboard backend operations.
///
/// This trait abstracts the client interface, allowing front ends to be
/// tested against mock implementations.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Fetch unfiltered dashboard data.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the payload is unusable.
    async fn fetch_dashboard(&self) -> Result<DashboardPayload>;

    /// Fetch dashboard data narrowed by `filters`.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the payload is unusable.
    async fn fetch_dashboard_filtered(&self, filters: &FilterSet) -> Result<DashboardPayload>;

    /// Check that the API is up.
    ///
    /// # Errors
    ///
    /// Returns an error if the API does not answer with a status document.
    async fn check_status(&self) -> Result<ApiStatus>;

    /// Exchange a username and password for a credential and store it.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the login, the response carries
    /// no token, or the session cannot be stored.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse>;

    /// List the users of the logged-in user's training center.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` without calling the server when no
    /// user profile is cached, or any call error.
    async fn get_users_by_center(&self) -> Result<Vec<serde_json::Value>>;

    /// Create a user. Returns `None` when the server answers 204.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the request.
    async fn create_user(
        &self,
        user_data: &serde_json::Value,
    ) -> Result<Option<serde_json::Value>>;
}

/// Answer of the liveness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    /// Status line reported by the API.
    pub status: String,
}

/// A successful login.
#[derive(Clone, PartialEq, Serialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub access_token: String,
    /// Token type, normally `bearer`.
    pub token_type: String,
    /// Profile of the logged-in user, when the server sends one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("user", &self.user)
            .finish()
    }
}

/// Raw response from the token endpoint.
#[derive(Debug, Deserialize)]
struct RawLoginResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    user: Option<serde_json::Value>,
}

/// Client for the dashboard backend.
#[derive(Debug, Clone)]
pub struct DashboardQueryClient {
    gateway: RequestGateway,
}

impl DashboardQueryClient {
    /// Create a client with its own HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, session: SessionPolicy) -> Result<Self> {
        Ok(Self::from_gateway(RequestGateway::new(config, session)?))
    }

    /// Create a client over an existing gateway.
    #[must_use]
    pub const fn from_gateway(gateway: RequestGateway) -> Self {
        Self { gateway }
    }

    /// The underlying gateway.
    #[must_use]
    pub const fn gateway(&self) -> &RequestGateway {
        &self.gateway
    }

    /// The session policy in use.
    #[must_use]
    pub const fn session(&self) -> &SessionPolicy {
        self.gateway.session()
    }

    /// Drop the session and ask the UI to show the login view.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be cleared.
    pub fn logout(&self) -> Result<()> {
        self.session().logout().map_err(ApiError::from)
    }

    async fn dashboard(&self, endpoint: &str) -> Result<DashboardPayload> {
        let value = self
            .gateway
            .execute(endpoint, RequestSpec::get())
            .await
            .into_result()?
            .ok_or_else(|| ServerError::parse("empty dashboard response"))?;

        // The backend answers 200 with `{"error": ...}` when its data is not loaded.
        if value.get("cards").is_none() {
            if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
                return Err(ServerError::parse(message).into());
            }
        }

        decode(value, "dashboard payload")
    }
}

#[async_trait]
impl DashboardApi for DashboardQueryClient {
    async fn fetch_dashboard(&self) -> Result<DashboardPayload> {
        self.dashboard(DASHBOARD_PATH).await
    }

    async fn fetch_dashboard_filtered(&self, filters: &FilterSet) -> Result<DashboardPayload> {
        self.dashboard(&filters.apply_to(DASHBOARD_PATH)).await
    }

    async fn check_status(&self) -> Result<ApiStatus> {
        let value = self
            .gateway
            .execute(STATUS_PATH, RequestSpec::get())
            .await
            .into_result()?
            .ok_or_else(|| ServerError::parse("empty status response"))?;

        decode(value, "status response")
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let spec = RequestSpec::post().form([("username", username), ("password", password)]);

        let value = self
            .gateway
            .execute(LOGIN_PATH, spec)
            .await
            .into_result()?
            .ok_or_else(|| ServerError::parse("empty login response"))?;

        let raw: RawLoginResponse = decode(value, "login response")?;

        let access_token = raw
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServerError::parse("login response missing access_token"))?;

        let user = raw
            .user
            .and_then(|user| match serde_json::from_value::<UserProfile>(user) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unusable user profile in login response");
                    None
                }
            });

        self.session()
            .establish(Credential::new(access_token.clone()), user.clone())?;

        tracing::info!(username, has_profile = user.is_some(), "Logged in");

        Ok(LoginResponse {
            access_token,
            token_type: raw.token_type.unwrap_or_else(|| "bearer".to_string()),
            user,
        })
    }

    async fn get_users_by_center(&self) -> Result<Vec<serde_json::Value>> {
        let profile = self.session().profile().ok_or_else(|| {
            ApiError::Configuration("no cached user profile; log in first".to_string())
        })?;

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("cod_centro", &profile.cod_centro.to_string())
            .finish();
        let endpoint = format!("{USERS_BY_CENTER_PATH}?{query}");

        match self
            .gateway
            .execute(&endpoint, RequestSpec::get().authenticated())
            .await
            .into_result()?
        {
            Some(value) => decode(value, "user list"),
            None => Ok(Vec::new()),
        }
    }

    async fn create_user(
        &self,
        user_data: &serde_json::Value,
    ) -> Result<Option<serde_json::Value>> {
        let spec = RequestSpec::post().json(user_data.clone()).authenticated();
        self.gateway
            .execute(CREATE_USER_PATH, spec)
            .await
            .into_result()
    }
}

/// Decode a success body, turning shape mismatches into parse errors.
fn decode<T: DeserializeOwned>(value: serde_json::Value, what: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ServerError::parse(format!("invalid {what}: {e}")).into())
}
