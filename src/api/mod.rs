//! User API Client
//!
//! CRUD client for the public `/users` endpoint. Every call returns the raw
//! status code and JSON body so suites can assert on 404/422/401 responses
//! as directly as on the happy path. Typed payloads cover valid requests;
//! the `*_raw` variants send arbitrary JSON for the negative suites.
//!
//! # Example
//!
//! ```no_run
//! use cartwright::api::{UserApi, UserApiConfig};
//! use std::time::Duration;
//!
//! // Simple configuration
//! let config = UserApiConfig {
//!     base_url: "https://gorest.co.in/public/v2".to_string(),
//!     token: Some("secret".to_string()),
//!     timeout: Some(Duration::from_secs(10)),
//! };
//! let api = UserApi::new(config).expect("valid config");
//!
//! // Or use builder pattern
//! let api = UserApi::builder()
//!     .base_url("https://gorest.co.in/public/v2")
//!     .token("secret")
//!     .timeout(Duration::from_secs(10))
//!     .build()
//!     .expect("valid config");
//! ```

use crate::cleanup::ResourceDeleter;
use crate::config::Settings;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

mod types;

pub use types::{FieldError, Gender, User, UserDraft, UserStatus, UserUpdate};

/// Base URL of the public user API
pub const DEFAULT_BASE_URL: &str = "https://gorest.co.in/public/v2";

/// Default timeout for API requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid API configuration: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Body(#[from] serde_json::Error),
}

/// User API client configuration
#[derive(Debug, Clone)]
pub struct UserApiConfig {
    /// API base URL (e.g., "https://gorest.co.in/public/v2")
    pub base_url: String,
    /// Bearer token; `None` sends unauthenticated requests
    pub token: Option<String>,
    /// Request timeout (default: 30 seconds)
    pub timeout: Option<Duration>,
}

/// Status code and JSON body of one API call.
///
/// Error statuses are data here, not `Err` values: only transport and
/// client-configuration problems surface as [`ApiError`].
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Deserialize a 422 body into its field errors
    pub fn field_errors(&self) -> Result<Vec<FieldError>, ApiError> {
        self.json()
    }

    /// The `message` field of an error body, if present
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// User API Client
///
/// Thin wrapper over `reqwest` for the user endpoint.
pub struct UserApi {
    config: UserApiConfig,
    client: reqwest::Client,
}

/// Builder for UserApi
#[derive(Default)]
pub struct UserApiBuilder {
    base_url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl UserApiBuilder {
    /// Set the API base URL
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Set the bearer token
    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the UserApi, falling back to the public base URL
    pub fn build(self) -> Result<UserApi, ApiError> {
        UserApi::new(UserApiConfig {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token: self.token,
            timeout: self.timeout,
        })
    }
}

impl UserApi {
    /// Create a new user API client
    pub fn new(mut config: UserApiConfig) -> Result<Self, ApiError> {
        if !is_valid_http_url(&config.base_url) {
            return Err(ApiError::Config(
                "Invalid base URL: must be an http(s) URL with a host".into(),
            ));
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let timeout = config.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { config, client })
    }

    /// Create a new builder for UserApi
    pub fn builder() -> UserApiBuilder {
        UserApiBuilder::default()
    }

    /// Create a client from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(UserApiConfig {
            base_url: settings.base_url.clone(),
            token: settings.token.clone(),
            timeout: Some(settings.timeout),
        })
    }

    /// The normalized base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Create a user (expects 201 from the API)
    pub async fn create_user(&self, draft: &UserDraft) -> Result<ApiResponse, ApiError> {
        self.send(self.client.post(self.users_url()).json(draft))
            .await
    }

    /// Create a user from an arbitrary JSON payload
    pub async fn create_user_raw(&self, body: &Value) -> Result<ApiResponse, ApiError> {
        self.send(self.client.post(self.users_url()).json(body))
            .await
    }

    /// Fetch a user by id
    pub async fn get_user(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.send(self.client.get(self.user_url(id))).await
    }

    /// Update a user; unset fields are left untouched by the API
    pub async fn update_user(&self, id: u64, update: &UserUpdate) -> Result<ApiResponse, ApiError> {
        self.send(self.client.put(self.user_url(id)).json(update))
            .await
    }

    /// Update a user from an arbitrary JSON payload
    pub async fn update_user_raw(&self, id: u64, body: &Value) -> Result<ApiResponse, ApiError> {
        self.send(self.client.put(self.user_url(id)).json(body))
            .await
    }

    /// Delete a user by id (expects 204 from the API)
    pub async fn delete_user(&self, id: u64) -> Result<ApiResponse, ApiError> {
        self.send(self.client.delete(self.user_url(id))).await
    }

    /// List users on the first page
    pub async fn list_users(&self) -> Result<ApiResponse, ApiError> {
        self.send(self.client.get(self.users_url())).await
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.config.base_url)
    }

    fn user_url(&self, id: u64) -> String {
        format!("{}/users/{}", self.config.base_url, id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse, ApiError> {
        let request = match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // 204 and other empty bodies become null; non-JSON bodies are kept
        // verbatim as a string value.
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        tracing::debug!(status = %status, "User API response");
        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl ResourceDeleter for UserApi {
    type Id = u64;

    /// Delete a tracked user; any non-2xx status counts as a failure
    async fn delete(&self, id: &u64) -> anyhow::Result<()> {
        let response = self.delete_user(*id).await?;
        if !response.is_success() {
            anyhow::bail!("delete of user {} returned {}", id, response.status);
        }
        Ok(())
    }
}

/// Validate that a URL starts with http:// or https:// and names a host
fn is_valid_http_url(url: &str) -> bool {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_config() {
        let config = UserApiConfig {
            base_url: "https://gorest.co.in/public/v2".into(),
            token: None,
            timeout: None,
        };
        assert_eq!(config.base_url, "https://gorest.co.in/public/v2");
    }

    #[test]
    fn test_builder_pattern() {
        let api = UserApi::builder()
            .base_url("https://api.example.com/v2")
            .token("secret")
            .timeout(Duration::from_secs(5))
            .build();
        assert!(api.is_ok());
    }

    #[test]
    fn test_builder_defaults_base_url() {
        let api = UserApi::builder().build().unwrap();
        assert_eq!(api.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_base_url() {
        let result = UserApi::builder().base_url("ftp://nope").build();
        assert!(result.is_err());
    }

    /// Test: A bare scheme has no host to join request paths onto
    #[test]
    fn test_rejects_scheme_only_base_url() {
        assert!(UserApi::builder().base_url("https://").build().is_err());
        assert!(UserApi::builder().base_url("http://").build().is_err());
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let api = UserApi::builder()
            .base_url("https://api.example.com/v2/")
            .build()
            .unwrap();
        assert_eq!(api.base_url(), "https://api.example.com/v2");
        assert_eq!(api.users_url(), "https://api.example.com/v2/users");
        assert_eq!(api.user_url(7), "https://api.example.com/v2/users/7");
    }

    #[test]
    fn test_response_json() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: json!({"id": 1, "name": "A", "email": "a@b.c", "gender": "male", "status": "active"}),
        };
        let user: User = response.json().unwrap();
        assert_eq!(user.id, 1);
    }

    #[test]
    fn test_response_field_errors() {
        let response = ApiResponse {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: json!([{"field": "email", "message": "is invalid"}]),
        };
        let errors = response.field_errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn test_response_message() {
        let response = ApiResponse {
            status: StatusCode::UNAUTHORIZED,
            body: json!({"message": "Authentication failed"}),
        };
        assert_eq!(response.message(), Some("Authentication failed"));
    }
}
