// ABOUTME: HTTP client for the authentication and profile endpoints
// ABOUTME: Defines the AuthApi seam used by the session store and its reqwest implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Authentication API client
//!
//! Server errors arrive as `{message, code}` bodies and are rebuilt into the
//! same [`AppError`] the server produced, so callers can branch on
//! [`ErrorCode`] and show `message` verbatim.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::constants::{defaults, env_vars};
use crate::errors::{AppError, AppResult, ErrorBody, ErrorCode};
use crate::models::{AuthPayload, Identity, IdentityPatch};

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Registration request body
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Remote operations the session store depends on
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/users/login`
    async fn login(&self, credentials: &Credentials) -> AppResult<AuthPayload>;

    /// `POST /api/users`
    async fn register(&self, registration: &Registration) -> AppResult<AuthPayload>;

    /// `GET /api/users/profile`
    async fn fetch_identity(&self, token: &str) -> AppResult<Identity>;

    /// `PUT /api/users/profile`
    async fn update_identity(&self, token: &str, patch: &IdentityPatch) -> AppResult<Identity>;
}

/// Client connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_URL.to_owned(),
            request_timeout: Duration::from_secs(defaults::CLIENT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Defaults, with the base URL taken from `$FITTRACK_API_URL` when set
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(env_vars::API_URL) {
            config.base_url = url.trim_end_matches('/').to_owned();
        }
        config
    }
}

/// reqwest-backed [`AuthApi`]
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    http_client: Client,
    base_url: String,
}

impl HttpAuthApi {
    /// Build a client honoring the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> AppResult<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::upstream_unavailable("Request timed out")
            } else {
                AppError::upstream_unavailable(format!("Cannot reach the FitTrack API: {e}"))
            }
        })?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::internal(format!("Unexpected response body: {e}")))
    }

    async fn error_from(response: Response) -> AppError {
        let status = response.status();
        debug!(status = %status, "API request rejected");

        match response.json::<ErrorBody>().await {
            Ok(body) => AppError::new(body.code, body.message),
            Err(_) => AppError::new(
                code_for_status(status),
                format!("Request failed with HTTP {status}"),
            ),
        }
    }
}

const fn code_for_status(status: StatusCode) -> ErrorCode {
    match status.as_u16() {
        400 => ErrorCode::InvalidInput,
        401 => ErrorCode::AuthInvalid,
        403 => ErrorCode::PermissionDenied,
        404 => ErrorCode::ResourceNotFound,
        409 => ErrorCode::ResourceAlreadyExists,
        503 => ErrorCode::UpstreamUnavailable,
        _ => ErrorCode::InternalError,
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> AppResult<AuthPayload> {
        Self::send(
            self.http_client
                .post(self.url("/api/users/login"))
                .json(credentials),
        )
        .await
    }

    async fn register(&self, registration: &Registration) -> AppResult<AuthPayload> {
        Self::send(self.http_client.post(self.url("/api/users")).json(registration)).await
    }

    async fn fetch_identity(&self, token: &str) -> AppResult<Identity> {
        Self::send(
            self.http_client
                .get(self.url("/api/users/profile"))
                .bearer_auth(token),
        )
        .await
    }

    async fn update_identity(&self, token: &str, patch: &IdentityPatch) -> AppResult<Identity> {
        Self::send(
            self.http_client
                .put(self.url("/api/users/profile"))
                .bearer_auth(token)
                .json(patch),
        )
        .await
    }
}
