// ABOUTME: User account route handlers for registration, login, and profile synchronization
// ABOUTME: Provides REST endpoints backed by AuthService for credentials, tokens and identity updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! User account routes
//!
//! This module handles user registration, login and the profile read/update
//! pair the client uses to synchronize its cached identity. All handlers are
//! thin wrappers that delegate business logic to [`AuthService`].
//!
//! ## Module Structure
//! - `types` - Request/response DTOs for account endpoints

mod types;

pub use types::{LoginRequest, RegisterRequest};

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use tokio::task;
use tracing::{debug, field::Empty, info, warn, Span};

use crate::{
    auth::AuthManager,
    constants::{error_messages, limits},
    database::Database,
    errors::{AppError, AppResult},
    middleware::{with_guards, AuthResult, Guard},
    models::{AuthPayload, Identity, IdentityPatch, User},
    resources::ServerResources,
};

/// Account business logic: registration, login and profile updates
#[derive(Debug, Clone)]
pub struct AuthService {
    database: Database,
    auth_manager: AuthManager,
}

impl AuthService {
    /// Creates a new account service
    #[must_use]
    pub const fn new(database: Database, auth_manager: AuthManager) -> Self {
        Self {
            database,
            auth_manager,
        }
    }

    /// Build the service from shared resources
    ///
    /// # Errors
    ///
    /// Returns `UpstreamUnavailable` when the server runs without a database
    pub fn from_resources(resources: &ServerResources) -> AppResult<Self> {
        Ok(Self::new(
            resources.database()?.clone(),
            resources.auth_manager.clone(),
        ))
    }

    /// Register a new account and issue its first token
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` on validation failure and `ResourceAlreadyExists`
    /// when the email is taken
    #[tracing::instrument(skip(self, request), fields(route = "register"))]
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthPayload> {
        info!("User registration attempt");

        let name = Self::validate_name(&request.name)?;
        let email = Self::normalize_email(&request.email)?;
        Self::validate_password(&request.password)?;

        if self.database.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(error_messages::USER_ALREADY_EXISTS));
        }

        let password_hash = hash_password(request.password).await?;
        let user = User::new(name, email, password_hash);
        let user_id = self.database.create_user(&user).await?;
        let token = self.auth_manager.generate_token(&user)?;

        info!(user_id = %user_id, "User registered successfully");

        Ok(AuthPayload {
            user: user.to_identity(),
            token,
        })
    }

    /// Check credentials and issue a token
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` for an unknown email or a wrong password
    #[tracing::instrument(skip(self, request), fields(route = "login"))]
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthPayload> {
        debug!("User login attempt");

        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::invalid_input(error_messages::MISSING_CREDENTIALS));
        }

        let Some(user) = self.database.get_user_by_email(&request.email).await? else {
            debug!("Login failed: unknown email");
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        };

        // bcrypt is CPU-bound, keep it off the async executor
        let password = request.password;
        let password_hash = user.password_hash.clone();
        let is_valid = task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
            .map_err(|_| AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password for login attempt");
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        }

        let token = self.auth_manager.generate_token(&user)?;
        info!(user_id = %user.id, "User logged in successfully");

        Ok(AuthPayload {
            user: user.to_identity(),
            token,
        })
    }

    /// Apply a partial profile update for `user_id`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` on validation failure, `ResourceNotFound` if the
    /// user vanished and `ResourceAlreadyExists` if the new email is taken
    #[tracing::instrument(skip(self, patch), fields(route = "update_profile"))]
    pub async fn update_profile(
        &self,
        user_id: uuid::Uuid,
        patch: IdentityPatch,
    ) -> AppResult<Identity> {
        let mut user = self
            .database
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if patch.is_empty() {
            return Ok(user.to_identity());
        }

        if let Some(name) = patch.name.as_deref() {
            user.name = Self::validate_name(name)?;
        }
        if let Some(email) = patch.email.as_deref() {
            user.email = Self::normalize_email(email)?;
        }
        if let Some(age) = patch.age {
            if age == 0 || age > limits::MAX_AGE {
                return Err(AppError::invalid_input(format!(
                    "Age must be between 1 and {}",
                    limits::MAX_AGE
                )));
            }
            user.age = Some(age);
        }
        if let Some(height) = patch.height_cm {
            user.height_cm = Some(Self::validate_positive(height, "Height")?);
        }
        if let Some(weight) = patch.weight_kg {
            user.weight_kg = Some(Self::validate_positive(weight, "Weight")?);
        }
        if let Some(level) = patch.fitness_level {
            user.fitness_level = Some(level);
        }
        if let Some(password) = patch.password {
            Self::validate_password(&password)?;
            user.password_hash = hash_password(password).await?;
        }

        user.updated_at = chrono::Utc::now();
        let updated = self.database.update_user(&user).await?;

        info!("User profile updated successfully");
        Ok(updated.to_identity())
    }

    /// Validate email format
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        if email.len() <= 5 || email.contains(char::is_whitespace) {
            return false;
        }
        let Some(at_pos) = email.find('@') else {
            return false;
        };
        if at_pos == 0 || at_pos == email.len() - 1 {
            return false;
        }
        let domain_part = &email[at_pos + 1..];
        domain_part.contains('.') && !domain_part.contains('@')
    }

    /// Validate password strength
    #[must_use]
    pub const fn is_valid_password(password: &str) -> bool {
        password.len() >= limits::MIN_PASSWORD_LENGTH
    }

    fn validate_name(name: &str) -> AppResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input(error_messages::NAME_REQUIRED));
        }
        if name.chars().count() > limits::MAX_NAME_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Name must be {} characters or less",
                limits::MAX_NAME_LENGTH
            )));
        }
        Ok(name.to_owned())
    }

    fn normalize_email(email: &str) -> AppResult<String> {
        let email = email.trim().to_lowercase();
        if !Self::is_valid_email(&email) {
            return Err(AppError::invalid_input(error_messages::INVALID_EMAIL_FORMAT));
        }
        Ok(email)
    }

    fn validate_password(password: &str) -> AppResult<()> {
        if Self::is_valid_password(password) {
            Ok(())
        } else {
            Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK))
        }
    }

    fn validate_positive(value: f64, field: &str) -> AppResult<f64> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(AppError::invalid_input(format!("{field} must be a positive number")))
        }
    }
}

async fn hash_password(password: String) -> AppResult<String> {
    task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// User account routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all user account routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let public = Router::new()
            .route("/api/users", post(Self::handle_register))
            .route("/api/users/login", post(Self::handle_login));

        let protected = with_guards(
            Router::new().route(
                "/api/users/profile",
                get(Self::handle_get_profile).put(Self::handle_update_profile),
            ),
            &resources,
            &[Guard::Authenticated],
        );

        public.merge(protected).with_state(resources)
    }

    #[tracing::instrument(
        skip(resources, request),
        fields(route = "register", user_id = Empty)
    )]
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let payload = AuthService::from_resources(&resources)?
            .register(request)
            .await?;
        Span::current().record("user_id", payload.user.id.to_string());

        Ok((StatusCode::CREATED, Json(payload)).into_response())
    }

    #[tracing::instrument(
        skip(resources, request),
        fields(route = "login", user_id = Empty)
    )]
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let payload = AuthService::from_resources(&resources)?
            .login(request)
            .await?;
        Span::current().record("user_id", payload.user.id.to_string());

        Ok((StatusCode::OK, Json(payload)).into_response())
    }

    /// The identity was resolved by the Auth Gate for this very request
    #[tracing::instrument(skip(auth), fields(route = "get_profile", user_id = %auth.user_id))]
    async fn handle_get_profile(Extension(auth): Extension<AuthResult>) -> Response {
        if auth.degraded {
            debug!("Serving token-derived profile");
        }
        (StatusCode::OK, Json(auth.identity)).into_response()
    }

    #[tracing::instrument(
        skip(resources, auth, patch),
        fields(route = "update_profile", user_id = %auth.user_id)
    )]
    async fn handle_update_profile(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Json(patch): Json<IdentityPatch>,
    ) -> Result<Response, AppError> {
        let identity = AuthService::from_resources(&resources)?
            .update_profile(auth.user_id, patch)
            .await?;

        Ok((StatusCode::OK, Json(identity)).into_response())
    }
}
