// ABOUTME: Bearer-token Auth Gate and Admin Gate middleware for protected routes
// ABOUTME: Verifies tokens, resolves the identity, attaches it to the request, and short-circuits failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Authentication middleware
//!
//! Guards run as an explicit ordered chain. [`Guard::Authenticated`] must
//! precede [`Guard::Admin`]: the admin check reads the [`AuthResult`] the
//! auth gate attached to the request.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{from_fn, from_fn_with_state, Next};
use axum::response::Response;
use axum::Router;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{AuthManager, Claims};
use crate::constants::error_messages;
use crate::database::Database;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{Identity, User};
use crate::resources::ServerResources;

/// Looks up the account behind a verified token subject
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Fetch the user, `None` if the account no longer exists
    async fn resolve_user(&self, user_id: Uuid) -> AppResult<Option<User>>;
}

#[async_trait]
impl IdentityResolver for Database {
    async fn resolve_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        self.get_user(user_id).await
    }
}

/// Resolver used when the server runs without a database
struct DisconnectedStore;

#[async_trait]
impl IdentityResolver for DisconnectedStore {
    async fn resolve_user(&self, _user_id: Uuid) -> AppResult<Option<User>> {
        Err(AppError::upstream_unavailable("Database is not connected"))
    }
}

/// Outcome of a successful authentication, attached to request extensions
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Authenticated user ID
    pub user_id: Uuid,
    /// Resolved identity (no password hash)
    pub identity: Identity,
    /// Verified token claims
    pub claims: Claims,
    /// Identity was derived from the token because the user store was unreachable
    pub degraded: bool,
}

/// Auth Gate core, shared by the axum middleware and any handler that
/// authenticates manually
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: AuthManager,
    resolver: Arc<dyn IdentityResolver>,
}

impl fmt::Debug for AuthMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthMiddleware")
            .field("auth_manager", &self.auth_manager)
            .finish_non_exhaustive()
    }
}

impl AuthMiddleware {
    /// Build the gate over the database, or over a disconnected store
    #[must_use]
    pub fn new(auth_manager: AuthManager, database: Option<Database>) -> Self {
        let resolver: Arc<dyn IdentityResolver> = match database {
            Some(db) => Arc::new(db),
            None => Arc::new(DisconnectedStore),
        };
        Self::with_resolver(auth_manager, resolver)
    }

    /// Build the gate over an arbitrary resolver
    #[must_use]
    pub fn with_resolver(auth_manager: AuthManager, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self {
            auth_manager,
            resolver,
        }
    }

    /// Authenticate a raw `Authorization` header value
    ///
    /// Identity resolution only happens after the header parses and the
    /// token verifies.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `AuthRequired` if the header is absent
    /// - `AuthInvalid` if it is malformed, the token is bad, or the user is gone
    /// - `AuthExpired` if the token is past expiry
    ///
    /// When the user store is unreachable the token alone vouches for the
    /// caller and the result is marked `degraded`.
    pub async fn authenticate_request(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let header =
            auth_header.ok_or_else(|| AppError::auth_required(error_messages::MISSING_TOKEN))?;
        let token = extract_bearer_token(header)?;

        let claims = self.auth_manager.validate_token(token)?;
        let user_id = claims.user_id()?;

        match self.resolver.resolve_user(user_id).await {
            Ok(Some(user)) => {
                debug!(user_id = %user_id, "Request authenticated");
                Ok(AuthResult {
                    user_id,
                    identity: user.to_identity(),
                    claims,
                    degraded: false,
                })
            }
            Ok(None) => {
                warn!(user_id = %user_id, "Token subject no longer exists");
                Err(AppError::auth_invalid(error_messages::USER_NOT_FOUND))
            }
            Err(e) if e.code == ErrorCode::UpstreamUnavailable => {
                warn!(user_id = %user_id, error = %e, "User store unavailable; using token claims");
                Ok(AuthResult {
                    user_id,
                    identity: identity_from_claims(user_id, &claims),
                    claims,
                    degraded: true,
                })
            }
            Err(e) => Err(e),
        }
    }
}

/// Minimal non-admin identity vouched for by a verified token
fn identity_from_claims(user_id: Uuid, claims: &Claims) -> Identity {
    let name = claims
        .email
        .split('@')
        .next()
        .filter(|local| !local.is_empty())
        .unwrap_or("user")
        .to_owned();
    Identity {
        id: user_id,
        name,
        email: claims.email.clone(),
        age: None,
        height_cm: None,
        weight_kg: None,
        fitness_level: None,
        is_admin: false,
    }
}

/// Extract the token from a `Bearer <token>` header value
///
/// # Errors
///
/// Returns `AuthInvalid` if the scheme is not Bearer or the token is empty
pub fn extract_bearer_token(header: &str) -> AppResult<&str> {
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().map(str::trim).unwrap_or_default();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return Err(AppError::auth_invalid(
            error_messages::MALFORMED_AUTH_HEADER,
        ));
    }
    Ok(token)
}

/// One step of a guard chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Valid bearer token for an existing user
    Authenticated,
    /// Authenticated identity with the admin capability
    Admin,
}

/// Wrap `router` so `guards` run left-to-right before its handlers
///
/// axum runs the most recently added layer first, so layers are added in
/// reverse.
pub fn with_guards<S>(
    router: Router<S>,
    resources: &Arc<ServerResources>,
    guards: &[Guard],
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    guards.iter().rev().fold(router, |router, guard| match guard {
        Guard::Authenticated => {
            router.route_layer(from_fn_with_state(resources.clone(), require_auth))
        }
        Guard::Admin => router.route_layer(from_fn(require_admin)),
    })
}

/// Auth Gate: verify the bearer token and attach the [`AuthResult`]
///
/// # Errors
///
/// Short-circuits with 401 (or 503 when the user store is down)
pub async fn require_auth(
    State(resources): State<Arc<ServerResources>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map(str::to_owned)
                .map_err(|_| AppError::auth_invalid(error_messages::MALFORMED_AUTH_HEADER))
        })
        .transpose()?;

    let auth = resources
        .auth_middleware
        .authenticate_request(header.as_deref())
        .await?;

    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}

/// Admin Gate: requires the identity attached by [`require_auth`] to be an admin
///
/// # Errors
///
/// Returns 401 if no identity is attached, 403 if it is not an admin, and 503
/// if the identity could not be checked against the user store
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let auth = request
        .extensions()
        .get::<AuthResult>()
        .ok_or_else(|| AppError::auth_required(error_messages::MISSING_TOKEN))?;

    if auth.degraded {
        return Err(AppError::upstream_unavailable(
            "Cannot verify admin capability while the user store is unavailable",
        ));
    }

    if !auth.identity.is_admin {
        warn!(user_id = %auth.user_id, "Admin route denied");
        return Err(AppError::permission_denied(error_messages::ADMIN_REQUIRED));
    }

    Ok(next.run(request).await)
}
