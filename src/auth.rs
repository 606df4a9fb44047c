// ABOUTME: JWT token codec for issuing and verifying user bearer tokens
// ABOUTME: Signs HS256 tokens carrying the user ID and expiry, and classifies verification failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Authentication token management
//!
//! Tokens are HS256 JWTs signed with the server secret. Expiry is the only
//! invalidation mechanism: there is no revocation list, and rotating the
//! secret invalidates every outstanding token.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::models::{Identity, User};

/// Claims embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID
    pub sub: String,
    /// Email at issue time (informational)
    pub email: String,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
}

impl Claims {
    /// Parse the subject back into a user ID
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` if the subject is not a UUID
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::auth_invalid(error_messages::INVALID_TOKEN))
    }

    /// Expiry as a timestamp
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Why a token failed verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Signature mismatch, malformed token or bad claims
    InvalidToken {
        /// Underlying decoder message
        reason: String,
    },
    /// Signature valid but past expiry
    ExpiredToken,
}

impl fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken { reason } => write!(f, "Invalid token: {reason}"),
            Self::ExpiredToken => f.write_str("Token expired"),
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(e: JwtValidationError) -> Self {
        match e {
            JwtValidationError::InvalidToken { .. } => {
                Self::auth_invalid(error_messages::INVALID_TOKEN)
            }
            JwtValidationError::ExpiredToken => {
                Self::auth_expired(error_messages::EXPIRED_TOKEN)
            }
        }
    }
}

/// Issues and verifies bearer tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthManager")
            .field("expiry_hours", &self.expiry.num_hours())
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Create a manager from a raw secret and token lifetime
    ///
    /// A lifetime beyond what `chrono` can represent makes token issuance
    /// fail instead of panicking.
    #[must_use]
    pub fn new(secret: &[u8], expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry: Duration::try_hours(expiry_hours).unwrap_or(Duration::MAX),
        }
    }

    /// Create a manager from server configuration
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.jwt_expiry_hours)
    }

    /// Configured token lifetime
    #[must_use]
    pub const fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Issue a token for the user, valid from now
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        self.generate_token_at(&user.to_identity(), Utc::now())
    }

    /// Issue a token as if it had been issued at `issued_at`
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry is out of range or signing fails
    pub fn generate_token_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let expires_at = issued_at
            .checked_add_signed(self.expiry)
            .ok_or_else(|| AppError::internal("Token expiry is out of range"))?;
        let claims = Claims {
            sub: identity.id.to_string(),
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Verify signature and expiry, returning the claims
    ///
    /// # Errors
    ///
    /// Returns `ExpiredToken` past expiry and `InvalidToken` for any other failure
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                debug!(error = %e, "Token validation failed");
                match e.kind() {
                    ErrorKind::ExpiredSignature => Err(JwtValidationError::ExpiredToken),
                    _ => Err(JwtValidationError::InvalidToken {
                        reason: e.to_string(),
                    }),
                }
            }
        }
    }

    /// Verify a token and return its subject
    ///
    /// # Errors
    ///
    /// Returns `AuthExpired` or `AuthInvalid`
    pub fn verify(&self, token: &str) -> AppResult<Uuid> {
        self.validate_token(token)?.user_id()
    }
}
