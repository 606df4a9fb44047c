// ABOUTME: Environment-based configuration for the FitTrack server
// ABOUTME: Parses ports, database URL, JWT settings, CORS, timeouts and logging from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Environment configuration
//!
//! All configuration comes from environment variables. Missing values fall
//! back to development-friendly defaults, except `JWT_SECRET`, which is
//! required unless `ENVIRONMENT=development`.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{defaults, env_vars, limits};
use crate::errors::{AppError, AppResult};

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Automated tests
    Testing,
    /// Production deployment
    Production,
}

impl Environment {
    /// Whether a built-in development secret may be used
    #[must_use]
    pub const fn allows_dev_secret(self) -> bool {
        matches!(self, Self::Development | Self::Testing)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Testing => f.write_str("testing"),
            Self::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "testing" | "test" => Ok(Self::Testing),
            "production" | "prod" => Ok(Self::Production),
            other => Err(AppError::config(format!("Unknown ENVIRONMENT: {other}"))),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(AppError::config(format!("Unknown LOG_FORMAT: {other}"))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (overridden by `RUST_LOG`)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

/// JWT signing configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .finish()
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Bind address
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// sqlx database URL
    pub database_url: String,
    /// Token signing settings
    pub auth: AuthConfig,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
    /// Per-request timeout applied by the HTTP stack
    pub request_timeout_secs: u64,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but unparseable, or if
    /// `JWT_SECRET` is missing outside development.
    pub fn from_env() -> AppResult<Self> {
        let environment = env_parse(env_vars::ENVIRONMENT, Environment::Development)?;

        let jwt_secret = match env::var(env_vars::JWT_SECRET) {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.allows_dev_secret() => {
                warn!(
                    "{} not set; using the built-in development secret",
                    env_vars::JWT_SECRET
                );
                defaults::DEV_JWT_SECRET.to_owned()
            }
            _ => {
                return Err(AppError::config(format!(
                    "{} must be set in {environment}",
                    env_vars::JWT_SECRET
                )))
            }
        };

        let jwt_expiry_hours =
            env_parse(env_vars::JWT_EXPIRY_HOURS, defaults::JWT_EXPIRY_HOURS)?;
        if jwt_expiry_hours <= 0 || jwt_expiry_hours > limits::MAX_JWT_EXPIRY_HOURS {
            return Err(AppError::config(format!(
                "{} must be between 1 and {}",
                env_vars::JWT_EXPIRY_HOURS,
                limits::MAX_JWT_EXPIRY_HOURS
            )));
        }

        let cors_origins = env::var(env_vars::CORS_ORIGINS)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment,
            host: env::var(env_vars::HOST).unwrap_or_else(|_| defaults::HOST.to_owned()),
            http_port: env_parse(env_vars::HTTP_PORT, defaults::HTTP_PORT)?,
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_owned()),
            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_hours,
            },
            cors_origins,
            request_timeout_secs: env_parse(
                env_vars::REQUEST_TIMEOUT_SECS,
                defaults::REQUEST_TIMEOUT_SECS,
            )?,
            logging: LoggingConfig {
                level: env::var(env_vars::LOG_LEVEL)
                    .unwrap_or_else(|_| defaults::LOG_LEVEL.to_owned()),
                format: env_parse(env_vars::LOG_FORMAT, LogFormat::Pretty)?,
            },
        })
    }

    /// Request timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `host:port` bind address
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

/// Parse an optional env var, falling back to `default` when unset
fn env_parse<T>(name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid value for {name}: {e}"))),
        Err(_) => Ok(default),
    }
}
