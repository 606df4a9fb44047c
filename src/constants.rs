// ABOUTME: Application constants: environment variable names, defaults, limits and messages
// ABOUTME: Centralizes literal values shared by configuration, routes and the session client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "fittrack-server";

/// Environment variable names
pub mod env_vars {
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Bind host
    pub const HOST: &str = "HOST";
    /// HTTP port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// sqlx database URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// JWT HMAC secret
    pub const JWT_SECRET: &str = "JWT_SECRET";
    /// JWT lifetime in hours
    pub const JWT_EXPIRY_HOURS: &str = "JWT_EXPIRY_HOURS";
    /// Comma-separated CORS origins
    pub const CORS_ORIGINS: &str = "CORS_ORIGINS";
    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    /// Log filter directive
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Log format (`json` or `pretty`)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// API base URL used by the session client
    pub const API_URL: &str = "FITTRACK_API_URL";
    /// Session file location override for the session client
    pub const SESSION_PATH: &str = "FITTRACK_SESSION_PATH";
}

/// Default configuration values
pub mod defaults {
    /// Bind host
    pub const HOST: &str = "0.0.0.0";
    /// HTTP port
    pub const HTTP_PORT: u16 = 5000;
    /// `SQLite` database file
    pub const DATABASE_URL: &str = "sqlite:./data/fittrack.db";
    /// Token lifetime: 30 days
    pub const JWT_EXPIRY_HOURS: i64 = 24 * 30;
    /// Server-side request timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Client-side request timeout
    pub const CLIENT_TIMEOUT_SECS: u64 = 10;
    /// API base URL the session client talks to
    pub const API_URL: &str = "http://localhost:5000";
    /// Application directory under the platform data dir
    pub const CLIENT_DATA_DIR: &str = "fittrack";
    /// Session file name inside the application directory
    pub const SESSION_FILE: &str = "session.json";
    /// Log filter
    pub const LOG_LEVEL: &str = "info";
    /// Sessions per week when a plan request does not say
    pub const PLAN_DAYS_PER_WEEK: u8 = 3;
    /// Minutes per session when a plan request does not say
    pub const PLAN_SESSION_MINUTES: u32 = 45;
    /// Development-only signing secret
    pub const DEV_JWT_SECRET: &str = "fittrack-development-secret-do-not-use-in-production";
}

/// Validation limits
pub mod limits {
    /// Minimum password length
    pub const MIN_PASSWORD_LENGTH: usize = 6;
    /// Maximum display name length
    pub const MAX_NAME_LENGTH: usize = 100;
    /// Maximum free-text length (notes, descriptions)
    pub const MAX_TEXT_LENGTH: usize = 2000;
    /// Maximum number of records returned by list endpoints
    pub const MAX_LIST_LIMIT: i64 = 200;
    /// Default number of records returned by list endpoints
    pub const DEFAULT_LIST_LIMIT: i64 = 50;
    /// Upper bound for a plausible age
    pub const MAX_AGE: u32 = 150;
    /// Upper bound for the energy of a single meal, in kcal
    pub const MAX_MEAL_CALORIES: u32 = 20_000;
    /// Longest accepted token lifetime (ten years)
    pub const MAX_JWT_EXPIRY_HOURS: i64 = 24 * 365 * 10;
}

/// User-facing error messages
pub mod error_messages {
    /// Login failure (never reveals which part was wrong)
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
    /// Registration with an existing email
    pub const USER_ALREADY_EXISTS: &str = "User already exists";
    /// Email validation failure
    pub const INVALID_EMAIL_FORMAT: &str = "Please provide a valid email address";
    /// Password validation failure
    pub const PASSWORD_TOO_WEAK: &str = "Password must be at least 6 characters";
    /// Login without email or password
    pub const MISSING_CREDENTIALS: &str = "Please provide email and password";
    /// Missing name on registration
    pub const NAME_REQUIRED: &str = "Name is required";
    /// No authorization header
    pub const MISSING_TOKEN: &str = "Not authorized, no token";
    /// Malformed authorization header
    pub const MALFORMED_AUTH_HEADER: &str = "Not authorized, malformed authorization header";
    /// Token failed verification
    pub const INVALID_TOKEN: &str = "Not authorized, token failed";
    /// Token past expiry
    pub const EXPIRED_TOKEN: &str = "Not authorized, token expired";
    /// Token subject no longer exists
    pub const USER_NOT_FOUND: &str = "Not authorized, user not found";
    /// Admin gate rejection
    pub const ADMIN_REQUIRED: &str = "Not authorized as an admin";
}

/// Client-side navigation paths
pub mod client_paths {
    /// Login view the route guard redirects to
    pub const LOGIN: &str = "/login";
}
