// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, server resources, token helpers and user fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `fittrack_server`

use std::env;
use std::sync::{Arc, Once};

use anyhow::Result;
use fittrack_server::{
    auth::AuthManager,
    config::{AuthConfig, Environment, LoggingConfig, ServerConfig},
    database::Database,
    models::User,
    resources::ServerResources,
};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

pub const TEST_JWT_SECRET: &str = "fittrack-test-secret";
pub const TEST_PASSWORD: &str = "password123";

/// bcrypt cost for fixtures; production uses the library default
const TEST_BCRYPT_COST: u32 = 4;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        environment: Environment::Testing,
        host: "127.0.0.1".to_owned(),
        http_port: 0,
        database_url: "sqlite::memory:".to_owned(),
        auth: AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_owned(),
            jwt_expiry_hours: 24,
        },
        cors_origins: Vec::new(),
        request_timeout_secs: 30,
        logging: LoggingConfig::default(),
    }
}

pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(TEST_JWT_SECRET.as_bytes(), 24)
}

/// Fresh private in-memory database with migrations applied
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Resources over a fresh in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(
        Arc::new(test_config()),
        Some(database),
        create_test_auth_manager(),
    )))
}

/// Resources for a server whose store never came up
pub fn create_degraded_resources() -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::new(
        Arc::new(test_config()),
        None,
        create_test_auth_manager(),
    ))
}

pub fn hash_test_password(password: &str) -> String {
    bcrypt::hash(password, TEST_BCRYPT_COST).unwrap()
}

/// Standard test user with `TEST_PASSWORD`
pub async fn create_test_user(database: &Database) -> Result<(Uuid, User)> {
    create_test_user_with_email(database, &format!("user-{}@example.com", Uuid::new_v4())).await
}

pub async fn create_test_user_with_email(database: &Database, email: &str) -> Result<(Uuid, User)> {
    let user = User::new(
        "Test User".to_owned(),
        email.to_lowercase(),
        hash_test_password(TEST_PASSWORD),
    );
    let user_id = database.create_user(&user).await?;
    Ok((user_id, user))
}

/// User holding the admin capability
pub async fn create_test_admin(database: &Database) -> Result<(Uuid, User)> {
    let mut user = User::new(
        "Test Admin".to_owned(),
        format!("admin-{}@example.com", Uuid::new_v4()),
        hash_test_password(TEST_PASSWORD),
    );
    user.is_admin = true;
    let user_id = database.create_user(&user).await?;
    Ok((user_id, user))
}

/// Signed token for `user` from the test resources
pub fn token_for(resources: &ServerResources, user: &User) -> String {
    resources.auth_manager.generate_token(user).unwrap()
}

/// Resources plus a regular user and their token
pub async fn setup_user() -> Result<(Arc<ServerResources>, User, String)> {
    let resources = create_test_resources().await?;
    let (_, user) = create_test_user(resources.database()?).await?;
    let token = token_for(&resources, &user);
    Ok((resources, user, token))
}
