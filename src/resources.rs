// ABOUTME: Process-scoped server resources built once at startup and shared with every handler
// ABOUTME: Bundles configuration, the optional database handle and the token codec
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Shared server resources
//!
//! A single `Arc<ServerResources>` is created at startup and handed to the
//! routers through axum `State`. Nothing is reinitialized mid-process.
//!
//! The database handle is optional: when the store cannot be reached at
//! startup the server still comes up, read endpoints serve fallback data and
//! writes fail with `UpstreamUnavailable`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::health::HealthChecker;
use crate::middleware::AuthMiddleware;

/// Shared handles used by all route groups
#[derive(Debug)]
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Database handle, absent when the store was unreachable at startup
    pub database: Option<Database>,
    /// Token codec
    pub auth_manager: AuthManager,
    /// Auth Gate core
    pub auth_middleware: AuthMiddleware,
    /// Liveness probe
    pub health_checker: HealthChecker,
}

impl ServerResources {
    /// Assemble resources from already-initialized parts
    #[must_use]
    pub fn new(
        config: Arc<ServerConfig>,
        database: Option<Database>,
        auth_manager: AuthManager,
    ) -> Self {
        let auth_middleware = AuthMiddleware::new(auth_manager.clone(), database.clone());
        let health_checker = HealthChecker::new(database.clone(), config.environment);
        Self {
            config,
            database,
            auth_manager,
            auth_middleware,
            health_checker,
        }
    }

    /// Connect to the configured database and build the resources
    ///
    /// A connection failure is logged and leaves the server in degraded mode
    /// instead of aborting startup.
    pub async fn initialize(config: ServerConfig) -> Self {
        let auth_manager = AuthManager::from_config(&config.auth);

        let database = match Database::new(&config.database_url).await {
            Ok(db) => {
                info!(url = %config.database_url, "Database connected");
                Some(db)
            }
            Err(e) => {
                warn!(error = %e, "Database unavailable; serving degraded responses");
                None
            }
        };

        Self::new(Arc::new(config), database, auth_manager)
    }

    /// Database handle or `UpstreamUnavailable`
    ///
    /// # Errors
    ///
    /// Returns `UpstreamUnavailable` when the server runs without a database
    pub fn database(&self) -> AppResult<&Database> {
        self.database
            .as_ref()
            .ok_or_else(|| AppError::upstream_unavailable("Database is not connected"))
    }
}
