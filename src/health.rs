// ABOUTME: Server health monitoring and database availability checks for operational visibility
// ABOUTME: Builds the liveness payload served by /health, including store connectivity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Health check utilities
//!
//! The probe never fails: a missing or unreachable store turns the overall
//! status to `degraded` while the endpoint itself still answers 200.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Environment;
use crate::constants::SERVICE_NAME;
use crate::database::Database;

/// Overall health status
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Store unreachable, service answering with fallbacks
    Degraded,
}

/// Service information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Deployment environment
    pub environment: String,
    /// Service uptime in seconds
    pub uptime_seconds: u64,
}

/// Store connectivity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseHealth {
    /// Whether a ping succeeded
    pub connected: bool,
    /// Status description
    pub message: String,
    /// Ping duration in milliseconds
    pub duration_ms: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: HealthStatus,
    /// Service information
    pub service: ServiceInfo,
    /// Store connectivity
    pub database: DatabaseHealth,
    /// Response timestamp (Unix seconds)
    pub timestamp: u64,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Health checker for the FitTrack server
#[derive(Debug, Clone)]
pub struct HealthChecker {
    /// Service start time
    start_time: Instant,
    /// Database handle, absent in degraded mode
    database: Option<Database>,
    /// Reported environment
    environment: Environment,
}

impl HealthChecker {
    /// Create a new health checker
    #[must_use]
    pub fn new(database: Option<Database>, environment: Environment) -> Self {
        Self {
            start_time: Instant::now(),
            database,
            environment,
        }
    }

    /// Run all checks
    pub async fn check(&self) -> HealthResponse {
        let start = Instant::now();
        let database = self.check_database().await;

        let status = if database.connected {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };

        HealthResponse {
            status,
            service: ServiceInfo {
                name: SERVICE_NAME.to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                environment: self.environment.to_string(),
                uptime_seconds: self.start_time.elapsed().as_secs(),
            },
            database,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            response_time_ms: elapsed_ms(start),
        }
    }

    /// Check database connectivity
    async fn check_database(&self) -> DatabaseHealth {
        let start = Instant::now();

        let Some(database) = &self.database else {
            return DatabaseHealth {
                connected: false,
                message: "Database not configured or unreachable at startup".into(),
                duration_ms: 0,
            };
        };

        match database.ping().await {
            Ok(()) => DatabaseHealth {
                connected: true,
                message: "Database connection healthy".into(),
                duration_ms: elapsed_ms(start),
            },
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                DatabaseHealth {
                    connected: false,
                    message: format!("Database connection failed: {e}"),
                    duration_ms: elapsed_ms(start),
                }
            }
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
