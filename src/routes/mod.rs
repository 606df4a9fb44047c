// ABOUTME: Route module organization for FitTrack HTTP endpoints
// ABOUTME: Provides centralized route definitions organized by domain plus shared handler helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Route module for the FitTrack server
//!
//! This module organizes all HTTP routes by domain. Each domain module
//! contains only route definitions and thin handler functions that delegate
//! to the database layer or a service.

use std::sync::Arc;

use axum::Router;
use tracing::warn;
use uuid::Uuid;

use crate::constants::limits;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::resources::ServerResources;

// ═══════════════════════════════════════════════════════════════
// ALWAYS ENABLED - Core infrastructure
// ═══════════════════════════════════════════════════════════════

/// Health check routes
pub mod health;

/// User registration, login and profile routes
pub mod auth;

// ═══════════════════════════════════════════════════════════════
// FITNESS DATA
// ═══════════════════════════════════════════════════════════════

/// Workout log and plan generation routes
pub mod workouts;

/// Nutrition log, daily summary and meal plan routes
pub mod nutrition;

/// Personal goal routes
pub mod goals;

// ═══════════════════════════════════════════════════════════════
// ADMIN
// ═══════════════════════════════════════════════════════════════

/// Admin user management routes
pub mod admin;

// ═══════════════════════════════════════════════════════════════
// RE-EXPORTS
// ═══════════════════════════════════════════════════════════════

pub use admin::AdminRoutes;
pub use auth::{AuthRoutes, AuthService, LoginRequest, RegisterRequest};
pub use goals::GoalRoutes;
pub use health::HealthRoutes;
pub use nutrition::NutritionRoutes;
pub use workouts::WorkoutRoutes;

/// Every route group merged into one router
pub fn api_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(WorkoutRoutes::routes(resources.clone()))
        .merge(NutritionRoutes::routes(resources.clone()))
        .merge(GoalRoutes::routes(resources.clone()))
        .merge(AdminRoutes::routes(resources.clone()))
}

/// Replace an `UpstreamUnavailable` failure of a read with fallback data
///
/// Any other error passes through unchanged.
pub(crate) fn or_fallback<T>(result: AppResult<T>, fallback: impl FnOnce() -> T) -> AppResult<T> {
    match result {
        Err(e) if e.code == ErrorCode::UpstreamUnavailable => {
            warn!(error = %e, "Store unavailable; serving fallback response");
            Ok(fallback())
        }
        other => other,
    }
}

/// Parse a path ID, naming the resource in the error
pub(crate) fn parse_id(raw: &str, resource: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::invalid_input(format!("Invalid {resource} ID format")))
}

/// Clamp an optional `limit` query parameter into the allowed range
pub(crate) fn list_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(limits::DEFAULT_LIST_LIMIT)
        .clamp(1, limits::MAX_LIST_LIMIT)
}

/// Reject free text longer than the configured maximum
pub(crate) fn check_text(value: Option<&str>, field: &str) -> AppResult<()> {
    match value {
        Some(text) if text.chars().count() > limits::MAX_TEXT_LENGTH => {
            Err(AppError::invalid_input(format!(
                "{field} must be {} characters or less",
                limits::MAX_TEXT_LENGTH
            )))
        }
        _ => Ok(()),
    }
}

/// Require a non-empty trimmed name of bounded length
pub(crate) fn require_name(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::invalid_input(format!("{field} is required")));
    }
    if value.chars().count() > limits::MAX_NAME_LENGTH {
        return Err(AppError::invalid_input(format!(
            "{field} must be {} characters or less",
            limits::MAX_NAME_LENGTH
        )));
    }
    Ok(value.to_owned())
}
