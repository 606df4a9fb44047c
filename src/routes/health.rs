// ABOUTME: Health check route definitions
// ABOUTME: Serves the unauthenticated /health liveness probe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};

use crate::resources::ServerResources;

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Always 200; the body reports whether the store is reachable
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> impl IntoResponse {
        (StatusCode::OK, Json(resources.health_checker.check().await))
    }
}
