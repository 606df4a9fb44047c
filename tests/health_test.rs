// ABOUTME: Tests for the health endpoint and the full middleware-wrapped router
// ABOUTME: Verifies healthy status, CORS headers and JSON 404s through build_router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use fittrack_server::health::{HealthResponse, HealthStatus};
use fittrack_server::server::build_router;
use helpers::axum_test::AxumTestRequest;

#[tokio::test]
async fn test_health_reports_healthy_with_database() {
    let resources = common::create_test_resources().await.unwrap();

    let response = AxumTestRequest::get("/health")
        .send(build_router(&resources))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let health: HealthResponse = response.json();
    assert_eq!(health.status, HealthStatus::Healthy);
    assert!(health.database.connected);
    assert_eq!(health.service.environment, "testing");
    assert!(health.timestamp > 0);
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let resources = common::create_test_resources().await.unwrap();

    let response = AxumTestRequest::get("/health")
        .header("authorization", "Bearer garbage")
        .send(build_router(&resources))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let resources = common::create_test_resources().await.unwrap();

    let response = AxumTestRequest::get("/api/does-not-exist")
        .send(build_router(&resources))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_route_through_full_stack() {
    let (resources, _user, token) = common::setup_user().await.unwrap();

    let response = AxumTestRequest::get("/api/workouts")
        .bearer(&token)
        .send(build_router(&resources))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}
