// ABOUTME: Tests for server behavior while the backing store is unavailable
// ABOUTME: Reads serve mock fallbacks, writes and admin checks fail with 503, tokens still authenticate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use fittrack_server::errors::{ErrorBody, ErrorCode};
use fittrack_server::health::{HealthResponse, HealthStatus};
use fittrack_server::models::{Identity, User};
use fittrack_server::plans::WorkoutPlan;
use fittrack_server::routes::api_router;
use fittrack_server::routes::goals::GoalListResponse;
use fittrack_server::routes::nutrition::{MealListResponse, SummaryResponse};
use fittrack_server::routes::workouts::WorkoutListResponse;
use helpers::axum_test::AxumTestRequest;
use serde_json::json;
use uuid::Uuid;

fn setup() -> (axum::Router, User, String) {
    let resources = common::create_degraded_resources();
    let mut user = User::new(
        "Offline".to_owned(),
        "offline.user@example.com".to_owned(),
        "unused".to_owned(),
    );
    user.is_admin = true;
    let token = common::token_for(&resources, &user);
    (api_router(&resources), user, token)
}

#[tokio::test]
async fn test_list_endpoints_return_mock_fallbacks() {
    let (router, _user, token) = setup();

    let workouts = AxumTestRequest::get("/api/workouts")
        .bearer(&token)
        .send(router.clone())
        .await;
    assert_eq!(workouts.status_code(), StatusCode::OK);
    let workouts: WorkoutListResponse = workouts.json();
    assert!(workouts.mock);
    assert_eq!(workouts.count, 0);

    let meals: MealListResponse = AxumTestRequest::get("/api/nutrition")
        .bearer(&token)
        .send(router.clone())
        .await
        .json();
    assert!(meals.mock);

    let summary: SummaryResponse = AxumTestRequest::get("/api/nutrition/summary?date=2025-05-05")
        .bearer(&token)
        .send(router.clone())
        .await
        .json();
    assert!(summary.mock);
    assert_eq!(summary.summary.total_calories, 0);
    assert_eq!(summary.summary.date.unwrap().to_string(), "2025-05-05");

    let goals: GoalListResponse = AxumTestRequest::get("/api/goals")
        .bearer(&token)
        .send(router)
        .await
        .json();
    assert!(goals.mock);
}

#[tokio::test]
async fn test_writes_fail_with_503() {
    let (router, _user, token) = setup();

    let create = AxumTestRequest::post("/api/workouts")
        .bearer(&token)
        .json(&json!({"name": "Run", "workout_type": "cardio", "duration_minutes": 30}))
        .send(router.clone())
        .await;
    assert_eq!(create.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let error: ErrorBody = create.json();
    assert_eq!(error.code, ErrorCode::UpstreamUnavailable);

    let single = AxumTestRequest::get(&format!("/api/goals/{}", Uuid::new_v4()))
        .bearer(&token)
        .send(router.clone())
        .await;
    assert_eq!(single.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let login = AxumTestRequest::post("/api/users/login")
        .json(&json!({"email": "offline.user@example.com", "password": "whatever"}))
        .send(router)
        .await;
    assert_eq!(login.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_profile_is_derived_from_token_claims() {
    let (router, user, token) = setup();

    let response = AxumTestRequest::get("/api/users/profile")
        .bearer(&token)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let identity: Identity = response.json();
    assert_eq!(identity.id, user.id);
    assert_eq!(identity.email, "offline.user@example.com");
    assert_eq!(identity.name, "offline.user");
    assert!(!identity.is_admin);
}

#[tokio::test]
async fn test_admin_routes_are_unavailable_not_forbidden() {
    let (router, _user, token) = setup();

    let response = AxumTestRequest::get("/api/admin/users")
        .bearer(&token)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_missing_token_is_still_401() {
    let (router, _user, _token) = setup();

    let response = AxumTestRequest::get("/api/workouts").send(router).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_plan_generation_keeps_working() {
    let (router, _user, token) = setup();

    let response = AxumTestRequest::post("/api/workouts/generate")
        .bearer(&token)
        .json(&json!({"goal": "endurance"}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let plan: WorkoutPlan = response.json();
    assert_eq!(plan.sessions.len(), 3);
}

#[tokio::test]
async fn test_health_reports_degraded() {
    let (router, _user, _token) = setup();

    let response = AxumTestRequest::get("/health").send(router).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let health: HealthResponse = response.json();
    assert_eq!(health.status, HealthStatus::Degraded);
    assert!(!health.database.connected);
    assert_eq!(health.service.name, "fittrack-server");
}
