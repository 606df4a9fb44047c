// ABOUTME: Integration tests for the goal route handlers
// ABOUTME: Tests goal creation, progress tracking with automatic completion, filtering and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use fittrack_server::errors::ErrorBody;
use fittrack_server::models::{GoalStatus, GoalType};
use fittrack_server::routes::goals::{GoalListResponse, GoalResponse, GoalRoutes};
use helpers::axum_test::AxumTestRequest;
use serde_json::json;

async fn setup_test_environment() -> (axum::Router, String) {
    let (resources, _user, token) = common::setup_user().await.unwrap();
    (GoalRoutes::routes(resources), token)
}

async fn create_goal(router: &axum::Router, token: &str, body: serde_json::Value) -> GoalResponse {
    let response = AxumTestRequest::post("/api/goals")
        .bearer(token)
        .json(&body)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_create_goal_with_defaults() {
    let (router, token) = setup_test_environment().await;

    let goal = create_goal(
        &router,
        &token,
        json!({"title": "Run 100 km", "target_value": 100.0, "unit": "km"}),
    )
    .await;

    assert_eq!(goal.goal.goal_type, GoalType::General);
    assert_eq!(goal.goal.status, GoalStatus::Active);
    assert!(goal.goal.current_value.abs() < f64::EPSILON);
    assert!(goal.progress_percent.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_create_goal_already_met_starts_completed() {
    let (router, token) = setup_test_environment().await;

    let goal = create_goal(
        &router,
        &token,
        json!({"title": "Bench 60", "target_value": 60.0, "current_value": 62.5, "unit": "kg",
               "goal_type": "strength"}),
    )
    .await;

    assert_eq!(goal.goal.status, GoalStatus::Completed);
    assert!((goal.progress_percent - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_create_goal_validation() {
    let (router, token) = setup_test_environment().await;

    for (body, message) in [
        (json!({"title": "", "target_value": 5.0, "unit": "kg"}), "Goal title is required"),
        (json!({"title": "x", "target_value": 5.0}), "Unit is required"),
        (
            json!({"title": "x", "target_value": 0.0, "unit": "kg"}),
            "Target value must be a positive number",
        ),
        (
            json!({"title": "x", "target_value": 5.0, "current_value": -1.0, "unit": "kg"}),
            "Progress value must be a non-negative number",
        ),
    ] {
        let response = AxumTestRequest::post("/api/goals")
            .bearer(&token)
            .json(&body)
            .send(router.clone())
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{body}");
        let error: ErrorBody = response.json();
        assert_eq!(error.message, message);
    }
}

#[tokio::test]
async fn test_progress_completes_goal() {
    let (router, token) = setup_test_environment().await;
    let goal = create_goal(
        &router,
        &token,
        json!({"title": "Lose 5 kg", "target_value": 5.0, "unit": "kg", "goal_type": "weight_loss"}),
    )
    .await;
    let path = format!("/api/goals/{}/progress", goal.goal.id);

    let halfway: GoalResponse = AxumTestRequest::put(&path)
        .bearer(&token)
        .json(&json!({"value": 2.5}))
        .send(router.clone())
        .await
        .json();
    assert_eq!(halfway.goal.status, GoalStatus::Active);
    assert!((halfway.progress_percent - 50.0).abs() < 1e-9);

    let done: GoalResponse = AxumTestRequest::put(&path)
        .bearer(&token)
        .json(&json!({"value": 5.0}))
        .send(router.clone())
        .await
        .json();
    assert_eq!(done.goal.status, GoalStatus::Completed);

    let fetched: GoalResponse = AxumTestRequest::get(&format!("/api/goals/{}", goal.goal.id))
        .bearer(&token)
        .send(router)
        .await
        .json();
    assert_eq!(fetched.goal.status, GoalStatus::Completed);
}

#[tokio::test]
async fn test_list_goals_by_status() {
    let (router, token) = setup_test_environment().await;
    create_goal(&router, &token, json!({"title": "A", "target_value": 10.0, "unit": "km"})).await;
    create_goal(
        &router,
        &token,
        json!({"title": "B", "target_value": 10.0, "current_value": 10.0, "unit": "km"}),
    )
    .await;

    let active: GoalListResponse = AxumTestRequest::get("/api/goals?status=active")
        .bearer(&token)
        .send(router.clone())
        .await
        .json();
    assert_eq!(active.count, 1);
    assert_eq!(active.goals[0].goal.title, "A");

    let all: GoalListResponse = AxumTestRequest::get("/api/goals")
        .bearer(&token)
        .send(router)
        .await
        .json();
    assert_eq!(all.count, 2);
    assert!(!all.mock);
}

#[tokio::test]
async fn test_lowering_target_can_complete_goal() {
    let (router, token) = setup_test_environment().await;
    let goal = create_goal(
        &router,
        &token,
        json!({"title": "Squat", "target_value": 140.0, "current_value": 120.0, "unit": "kg"}),
    )
    .await;

    let updated: GoalResponse = AxumTestRequest::put(&format!("/api/goals/{}", goal.goal.id))
        .bearer(&token)
        .json(&json!({"target_value": 120.0}))
        .send(router)
        .await
        .json();

    assert_eq!(updated.goal.status, GoalStatus::Completed);
}

#[tokio::test]
async fn test_abandon_and_delete_goal() {
    let (router, token) = setup_test_environment().await;
    let goal = create_goal(&router, &token, json!({"title": "Yoga", "target_value": 30.0, "unit": "sessions"})).await;
    let path = format!("/api/goals/{}", goal.goal.id);

    let abandoned: GoalResponse = AxumTestRequest::put(&path)
        .bearer(&token)
        .json(&json!({"status": "abandoned"}))
        .send(router.clone())
        .await
        .json();
    assert_eq!(abandoned.goal.status, GoalStatus::Abandoned);

    let deleted = AxumTestRequest::delete(&path)
        .bearer(&token)
        .send(router.clone())
        .await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let missing = AxumTestRequest::get(&path).bearer(&token).send(router).await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}
