// ABOUTME: Route handlers for the personal goals REST API
// ABOUTME: Provides goal CRUD and progress recording with automatic completion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Goal routes
//!
//! Every goal is returned together with its clamped progress percentage.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    middleware::{with_guards, AuthResult, Guard},
    models::{Goal, GoalStatus, GoalType},
    resources::ServerResources,
    routes::{check_text, or_fallback, parse_id, require_name},
};

/// Request body for creating a goal
#[derive(Debug, Deserialize)]
pub struct CreateGoalBody {
    /// Short title
    #[serde(default)]
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Goal category
    #[serde(default = "default_goal_type")]
    pub goal_type: GoalType,
    /// Value that completes the goal
    pub target_value: f64,
    /// Starting value
    #[serde(default)]
    pub current_value: f64,
    /// Unit of both values
    #[serde(default)]
    pub unit: String,
    /// Optional deadline
    pub deadline: Option<NaiveDate>,
}

const fn default_goal_type() -> GoalType {
    GoalType::General
}

/// Partial update of a goal
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGoalBody {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New category
    pub goal_type: Option<GoalType>,
    /// New target
    pub target_value: Option<f64>,
    /// New unit
    pub unit: Option<String>,
    /// New deadline
    pub deadline: Option<NaiveDate>,
    /// New lifecycle state
    pub status: Option<GoalStatus>,
}

/// Request body for recording progress
#[derive(Debug, Deserialize)]
pub struct ProgressBody {
    /// Latest measured value
    pub value: f64,
}

/// Query parameters for listing goals
#[derive(Debug, Default, Deserialize)]
pub struct ListGoalsQuery {
    /// Restrict to one lifecycle state
    pub status: Option<GoalStatus>,
}

/// A goal with its derived progress
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalResponse {
    /// Stored goal
    #[serde(flatten)]
    pub goal: Goal,
    /// `current / target` in percent, clamped to `[0, 100]`
    pub progress_percent: f64,
}

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        Self {
            progress_percent: goal.progress_percent(),
            goal,
        }
    }
}

/// Goal listing
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalListResponse {
    /// Goals, newest first
    pub goals: Vec<GoalResponse>,
    /// Number of goals returned
    pub count: usize,
    /// True when the store was unreachable and this is fallback data
    pub mock: bool,
}

/// Goal routes handler
pub struct GoalRoutes;

impl GoalRoutes {
    /// Create all goal routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let router = Router::new()
            .route("/api/goals", get(Self::handle_list).post(Self::handle_create))
            .route(
                "/api/goals/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/goals/:id/progress", put(Self::handle_progress));

        with_guards(router, &resources, &[Guard::Authenticated]).with_state(resources)
    }

    /// Handle GET /api/goals - List the caller's goals
    #[tracing::instrument(skip(resources, auth, query), fields(route = "list_goals", user_id = %auth.user_id))]
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Query(query): Query<ListGoalsQuery>,
    ) -> Result<Response, AppError> {
        let response = or_fallback(
            Self::list(&resources, auth.user_id, query.status).await,
            || GoalListResponse {
                goals: Vec::new(),
                count: 0,
                mock: true,
            },
        )?;

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/goals - Create a goal
    #[tracing::instrument(skip(resources, auth, body), fields(route = "create_goal", user_id = %auth.user_id))]
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Json(body): Json<CreateGoalBody>,
    ) -> Result<Response, AppError> {
        let title = require_name(&body.title, "Goal title")?;
        let unit = require_name(&body.unit, "Unit")?;
        check_text(body.description.as_deref(), "Description")?;
        Self::validate_target(body.target_value)?;
        Self::validate_value(body.current_value)?;

        let now = Utc::now();
        let mut goal = Goal {
            id: Uuid::new_v4(),
            user_id: auth.user_id,
            title,
            description: body.description,
            goal_type: body.goal_type,
            target_value: body.target_value,
            current_value: 0.0,
            unit,
            deadline: body.deadline,
            status: GoalStatus::Active,
            created_at: now,
            updated_at: now,
        };
        goal.record_progress(body.current_value);

        resources.database()?.create_goal(&goal).await?;
        info!(goal_id = %goal.id, "Goal created");

        Ok((StatusCode::CREATED, Json(GoalResponse::from(goal))).into_response())
    }

    /// Handle GET /api/goals/:id - Get one goal
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let goal_id = parse_id(&id, "goal")?;
        let goal = Self::load(&resources, auth.user_id, goal_id).await?;

        Ok((StatusCode::OK, Json(GoalResponse::from(goal))).into_response())
    }

    /// Handle PUT /api/goals/:id - Update a goal
    #[tracing::instrument(skip(resources, auth, body), fields(route = "update_goal", user_id = %auth.user_id))]
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(id): Path<String>,
        Json(body): Json<UpdateGoalBody>,
    ) -> Result<Response, AppError> {
        let goal_id = parse_id(&id, "goal")?;
        let mut goal = Self::load(&resources, auth.user_id, goal_id).await?;

        if let Some(title) = body.title.as_deref() {
            goal.title = require_name(title, "Goal title")?;
        }
        if let Some(description) = body.description {
            check_text(Some(&description), "Description")?;
            goal.description = Some(description);
        }
        if let Some(goal_type) = body.goal_type {
            goal.goal_type = goal_type;
        }
        if let Some(unit) = body.unit.as_deref() {
            goal.unit = require_name(unit, "Unit")?;
        }
        if let Some(deadline) = body.deadline {
            goal.deadline = Some(deadline);
        }
        if let Some(status) = body.status {
            goal.status = status;
        }
        if let Some(target) = body.target_value {
            Self::validate_target(target)?;
            goal.target_value = target;
            // a lowered target may already be met
            goal.record_progress(goal.current_value);
        }
        goal.updated_at = Utc::now();

        Self::store(&resources, &goal).await?;
        Ok((StatusCode::OK, Json(GoalResponse::from(goal))).into_response())
    }

    /// Handle PUT /api/goals/:id/progress - Record a new value
    #[tracing::instrument(skip(resources, auth, body), fields(route = "goal_progress", user_id = %auth.user_id))]
    async fn handle_progress(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(id): Path<String>,
        Json(body): Json<ProgressBody>,
    ) -> Result<Response, AppError> {
        Self::validate_value(body.value)?;
        let goal_id = parse_id(&id, "goal")?;
        let mut goal = Self::load(&resources, auth.user_id, goal_id).await?;

        let was_active = goal.status == GoalStatus::Active;
        goal.record_progress(body.value);
        Self::store(&resources, &goal).await?;

        if was_active && goal.status == GoalStatus::Completed {
            info!(goal_id = %goal.id, "Goal completed");
        }

        Ok((StatusCode::OK, Json(GoalResponse::from(goal))).into_response())
    }

    /// Handle DELETE /api/goals/:id - Delete a goal
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let goal_id = parse_id(&id, "goal")?;
        let deleted = resources
            .database()?
            .delete_goal(auth.user_id, goal_id)
            .await?;

        if !deleted {
            return Err(AppError::not_found(format!("Goal {id}")));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    async fn list(
        resources: &ServerResources,
        user_id: Uuid,
        status: Option<GoalStatus>,
    ) -> AppResult<GoalListResponse> {
        let goals: Vec<GoalResponse> = resources
            .database()?
            .list_goals(user_id, status)
            .await?
            .into_iter()
            .map(GoalResponse::from)
            .collect();
        Ok(GoalListResponse {
            count: goals.len(),
            goals,
            mock: false,
        })
    }

    async fn load(resources: &ServerResources, user_id: Uuid, goal_id: Uuid) -> AppResult<Goal> {
        resources
            .database()?
            .get_goal(user_id, goal_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Goal {goal_id}")))
    }

    async fn store(resources: &ServerResources, goal: &Goal) -> AppResult<()> {
        if resources.database()?.update_goal(goal).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Goal {}", goal.id)))
        }
    }

    fn validate_target(target: f64) -> AppResult<()> {
        if target.is_finite() && target > 0.0 {
            Ok(())
        } else {
            Err(AppError::invalid_input("Target value must be a positive number"))
        }
    }

    fn validate_value(value: f64) -> AppResult<()> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(AppError::invalid_input("Progress value must be a non-negative number"))
        }
    }
}
