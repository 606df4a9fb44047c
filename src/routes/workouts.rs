// ABOUTME: Route handlers for the workout log REST API
// ABOUTME: Provides CRUD endpoints for logged workouts plus templated weekly plan generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Workout routes
//!
//! All endpoints sit behind the Auth Gate and only ever touch the caller's
//! own workouts. Listing degrades to an empty `mock` response when the store
//! is unreachable; writes fail with 503.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    constants::defaults,
    database::WorkoutFilter,
    errors::{AppError, AppResult},
    middleware::{with_guards, AuthResult, Guard},
    models::{Exercise, FitnessLevel, GoalType, Workout, WorkoutType},
    plans::{self, WorkoutPlan},
    resources::ServerResources,
    routes::{check_text, list_limit, or_fallback, parse_id, require_name},
};

/// Longest session accepted, one day
const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// Request body for logging a workout
#[derive(Debug, Deserialize)]
pub struct CreateWorkoutBody {
    /// Session name
    #[serde(default)]
    pub name: String,
    /// Session kind
    pub workout_type: WorkoutType,
    /// Total duration
    pub duration_minutes: u32,
    /// Estimated energy expenditure
    pub calories_burned: Option<u32>,
    /// Exercises performed
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Day of the session, today when omitted
    pub date: Option<NaiveDate>,
}

/// Partial update of a logged workout
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkoutBody {
    /// New name
    pub name: Option<String>,
    /// New kind
    pub workout_type: Option<WorkoutType>,
    /// New duration
    pub duration_minutes: Option<u32>,
    /// New calorie estimate
    pub calories_burned: Option<u32>,
    /// Replacement exercise list
    pub exercises: Option<Vec<Exercise>>,
    /// New notes
    pub notes: Option<String>,
    /// New day
    pub date: Option<NaiveDate>,
}

/// Query parameters for listing workouts
#[derive(Debug, Default, Deserialize)]
pub struct ListWorkoutsQuery {
    /// Earliest day (inclusive)
    pub from: Option<NaiveDate>,
    /// Latest day (inclusive)
    pub to: Option<NaiveDate>,
    /// Maximum number of workouts
    pub limit: Option<i64>,
}

/// Workout listing
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkoutListResponse {
    /// Workouts, most recent first
    pub workouts: Vec<Workout>,
    /// Number of workouts returned
    pub count: usize,
    /// True when the store was unreachable and this is fallback data
    pub mock: bool,
}

impl WorkoutListResponse {
    fn new(workouts: Vec<Workout>) -> Self {
        Self {
            count: workouts.len(),
            workouts,
            mock: false,
        }
    }

    const fn fallback() -> Self {
        Self {
            workouts: Vec::new(),
            count: 0,
            mock: true,
        }
    }
}

/// Request body for plan generation; omitted fields fall back to the profile
#[derive(Debug, Default, Deserialize)]
pub struct GenerateWorkoutBody {
    /// Level to scale volume for
    pub fitness_level: Option<FitnessLevel>,
    /// Goal to pick the split for
    pub goal: Option<GoalType>,
    /// Sessions per week
    pub days_per_week: Option<u8>,
    /// Minutes per session
    pub session_minutes: Option<u32>,
}

/// Workout routes handler
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let router = Router::new()
            .route(
                "/api/workouts",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/api/workouts/generate", post(Self::handle_generate))
            .route(
                "/api/workouts/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            );

        with_guards(router, &resources, &[Guard::Authenticated]).with_state(resources)
    }

    /// Handle GET /api/workouts - List the caller's workouts
    #[tracing::instrument(skip(resources, auth, query), fields(route = "list_workouts", user_id = %auth.user_id))]
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Query(query): Query<ListWorkoutsQuery>,
    ) -> Result<Response, AppError> {
        let filter = WorkoutFilter {
            from: query.from,
            to: query.to,
            limit: list_limit(query.limit),
        };

        let response = or_fallback(
            Self::list(&resources, auth.user_id, &filter).await,
            WorkoutListResponse::fallback,
        )?;

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/workouts - Log a workout
    #[tracing::instrument(skip(resources, auth, body), fields(route = "create_workout", user_id = %auth.user_id))]
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Json(body): Json<CreateWorkoutBody>,
    ) -> Result<Response, AppError> {
        let name = require_name(&body.name, "Workout name")?;
        Self::validate_duration(body.duration_minutes)?;
        Self::validate_exercises(&body.exercises)?;
        check_text(body.notes.as_deref(), "Notes")?;

        let now = Utc::now();
        let workout = Workout {
            id: Uuid::new_v4(),
            user_id: auth.user_id,
            name,
            workout_type: body.workout_type,
            duration_minutes: body.duration_minutes,
            calories_burned: body.calories_burned,
            exercises: body.exercises,
            notes: body.notes,
            date: body.date.unwrap_or_else(|| now.date_naive()),
            created_at: now,
            updated_at: now,
        };

        resources.database()?.create_workout(&workout).await?;
        info!(workout_id = %workout.id, "Workout logged");

        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    /// Handle GET /api/workouts/:id - Get one workout
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let workout_id = parse_id(&id, "workout")?;
        let workout = Self::load(&resources, auth.user_id, workout_id).await?;

        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle PUT /api/workouts/:id - Update a workout
    #[tracing::instrument(skip(resources, auth, body), fields(route = "update_workout", user_id = %auth.user_id))]
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(id): Path<String>,
        Json(body): Json<UpdateWorkoutBody>,
    ) -> Result<Response, AppError> {
        let workout_id = parse_id(&id, "workout")?;
        let mut workout = Self::load(&resources, auth.user_id, workout_id).await?;

        if let Some(name) = body.name.as_deref() {
            workout.name = require_name(name, "Workout name")?;
        }
        if let Some(workout_type) = body.workout_type {
            workout.workout_type = workout_type;
        }
        if let Some(duration) = body.duration_minutes {
            Self::validate_duration(duration)?;
            workout.duration_minutes = duration;
        }
        if let Some(calories) = body.calories_burned {
            workout.calories_burned = Some(calories);
        }
        if let Some(exercises) = body.exercises {
            Self::validate_exercises(&exercises)?;
            workout.exercises = exercises;
        }
        if let Some(notes) = body.notes {
            check_text(Some(&notes), "Notes")?;
            workout.notes = Some(notes);
        }
        if let Some(date) = body.date {
            workout.date = date;
        }
        workout.updated_at = Utc::now();

        if !resources.database()?.update_workout(&workout).await? {
            return Err(AppError::not_found(format!("Workout {id}")));
        }

        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle DELETE /api/workouts/:id - Delete a workout
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let workout_id = parse_id(&id, "workout")?;
        let deleted = resources
            .database()?
            .delete_workout(auth.user_id, workout_id)
            .await?;

        if !deleted {
            return Err(AppError::not_found(format!("Workout {id}")));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    /// Handle POST /api/workouts/generate - Build a weekly plan
    ///
    /// Pure computation over the request and the attached identity, so it
    /// keeps working while the store is down.
    #[tracing::instrument(skip(auth, body), fields(route = "generate_workout", user_id = %auth.user_id))]
    async fn handle_generate(
        Extension(auth): Extension<AuthResult>,
        Json(body): Json<GenerateWorkoutBody>,
    ) -> Result<Response, AppError> {
        let fitness_level = body
            .fitness_level
            .or(auth.identity.fitness_level)
            .unwrap_or(FitnessLevel::Beginner);
        let goal = body.goal.unwrap_or(GoalType::General);
        let days = body.days_per_week.unwrap_or(defaults::PLAN_DAYS_PER_WEEK);
        let minutes = body
            .session_minutes
            .unwrap_or(defaults::PLAN_SESSION_MINUTES);

        Self::validate_duration(minutes)?;

        let plan: WorkoutPlan = plans::workout_plan(fitness_level, goal, days, minutes);
        info!(sessions = plan.sessions.len(), "Workout plan generated");

        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    async fn list(
        resources: &ServerResources,
        user_id: Uuid,
        filter: &WorkoutFilter,
    ) -> AppResult<WorkoutListResponse> {
        let workouts = resources.database()?.list_workouts(user_id, filter).await?;
        Ok(WorkoutListResponse::new(workouts))
    }

    async fn load(
        resources: &ServerResources,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> AppResult<Workout> {
        resources
            .database()?
            .get_workout(user_id, workout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workout {workout_id}")))
    }

    fn validate_duration(minutes: u32) -> AppResult<()> {
        if minutes == 0 || minutes > MAX_DURATION_MINUTES {
            return Err(AppError::invalid_input(format!(
                "Duration must be between 1 and {MAX_DURATION_MINUTES} minutes"
            )));
        }
        Ok(())
    }

    fn validate_exercises(exercises: &[Exercise]) -> AppResult<()> {
        if exercises.iter().any(|e| e.name.trim().is_empty()) {
            return Err(AppError::invalid_input("Every exercise needs a name"));
        }
        Ok(())
    }
}
