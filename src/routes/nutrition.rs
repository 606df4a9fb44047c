// ABOUTME: Route handlers for the nutrition log REST API
// ABOUTME: Provides meal CRUD, per-day macro summaries and calorie/macro plan generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Nutrition routes
//!
//! All endpoints require the Auth Gate. Meal listing and the daily summary
//! degrade to zeroed `mock` responses when the store is unreachable.

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
    constants::limits,
    errors::{AppError, AppResult},
    middleware::{with_guards, AuthResult, Guard},
    models::{Meal, MealType, NutritionSummary},
    plans::{self, ActivityLevel, BodyMetrics, NutritionGoal},
    resources::ServerResources,
    routes::{list_limit, or_fallback, parse_id, require_name},
};

/// Request body for logging a meal
#[derive(Debug, Deserialize)]
pub struct CreateMealBody {
    /// Meal description
    #[serde(default)]
    pub name: String,
    /// Slot in the day
    pub meal_type: MealType,
    /// Energy in kcal
    pub calories: u32,
    /// Protein in grams
    #[serde(default)]
    pub protein_g: f64,
    /// Carbohydrates in grams
    #[serde(default)]
    pub carbs_g: f64,
    /// Fat in grams
    #[serde(default)]
    pub fat_g: f64,
    /// Day eaten, today when omitted
    pub date: Option<NaiveDate>,
}

/// Partial update of a logged meal
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMealBody {
    /// New description
    pub name: Option<String>,
    /// New slot
    pub meal_type: Option<MealType>,
    /// New energy
    pub calories: Option<u32>,
    /// New protein
    pub protein_g: Option<f64>,
    /// New carbohydrates
    pub carbs_g: Option<f64>,
    /// New fat
    pub fat_g: Option<f64>,
    /// New day
    pub date: Option<NaiveDate>,
}

/// Query parameters for listing meals
#[derive(Debug, Default, Deserialize)]
pub struct ListMealsQuery {
    /// Restrict to one day
    pub date: Option<NaiveDate>,
    /// Maximum number of meals
    pub limit: Option<i64>,
}

/// Query parameters for the daily summary
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Day to summarise, today when omitted
    pub date: Option<NaiveDate>,
}

/// Meal listing
#[derive(Debug, Serialize, Deserialize)]
pub struct MealListResponse {
    /// Meals, most recent first
    pub meals: Vec<Meal>,
    /// Number of meals returned
    pub count: usize,
    /// True when the store was unreachable and this is fallback data
    pub mock: bool,
}

/// Daily summary
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Totals for the day
    #[serde(flatten)]
    pub summary: NutritionSummary,
    /// True when the store was unreachable and this is fallback data
    pub mock: bool,
}

/// Request body for plan generation; omitted metrics come from the profile
#[derive(Debug, Default, Deserialize)]
pub struct NutritionPlanBody {
    /// Age in years
    pub age: Option<u32>,
    /// Height in centimetres
    pub height_cm: Option<f64>,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Daily activity
    #[serde(default)]
    pub activity_level: ActivityLevel,
    /// Calorie direction
    #[serde(default)]
    pub goal: NutritionGoal,
}

/// Nutrition routes handler
pub struct NutritionRoutes;

impl NutritionRoutes {
    /// Create all nutrition routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let router = Router::new()
            .route(
                "/api/nutrition",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/api/nutrition/summary", get(Self::handle_summary))
            .route("/api/nutrition/plan", post(Self::handle_plan))
            .route(
                "/api/nutrition/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            );

        with_guards(router, &resources, &[Guard::Authenticated]).with_state(resources)
    }

    /// Handle GET /api/nutrition - List the caller's meals
    #[tracing::instrument(skip(resources, auth, query), fields(route = "list_meals", user_id = %auth.user_id))]
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Query(query): Query<ListMealsQuery>,
    ) -> Result<Response, AppError> {
        let limit = list_limit(query.limit);
        let response = or_fallback(
            Self::list(&resources, auth.user_id, query.date, limit).await,
            || MealListResponse {
                meals: Vec::new(),
                count: 0,
                mock: true,
            },
        )?;

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/nutrition/summary - Totals for one day
    #[tracing::instrument(skip(resources, auth, query), fields(route = "nutrition_summary", user_id = %auth.user_id))]
    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Query(query): Query<SummaryQuery>,
    ) -> Result<Response, AppError> {
        let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
        let response = or_fallback(
            Self::summary(&resources, auth.user_id, date).await,
            || SummaryResponse {
                summary: NutritionSummary::from_meals(Some(date), &[]),
                mock: true,
            },
        )?;

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/nutrition - Log a meal
    #[tracing::instrument(skip(resources, auth, body), fields(route = "create_meal", user_id = %auth.user_id))]
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Json(body): Json<CreateMealBody>,
    ) -> Result<Response, AppError> {
        let name = require_name(&body.name, "Meal name")?;
        for (value, field) in [
            (body.protein_g, "Protein"),
            (body.carbs_g, "Carbohydrates"),
            (body.fat_g, "Fat"),
        ] {
            Self::validate_grams(value, field)?;
        }
        Self::validate_calories(body.calories)?;

        let now = Utc::now();
        let meal = Meal {
            id: Uuid::new_v4(),
            user_id: auth.user_id,
            name,
            meal_type: body.meal_type,
            calories: body.calories,
            protein_g: body.protein_g,
            carbs_g: body.carbs_g,
            fat_g: body.fat_g,
            date: body.date.unwrap_or_else(|| now.date_naive()),
            created_at: now,
            updated_at: now,
        };

        resources.database()?.create_meal(&meal).await?;
        info!(meal_id = %meal.id, "Meal logged");

        Ok((StatusCode::CREATED, Json(meal)).into_response())
    }

    /// Handle GET /api/nutrition/:id - Get one meal
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let meal_id = parse_id(&id, "meal")?;
        let meal = Self::load(&resources, auth.user_id, meal_id).await?;

        Ok((StatusCode::OK, Json(meal)).into_response())
    }

    /// Handle PUT /api/nutrition/:id - Update a meal
    #[tracing::instrument(skip(resources, auth, body), fields(route = "update_meal", user_id = %auth.user_id))]
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(id): Path<String>,
        Json(body): Json<UpdateMealBody>,
    ) -> Result<Response, AppError> {
        let meal_id = parse_id(&id, "meal")?;
        let mut meal = Self::load(&resources, auth.user_id, meal_id).await?;

        if let Some(name) = body.name.as_deref() {
            meal.name = require_name(name, "Meal name")?;
        }
        if let Some(meal_type) = body.meal_type {
            meal.meal_type = meal_type;
        }
        if let Some(calories) = body.calories {
            meal.calories = Self::validate_calories(calories)?;
        }
        if let Some(protein) = body.protein_g {
            meal.protein_g = Self::validate_grams(protein, "Protein")?;
        }
        if let Some(carbs) = body.carbs_g {
            meal.carbs_g = Self::validate_grams(carbs, "Carbohydrates")?;
        }
        if let Some(fat) = body.fat_g {
            meal.fat_g = Self::validate_grams(fat, "Fat")?;
        }
        if let Some(date) = body.date {
            meal.date = date;
        }
        meal.updated_at = Utc::now();

        if !resources.database()?.update_meal(&meal).await? {
            return Err(AppError::not_found(format!("Meal {id}")));
        }

        Ok((StatusCode::OK, Json(meal)).into_response())
    }

    /// Handle DELETE /api/nutrition/:id - Delete a meal
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Extension(auth): Extension<AuthResult>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let meal_id = parse_id(&id, "meal")?;
        let deleted = resources
            .database()?
            .delete_meal(auth.user_id, meal_id)
            .await?;

        if !deleted {
            return Err(AppError::not_found(format!("Meal {id}")));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    /// Handle POST /api/nutrition/plan - Daily calorie and macro targets
    #[tracing::instrument(skip(auth, body), fields(route = "nutrition_plan", user_id = %auth.user_id))]
    async fn handle_plan(
        Extension(auth): Extension<AuthResult>,
        Json(body): Json<NutritionPlanBody>,
    ) -> Result<Response, AppError> {
        let identity = &auth.identity;
        let (Some(age), Some(height_cm), Some(weight_kg)) = (
            body.age.or(identity.age),
            body.height_cm.or(identity.height_cm),
            body.weight_kg.or(identity.weight_kg),
        ) else {
            return Err(AppError::invalid_input(
                "Age, height_cm and weight_kg are required, in the request or the profile",
            ));
        };

        if age == 0 || age > limits::MAX_AGE {
            return Err(AppError::invalid_input(format!(
                "Age must be between 1 and {}",
                limits::MAX_AGE
            )));
        }
        if !(height_cm.is_finite() && height_cm > 0.0 && weight_kg.is_finite() && weight_kg > 0.0)
        {
            return Err(AppError::invalid_input(
                "Height and weight must be positive numbers",
            ));
        }

        let metrics = BodyMetrics {
            age,
            height_cm,
            weight_kg,
        };
        let plan = plans::nutrition_plan(&metrics, body.activity_level, body.goal);
        info!(daily_calories = plan.daily_calories, "Nutrition plan generated");

        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    async fn list(
        resources: &ServerResources,
        user_id: Uuid,
        date: Option<NaiveDate>,
        limit: i64,
    ) -> AppResult<MealListResponse> {
        let meals = resources.database()?.list_meals(user_id, date, limit).await?;
        Ok(MealListResponse {
            count: meals.len(),
            meals,
            mock: false,
        })
    }

    async fn summary(
        resources: &ServerResources,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<SummaryResponse> {
        let summary = resources
            .database()?
            .nutrition_summary(user_id, date)
            .await?;
        Ok(SummaryResponse {
            summary,
            mock: false,
        })
    }

    async fn load(resources: &ServerResources, user_id: Uuid, meal_id: Uuid) -> AppResult<Meal> {
        resources
            .database()?
            .get_meal(user_id, meal_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Meal {meal_id}")))
    }

    fn validate_calories(calories: u32) -> AppResult<u32> {
        if calories > limits::MAX_MEAL_CALORIES {
            return Err(AppError::invalid_input(format!(
                "Calories must be at most {}",
                limits::MAX_MEAL_CALORIES
            )));
        }
        Ok(calories)
    }

    fn validate_grams(value: f64, field: &str) -> AppResult<f64> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(AppError::invalid_input(format!(
                "{field} must be a non-negative number"
            )))
        }
    }
}
