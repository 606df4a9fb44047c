// ABOUTME: Nutrition log database operations
// ABOUTME: CRUD for logged meals and per-day macro summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{parse_enum, parse_uuid, to_u32, Database};
use crate::errors::AppResult;
use crate::models::{Meal, NutritionSummary};

const MEAL_COLUMNS: &str = "id, user_id, name, meal_type, calories, protein_g, carbs_g, fat_g, \
                            date, created_at, updated_at";

impl Database {
    /// Insert a meal
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_meal(&self, meal: &Meal) -> AppResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO meals (
                id, user_id, name, meal_type, calories, protein_g, carbs_g, fat_g,
                date, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(meal.id.to_string())
        .bind(meal.user_id.to_string())
        .bind(&meal.name)
        .bind(meal.meal_type.as_str())
        .bind(i64::from(meal.calories))
        .bind(meal.protein_g)
        .bind(meal.carbs_g)
        .bind(meal.fat_g)
        .bind(meal.date)
        .bind(meal.created_at)
        .bind(meal.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(meal.id)
    }

    /// Get one of the user's meals
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_meal(&self, user_id: Uuid, meal_id: Uuid) -> AppResult<Option<Meal>> {
        let query = format!("SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&query)
            .bind(meal_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_meal).transpose()
    }

    /// List the user's meals, optionally for one day
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_meals(
        &self,
        user_id: Uuid,
        date: Option<NaiveDate>,
        limit: i64,
    ) -> AppResult<Vec<Meal>> {
        let query = format!(
            r"
            SELECT {MEAL_COLUMNS} FROM meals
            WHERE user_id = $1 AND ($2 IS NULL OR date = $2)
            ORDER BY date DESC, created_at DESC
            LIMIT $3
            "
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(date)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_meal).collect()
    }

    /// Totals for one day
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn nutrition_summary(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<NutritionSummary> {
        let query = format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE user_id = $1 AND date = $2"
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        let meals = rows
            .iter()
            .map(Self::row_to_meal)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(NutritionSummary::from_meals(Some(date), &meals))
    }

    /// Overwrite a meal owned by its `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_meal(&self, meal: &Meal) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE meals SET
                name = $3,
                meal_type = $4,
                calories = $5,
                protein_g = $6,
                carbs_g = $7,
                fat_g = $8,
                date = $9,
                updated_at = $10
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(meal.id.to_string())
        .bind(meal.user_id.to_string())
        .bind(&meal.name)
        .bind(meal.meal_type.as_str())
        .bind(i64::from(meal.calories))
        .bind(meal.protein_g)
        .bind(meal.carbs_g)
        .bind(meal.fat_g)
        .bind(meal.date)
        .bind(meal.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete one of the user's meals
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(meal_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_meal(row: &SqliteRow) -> AppResult<Meal> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let meal_type: String = row.try_get("meal_type")?;
        let calories: i64 = row.try_get("calories")?;

        Ok(Meal {
            id: parse_uuid(&id, "meals.id")?,
            user_id: parse_uuid(&user_id, "meals.user_id")?,
            name: row.try_get("name")?,
            meal_type: parse_enum(&meal_type, "meals.meal_type")?,
            calories: to_u32(calories, "meals.calories")?,
            protein_g: row.try_get("protein_g")?,
            carbs_g: row.try_get("carbs_g")?,
            fat_g: row.try_get("fat_g")?,
            date: row.try_get("date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
