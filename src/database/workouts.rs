// ABOUTME: Workout log database operations
// ABOUTME: CRUD for a user's training sessions with exercises stored as a JSON column
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{parse_enum, parse_uuid, to_u32, Database};
use crate::errors::AppResult;
use crate::models::{Exercise, Workout};

const WORKOUT_COLUMNS: &str = "id, user_id, name, workout_type, duration_minutes, \
                               calories_burned, exercises, notes, date, created_at, updated_at";

/// Optional filters for listing workouts
#[derive(Debug, Clone, Default)]
pub struct WorkoutFilter {
    /// Earliest day (inclusive)
    pub from: Option<NaiveDate>,
    /// Latest day (inclusive)
    pub to: Option<NaiveDate>,
    /// Maximum rows
    pub limit: i64,
}

impl Database {
    /// Insert a workout
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails
    pub async fn create_workout(&self, workout: &Workout) -> AppResult<Uuid> {
        let exercises = serde_json::to_string(&workout.exercises)?;

        sqlx::query(
            r"
            INSERT INTO workouts (
                id, user_id, name, workout_type, duration_minutes, calories_burned,
                exercises, notes, date, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user_id.to_string())
        .bind(&workout.name)
        .bind(workout.workout_type.as_str())
        .bind(i64::from(workout.duration_minutes))
        .bind(workout.calories_burned.map(i64::from))
        .bind(exercises)
        .bind(&workout.notes)
        .bind(workout.date)
        .bind(workout.created_at)
        .bind(workout.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(workout.id)
    }

    /// Get one of the user's workouts
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_workout(&self, user_id: Uuid, workout_id: Uuid) -> AppResult<Option<Workout>> {
        let query = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&query)
            .bind(workout_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_workout).transpose()
    }

    /// List the user's workouts, most recent day first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_workouts(
        &self,
        user_id: Uuid,
        filter: &WorkoutFilter,
    ) -> AppResult<Vec<Workout>> {
        let query = format!(
            r"
            SELECT {WORKOUT_COLUMNS} FROM workouts
            WHERE user_id = $1
              AND ($2 IS NULL OR date >= $2)
              AND ($3 IS NULL OR date <= $3)
            ORDER BY date DESC, created_at DESC
            LIMIT $4
            "
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_workout).collect()
    }

    /// Overwrite a workout owned by its `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the update fails
    pub async fn update_workout(&self, workout: &Workout) -> AppResult<bool> {
        let exercises = serde_json::to_string(&workout.exercises)?;

        let result = sqlx::query(
            r"
            UPDATE workouts SET
                name = $3,
                workout_type = $4,
                duration_minutes = $5,
                calories_burned = $6,
                exercises = $7,
                notes = $8,
                date = $9,
                updated_at = $10
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.user_id.to_string())
        .bind(&workout.name)
        .bind(workout.workout_type.as_str())
        .bind(i64::from(workout.duration_minutes))
        .bind(workout.calories_burned.map(i64::from))
        .bind(exercises)
        .bind(&workout.notes)
        .bind(workout.date)
        .bind(workout.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete one of the user's workouts
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_workout(row: &SqliteRow) -> AppResult<Workout> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let workout_type: String = row.try_get("workout_type")?;
        let duration: i64 = row.try_get("duration_minutes")?;
        let calories: Option<i64> = row.try_get("calories_burned")?;
        let exercises: String = row.try_get("exercises")?;

        Ok(Workout {
            id: parse_uuid(&id, "workouts.id")?,
            user_id: parse_uuid(&user_id, "workouts.user_id")?,
            name: row.try_get("name")?,
            workout_type: parse_enum(&workout_type, "workouts.workout_type")?,
            duration_minutes: to_u32(duration, "workouts.duration_minutes")?,
            calories_burned: calories
                .map(|c| to_u32(c, "workouts.calories_burned"))
                .transpose()?,
            exercises: serde_json::from_str::<Vec<Exercise>>(&exercises)?,
            notes: row.try_get("notes")?,
            date: row.try_get("date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
