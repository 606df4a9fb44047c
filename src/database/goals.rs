// ABOUTME: Goal database operations
// ABOUTME: CRUD for personal fitness goals with optional status filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{parse_enum, parse_uuid, Database};
use crate::errors::AppResult;
use crate::models::{Goal, GoalStatus};

const GOAL_COLUMNS: &str = "id, user_id, title, description, goal_type, target_value, \
                            current_value, unit, deadline, status, created_at, updated_at";

impl Database {
    /// Insert a goal
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_goal(&self, goal: &Goal) -> AppResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO goals (
                id, user_id, title, description, goal_type, target_value,
                current_value, unit, deadline, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(goal.id.to_string())
        .bind(goal.user_id.to_string())
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.goal_type.as_str())
        .bind(goal.target_value)
        .bind(goal.current_value)
        .bind(&goal.unit)
        .bind(goal.deadline)
        .bind(goal.status.as_str())
        .bind(goal.created_at)
        .bind(goal.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(goal.id)
    }

    /// Get one of the user's goals
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_goal(&self, user_id: Uuid, goal_id: Uuid) -> AppResult<Option<Goal>> {
        let query = format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&query)
            .bind(goal_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_goal).transpose()
    }

    /// List the user's goals, optionally restricted to one status
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_goals(
        &self,
        user_id: Uuid,
        status: Option<GoalStatus>,
    ) -> AppResult<Vec<Goal>> {
        let query = format!(
            r"
            SELECT {GOAL_COLUMNS} FROM goals
            WHERE user_id = $1 AND ($2 IS NULL OR status = $2)
            ORDER BY created_at DESC
            "
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(status.map(GoalStatus::as_str))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_goal).collect()
    }

    /// Overwrite a goal owned by its `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn update_goal(&self, goal: &Goal) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE goals SET
                title = $3,
                description = $4,
                goal_type = $5,
                target_value = $6,
                current_value = $7,
                unit = $8,
                deadline = $9,
                status = $10,
                updated_at = $11
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(goal.id.to_string())
        .bind(goal.user_id.to_string())
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.goal_type.as_str())
        .bind(goal.target_value)
        .bind(goal.current_value)
        .bind(&goal.unit)
        .bind(goal.deadline)
        .bind(goal.status.as_str())
        .bind(goal.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete one of the user's goals
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_goal(&self, user_id: Uuid, goal_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(goal_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    fn row_to_goal(row: &SqliteRow) -> AppResult<Goal> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let goal_type: String = row.try_get("goal_type")?;
        let status: String = row.try_get("status")?;

        Ok(Goal {
            id: parse_uuid(&id, "goals.id")?,
            user_id: parse_uuid(&user_id, "goals.user_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            goal_type: parse_enum(&goal_type, "goals.goal_type")?,
            target_value: row.try_get("target_value")?,
            current_value: row.try_get("current_value")?,
            unit: row.try_get("unit")?,
            deadline: row.try_get("deadline")?,
            status: parse_enum(&status, "goals.status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
