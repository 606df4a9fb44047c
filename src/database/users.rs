// ABOUTME: User management database operations
// ABOUTME: Handles user registration, lookup by id or email, profile updates and admin listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::{parse_enum, parse_uuid, to_u32, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{FitnessLevel, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, age, height_cm, weight_kg, \
                            fitness_level, is_admin, created_at, updated_at";

impl Database {
    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is already in use
    /// - Database operation fails
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict("Email already in use by another user"));
        }

        sqlx::query(
            r"
            INSERT INTO users (
                id, name, email, password_hash, age, height_cm, weight_kg,
                fitness_level, is_admin, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.age.map(i64::from))
        .bind(user.height_cm)
        .bind(user.weight_kg)
        .bind(user.fitness_level.map(FitnessLevel::as_str))
        .bind(user.is_admin)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        self.get_user_by_field("id", &user_id.to_string()).await
    }

    /// Get a user by email (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.get_user_by_field("email", &email.trim().to_lowercase())
            .await
    }

    /// Internal implementation for getting a user
    async fn get_user_by_field(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE {field} = $1");

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Persist every mutable field of an existing user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user does not exist
    /// - The new email belongs to another user
    /// - Database operation fails
    pub async fn update_user(&self, user: &User) -> AppResult<User> {
        if let Some(existing) = self.get_user_by_email(&user.email).await? {
            if existing.id != user.id {
                return Err(AppError::conflict("Email already in use by another user"));
            }
        }

        let result = sqlx::query(
            r"
            UPDATE users SET
                name = $2,
                email = $3,
                password_hash = $4,
                age = $5,
                height_cm = $6,
                weight_kg = $7,
                fitness_level = $8,
                is_admin = $9,
                updated_at = $10
            WHERE id = $1
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.age.map(i64::from))
        .bind(user.height_cm)
        .bind(user.weight_kg)
        .bind(user.fitness_level.map(FitnessLevel::as_str))
        .bind(user.is_admin)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {}", user.id)));
        }

        self.get_user(user.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {}", user.id)))
    }

    /// Grant or revoke the administrator capability
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails
    pub async fn set_user_admin(&self, user_id: Uuid, is_admin: bool) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET is_admin = $2, updated_at = $3 WHERE id = $1")
            .bind(user_id.to_string())
            .bind(is_admin)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id}")));
        }
        Ok(())
    }

    /// Delete a user and, through cascading keys, everything they own
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List users, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_users(&self, limit: i64, offset: i64) -> AppResult<Vec<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Count registered users
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_count(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    /// Convert a database row to a User struct
    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let id: String = row.try_get("id")?;
        let age: Option<i64> = row.try_get("age")?;
        let fitness_level: Option<String> = row.try_get("fitness_level")?;

        Ok(User {
            id: parse_uuid(&id, "users.id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            age: age.map(|a| to_u32(a, "users.age")).transpose()?,
            height_cm: row.try_get("height_cm")?,
            weight_kg: row.try_get("weight_kg")?,
            fitness_level: fitness_level
                .as_deref()
                .map(|raw| parse_enum(raw, "users.fitness_level"))
                .transpose()?,
            is_admin: row.try_get("is_admin")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
