// ABOUTME: Admin user management route handlers
// ABOUTME: Handles user listing, admin capability changes and account deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use tracing::{info, warn};

use crate::{
    errors::{AppError, AppResult},
    middleware::AuthResult,
    models::User,
    resources::ServerResources,
    routes::{list_limit, parse_id},
};

use super::types::{DeleteUserResponse, ListUsersQuery, SetAdminRequest, UserListResponse};

/// Handle user listing
#[tracing::instrument(skip(resources, auth, params), fields(route = "admin_list_users", admin_id = %auth.user_id))]
pub(super) async fn handle_list_users(
    State(resources): State<Arc<ServerResources>>,
    Extension(auth): Extension<AuthResult>,
    Query(params): Query<ListUsersQuery>,
) -> AppResult<Response> {
    let database = resources.database()?;
    let limit = list_limit(params.limit);
    let offset = params.offset.unwrap_or(0).max(0);

    let users = database.list_users(limit, offset).await?;
    let total = database.get_user_count().await?;

    info!(count = users.len(), total, "Listed users");

    Ok((
        StatusCode::OK,
        Json(UserListResponse {
            users: users.iter().map(User::to_identity).collect(),
            total,
        }),
    )
        .into_response())
}

/// Grant or revoke the admin capability; an admin cannot demote themself
#[tracing::instrument(skip(resources, auth, request), fields(route = "admin_set_admin", admin_id = %auth.user_id))]
pub(super) async fn handle_set_admin(
    State(resources): State<Arc<ServerResources>>,
    Extension(auth): Extension<AuthResult>,
    Path(user_id): Path<String>,
    Json(request): Json<SetAdminRequest>,
) -> AppResult<Response> {
    let user_id = parse_id(&user_id, "user")?;
    if user_id == auth.user_id && !request.is_admin {
        return Err(AppError::invalid_input(
            "Admins cannot revoke their own admin capability",
        ));
    }

    let database = resources.database()?;
    database.set_user_admin(user_id, request.is_admin).await?;
    let user = database
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    info!(user_id = %user_id, is_admin = request.is_admin, "Admin capability changed");

    Ok((StatusCode::OK, Json(user.to_identity())).into_response())
}

/// Permanently delete a user and, through cascading foreign keys, their data
#[tracing::instrument(skip(resources, auth), fields(route = "admin_delete_user", admin_id = %auth.user_id))]
pub(super) async fn handle_delete_user(
    State(resources): State<Arc<ServerResources>>,
    Extension(auth): Extension<AuthResult>,
    Path(user_id): Path<String>,
) -> AppResult<Response> {
    let user_id = parse_id(&user_id, "user")?;
    if user_id == auth.user_id {
        return Err(AppError::invalid_input("Admins cannot delete their own account"));
    }

    let database = resources.database()?;
    let user = database.get_user(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "User not found for deletion");
        AppError::not_found("User")
    })?;

    database.delete_user(user_id).await?;
    info!(user_id = %user_id, "User deleted");

    Ok((
        StatusCode::OK,
        Json(DeleteUserResponse {
            id: user_id.to_string(),
            email: user.email,
            message: "User deleted successfully".to_owned(),
        }),
    )
        .into_response())
}
