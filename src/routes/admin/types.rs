// ABOUTME: Request and response types for admin user management routes
// ABOUTME: Defines DTOs for user listing and admin capability changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

use serde::{Deserialize, Serialize};

use crate::models::Identity;

/// Pagination for the user listing
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    /// Maximum number of users to return
    pub limit: Option<i64>,
    /// Number of users to skip
    pub offset: Option<i64>,
}

/// User listing
#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    /// One page of identities, newest first
    pub users: Vec<Identity>,
    /// Total number of registered users
    pub total: i64,
}

/// Grant or revoke the admin capability
#[derive(Debug, Deserialize)]
pub struct SetAdminRequest {
    /// New value of `is_admin`
    pub is_admin: bool,
}

/// Outcome of a user deletion
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    /// ID of the deleted user
    pub id: String,
    /// Email of the deleted user
    pub email: String,
    /// Confirmation message
    pub message: String,
}
