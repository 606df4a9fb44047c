// ABOUTME: Admin API route definitions for user management
// ABOUTME: Composes the Auth Gate and Admin Gate in front of every admin handler
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Admin routes
//!
//! Every route here runs behind the guard chain
//! `[Guard::Authenticated, Guard::Admin]`: the Auth Gate attaches the
//! identity, then the Admin Gate rejects non-admins with 403.

mod types;
mod users;

pub use types::{DeleteUserResponse, ListUsersQuery, SetAdminRequest, UserListResponse};

use std::sync::Arc;

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::middleware::{with_guards, Guard};
use crate::resources::ServerResources;

/// Admin route group
pub struct AdminRoutes;

impl AdminRoutes {
    /// Create all admin routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let router = Router::new()
            .route("/api/admin/users", get(users::handle_list_users))
            .route("/api/admin/users/:id", delete(users::handle_delete_user))
            .route("/api/admin/users/:id/admin", put(users::handle_set_admin));

        with_guards(router, &resources, &[Guard::Authenticated, Guard::Admin])
            .with_state(resources)
    }
}
