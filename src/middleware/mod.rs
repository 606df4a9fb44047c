// ABOUTME: HTTP middleware for request authentication and authorization
// ABOUTME: Re-exports the Auth Gate, Admin Gate and guard-chain helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

/// Bearer-token authentication and admin authorization
pub mod auth;

pub use auth::{
    extract_bearer_token, require_admin, require_auth, with_guards, AuthMiddleware, AuthResult,
    Guard, IdentityResolver,
};
