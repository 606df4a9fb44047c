// ABOUTME: Request and response types for user account routes
// ABOUTME: Defines DTOs for registration and login endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! User account request and response types
//!
//! Register and login both answer with [`AuthPayload`](crate::models::AuthPayload);
//! the profile endpoints exchange [`Identity`](crate::models::Identity) and
//! [`IdentityPatch`](crate::models::IdentityPatch) directly.

use serde::Deserialize;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// User's email address
    #[serde(default)]
    pub email: String,
    /// User's password (will be hashed)
    #[serde(default)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// User's email address
    #[serde(default)]
    pub email: String,
    /// User's password
    #[serde(default)]
    pub password: String,
}
