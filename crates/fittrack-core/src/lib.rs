// ABOUTME: Shared types for the FitTrack server and its session client
// ABOUTME: Exposes the unified error type and the Identity model used on both sides of the API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

#![deny(unsafe_code)]

//! # FitTrack Core
//!
//! Types that cross the HTTP boundary. The server builds responses from
//! them and the client deserializes them, so both sides agree on one shape.

/// Unified error handling with stable error codes
pub mod errors;

/// Identity and profile data models
pub mod models;
