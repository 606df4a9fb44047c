// ABOUTME: Main library entry point for the FitTrack fitness tracking platform
// ABOUTME: Provides the REST API server and the headless session client that consumes it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

#![deny(unsafe_code)]

//! # FitTrack Server
//!
//! A REST backend for logging workouts, meals and goals, together with the
//! client-side session machinery an application uses to talk to it.
//!
//! ## Features
//!
//! - **Token authentication**: HS256 bearer tokens issued at login and registration
//! - **Guard chain**: explicit, ordered Auth Gate and Admin Gate middleware
//! - **Degraded mode**: read endpoints serve `mock` fallbacks while the store is down
//! - **Session client**: pure reducer, durable token storage and a route guard
//!
//! ## Architecture
//!
//! - **Auth**: token codec (`AuthManager`)
//! - **Middleware**: Auth Gate / Admin Gate
//! - **Database**: sqlx-backed SQLite store
//! - **Routes**: thin axum handlers per domain
//! - **Client**: session store, HTTP API and route guard
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use fittrack_server::config::ServerConfig;
//! use fittrack_server::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("FitTrack server configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Token issuing and verification
pub mod auth;

/// Headless client: session reducer, storage, HTTP API and route guard
pub mod client;

/// Configuration loaded from the environment
pub mod config;

/// Application constants and defaults
pub mod constants;

/// SQLite persistence layer
pub mod database;

/// Unified error handling
pub mod errors;

/// Health check payloads
pub mod health;

/// Tracing subscriber setup
pub mod logging;

/// Authentication and authorization middleware
pub mod middleware;

/// Persisted data models
pub mod models;

/// Workout and nutrition plan generation
pub mod plans;

/// Process-scoped shared resources
pub mod resources;

/// HTTP route groups
pub mod routes;

/// Server assembly and lifecycle
pub mod server;
