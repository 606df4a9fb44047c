// ABOUTME: Headless session client for the FitTrack API
// ABOUTME: Groups the session reducer, durable storage, HTTP API, session store and route guard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Client-side session handling
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use fittrack_server::client::{
//!     ClientConfig, FileTokenStorage, HttpAuthApi, RouteGuard, SessionStore,
//! };
//! use fittrack_server::errors::AppResult;
//!
//! # async fn example() -> AppResult<()> {
//! let api = HttpAuthApi::new(&ClientConfig::from_env())?;
//! let storage = FileTokenStorage::default_location()?;
//! let store = Arc::new(SessionStore::new(Arc::new(api), Arc::new(storage)));
//!
//! store.login("a@x.com", "secret1").await?;
//! let decision = RouteGuard::new(Arc::clone(&store)).check("/dashboard").await;
//! println!("{decision:?}");
//! # Ok(())
//! # }
//! ```

/// Authentication API client
pub mod api;
/// Protected-view guard
pub mod guard;
/// Session state and reducer
pub mod session;
/// Session store
pub mod store;
/// Durable token storage
pub mod storage;

pub use api::{AuthApi, ClientConfig, Credentials, HttpAuthApi, Registration};
pub use guard::{decide, GuardDecision, RouteGuard};
pub use session::{reduce, SessionAction, SessionState, Transition, TransitionFamily};
pub use storage::{FileTokenStorage, MemoryTokenStorage, StoredSession, TokenStorage};
pub use store::SessionStore;
