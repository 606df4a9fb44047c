// ABOUTME: Client session state and its pure reducer
// ABOUTME: Models login, register, identity fetch/update transitions plus logout and error clearing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Session reducer
//!
//! [`reduce`] is the only way a [`SessionState`] changes. It performs no I/O;
//! persistence and network calls live in
//! [`SessionStore`](crate::client::SessionStore).
//!
//! Invariant: `is_authenticated` implies both `identity` and `token` are
//! present.

use serde::{Deserialize, Serialize};

use crate::models::{AuthPayload, Identity};

/// Client-held authentication state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Cached identity, absent until verified
    pub identity: Option<Identity>,
    /// Bearer token
    pub token: Option<String>,
    /// Identity and token are present and the last verification succeeded
    pub is_authenticated: bool,
    /// A transition is in flight
    pub is_loading: bool,
    /// Message of the last rejected transition
    pub error: Option<String>,
}

impl SessionState {
    /// Session restored from durable storage: the token only, pending verification
    #[must_use]
    pub fn with_token(token: String) -> Self {
        Self {
            token: Some(token),
            ..Self::default()
        }
    }
}

/// Outcome of one asynchronous request
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<T> {
    /// Request dispatched
    Pending,
    /// Request succeeded
    Fulfilled(T),
    /// Request failed with a user-facing message
    Rejected(String),
}

/// Asynchronous transition families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionFamily {
    /// Credentials exchange
    Login,
    /// Account creation
    Register,
    /// Profile read
    FetchIdentity,
    /// Profile write
    UpdateIdentity,
}

impl TransitionFamily {
    /// Stable index into per-family tables
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Login => 0,
            Self::Register => 1,
            Self::FetchIdentity => 2,
            Self::UpdateIdentity => 3,
        }
    }
}

/// Everything that can happen to a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// `login(credentials)`
    Login(Transition<AuthPayload>),
    /// `register(data)`
    Register(Transition<AuthPayload>),
    /// `fetchIdentity()`
    FetchIdentity(Transition<Identity>),
    /// `updateIdentity(patch)`
    UpdateIdentity(Transition<Identity>),
    /// Drop identity, token and error
    Logout,
    /// Drop the error only
    ClearError,
}

/// Apply `action` to `state`
pub fn reduce(state: &mut SessionState, action: SessionAction) {
    match action {
        SessionAction::Login(transition) | SessionAction::Register(transition) => {
            reduce_credentials(state, transition);
        }
        SessionAction::FetchIdentity(transition) => match transition {
            Transition::Pending => state.is_loading = true,
            Transition::Fulfilled(identity) => {
                state.identity = Some(identity);
                state.is_authenticated = state.token.is_some();
                state.is_loading = false;
            }
            Transition::Rejected(message) => {
                state.is_loading = false;
                state.error = Some(message);
                if state.token.is_some() {
                    state.token = None;
                    state.identity = None;
                    state.is_authenticated = false;
                }
            }
        },
        SessionAction::UpdateIdentity(transition) => match transition {
            Transition::Pending => state.is_loading = true,
            Transition::Fulfilled(identity) => {
                state.identity = Some(identity);
                state.is_loading = false;
            }
            Transition::Rejected(message) => {
                state.is_loading = false;
                state.error = Some(message);
            }
        },
        SessionAction::Logout => {
            state.identity = None;
            state.token = None;
            state.is_authenticated = false;
            state.error = None;
        }
        SessionAction::ClearError => state.error = None,
    }
}

/// Shared shape of `login` and `register`
fn reduce_credentials(state: &mut SessionState, transition: Transition<AuthPayload>) {
    match transition {
        Transition::Pending => {
            state.is_loading = true;
            state.error = None;
        }
        Transition::Fulfilled(AuthPayload { user, token }) => {
            state.identity = Some(user);
            state.token = Some(token);
            state.is_authenticated = true;
            state.is_loading = false;
        }
        Transition::Rejected(message) => {
            state.is_loading = false;
            state.error = Some(message);
        }
    }
}
