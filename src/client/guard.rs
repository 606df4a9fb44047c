// ABOUTME: Route guard deciding whether a protected view renders, waits, verifies or redirects
// ABOUTME: Starts at most one identity fetch for a held but unverified token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

use std::sync::Arc;

use tracing::debug;

use super::session::SessionState;
use super::store::SessionStore;
use crate::constants::client_paths;

/// What a protected view should do for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the protected content
    Render,
    /// Show a loading indicator
    Loading,
    /// A token is held but unverified; fetch the identity
    FetchIdentity,
    /// Navigate to `to`, remembering `from` for the post-login return
    Redirect {
        /// Login view
        to: String,
        /// Location that was requested
        from: String,
    },
}

/// Decide for `state` at `location`
#[must_use]
pub fn decide(state: &SessionState, location: &str) -> GuardDecision {
    if state.is_loading {
        GuardDecision::Loading
    } else if state.token.is_some() && state.identity.is_none() {
        GuardDecision::FetchIdentity
    } else if state.is_authenticated {
        GuardDecision::Render
    } else {
        GuardDecision::Redirect {
            to: client_paths::LOGIN.to_owned(),
            from: location.to_owned(),
        }
    }
}

/// Guard bound to a session store
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: Arc<SessionStore>,
}

impl RouteGuard {
    /// Guard over `store`
    #[must_use]
    pub const fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Evaluate once without waiting
    ///
    /// When verification is needed the fetch is started in the background
    /// and `Loading` is returned. The pending action is dispatched together
    /// with the check, so repeated renders before settlement see
    /// `is_loading` and start nothing further. Must be called within a Tokio
    /// runtime.
    #[must_use]
    pub fn render(&self, location: &str) -> GuardDecision {
        let decision = decide(&self.store.state(), location);
        if decision != GuardDecision::FetchIdentity {
            return decision;
        }

        let started = self.store.begin_fetch_identity_if(|state| {
            decide(state, location) == GuardDecision::FetchIdentity
        });
        if let Some(seq) = started {
            debug!(location, "Verifying stored token");
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                if let Err(e) = store.complete_fetch_identity(seq).await {
                    debug!(error = %e, "Stored token verification failed");
                }
            });
        }
        GuardDecision::Loading
    }

    /// Evaluate until the decision no longer is `Loading`
    pub async fn check(&self, location: &str) -> GuardDecision {
        let mut changes = self.store.subscribe();
        loop {
            let decision = self.render(location);
            if decision != GuardDecision::Loading {
                return decision;
            }
            if changes.changed().await.is_err() {
                return decision;
            }
        }
    }
}
