// ABOUTME: Session store that drives the reducer from API calls and durable storage
// ABOUTME: Publishes state through a watch channel and discards stale settlements per transition family
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Session store
//!
//! Each asynchronous operation dispatches its `Pending` action before the
//! first `.await`, then settles with `Fulfilled` or `Rejected`. Every
//! `Pending` takes a new sequence number for its family; a settlement whose
//! number is no longer the latest is dropped, so the most recently started
//! request wins. Fetch and update settlements are also dropped when the
//! token they were sent with is no longer the current one.
//!
//! Logout supersedes every in-flight request.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::api::{AuthApi, Credentials, Registration};
use super::session::{reduce, SessionAction, SessionState, Transition, TransitionFamily};
use super::storage::{StoredSession, TokenStorage};
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::models::{AuthPayload, Identity, IdentityPatch};

/// Observable client session
pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn TokenStorage>,
    state: watch::Sender<SessionState>,
    sequences: [AtomicU64; 4],
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.borrow())
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store, restoring the token from `storage`
    ///
    /// A restored token is unverified: the identity stays absent and
    /// `is_authenticated` false until `fetch_identity` succeeds.
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn TokenStorage>) -> Self {
        let initial = match storage.load() {
            Ok(Some(stored)) => {
                debug!("Restored session token from storage");
                SessionState::with_token(stored.token)
            }
            Ok(None) => SessionState::default(),
            Err(e) => {
                warn!(error = %e, "Failed to load stored session, starting signed out");
                SessionState::default()
            }
        };

        Self {
            api,
            storage,
            state: watch::Sender::new(initial),
            sequences: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every applied action
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Apply an action directly
    pub fn dispatch(&self, action: SessionAction) {
        self.state.send_modify(|state| reduce(state, action));
    }

    /// Exchange credentials for a session
    ///
    /// # Errors
    ///
    /// Returns the API error; its message is also recorded in `error`
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Identity> {
        let credentials = Credentials {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let seq = self.begin(TransitionFamily::Login);
        let result = self.api.login(&credentials).await;
        self.settle_credentials(TransitionFamily::Login, seq, result)
    }

    /// Create an account and sign in as it
    ///
    /// # Errors
    ///
    /// Returns the API error; its message is also recorded in `error`
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<Identity> {
        let registration = Registration {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let seq = self.begin(TransitionFamily::Register);
        let result = self.api.register(&registration).await;
        self.settle_credentials(TransitionFamily::Register, seq, result)
    }

    /// Verify the held token by loading the profile
    ///
    /// A rejection clears the token here and in storage.
    ///
    /// # Errors
    ///
    /// Returns the API error, or an auth error when no token is held
    pub async fn fetch_identity(&self) -> AppResult<Identity> {
        let seq = self.begin(TransitionFamily::FetchIdentity);
        self.complete_fetch_identity(seq).await
    }

    /// Dispatch `FetchIdentity` pending only if `should_fetch` holds for the
    /// current state, atomically with the check
    ///
    /// Returns the sequence number to pass to [`Self::complete_fetch_identity`].
    pub fn begin_fetch_identity_if(
        &self,
        should_fetch: impl FnOnce(&SessionState) -> bool,
    ) -> Option<u64> {
        let mut started = None;
        self.state.send_if_modified(|state| {
            if !should_fetch(state) {
                return false;
            }
            started = Some(self.next_sequence(TransitionFamily::FetchIdentity));
            reduce(state, SessionAction::FetchIdentity(Transition::Pending));
            true
        });
        started
    }

    /// Run the profile request for an already dispatched `FetchIdentity` pending
    ///
    /// # Errors
    ///
    /// Returns the API error, or an auth error when no token is held
    pub async fn complete_fetch_identity(&self, seq: u64) -> AppResult<Identity> {
        let family = TransitionFamily::FetchIdentity;
        let Some(token) = self.current_token() else {
            let error = AppError::auth_required(error_messages::MISSING_TOKEN);
            self.settle(
                family,
                seq,
                SessionAction::FetchIdentity(Transition::Rejected(error.message.clone())),
            );
            return Err(error);
        };

        match self.api.fetch_identity(&token).await {
            Ok(identity) => {
                let applied = self.settle_for_token(
                    family,
                    seq,
                    &token,
                    SessionAction::FetchIdentity(Transition::Fulfilled(identity.clone())),
                );
                if applied {
                    self.persist(&token, &identity);
                }
                Ok(identity)
            }
            Err(e) => {
                let applied = self.settle_for_token(
                    family,
                    seq,
                    &token,
                    SessionAction::FetchIdentity(Transition::Rejected(e.message.clone())),
                );
                if applied {
                    info!(code = %e.code, "Identity verification failed, session cleared");
                    self.clear_storage();
                }
                Err(e)
            }
        }
    }

    /// Send a profile patch
    ///
    /// A rejection leaves the session and cached identity untouched.
    ///
    /// # Errors
    ///
    /// Returns the API error, or an auth error when no token is held
    pub async fn update_identity(&self, patch: &IdentityPatch) -> AppResult<Identity> {
        let family = TransitionFamily::UpdateIdentity;
        let seq = self.begin(family);

        let Some(token) = self.current_token() else {
            let error = AppError::auth_required(error_messages::MISSING_TOKEN);
            self.settle(
                family,
                seq,
                SessionAction::UpdateIdentity(Transition::Rejected(error.message.clone())),
            );
            return Err(error);
        };

        match self.api.update_identity(&token, patch).await {
            Ok(identity) => {
                let applied = self.settle_for_token(
                    family,
                    seq,
                    &token,
                    SessionAction::UpdateIdentity(Transition::Fulfilled(identity.clone())),
                );
                if applied {
                    self.persist(&token, &identity);
                }
                Ok(identity)
            }
            Err(e) => {
                self.settle_for_token(
                    family,
                    seq,
                    &token,
                    SessionAction::UpdateIdentity(Transition::Rejected(e.message.clone())),
                );
                Err(e)
            }
        }
    }

    /// Sign out locally and forget the stored session
    pub fn logout(&self) {
        self.state.send_modify(|state| {
            for sequence in &self.sequences {
                sequence.fetch_add(1, Ordering::SeqCst);
            }
            reduce(state, SessionAction::Logout);
            state.is_loading = false;
        });
        self.clear_storage();
    }

    /// Dismiss the last error
    pub fn clear_error(&self) {
        self.dispatch(SessionAction::ClearError);
    }

    fn current_token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    fn next_sequence(&self, family: TransitionFamily) -> u64 {
        self.sequences[family.index()].fetch_add(1, Ordering::SeqCst) + 1
    }

    fn begin(&self, family: TransitionFamily) -> u64 {
        let mut seq = 0;
        self.state.send_modify(|state| {
            seq = self.next_sequence(family);
            reduce(state, pending(family));
        });
        seq
    }

    /// Apply a settlement if it belongs to the latest request of its family
    fn settle(&self, family: TransitionFamily, seq: u64, action: SessionAction) -> bool {
        self.settle_when(family, seq, action, |_| true)
    }

    fn settle_for_token(
        &self,
        family: TransitionFamily,
        seq: u64,
        token: &str,
        action: SessionAction,
    ) -> bool {
        self.settle_when(family, seq, action, |state| {
            state.token.as_deref() == Some(token)
        })
    }

    fn settle_when(
        &self,
        family: TransitionFamily,
        seq: u64,
        action: SessionAction,
        still_current: impl FnOnce(&SessionState) -> bool,
    ) -> bool {
        self.state.send_if_modified(|state| {
            let latest = self.sequences[family.index()].load(Ordering::SeqCst);
            if latest != seq || !still_current(state) {
                debug!(?family, seq, latest, "Discarding stale settlement");
                return false;
            }
            reduce(state, action);
            true
        })
    }

    fn settle_credentials(
        &self,
        family: TransitionFamily,
        seq: u64,
        result: AppResult<AuthPayload>,
    ) -> AppResult<Identity> {
        let wrap = |transition: Transition<AuthPayload>| match family {
            TransitionFamily::Register => SessionAction::Register(transition),
            _ => SessionAction::Login(transition),
        };

        match result {
            Ok(payload) => {
                let applied = self.settle(family, seq, wrap(Transition::Fulfilled(payload.clone())));
                if applied {
                    info!(user_id = %payload.user.id, "Signed in");
                    self.persist(&payload.token, &payload.user);
                }
                Ok(payload.user)
            }
            Err(e) => {
                self.settle(family, seq, wrap(Transition::Rejected(e.message.clone())));
                Err(e)
            }
        }
    }

    fn persist(&self, token: &str, identity: &Identity) {
        let stored = StoredSession {
            token: token.to_owned(),
            identity: Some(identity.clone()),
        };
        if let Err(e) = self.storage.save(&stored) {
            warn!(error = %e, "Failed to persist session");
        }
    }

    fn clear_storage(&self) {
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "Failed to clear stored session");
        }
    }
}

const fn pending(family: TransitionFamily) -> SessionAction {
    match family {
        TransitionFamily::Login => SessionAction::Login(Transition::Pending),
        TransitionFamily::Register => SessionAction::Register(Transition::Pending),
        TransitionFamily::FetchIdentity => SessionAction::FetchIdentity(Transition::Pending),
        TransitionFamily::UpdateIdentity => SessionAction::UpdateIdentity(Transition::Pending),
    }
}
