// ABOUTME: Scripted AuthApi double for session store and route guard tests
// ABOUTME: Replays queued results per endpoint, optionally holding a response until released
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fittrack_server::client::{AuthApi, Credentials, Registration};
use fittrack_server::errors::{AppError, AppResult};
use fittrack_server::models::{AuthPayload, Identity, IdentityPatch};
use tokio::sync::Notify;
use uuid::Uuid;

struct Step<T> {
    result: AppResult<T>,
    gate: Option<Arc<Notify>>,
}

type Queue<T> = Mutex<VecDeque<Step<T>>>;

#[derive(Default)]
pub struct ScriptedApi {
    logins: Queue<AuthPayload>,
    registrations: Queue<AuthPayload>,
    fetches: Queue<Identity>,
    updates: Queue<Identity>,
    fetch_calls: AtomicUsize,
    tokens_seen: Mutex<Vec<String>>,
}

fn push<T>(queue: &Queue<T>, result: AppResult<T>, gated: bool) -> Arc<Notify> {
    let gate = Arc::new(Notify::new());
    queue.lock().unwrap().push_back(Step {
        result,
        gate: gated.then(|| Arc::clone(&gate)),
    });
    gate
}

async fn play<T>(queue: &Queue<T>) -> AppResult<T> {
    let step = queue.lock().unwrap().pop_front();
    let Some(step) = step else {
        return Err(AppError::internal("Unscripted API call"));
    };
    if let Some(gate) = step.gate {
        gate.notified().await;
    }
    step.result
}

impl ScriptedApi {
    pub fn push_login(&self, result: AppResult<AuthPayload>) {
        push(&self.logins, result, false);
    }

    /// Queue a login that only answers once the returned gate is notified
    pub fn push_login_gated(&self, result: AppResult<AuthPayload>) -> Arc<Notify> {
        push(&self.logins, result, true)
    }

    pub fn push_register(&self, result: AppResult<AuthPayload>) {
        push(&self.registrations, result, false);
    }

    pub fn push_fetch(&self, result: AppResult<Identity>) {
        push(&self.fetches, result, false);
    }

    pub fn push_fetch_gated(&self, result: AppResult<Identity>) -> Arc<Notify> {
        push(&self.fetches, result, true)
    }

    pub fn push_update(&self, result: AppResult<Identity>) {
        push(&self.updates, result, false);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for ScriptedApi {
    async fn login(&self, _credentials: &Credentials) -> AppResult<AuthPayload> {
        play(&self.logins).await
    }

    async fn register(&self, _registration: &Registration) -> AppResult<AuthPayload> {
        play(&self.registrations).await
    }

    async fn fetch_identity(&self, token: &str) -> AppResult<Identity> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.tokens_seen.lock().unwrap().push(token.to_owned());
        play(&self.fetches).await
    }

    async fn update_identity(&self, token: &str, _patch: &IdentityPatch) -> AppResult<Identity> {
        self.tokens_seen.lock().unwrap().push(token.to_owned());
        play(&self.updates).await
    }
}

pub fn identity(name: &str, email: &str) -> Identity {
    Identity {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        email: email.to_owned(),
        age: None,
        height_cm: None,
        weight_kg: None,
        fitness_level: None,
        is_admin: false,
    }
}

pub fn payload(name: &str, email: &str, token: &str) -> AuthPayload {
    AuthPayload {
        user: identity(name, email),
        token: token.to_owned(),
    }
}
