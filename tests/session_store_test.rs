// ABOUTME: Tests for the session store driving the reducer from API calls
// ABOUTME: Covers persistence, hydration, stale settlement discard and logout supersession
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::sync::Arc;

use fittrack_server::client::{
    FileTokenStorage, MemoryTokenStorage, SessionStore, StoredSession, TokenStorage,
};
use fittrack_server::errors::{AppError, ErrorCode};
use fittrack_server::models::IdentityPatch;
use helpers::scripted_api::{identity, payload, ScriptedApi};
use tempfile::TempDir;

fn store_with(api: &Arc<ScriptedApi>, storage: &Arc<MemoryTokenStorage>) -> SessionStore {
    SessionStore::new(api.clone(), storage.clone())
}

async fn signed_in_store() -> (Arc<ScriptedApi>, Arc<MemoryTokenStorage>, SessionStore) {
    let api = Arc::new(ScriptedApi::default());
    let storage = Arc::new(MemoryTokenStorage::default());
    api.push_login(Ok(payload("A", "a@x.com", "tok")));
    let store = store_with(&api, &storage);
    store.login("a@x.com", "secret1").await.unwrap();
    (api, storage, store)
}

#[tokio::test]
async fn test_login_success_persists_session() {
    let (_api, storage, store) = signed_in_store().await;

    let state = store.state();
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.token.as_deref(), Some("tok"));

    let stored = storage.load().unwrap().unwrap();
    assert_eq!(stored.token, "tok");
    assert_eq!(stored.identity, state.identity);
}

#[tokio::test]
async fn test_login_failure_records_message() {
    let api = Arc::new(ScriptedApi::default());
    let storage = Arc::new(MemoryTokenStorage::default());
    api.push_login(Err(AppError::auth_invalid("Invalid email or password")));
    let store = store_with(&api, &storage);

    let err = store.login("a@x.com", "wrong").await.unwrap_err();

    assert_eq!(err.code, ErrorCode::AuthInvalid);
    let state = store.state();
    assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
    assert!(!state.is_authenticated);
    assert!(storage.load().unwrap().is_none());
}

#[tokio::test]
async fn test_failed_relogin_keeps_stored_session() {
    let (api, storage, store) = signed_in_store().await;
    let before = store.state();
    api.push_login(Err(AppError::auth_invalid("Invalid email or password")));

    store.login("a@x.com", "wrong").await.unwrap_err();

    let state = store.state();
    assert!(state.is_authenticated);
    assert_eq!(state.token, before.token);
    assert_eq!(state.identity, before.identity);
    assert_eq!(storage.load().unwrap().unwrap().token, "tok");
}

#[tokio::test]
async fn test_register_signs_in() {
    let api = Arc::new(ScriptedApi::default());
    let storage = Arc::new(MemoryTokenStorage::default());
    api.push_register(Ok(payload("New", "new@x.com", "fresh")));
    let store = store_with(&api, &storage);

    let user = store.register("New", "new@x.com", "secret1").await.unwrap();

    assert_eq!(user.email, "new@x.com");
    assert!(store.state().is_authenticated);
    assert_eq!(storage.load().unwrap().unwrap().token, "fresh");
}

#[tokio::test]
async fn test_hydration_restores_token_only() {
    let api = Arc::new(ScriptedApi::default());
    let storage = Arc::new(MemoryTokenStorage::with_session(StoredSession {
        token: "stored".to_owned(),
        identity: Some(identity("Cached", "cached@x.com")),
    }));

    let store = store_with(&api, &storage);
    let state = store.state();

    assert_eq!(state.token.as_deref(), Some("stored"));
    assert!(state.identity.is_none());
    assert!(!state.is_authenticated);
    assert_eq!(api.fetch_calls(), 0);
}

#[tokio::test]
async fn test_fetch_identity_verifies_hydrated_token() {
    let api = Arc::new(ScriptedApi::default());
    let storage = Arc::new(MemoryTokenStorage::with_session(StoredSession {
        token: "stored".to_owned(),
        identity: None,
    }));
    let user = identity("B", "b@x.com");
    api.push_fetch(Ok(user.clone()));
    let store = store_with(&api, &storage);

    let fetched = store.fetch_identity().await.unwrap();

    assert_eq!(fetched, user);
    assert_eq!(api.tokens_seen(), vec!["stored".to_owned()]);
    assert!(store.state().is_authenticated);
    assert_eq!(storage.load().unwrap().unwrap().identity, Some(user));
}

#[tokio::test]
async fn test_fetch_identity_rejection_clears_storage() {
    let api = Arc::new(ScriptedApi::default());
    let storage = Arc::new(MemoryTokenStorage::with_session(StoredSession {
        token: "expired-token".to_owned(),
        identity: None,
    }));
    api.push_fetch(Err(AppError::auth_expired("Token expired")));
    let store = store_with(&api, &storage);

    let err = store.fetch_identity().await.unwrap_err();

    assert_eq!(err.code, ErrorCode::AuthExpired);
    let state = store.state();
    assert!(state.token.is_none());
    assert!(!state.is_authenticated);
    assert_eq!(state.error.as_deref(), Some("Token expired"));
    assert!(storage.load().unwrap().is_none());
}

#[tokio::test]
async fn test_fetch_identity_without_token_is_rejected_locally() {
    let api = Arc::new(ScriptedApi::default());
    let store = store_with(&api, &Arc::new(MemoryTokenStorage::default()));

    let err = store.fetch_identity().await.unwrap_err();

    assert_eq!(err.code, ErrorCode::AuthRequired);
    assert_eq!(api.fetch_calls(), 0);
    assert!(!store.state().is_loading);
}

#[tokio::test]
async fn test_update_identity_success_replaces_identity() {
    let (api, storage, store) = signed_in_store().await;
    let mut renamed = store.state().identity.unwrap();
    renamed.name = "Renamed".to_owned();
    api.push_update(Ok(renamed.clone()));

    let patch = IdentityPatch {
        name: Some("Renamed".to_owned()),
        ..IdentityPatch::default()
    };
    store.update_identity(&patch).await.unwrap();

    assert_eq!(store.state().identity, Some(renamed.clone()));
    assert_eq!(storage.load().unwrap().unwrap().identity, Some(renamed));
    assert_eq!(api.tokens_seen(), vec!["tok".to_owned()]);
}

#[tokio::test]
async fn test_update_identity_rejection_keeps_session() {
    let (api, storage, store) = signed_in_store().await;
    let before = store.state();
    api.push_update(Err(AppError::conflict("Email already in use")));

    let patch = IdentityPatch {
        email: Some("taken@x.com".to_owned()),
        ..IdentityPatch::default()
    };
    let err = store.update_identity(&patch).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    let state = store.state();
    assert!(state.is_authenticated);
    assert_eq!(state.identity, before.identity);
    assert_eq!(state.token, before.token);
    assert_eq!(state.error.as_deref(), Some("Email already in use"));
    assert!(storage.load().unwrap().is_some());
}

#[tokio::test]
async fn test_latest_login_wins_over_earlier_slow_login() {
    let api = Arc::new(ScriptedApi::default());
    let storage = Arc::new(MemoryTokenStorage::default());
    let first = payload("First", "first@x.com", "first-token");
    let second = payload("Second", "second@x.com", "second-token");
    let gate = api.push_login_gated(Ok(first));
    api.push_login(Ok(second.clone()));
    let store = Arc::new(store_with(&api, &storage));

    let slow = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.login("first@x.com", "secret1").await })
    };
    // The gated step is popped once the first login reaches the API
    while !store.state().is_loading {
        tokio::task::yield_now().await;
    }
    tokio::task::yield_now().await;

    store.login("second@x.com", "secret1").await.unwrap();
    gate.notify_one();
    slow.await.unwrap().unwrap();

    let state = store.state();
    assert_eq!(state.identity, Some(second.user));
    assert_eq!(state.token.as_deref(), Some("second-token"));
    assert_eq!(storage.load().unwrap().unwrap().token, "second-token");
}

#[tokio::test]
async fn test_logout_supersedes_in_flight_fetch() {
    let api = Arc::new(ScriptedApi::default());
    let storage = Arc::new(MemoryTokenStorage::with_session(StoredSession {
        token: "stored".to_owned(),
        identity: None,
    }));
    let gate = api.push_fetch_gated(Ok(identity("Late", "late@x.com")));
    let store = Arc::new(store_with(&api, &storage));

    let pending = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.fetch_identity().await })
    };
    while api.fetch_calls() == 0 {
        tokio::task::yield_now().await;
    }

    store.logout();
    assert!(!store.state().is_loading);
    gate.notify_one();
    pending.await.unwrap().unwrap();

    let state = store.state();
    assert!(state.identity.is_none());
    assert!(state.token.is_none());
    assert!(!state.is_authenticated);
    assert!(storage.load().unwrap().is_none());
}

#[tokio::test]
async fn test_logout_clears_state_and_storage() {
    let (_api, storage, store) = signed_in_store().await;

    store.logout();
    store.logout();

    let state = store.state();
    assert!(state.token.is_none());
    assert!(state.identity.is_none());
    assert!(!state.is_authenticated);
    assert!(storage.load().unwrap().is_none());
}

#[tokio::test]
async fn test_clear_error_keeps_session() {
    let (api, _storage, store) = signed_in_store().await;
    api.push_update(Err(AppError::invalid_input("Age must be positive")));
    let _ = store.update_identity(&IdentityPatch::default()).await;
    assert!(store.state().error.is_some());

    store.clear_error();

    let state = store.state();
    assert!(state.error.is_none());
    assert!(state.is_authenticated);
}

#[tokio::test]
async fn test_subscribers_observe_transitions() {
    let api = Arc::new(ScriptedApi::default());
    api.push_login(Ok(payload("A", "a@x.com", "tok")));
    let store = store_with(&api, &Arc::new(MemoryTokenStorage::default()));
    let mut changes = store.subscribe();

    store.login("a@x.com", "secret1").await.unwrap();

    assert!(changes.has_changed().unwrap());
    assert!(changes.borrow_and_update().is_authenticated);
}

#[tokio::test]
async fn test_file_storage_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("session.json");
    let api = Arc::new(ScriptedApi::default());
    api.push_login(Ok(payload("A", "a@x.com", "persisted")));

    {
        let store = SessionStore::new(api.clone(), Arc::new(FileTokenStorage::new(&path)));
        store.login("a@x.com", "secret1").await.unwrap();
    }
    assert!(path.exists());

    let restarted = SessionStore::new(api.clone(), Arc::new(FileTokenStorage::new(&path)));
    assert_eq!(restarted.state().token.as_deref(), Some("persisted"));

    restarted.logout();
    assert!(!path.exists());
}

#[test]
fn test_file_storage_ignores_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, b"{not json").unwrap();
    let storage = FileTokenStorage::new(&path);

    assert!(storage.load().unwrap().is_none());
    storage.clear().unwrap();
    storage.clear().unwrap();
}

#[cfg(unix)]
#[test]
fn test_file_storage_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let storage = FileTokenStorage::new(dir.path().join("session.json"));
    storage
        .save(&StoredSession {
            token: "t".to_owned(),
            identity: None,
        })
        .unwrap();

    let mode = std::fs::metadata(storage.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
