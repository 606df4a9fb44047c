// ABOUTME: End-to-end tests of the HTTP session client against a live in-process server
// ABOUTME: Exercises register, login, profile verification and error mapping over real sockets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;
use std::time::Duration;

use fittrack_server::client::{
    AuthApi, ClientConfig, Credentials, GuardDecision, HttpAuthApi, MemoryTokenStorage,
    RouteGuard, SessionStore, StoredSession,
};
use fittrack_server::constants::error_messages;
use fittrack_server::errors::ErrorCode;
use fittrack_server::models::IdentityPatch;
use fittrack_server::server::build_router;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let resources = common::create_test_resources().await.unwrap();
    let router = build_router(&resources);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> Arc<HttpAuthApi> {
    let config = ClientConfig {
        base_url: base_url.to_owned(),
        request_timeout: Duration::from_secs(5),
    };
    Arc::new(HttpAuthApi::new(&config).unwrap())
}

#[tokio::test]
async fn test_register_then_verify_over_http() {
    let base_url = spawn_server().await;
    let api = client_for(&base_url);
    let store = Arc::new(SessionStore::new(
        api.clone(),
        Arc::new(MemoryTokenStorage::default()),
    ));

    let user = store
        .register("Http User", "http@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(user.email, "http@example.com");
    let token = store.state().token.unwrap();

    // A fresh client holding only the token verifies it through the guard
    let restored = Arc::new(SessionStore::new(
        api.clone(),
        Arc::new(MemoryTokenStorage::with_session(StoredSession {
            token,
            identity: None,
        })),
    ));
    let decision = RouteGuard::new(Arc::clone(&restored)).check("/dashboard").await;

    assert_eq!(decision, GuardDecision::Render);
    assert_eq!(restored.state().identity.unwrap().id, user.id);
}

#[tokio::test]
async fn test_update_profile_over_http() {
    let base_url = spawn_server().await;
    let api = client_for(&base_url);
    let store = SessionStore::new(api, Arc::new(MemoryTokenStorage::default()));
    store
        .register("Before", "update@example.com", "secret1")
        .await
        .unwrap();

    let patch = IdentityPatch {
        name: Some("After".to_owned()),
        age: Some(31),
        ..IdentityPatch::default()
    };
    let updated = store.update_identity(&patch).await.unwrap();

    assert_eq!(updated.name, "After");
    assert_eq!(updated.age, Some(31));
    assert_eq!(store.state().identity.unwrap().name, "After");
}

#[tokio::test]
async fn test_server_errors_keep_code_and_message() {
    let base_url = spawn_server().await;
    let api = client_for(&base_url);

    let err = api
        .login(&Credentials {
            email: "nobody@example.com".to_owned(),
            password: "secret1".to_owned(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthInvalid);
    assert_eq!(err.message, error_messages::INVALID_CREDENTIALS);

    let err = api.fetch_identity("not-a-jwt").await.unwrap_err();
    assert!(err.code.is_unauthenticated());
}

#[tokio::test]
async fn test_duplicate_registration_surfaces_conflict() {
    let base_url = spawn_server().await;
    let store = SessionStore::new(
        client_for(&base_url),
        Arc::new(MemoryTokenStorage::default()),
    );
    store
        .register("First", "dup@example.com", "secret1")
        .await
        .unwrap();
    store.logout();

    let err = store
        .register("Second", "dup@example.com", "secret1")
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(
        store.state().error.as_deref(),
        Some(error_messages::USER_ALREADY_EXISTS)
    );
}

#[tokio::test]
async fn test_unreachable_server_is_upstream_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = client_for(&format!("http://{addr}"));

    let err = api.fetch_identity("token").await.unwrap_err();

    assert_eq!(err.code, ErrorCode::UpstreamUnavailable);
}
