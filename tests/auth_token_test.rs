// ABOUTME: Tests for the JWT token codec
// ABOUTME: Covers issue/verify, expiry classification, tampering and wrong-secret rejection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use fittrack_server::auth::{AuthManager, JwtValidationError};
use fittrack_server::errors::{AppError, ErrorCode};
use fittrack_server::models::User;

fn sample_user() -> User {
    User::new(
        "Ada".to_owned(),
        "ada@example.com".to_owned(),
        "not-a-real-hash".to_owned(),
    )
}

#[test]
fn test_token_round_trip_returns_subject() {
    let manager = common::create_test_auth_manager();
    let user = sample_user();

    let token = manager.generate_token(&user).unwrap();
    let claims = manager.validate_token(&token).unwrap();

    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.email, "ada@example.com");
    assert_eq!(claims.exp - claims.iat, 24 * 3600);
    assert_eq!(manager.verify(&token).unwrap(), user.id);
}

#[test]
fn test_token_is_rejected_exactly_after_expiry() {
    let manager = common::create_test_auth_manager();
    let identity = sample_user().to_identity();

    let just_expired = manager
        .generate_token_at(&identity, Utc::now() - Duration::hours(24) - Duration::seconds(5))
        .unwrap();
    assert_eq!(
        manager.validate_token(&just_expired),
        Err(JwtValidationError::ExpiredToken)
    );

    let still_valid = manager
        .generate_token_at(&identity, Utc::now() - Duration::hours(23))
        .unwrap();
    assert!(manager.validate_token(&still_valid).is_ok());
}

#[test]
fn test_expired_token_maps_to_auth_expired() {
    let manager = common::create_test_auth_manager();
    let identity = sample_user().to_identity();
    let token = manager
        .generate_token_at(&identity, Utc::now() - Duration::days(30))
        .unwrap();

    let error = manager.verify(&token).unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthExpired);
    assert_eq!(error.http_status(), 401);
}

#[test]
fn test_token_signed_with_other_secret_is_invalid() {
    let issuer = AuthManager::new(b"some-other-secret", 24);
    let verifier = common::create_test_auth_manager();
    let token = issuer.generate_token(&sample_user()).unwrap();

    let result = verifier.validate_token(&token);
    assert!(matches!(result, Err(JwtValidationError::InvalidToken { .. })));
    assert_eq!(verifier.verify(&token).unwrap_err().code, ErrorCode::AuthInvalid);
}

#[test]
fn test_tampered_payload_is_invalid() {
    let manager = common::create_test_auth_manager();
    let token = manager.generate_token(&sample_user()).unwrap();

    let other = manager.generate_token(&sample_user()).unwrap();
    let mut parts: Vec<&str> = token.split('.').collect();
    let other_parts: Vec<&str> = other.split('.').collect();
    parts[1] = other_parts[1];
    let spliced = parts.join(".");

    assert!(matches!(
        manager.validate_token(&spliced),
        Err(JwtValidationError::InvalidToken { .. })
    ));
}

#[test]
fn test_garbage_token_is_invalid() {
    let manager = common::create_test_auth_manager();
    for token in ["", "abc", "a.b.c", "Bearer xyz"] {
        assert!(
            matches!(
                manager.validate_token(token),
                Err(JwtValidationError::InvalidToken { .. })
            ),
            "token {token:?} should be invalid"
        );
    }
}

#[test]
fn test_validation_error_converts_to_app_error() {
    let invalid: AppError = JwtValidationError::InvalidToken {
        reason: "bad".to_owned(),
    }
    .into();
    assert_eq!(invalid.code, ErrorCode::AuthInvalid);

    let expired: AppError = JwtValidationError::ExpiredToken.into();
    assert_eq!(expired.code, ErrorCode::AuthExpired);
}

#[test]
fn test_out_of_range_expiry_fails_without_panicking() {
    let identity = sample_user().to_identity();

    for expiry_hours in [10_000_000_000, i64::MAX] {
        let manager = AuthManager::new(b"secret", expiry_hours);
        let err = manager.generate_token_at(&identity, Utc::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
    }
}
