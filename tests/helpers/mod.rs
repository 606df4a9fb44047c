// ABOUTME: Test helper modules shared by the integration test binaries
// ABOUTME: Provides an axum request builder and a scripted authentication API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors
#![allow(dead_code)]

pub mod axum_test;
pub mod scripted_api;
