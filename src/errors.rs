// ABOUTME: Error handling re-exports for the FitTrack server crate
// ABOUTME: Surfaces the core AppError, ErrorCode and AppResult under crate::errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

pub use fittrack_core::errors::{AppError, AppResult, ErrorBody, ErrorCode};
