// ABOUTME: Configuration module root for the FitTrack server
// ABOUTME: Re-exports environment-driven server configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

/// Environment variable parsing into `ServerConfig`
pub mod environment;

pub use environment::{AuthConfig, Environment, LogFormat, LoggingConfig, ServerConfig};
