// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven ServerConfig and its typed components
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! Configuration module for the Ladle server
//!
//! All runtime configuration comes from environment variables (optionally via
//! a `.env` file), parsed once at startup into a typed [`ServerConfig`].

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AppBehaviorConfig, AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel,
    SecurityConfig, ServerConfig,
};
