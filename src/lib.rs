// ABOUTME: Main library entry point for the Ladle recipe-sharing API server
// ABOUTME: Provides the REST backend for recipes, tags, favorites, baskets, and subscriptions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

#![deny(unsafe_code)]

//! # Ladle Server
//!
//! A recipe-sharing REST backend. Users publish recipes built from a
//! curated foodstuff catalog, tag them, favorite them, follow authors,
//! and collect recipes into a shopping basket that exports as an
//! aggregated plain-text shopping list.
//!
//! ## Features
//!
//! - **Recipes**: CRUD with tag filters, pagination, and viewer-dependent flags
//! - **Ingredient reconciliation**: submitted ingredient lists are diffed
//!   against stored lines into minimal create/update/delete plans
//! - **Social**: favorites, author subscriptions, shopping basket
//! - **Shopping list export**: basket-wide ingredient totals as a text file
//! - **JWT authentication**: HS256 tokens over bcrypt-hashed credentials
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ladle::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let config = ServerConfig::from_env()?;
//!
//!     println!("Ladle server configured with port: HTTP={}", config.http_port);
//!
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the server binary (src/bin/) and integration
// tests (tests/). They must remain `pub` so external consumers can access
// them.

/// Authentication and token management
pub mod auth;

/// Configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Database pool, schema, and per-domain operation managers
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Recipe image intake and media path handling
pub mod media;

/// HTTP middleware for authentication and CORS
pub mod middleware;

/// Common data models for users, catalog entries, and recipes
pub mod models;

/// Page-number pagination for list endpoints
pub mod pagination;

/// Ingredient-set reconciliation between stored and submitted lines
pub mod reconcile;

/// HTTP routes organized by domain
pub mod routes;

/// Server resources and the HTTP entry point
pub mod server;

/// Shopping-list text rendering
pub mod shopping_list;

/// Test utilities for creating consistent test data
#[cfg(any(test, feature = "testing"))]
pub mod test_utils;
