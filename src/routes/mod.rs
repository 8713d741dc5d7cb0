// ABOUTME: Route module organization for Ladle HTTP endpoints
// ABOUTME: Provides centralized route definitions organized by domain with clean separation of concerns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! Route module for the Ladle server
//!
//! This module organizes all HTTP routes by domain for better maintainability
//! and clear separation of concerns. Each domain module contains only route
//! definitions and thin handler functions that delegate to the database
//! managers and service helpers.

/// Authentication routes (login, registration, password changes)
pub mod auth;
/// Tag and foodstuff catalog routes
pub mod catalog;
/// Health check and system status routes
pub mod health;
/// Recipe CRUD, membership, and shopping-list export routes
pub mod recipes;
/// User profile and subscription routes
pub mod users;

// Re-export commonly used types from each domain

/// Authentication route handlers
pub use auth::AuthRoutes;
/// Authentication service
pub use auth::AuthService;
/// Login request payload
pub use auth::LoginRequest;
/// Login response with token
pub use auth::LoginResponse;
/// User registration request
pub use auth::RegisterRequest;
/// Password change request
pub use auth::SetPasswordRequest;
/// Catalog route handlers
pub use catalog::CatalogRoutes;
/// Health check route handlers
pub use health::HealthRoutes;
/// Recipe route handlers
pub use recipes::RecipeRoutes;
/// Subscription list entry (author + recipes)
pub use users::SubscriptionItem;
/// User route handlers
pub use users::UserRoutes;
