// ABOUTME: Core data models for users, the catalog (tags, foodstuffs) and recipes
// ABOUTME: Defines the domain structs shared by the storage layer and the REST routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! # Data Models
//!
//! Domain structs used throughout the Ladle server. The storage layer maps
//! rows into these types; the routes serialize them (or purpose-built response
//! shapes derived from them) to JSON.

/// Tag and foodstuff catalog models
pub mod catalog;
/// Recipe and ingredient-line models
pub mod recipe;
/// User account models
pub mod user;

pub use catalog::{Foodstuff, Tag};
pub use recipe::{validate_cooking_time, IngredientLine, IngredientRef, Recipe, RecipeSummary};
pub use user::{User, UserProfile};
