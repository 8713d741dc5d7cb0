// ABOUTME: Recipe and ingredient-line models plus the wire-level ingredient reference
// ABOUTME: IngredientRef is the (foodstuff id, amount) pair recipe submissions carry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use crate::constants::{MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published recipe as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier
    pub id: i64,
    /// Author user id
    pub author_id: Uuid,
    /// Recipe name
    pub name: String,
    /// Media path of the recipe image, relative to the media root
    pub image: String,
    /// Preparation text
    pub text: String,
    /// Cooking time in minutes (>= 1)
    pub cooking_time: i64,
    /// Publication timestamp, set once at insert
    pub pub_date: DateTime<Utc>,
}

/// A recipe-scoped ingredient line as stored
///
/// Lines are owned by their recipe: they are written only through recipe
/// create/update reconciliation and die with the recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Line identity (update operations key on this)
    pub id: i64,
    /// Owning recipe
    pub recipe_id: i64,
    /// Referenced foodstuff
    pub foodstuff_id: i64,
    /// Amount in the foodstuff's measurement unit (>= 1)
    pub amount: i64,
}

/// A desired ingredient reference in a recipe submission: foodstuff id + amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRef {
    /// Foodstuff id
    pub id: i64,
    /// Amount in the foodstuff's measurement unit (>= 1)
    pub amount: i64,
}

impl IngredientRef {
    /// Validate the amount bound
    ///
    /// # Errors
    ///
    /// Returns a validation error when the amount is below the minimum.
    pub fn validate(&self) -> AppResult<()> {
        if self.amount < MIN_INGREDIENT_AMOUNT {
            return Err(AppError::out_of_range(format!(
                "Ingredient amount must be at least {MIN_INGREDIENT_AMOUNT}, got {} for foodstuff {}",
                self.amount, self.id
            )));
        }
        Ok(())
    }
}

/// Minified recipe representation used by favorite/basket endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Unique recipe identifier
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// URL path of the recipe image
    pub image: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

impl RecipeSummary {
    /// Project a stored recipe to its minified form
    ///
    /// The stored media path becomes a fetchable URL path here.
    #[must_use]
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: crate::media::url_path(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Validate a cooking time value
///
/// # Errors
///
/// Returns a validation error when the value is below the minimum.
pub fn validate_cooking_time(cooking_time: i64) -> AppResult<()> {
    if cooking_time < MIN_COOKING_TIME {
        return Err(AppError::out_of_range(format!(
            "Cooking time must be at least {MIN_COOKING_TIME} minute, got {cooking_time}"
        )));
    }
    Ok(())
}
