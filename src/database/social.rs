// ABOUTME: Database operations for favorites, basket entries, and author subscriptions
// ABOUTME: Also aggregates basket ingredient totals for the shopping-list export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use std::collections::HashSet;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::User;

use super::is_unique_violation;

/// One aggregated shopping-list group: a (name, unit) pair and its summed amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientTotal {
    /// Foodstuff name
    pub name: String,
    /// Foodstuff measurement unit
    pub measurement_unit: String,
    /// Sum of amounts across all basket recipes
    pub total: i64,
}

/// Membership and subscription database operations manager
pub struct SocialManager {
    pool: SqlitePool,
}

impl SocialManager {
    /// Create a new social manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a recipe to a user's favorites
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the pair already exists, or a database
    /// error otherwise.
    pub async fn add_favorite(&self, user_id: Uuid, recipe_id: i64) -> AppResult<()> {
        insert_membership(&self.pool, "favorites", user_id, recipe_id).await
    }

    /// Remove a recipe from a user's favorites; false when it was not there
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn remove_favorite(&self, user_id: Uuid, recipe_id: i64) -> AppResult<bool> {
        remove_membership(&self.pool, "favorites", user_id, recipe_id).await
    }

    /// Whether a recipe is in a user's favorites
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn is_favorited(&self, user_id: Uuid, recipe_id: i64) -> AppResult<bool> {
        membership_exists(&self.pool, "favorites", user_id, recipe_id).await
    }

    /// Add a recipe to a user's basket
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the pair already exists, or a database
    /// error otherwise.
    pub async fn add_basket_entry(&self, user_id: Uuid, recipe_id: i64) -> AppResult<()> {
        insert_membership(&self.pool, "basket_entries", user_id, recipe_id).await
    }

    /// Remove a recipe from a user's basket; false when it was not there
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn remove_basket_entry(&self, user_id: Uuid, recipe_id: i64) -> AppResult<bool> {
        remove_membership(&self.pool, "basket_entries", user_id, recipe_id).await
    }

    /// Whether a recipe is in a user's basket
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn is_in_basket(&self, user_id: Uuid, recipe_id: i64) -> AppResult<bool> {
        membership_exists(&self.pool, "basket_entries", user_id, recipe_id).await
    }

    /// Subscribe a follower to an author
    ///
    /// Self-subscription is rejected here as well as at the route layer; the
    /// schema CHECK backs both up.
    ///
    /// # Errors
    ///
    /// Returns a validation error for self-subscription, a conflict error
    /// when the subscription already exists, or a database error otherwise.
    pub async fn subscribe(&self, follower_id: Uuid, author_id: Uuid) -> AppResult<()> {
        if follower_id == author_id {
            return Err(AppError::invalid_input("Cannot subscribe to yourself"));
        }

        sqlx::query(
            r"
            INSERT INTO subscriptions (follower_id, author_id, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(follower_id.to_string())
        .bind(author_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("A subscription to this author")
            } else {
                AppError::database(format!("Failed to create subscription: {e}"))
            }
        })?;

        Ok(())
    }

    /// Remove a subscription; false when it did not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn unsubscribe(&self, follower_id: Uuid, author_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE follower_id = $1 AND author_id = $2")
                .bind(follower_id.to_string())
                .bind(author_id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to remove subscription: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether a follower is subscribed to an author
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn is_subscribed(&self, follower_id: Uuid, author_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) as count FROM subscriptions
            WHERE follower_id = $1 AND author_id = $2
            ",
        )
        .bind(follower_id.to_string())
        .bind(author_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check subscription: {e}")))?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    /// Which of the given authors a follower subscribes to
    ///
    /// Used by user list endpoints to resolve `is_subscribed` flags for a
    /// whole page in one query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn subscribed_ids_among(
        &self,
        follower_id: Uuid,
        author_ids: &[Uuid],
    ) -> AppResult<HashSet<Uuid>> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let placeholders: String = author_ids
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT author_id FROM subscriptions WHERE follower_id = ? AND author_id IN ({placeholders})"
        );

        let mut query_builder = sqlx::query(&query).bind(follower_id.to_string());
        for author_id in author_ids {
            query_builder = query_builder.bind(author_id.to_string());
        }

        let rows = query_builder
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check subscriptions: {e}")))?;

        rows.iter()
            .map(|row| {
                let id_str: String = row.get("author_id");
                Uuid::parse_str(&id_str)
                    .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))
            })
            .collect()
    }

    /// Authors a follower subscribes to, most recent subscription first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_subscribed_authors(
        &self,
        follower_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<User>> {
        let rows = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                   u.password_hash, u.is_staff, u.created_at
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.follower_id = $1
            ORDER BY s.created_at DESC, u.username ASC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(follower_id.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        rows.iter().map(row_to_author).collect()
    }

    /// Count the authors a follower subscribes to
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count_subscribed_authors(&self, follower_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM subscriptions WHERE follower_id = $1")
            .bind(follower_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count subscriptions: {e}")))?;

        Ok(row.get("count"))
    }

    /// Aggregate the ingredient lines of every recipe in a user's basket
    ///
    /// Groups by (name, measurement unit) and sums amounts; ordering is
    /// alphabetical by name then unit, which fixes the shopping-list layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn basket_ingredient_totals(&self, user_id: Uuid) -> AppResult<Vec<IngredientTotal>> {
        let rows = sqlx::query(
            r"
            SELECT f.name as name, f.measurement_unit as measurement_unit,
                   SUM(il.amount) as total
            FROM basket_entries b
            JOIN ingredient_lines il ON il.recipe_id = b.recipe_id
            JOIN foodstuffs f ON f.id = il.foodstuff_id
            WHERE b.user_id = $1
            GROUP BY f.name, f.measurement_unit
            ORDER BY f.name ASC, f.measurement_unit ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to aggregate basket: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| IngredientTotal {
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                total: row.get("total"),
            })
            .collect())
    }
}

async fn insert_membership(
    pool: &SqlitePool,
    table: &str,
    user_id: Uuid,
    recipe_id: i64,
) -> AppResult<()> {
    let query = format!("INSERT INTO {table} (user_id, recipe_id, created_at) VALUES ($1, $2, $3)");
    sqlx::query(&query)
        .bind(user_id.to_string())
        .bind(recipe_id)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("A membership for this recipe")
            } else {
                AppError::database(format!("Failed to insert into {table}: {e}"))
            }
        })?;

    Ok(())
}

async fn remove_membership(
    pool: &SqlitePool,
    table: &str,
    user_id: Uuid,
    recipe_id: i64,
) -> AppResult<bool> {
    let query = format!("DELETE FROM {table} WHERE user_id = $1 AND recipe_id = $2");
    let result = sqlx::query(&query)
        .bind(user_id.to_string())
        .bind(recipe_id)
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete from {table}: {e}")))?;

    Ok(result.rows_affected() > 0)
}

async fn membership_exists(
    pool: &SqlitePool,
    table: &str,
    user_id: Uuid,
    recipe_id: i64,
) -> AppResult<bool> {
    let query = format!("SELECT COUNT(*) as count FROM {table} WHERE user_id = $1 AND recipe_id = $2");
    let row = sqlx::query(&query)
        .bind(user_id.to_string())
        .bind(recipe_id)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check {table}: {e}")))?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

/// Convert a joined subscription row to the author [`User`]
fn row_to_author(row: &SqliteRow) -> AppResult<User> {
    let id_str: String = row.get("id");
    let created_at_str: String = row.get("created_at");
    let is_staff: i64 = row.get("is_staff");

    Ok(User {
        id: Uuid::parse_str(&id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        email: row.get("email"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        password_hash: row.get("password_hash"),
        is_staff: is_staff == 1,
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&chrono::Utc),
    })
}
