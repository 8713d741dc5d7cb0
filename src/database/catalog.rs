// ABOUTME: Database operations for the tag and foodstuff catalogs
// ABOUTME: Read paths back the public API; writes exist for seeding and admin tooling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::models::{Foodstuff, Tag};

use super::is_unique_violation;

/// Catalog database operations manager
pub struct CatalogManager {
    pool: SqlitePool,
}

impl CatalogManager {
    /// Create a new catalog manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a tag
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the slug is already taken, a validation
    /// error for a malformed color or slug, or a database error otherwise.
    pub async fn create_tag(&self, name: &str, color: &str, slug: &str) -> AppResult<Tag> {
        Tag::validate_fields(name, color, slug)?;

        let result = sqlx::query("INSERT INTO tags (name, color, slug) VALUES ($1, $2, $3)")
            .bind(name)
            .bind(color)
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::already_exists("A tag with this slug")
                } else {
                    AppError::database(format!("Failed to create tag: {e}"))
                }
            })?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
            color: color.to_owned(),
            slug: slug.to_owned(),
        })
    }

    /// List all tags
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, color, slug FROM tags ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list tags: {e}")))?;

        Ok(rows.iter().map(row_to_tag).collect())
    }

    /// Get a tag by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_tag(&self, tag_id: i64) -> AppResult<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, color, slug FROM tags WHERE id = $1")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tag: {e}")))?;

        Ok(row.as_ref().map(row_to_tag))
    }

    /// Get tags by id set, in id order
    ///
    /// Missing ids are silently absent from the result; callers compare
    /// lengths to detect unknown tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_tags_by_ids(&self, tag_ids: &[i64]) -> AppResult<Vec<Tag>> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: String = tag_ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let query = format!(
            "SELECT id, name, color, slug FROM tags WHERE id IN ({placeholders}) ORDER BY id ASC"
        );

        let mut query_builder = sqlx::query(&query);
        for tag_id in tag_ids {
            query_builder = query_builder.bind(tag_id);
        }

        let rows = query_builder
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tags: {e}")))?;

        Ok(rows.iter().map(row_to_tag).collect())
    }

    /// Insert a foodstuff
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the (name, unit) pair already exists,
    /// or a database error otherwise.
    pub async fn create_foodstuff(&self, name: &str, measurement_unit: &str) -> AppResult<Foodstuff> {
        let result =
            sqlx::query("INSERT INTO foodstuffs (name, measurement_unit) VALUES ($1, $2)")
                .bind(name)
                .bind(measurement_unit)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::already_exists("A foodstuff with this name and unit")
                    } else {
                        AppError::database(format!("Failed to create foodstuff: {e}"))
                    }
                })?;

        Ok(Foodstuff {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        })
    }

    /// List foodstuffs, optionally restricted to a case-insensitive name prefix
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_foodstuffs(&self, name_prefix: Option<&str>) -> AppResult<Vec<Foodstuff>> {
        let rows = if let Some(prefix) = name_prefix {
            let pattern = format!("{prefix}%");
            sqlx::query(
                r"
                SELECT id, name, measurement_unit FROM foodstuffs
                WHERE name LIKE $1
                ORDER BY name ASC, measurement_unit ASC
                ",
            )
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query(
                r"
                SELECT id, name, measurement_unit FROM foodstuffs
                ORDER BY name ASC, measurement_unit ASC
                ",
            )
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| AppError::database(format!("Failed to list foodstuffs: {e}")))?;

        Ok(rows.iter().map(row_to_foodstuff).collect())
    }

    /// Get a foodstuff by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_foodstuff(&self, foodstuff_id: i64) -> AppResult<Option<Foodstuff>> {
        let row = sqlx::query("SELECT id, name, measurement_unit FROM foodstuffs WHERE id = $1")
            .bind(foodstuff_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get foodstuff: {e}")))?;

        Ok(row.as_ref().map(row_to_foodstuff))
    }

    /// Get foodstuffs by id set
    ///
    /// Missing ids are silently absent from the result; callers compare
    /// lengths to detect unknown foodstuffs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_foodstuffs_by_ids(&self, foodstuff_ids: &[i64]) -> AppResult<Vec<Foodstuff>> {
        if foodstuff_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: String = foodstuff_ids
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT id, name, measurement_unit FROM foodstuffs WHERE id IN ({placeholders})"
        );

        let mut query_builder = sqlx::query(&query);
        for foodstuff_id in foodstuff_ids {
            query_builder = query_builder.bind(foodstuff_id);
        }

        let rows = query_builder
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get foodstuffs: {e}")))?;

        Ok(rows.iter().map(row_to_foodstuff).collect())
    }
}

/// Convert a database row to a [`Tag`]
fn row_to_tag(row: &SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        color: row.get("color"),
        slug: row.get("slug"),
    }
}

/// Convert a database row to a [`Foodstuff`]
fn row_to_foodstuff(row: &SqliteRow) -> Foodstuff {
    Foodstuff {
        id: row.get("id"),
        name: row.get("name"),
        measurement_unit: row.get("measurement_unit"),
    }
}
