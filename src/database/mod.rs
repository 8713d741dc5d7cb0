// ABOUTME: Database connection management and schema migrations for SQLite storage
// ABOUTME: Owns the connection pool and creates all tables at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! # Database Management
//!
//! Storage is a single SQLite database behind an sqlx pool. Per-domain
//! managers ([`UsersManager`], [`CatalogManager`], [`RecipesManager`],
//! [`SocialManager`]) own pool clones and carry the queries; this module
//! owns connection setup and the schema.
//!
//! Uuids are stored as TEXT, timestamps as RFC 3339 TEXT, booleans as
//! INTEGER 0/1.

mod catalog;
mod recipes;
mod social;
mod users;

pub use catalog::CatalogManager;
pub use recipes::{
    IngredientDetail, NewRecipe, RecipeDetail, RecipeFilter, RecipePatch, RecipesManager,
};
pub use social::{IngredientTotal, SocialManager};
pub use users::UsersManager;

use sqlx::SqlitePool;
use tracing::info;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Database handle owning the pool and the schema
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration statement fails.
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        let base = url.to_connection_string();
        // File-backed databases are created on first connect
        let connection_string = if url.is_memory() {
            base
        } else {
            format!("{base}?mode=rwc")
        };

        let pool = SqlitePool::connect(&connection_string)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database = %url, "Database ready");

        Ok(db)
    }

    /// Get a reference to the pool for manager construction
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run schema migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a migration statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_catalog().await?;
        self.migrate_recipes().await?;
        self.migrate_social().await?;
        Ok(())
    }

    async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                is_staff INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create users table: {e}")))?;

        Ok(())
    }

    async fn migrate_catalog(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create tags table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS foodstuffs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                measurement_unit TEXT NOT NULL,
                UNIQUE (name, measurement_unit)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create foodstuffs table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_foodstuffs_name ON foodstuffs(name)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create foodstuffs index: {e}")))?;

        Ok(())
    }

    async fn migrate_recipes(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                image TEXT NOT NULL,
                text TEXT NOT NULL,
                cooking_time INTEGER NOT NULL,
                pub_date TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipes table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create recipes index: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_tags (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (recipe_id, tag_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe_tags table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredient_lines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                foodstuff_id INTEGER NOT NULL REFERENCES foodstuffs(id),
                amount INTEGER NOT NULL,
                UNIQUE (recipe_id, foodstuff_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredient_lines table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_ingredient_lines_recipe ON ingredient_lines(recipe_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredient_lines index: {e}")))?;

        Ok(())
    }

    async fn migrate_social(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS favorites (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, recipe_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create favorites table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS basket_entries (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, recipe_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create basket_entries table: {e}")))?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS subscriptions (
                follower_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                author_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                PRIMARY KEY (follower_id, author_id),
                CHECK (follower_id <> author_id)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create subscriptions table: {e}")))?;

        Ok(())
    }
}

/// True when an sqlx error is a unique-constraint violation
///
/// Used to turn insert races on unique pairs into conflict responses
/// instead of opaque database errors.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_user;

    #[tokio::test]
    async fn test_memory_database_migrates() {
        let db = Database::new(&DatabaseUrl::Memory).await.unwrap();

        // Migrations are idempotent
        db.migrate().await.unwrap();

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row.0, 0);
    }

    #[tokio::test]
    async fn test_user_round_trip() {
        let db = Database::new(&DatabaseUrl::Memory).await.unwrap();
        let users = UsersManager::new(db.pool().clone());

        let user = create_test_user("cook@example.com", "cook");
        users.create(&user).await.unwrap();

        let by_email = users.get_by_email("cook@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));

        let by_username = users.get_by_username("cook").await.unwrap();
        assert_eq!(by_username.map(|u| u.username), Some("cook".to_owned()));
    }
}
