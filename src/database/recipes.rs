// ABOUTME: Database operations for recipes, their tag sets, and their ingredient lines
// ABOUTME: Applies reconciliation plans transactionally and assembles full read representations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::media;
use crate::models::{IngredientLine, IngredientRef, Recipe, RecipeSummary, Tag, UserProfile};
use crate::reconcile::{reconcile, ReconcilePlan};

use super::is_unique_violation;

/// Fields for a new recipe; the image is the already-stored media path
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Recipe name
    pub name: String,
    /// Stored media path of the image
    pub image: String,
    /// Free-form preparation text
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
    /// Tag ids to attach
    pub tag_ids: Vec<i64>,
    /// Desired ingredient list
    pub ingredients: Vec<IngredientRef>,
}

/// Partial update for an existing recipe; absent fields keep their value
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    /// New name
    pub name: Option<String>,
    /// New stored media path
    pub image: Option<String>,
    /// New preparation text
    pub text: Option<String>,
    /// New cooking time in minutes
    pub cooking_time: Option<i64>,
    /// Replacement tag set
    pub tag_ids: Option<Vec<i64>>,
    /// Desired ingredient list, reconciled against the stored lines
    pub ingredients: Option<Vec<IngredientRef>>,
}

/// Filter options for listing recipes
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Restrict to one author
    pub author: Option<Uuid>,
    /// Restrict to recipes carrying any of these tag slugs
    pub tag_slugs: Vec<String>,
    /// Restrict to recipes favorited by this user
    pub favorited_by: Option<Uuid>,
    /// Restrict to recipes in this user's basket
    pub in_basket_of: Option<Uuid>,
}

/// One ingredient line in a recipe read representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDetail {
    /// Foodstuff id
    pub id: i64,
    /// Foodstuff name
    pub name: String,
    /// Foodstuff measurement unit
    pub measurement_unit: String,
    /// Amount in this recipe
    pub amount: i64,
}

/// Full recipe read representation with author, tags, and viewer flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// Unique recipe identifier
    pub id: i64,
    /// Attached tags
    pub tags: Vec<Tag>,
    /// Author profile with `is_subscribed` computed against the viewer
    pub author: UserProfile,
    /// Ingredient lines
    pub ingredients: Vec<IngredientDetail>,
    /// Whether the viewer has favorited this recipe
    pub is_favorited: bool,
    /// Whether this recipe is in the viewer's basket
    pub is_in_shopping_cart: bool,
    /// Recipe name
    pub name: String,
    /// URL path of the recipe image
    pub image: String,
    /// Free-form preparation text
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

const DETAIL_COLUMNS: &str = r"
    r.id, r.name, r.image, r.text, r.cooking_time, r.pub_date,
    u.id as author_id, u.email as author_email, u.username as author_username,
    u.first_name as author_first_name, u.last_name as author_last_name,
    CASE WHEN EXISTS (
        SELECT 1 FROM subscriptions s WHERE s.follower_id = ? AND s.author_id = r.author_id
    ) THEN 1 ELSE 0 END as author_is_subscribed,
    CASE WHEN EXISTS (
        SELECT 1 FROM favorites fav WHERE fav.user_id = ? AND fav.recipe_id = r.id
    ) THEN 1 ELSE 0 END as is_favorited,
    CASE WHEN EXISTS (
        SELECT 1 FROM basket_entries bk WHERE bk.user_id = ? AND bk.recipe_id = r.id
    ) THEN 1 ELSE 0 END as is_in_shopping_cart";

/// Recipe database operations manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a recipe together with its tag set and ingredient lines
    ///
    /// The ingredient lines go through the reconciler against an empty line
    /// set, so a duplicated foodstuff in the submission fails here before
    /// anything is written. The whole write is one transaction.
    ///
    /// # Errors
    ///
    /// Returns a validation error for duplicate foodstuffs, or a database
    /// error if any statement fails.
    pub async fn create(&self, author_id: Uuid, input: &NewRecipe) -> AppResult<i64> {
        let plan = reconcile(&[], &input.ingredients)?;
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO recipes (author_id, name, image, text, cooking_time, pub_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(author_id.to_string())
        .bind(&input.name)
        .bind(&input.image)
        .bind(&input.text)
        .bind(input.cooking_time)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        let recipe_id = result.last_insert_rowid();

        attach_tags(&mut tx, recipe_id, &input.tag_ids).await?;
        apply_plan(&mut tx, recipe_id, &plan).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe create: {e}")))?;

        Ok(recipe_id)
    }

    /// Get a bare recipe row by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, author_id, name, image, text, cooking_time, pub_date
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    /// Get the full read representation of one recipe
    ///
    /// `viewer` drives the `is_favorited`, `is_in_shopping_cart`, and author
    /// `is_subscribed` flags; all three are false for anonymous reads.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_detail(
        &self,
        recipe_id: i64,
        viewer: Option<Uuid>,
    ) -> AppResult<Option<RecipeDetail>> {
        let viewer_str = viewer.map_or_else(String::new, |u| u.to_string());
        let query = format!(
            r"
            SELECT {DETAIL_COLUMNS}
            FROM recipes r
            JOIN users u ON u.id = r.author_id
            WHERE r.id = ?
            "
        );

        let row = sqlx::query(&query)
            .bind(&viewer_str)
            .bind(&viewer_str)
            .bind(&viewer_str)
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe detail: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut tags = self.tags_for_recipes(&[recipe_id]).await?;
        let mut lines = self.ingredient_details_for_recipes(&[recipe_id]).await?;
        let detail = row_to_detail(
            &row,
            tags.remove(&recipe_id).unwrap_or_default(),
            lines.remove(&recipe_id).unwrap_or_default(),
        )?;

        Ok(Some(detail))
    }

    /// List recipe read representations, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        viewer: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<RecipeDetail>> {
        let viewer_str = viewer.map_or_else(String::new, |u| u.to_string());
        let (where_sql, filter_binds) = filter_sql(filter);
        let query = format!(
            r"
            SELECT {DETAIL_COLUMNS}
            FROM recipes r
            JOIN users u ON u.id = r.author_id
            {where_sql}
            ORDER BY r.pub_date DESC, r.id DESC
            LIMIT ? OFFSET ?
            "
        );

        // Bind order follows placeholder order: the three viewer flags in the
        // column list, then the filter clauses, then the page window.
        let mut query_builder = sqlx::query(&query)
            .bind(&viewer_str)
            .bind(&viewer_str)
            .bind(&viewer_str);
        for value in &filter_binds {
            query_builder = query_builder.bind(value);
        }
        let rows = query_builder
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let recipe_ids: Vec<i64> = rows.iter().map(|r| r.get("id")).collect();
        let mut tags = self.tags_for_recipes(&recipe_ids).await?;
        let mut lines = self.ingredient_details_for_recipes(&recipe_ids).await?;

        rows.iter()
            .map(|row| {
                let id: i64 = row.get("id");
                row_to_detail(
                    row,
                    tags.remove(&id).unwrap_or_default(),
                    lines.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }

    /// Count recipes matching a filter
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count(&self, filter: &RecipeFilter) -> AppResult<i64> {
        let (where_sql, filter_binds) = filter_sql(filter);
        let query = format!("SELECT COUNT(*) as count FROM recipes r {where_sql}");

        let mut query_builder = sqlx::query(&query);
        for value in &filter_binds {
            query_builder = query_builder.bind(value);
        }
        let row = query_builder
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        Ok(row.get("count"))
    }

    /// Apply a partial update, reconciling ingredient lines when provided
    ///
    /// Absent fields keep their stored value. A provided tag set replaces the
    /// stored one. The whole write is one transaction, so readers never see
    /// the line set half-migrated.
    ///
    /// # Errors
    ///
    /// Returns a validation error for duplicate foodstuffs, or a database
    /// error if any statement fails.
    pub async fn update(&self, recipe_id: i64, patch: &RecipePatch) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let row = sqlx::query(
            r"
            SELECT id, author_id, name, image, text, cooking_time, pub_date
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(recipe_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        let Some(row) = row else {
            return Ok(false);
        };
        let existing = row_to_recipe(&row)?;

        let name = patch.name.as_ref().unwrap_or(&existing.name);
        let image = patch.image.as_ref().unwrap_or(&existing.image);
        let text = patch.text.as_ref().unwrap_or(&existing.text);
        let cooking_time = patch.cooking_time.unwrap_or(existing.cooking_time);

        sqlx::query(
            r"
            UPDATE recipes SET name = $1, image = $2, text = $3, cooking_time = $4
            WHERE id = $5
            ",
        )
        .bind(name)
        .bind(image)
        .bind(text)
        .bind(cooking_time)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if let Some(tag_ids) = &patch.tag_ids {
            sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
                .bind(recipe_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to clear recipe tags: {e}")))?;
            attach_tags(&mut tx, recipe_id, tag_ids).await?;
        }

        if let Some(desired) = &patch.ingredients {
            let existing_lines = fetch_lines(&mut tx, recipe_id).await?;
            let plan = reconcile(&existing_lines, desired)?;
            apply_plan(&mut tx, recipe_id, &plan).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe update: {e}")))?;

        Ok(true)
    }

    /// Delete a recipe; lines, tag links, and memberships cascade
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn delete(&self, recipe_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a recipe's ingredient lines
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_ingredient_lines(&self, recipe_id: i64) -> AppResult<Vec<IngredientLine>> {
        let rows = sqlx::query(
            r"
            SELECT id, recipe_id, foodstuff_id, amount
            FROM ingredient_lines
            WHERE recipe_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredient lines: {e}")))?;

        Ok(rows.iter().map(row_to_ingredient_line).collect())
    }

    /// Minified recipes of one author, newest first, optionally trimmed
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn summaries_by_author(
        &self,
        author_id: Uuid,
        limit: Option<i64>,
    ) -> AppResult<Vec<RecipeSummary>> {
        let base = r"
            SELECT id, name, image, cooking_time FROM recipes
            WHERE author_id = ?
            ORDER BY pub_date DESC, id DESC
            ";
        let rows = if let Some(limit) = limit {
            sqlx::query(&format!("{base} LIMIT ?"))
                .bind(author_id.to_string())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
        } else {
            sqlx::query(base)
                .bind(author_id.to_string())
                .fetch_all(&self.pool)
                .await
        }
        .map_err(|e| AppError::database(format!("Failed to list author recipes: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| {
                let image: String = row.get("image");
                RecipeSummary {
                    id: row.get("id"),
                    name: row.get("name"),
                    image: media::url_path(&image),
                    cooking_time: row.get("cooking_time"),
                }
            })
            .collect())
    }

    /// Count one author's recipes
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn count_by_author(&self, author_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM recipes WHERE author_id = $1")
            .bind(author_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count author recipes: {e}")))?;

        Ok(row.get("count"))
    }

    /// Tags for a set of recipes, grouped by recipe id
    async fn tags_for_recipes(&self, recipe_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Tag>>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders: String = recipe_ids
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            r"
            SELECT rt.recipe_id as recipe_id, t.id as id, t.name as name,
                   t.color as color, t.slug as slug
            FROM recipe_tags rt
            JOIN tags t ON t.id = rt.tag_id
            WHERE rt.recipe_id IN ({placeholders})
            ORDER BY rt.recipe_id ASC, t.id ASC
            "
        );

        let mut query_builder = sqlx::query(&query);
        for recipe_id in recipe_ids {
            query_builder = query_builder.bind(recipe_id);
        }
        let rows = query_builder
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe tags: {e}")))?;

        let mut grouped: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in &rows {
            let recipe_id: i64 = row.get("recipe_id");
            grouped.entry(recipe_id).or_default().push(Tag {
                id: row.get("id"),
                name: row.get("name"),
                color: row.get("color"),
                slug: row.get("slug"),
            });
        }
        Ok(grouped)
    }

    /// Ingredient details for a set of recipes, grouped by recipe id
    async fn ingredient_details_for_recipes(
        &self,
        recipe_ids: &[i64],
    ) -> AppResult<HashMap<i64, Vec<IngredientDetail>>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders: String = recipe_ids
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            r"
            SELECT il.recipe_id as recipe_id, il.foodstuff_id as id, f.name as name,
                   f.measurement_unit as measurement_unit, il.amount as amount
            FROM ingredient_lines il
            JOIN foodstuffs f ON f.id = il.foodstuff_id
            WHERE il.recipe_id IN ({placeholders})
            ORDER BY il.recipe_id ASC, il.id ASC
            "
        );

        let mut query_builder = sqlx::query(&query);
        for recipe_id in recipe_ids {
            query_builder = query_builder.bind(recipe_id);
        }
        let rows = query_builder
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get ingredient details: {e}")))?;

        let mut grouped: HashMap<i64, Vec<IngredientDetail>> = HashMap::new();
        for row in &rows {
            let recipe_id: i64 = row.get("recipe_id");
            grouped.entry(recipe_id).or_default().push(IngredientDetail {
                id: row.get("id"),
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                amount: row.get("amount"),
            });
        }
        Ok(grouped)
    }
}

/// Build the WHERE clause and its bind values for a recipe filter
///
/// All bind values are strings (uuids and slugs); the caller appends them in
/// order after its own leading binds.
fn filter_sql(filter: &RecipeFilter) -> (String, Vec<String>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut binds: Vec<String> = Vec::new();

    if let Some(author) = filter.author {
        clauses.push("r.author_id = ?".to_owned());
        binds.push(author.to_string());
    }
    if !filter.tag_slugs.is_empty() {
        let placeholders: String = filter
            .tag_slugs
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(", ");
        clauses.push(format!(
            "r.id IN (SELECT rt.recipe_id FROM recipe_tags rt \
             JOIN tags t ON t.id = rt.tag_id WHERE t.slug IN ({placeholders}))"
        ));
        binds.extend(filter.tag_slugs.iter().cloned());
    }
    if let Some(user) = filter.favorited_by {
        clauses.push("r.id IN (SELECT recipe_id FROM favorites WHERE user_id = ?)".to_owned());
        binds.push(user.to_string());
    }
    if let Some(user) = filter.in_basket_of {
        clauses.push("r.id IN (SELECT recipe_id FROM basket_entries WHERE user_id = ?)".to_owned());
        binds.push(user.to_string());
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    (where_sql, binds)
}

/// Attach tag links to a recipe inside an open transaction
async fn attach_tags(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    tag_ids: &[i64],
) -> AppResult<()> {
    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to attach tag: {e}")))?;
    }
    Ok(())
}

/// Fetch a recipe's ingredient lines inside an open transaction
async fn fetch_lines(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
) -> AppResult<Vec<IngredientLine>> {
    let rows = sqlx::query(
        r"
        SELECT id, recipe_id, foodstuff_id, amount
        FROM ingredient_lines
        WHERE recipe_id = $1
        ORDER BY id ASC
        ",
    )
    .bind(recipe_id)
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| AppError::database(format!("Failed to get ingredient lines: {e}")))?;

    Ok(rows.iter().map(row_to_ingredient_line).collect())
}

/// Apply a reconciliation plan to a recipe's lines inside an open transaction
async fn apply_plan(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    plan: &ReconcilePlan,
) -> AppResult<()> {
    for item in &plan.to_create {
        sqlx::query(
            "INSERT INTO ingredient_lines (recipe_id, foodstuff_id, amount) VALUES ($1, $2, $3)",
        )
        .bind(recipe_id)
        .bind(item.id)
        .bind(item.amount)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("An ingredient line for this foodstuff")
            } else {
                AppError::database(format!("Failed to insert ingredient line: {e}"))
            }
        })?;
    }

    for update in &plan.to_update {
        sqlx::query("UPDATE ingredient_lines SET amount = $1 WHERE id = $2 AND recipe_id = $3")
            .bind(update.amount)
            .bind(update.line_id)
            .bind(recipe_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to update ingredient line: {e}")))?;
    }

    if !plan.to_delete.is_empty() {
        let placeholders: String = plan
            .to_delete
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "DELETE FROM ingredient_lines WHERE recipe_id = ? AND foodstuff_id IN ({placeholders})"
        );
        let mut query_builder = sqlx::query(&query).bind(recipe_id);
        for foodstuff_id in &plan.to_delete {
            query_builder = query_builder.bind(foodstuff_id);
        }
        query_builder
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete ingredient lines: {e}")))?;
    }

    Ok(())
}

/// Convert a database row to a bare [`Recipe`]
fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let author_id_str: String = row.get("author_id");
    let pub_date_str: String = row.get("pub_date");

    Ok(Recipe {
        id: row.get("id"),
        author_id: Uuid::parse_str(&author_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        name: row.get("name"),
        image: row.get("image"),
        text: row.get("text"),
        cooking_time: row.get("cooking_time"),
        pub_date: DateTime::parse_from_rfc3339(&pub_date_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}

/// Convert a database row to an [`IngredientLine`]
fn row_to_ingredient_line(row: &SqliteRow) -> IngredientLine {
    IngredientLine {
        id: row.get("id"),
        recipe_id: row.get("recipe_id"),
        foodstuff_id: row.get("foodstuff_id"),
        amount: row.get("amount"),
    }
}

/// Assemble a [`RecipeDetail`] from a detail-columns row and its groups
fn row_to_detail(
    row: &SqliteRow,
    tags: Vec<Tag>,
    ingredients: Vec<IngredientDetail>,
) -> AppResult<RecipeDetail> {
    let author_id_str: String = row.get("author_id");
    let author_is_subscribed: i64 = row.get("author_is_subscribed");
    let is_favorited: i64 = row.get("is_favorited");
    let is_in_shopping_cart: i64 = row.get("is_in_shopping_cart");
    let image: String = row.get("image");

    Ok(RecipeDetail {
        id: row.get("id"),
        tags,
        author: UserProfile {
            id: Uuid::parse_str(&author_id_str)
                .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
            email: row.get("author_email"),
            username: row.get("author_username"),
            first_name: row.get("author_first_name"),
            last_name: row.get("author_last_name"),
            is_subscribed: author_is_subscribed == 1,
        },
        ingredients,
        is_favorited: is_favorited == 1,
        is_in_shopping_cart: is_in_shopping_cart == 1,
        name: row.get("name"),
        image: media::url_path(&image),
        text: row.get("text"),
        cooking_time: row.get("cooking_time"),
    })
}
