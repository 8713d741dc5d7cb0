// ABOUTME: Route handlers for recipe CRUD, favorites, basket membership, and the shopping-list export
// ABOUTME: Read endpoints are public with viewer-dependent flags; mutation requires the author or staff
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! Recipe routes
//!
//! The write payloads reference foodstuffs and tags by id and carry the
//! recipe image as a base64 data URI. Submitted ingredient lists are
//! reconciled against stored lines inside the managers; handlers here
//! validate shape, existence, and permissions before delegating.

use crate::constants::{MAX_RECIPE_NAME_LENGTH, SHOPPING_LIST_FILENAME};
use crate::database::{
    CatalogManager, NewRecipe, RecipeDetail, RecipeFilter, RecipePatch, RecipesManager,
    SocialManager,
};
use crate::errors::{AppError, AppResult};
use crate::models::{validate_cooking_time, IngredientRef, Recipe, RecipeSummary, User};
use crate::pagination::{Page, PageQuery, Pagination};
use crate::server::ServerResources;
use crate::shopping_list;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::Query;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Request body for creating a recipe
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    /// Desired ingredient list as (foodstuff id, amount) pairs
    pub ingredients: Vec<IngredientRef>,
    /// Tag ids to attach
    pub tags: Vec<i64>,
    /// Recipe image as a `data:image/...;base64,` URI
    pub image: String,
    /// Recipe name
    pub name: String,
    /// Free-form preparation text
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i64,
}

/// Request body for partially updating a recipe
#[derive(Debug, Deserialize, Default)]
pub struct UpdateRecipeRequest {
    /// Replacement ingredient list, reconciled against stored lines
    pub ingredients: Option<Vec<IngredientRef>>,
    /// Replacement tag set
    pub tags: Option<Vec<i64>>,
    /// Replacement image as a data URI
    pub image: Option<String>,
    /// New name
    pub name: Option<String>,
    /// New preparation text
    pub text: Option<String>,
    /// New cooking time in minutes
    pub cooking_time: Option<i64>,
}

/// Query parameters for the recipe listing
#[derive(Debug, Deserialize, Default)]
pub struct RecipesListQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Requested page size
    pub limit: Option<u32>,
    /// Restrict to one author id
    pub author: Option<String>,
    /// Restrict to recipes carrying any of these tag slugs (repeated key)
    #[serde(default)]
    pub tags: Vec<String>,
    /// `1` restricts to the requester's favorites
    pub is_favorited: Option<String>,
    /// `1` restricts to the requester's shopping cart
    pub is_in_shopping_cart: Option<String>,
}

/// Which membership list a toggle endpoint operates on
#[derive(Clone, Copy)]
enum MembershipKind {
    Favorite,
    Basket,
}

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/download_shopping_cart",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/recipes/:id/favorite",
                post(Self::handle_add_favorite).delete(Self::handle_remove_favorite),
            )
            .route(
                "/api/recipes/:id/shopping_cart",
                post(Self::handle_add_to_cart).delete(Self::handle_remove_from_cart),
            )
            .with_state(resources)
    }

    /// Extract and authenticate the user from the authorization header
    async fn authenticate(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> AppResult<User> {
        let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
        resources
            .auth_middleware
            .authenticate_request(auth_header)
            .await
    }

    /// Authenticate when a token is present, otherwise proceed anonymously
    async fn authenticate_optional(
        headers: &HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> AppResult<Option<User>> {
        let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
        resources
            .auth_middleware
            .authenticate_optional(auth_header)
            .await
    }

    fn recipes_manager(resources: &Arc<ServerResources>) -> RecipesManager {
        RecipesManager::new(resources.database.pool().clone())
    }

    fn social_manager(resources: &Arc<ServerResources>) -> SocialManager {
        SocialManager::new(resources.database.pool().clone())
    }

    /// Handle GET /api/recipes - Paginated recipe listing with filters
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<RecipesListQuery>,
    ) -> Result<Response, AppError> {
        let viewer = Self::authenticate_optional(&headers, &resources).await?;
        let viewer_id = viewer.map(|u| u.id);
        let params = Pagination::resolve(
            PageQuery {
                page: query.page,
                limit: query.limit,
            },
            resources.config.app_behavior.page_size,
        );
        let path = Self::filter_path(&query);

        let Some(filter) = Self::resolve_filters(&query, viewer_id) else {
            // Membership filters and unknown-author filters can match
            // nothing by construction; skip the storage round trip.
            let page: Page<RecipeDetail> = Page::assemble(Vec::new(), 0, params, &path);
            return Ok((StatusCode::OK, Json(page)).into_response());
        };

        let manager = Self::recipes_manager(&resources);
        let results = manager
            .list(&filter, viewer_id, params.fetch(), params.offset())
            .await?;
        let count = manager.count(&filter).await?;

        let page = Page::assemble(results, count, params, &path);
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/recipes - Create a recipe
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;

        Self::validate_name(&request.name)?;
        Self::validate_text(&request.text)?;
        validate_cooking_time(request.cooking_time)?;
        Self::validate_ingredients(&request.ingredients)?;
        if request.tags.is_empty() {
            return Err(AppError::invalid_input("At least one tag is required"));
        }

        let tag_ids = Self::resolve_tag_ids(&resources, &request.tags).await?;
        Self::check_foodstuffs_exist(&resources, &request.ingredients).await?;

        let image = resources.media_store.store_recipe_image(&request.image).await?;
        let input = NewRecipe {
            name: request.name,
            image,
            text: request.text,
            cooking_time: request.cooking_time,
            tag_ids,
            ingredients: request.ingredients,
        };

        let manager = Self::recipes_manager(&resources);
        let recipe_id = manager.create(user.id, &input).await?;
        tracing::info!(user_id = %user.id, recipe_id, "Recipe created");

        let detail = manager
            .get_detail(recipe_id, Some(user.id))
            .await?
            .ok_or_else(|| AppError::internal(format!("Recipe {recipe_id} missing after create")))?;
        Ok((StatusCode::CREATED, Json(detail)).into_response())
    }

    /// Handle GET /api/recipes/:id - Read one recipe
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let viewer = Self::authenticate_optional(&headers, &resources).await?;
        let detail = Self::recipes_manager(&resources)
            .get_detail(id, viewer.map(|u| u.id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle PATCH /api/recipes/:id - Partially update a recipe
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(request): Json<UpdateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;

        let manager = Self::recipes_manager(&resources);
        let recipe = manager
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;
        Self::check_author_or_staff(&user, &recipe)?;

        if let Some(name) = &request.name {
            Self::validate_name(name)?;
        }
        if let Some(text) = &request.text {
            Self::validate_text(text)?;
        }
        if let Some(cooking_time) = request.cooking_time {
            validate_cooking_time(cooking_time)?;
        }
        if let Some(ingredients) = &request.ingredients {
            Self::validate_ingredients(ingredients)?;
            Self::check_foodstuffs_exist(&resources, ingredients).await?;
        }
        let tag_ids = match &request.tags {
            Some(tags) => {
                if tags.is_empty() {
                    return Err(AppError::invalid_input("At least one tag is required"));
                }
                Some(Self::resolve_tag_ids(&resources, tags).await?)
            }
            None => None,
        };
        let image = match &request.image {
            Some(data_uri) => Some(resources.media_store.store_recipe_image(data_uri).await?),
            None => None,
        };

        let patch = RecipePatch {
            name: request.name,
            image,
            text: request.text,
            cooking_time: request.cooking_time,
            tag_ids,
            ingredients: request.ingredients,
        };

        let updated = manager.update(id, &patch).await?;
        if !updated {
            return Err(AppError::not_found(format!("Recipe {id}")));
        }
        tracing::info!(user_id = %user.id, recipe_id = id, "Recipe updated");

        let detail = manager
            .get_detail(id, Some(user.id))
            .await?
            .ok_or_else(|| AppError::internal(format!("Recipe {id} missing after update")))?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle DELETE /api/recipes/:id - Delete a recipe
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;

        let manager = Self::recipes_manager(&resources);
        let recipe = manager
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;
        Self::check_author_or_staff(&user, &recipe)?;

        manager.delete(id).await?;
        tracing::info!(user_id = %user.id, recipe_id = id, "Recipe deleted");
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    /// Handle POST /api/recipes/:id/favorite - Add to favorites
    async fn handle_add_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;
        Self::add_membership(&resources, &user, id, MembershipKind::Favorite).await
    }

    /// Handle DELETE /api/recipes/:id/favorite - Remove from favorites
    async fn handle_remove_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;
        Self::remove_membership(&resources, &user, id, MembershipKind::Favorite).await
    }

    /// Handle POST /api/recipes/:id/shopping_cart - Add to the basket
    async fn handle_add_to_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;
        Self::add_membership(&resources, &user, id, MembershipKind::Basket).await
    }

    /// Handle DELETE /api/recipes/:id/shopping_cart - Remove from the basket
    async fn handle_remove_from_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;
        Self::remove_membership(&resources, &user, id, MembershipKind::Basket).await
    }

    /// Handle GET /api/recipes/download_shopping_cart - Export the shopping list
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;

        let totals = Self::social_manager(&resources)
            .basket_ingredient_totals(user.id)
            .await?;
        let body = shopping_list::render(&totals);

        Ok((
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "text/plain; charset=utf-8".to_owned(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{SHOPPING_LIST_FILENAME}\""),
                ),
            ],
            body,
        )
            .into_response())
    }

    /// Add a recipe to one of the user's membership lists
    async fn add_membership(
        resources: &Arc<ServerResources>,
        user: &User,
        recipe_id: i64,
        kind: MembershipKind,
    ) -> Result<Response, AppError> {
        let recipe = Self::recipes_manager(resources)
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))?;

        let social = Self::social_manager(resources);
        let already = match kind {
            MembershipKind::Favorite => social.is_favorited(user.id, recipe_id).await?,
            MembershipKind::Basket => social.is_in_basket(user.id, recipe_id).await?,
        };
        if already {
            return Err(AppError::invalid_input(match kind {
                MembershipKind::Favorite => "Recipe is already in favorites",
                MembershipKind::Basket => "Recipe is already in the shopping cart",
            }));
        }

        match kind {
            MembershipKind::Favorite => social.add_favorite(user.id, recipe_id).await?,
            MembershipKind::Basket => social.add_basket_entry(user.id, recipe_id).await?,
        }

        let summary = RecipeSummary::from_recipe(&recipe);
        Ok((StatusCode::CREATED, Json(summary)).into_response())
    }

    /// Remove a recipe from one of the user's membership lists
    async fn remove_membership(
        resources: &Arc<ServerResources>,
        user: &User,
        recipe_id: i64,
        kind: MembershipKind,
    ) -> Result<Response, AppError> {
        let social = Self::social_manager(resources);
        let removed = match kind {
            MembershipKind::Favorite => social.remove_favorite(user.id, recipe_id).await?,
            MembershipKind::Basket => social.remove_basket_entry(user.id, recipe_id).await?,
        };
        if !removed {
            return Err(AppError::not_found(match kind {
                MembershipKind::Favorite => "Favorite",
                MembershipKind::Basket => "Shopping cart entry",
            }));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    /// Translate list query parameters into a storage filter
    ///
    /// Returns `None` when the combination can only match an empty set:
    /// an unparseable author id, or a membership filter without a viewer.
    fn resolve_filters(query: &RecipesListQuery, viewer: Option<Uuid>) -> Option<RecipeFilter> {
        let mut filter = RecipeFilter::default();

        if let Some(author) = &query.author {
            match Uuid::parse_str(author) {
                Ok(author_id) => filter.author = Some(author_id),
                Err(_) => return None,
            }
        }

        let mut slugs = query.tags.clone();
        slugs.sort_unstable();
        slugs.dedup();
        filter.tag_slugs = slugs;

        if query.is_favorited.as_deref() == Some("1") {
            match viewer {
                Some(viewer) => filter.favorited_by = Some(viewer),
                None => return None,
            }
        }
        if query.is_in_shopping_cart.as_deref() == Some("1") {
            match viewer {
                Some(viewer) => filter.in_basket_of = Some(viewer),
                None => return None,
            }
        }

        Some(filter)
    }

    /// Canonical request path for page links, with filters but without page params
    fn filter_path(query: &RecipesListQuery) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(author) = &query.author {
            parts.push(format!("author={author}"));
        }
        for slug in &query.tags {
            parts.push(format!("tags={slug}"));
        }
        if let Some(value) = &query.is_favorited {
            parts.push(format!("is_favorited={value}"));
        }
        if let Some(value) = &query.is_in_shopping_cart {
            parts.push(format!("is_in_shopping_cart={value}"));
        }

        if parts.is_empty() {
            "/api/recipes".to_owned()
        } else {
            format!("/api/recipes?{}", parts.join("&"))
        }
    }

    fn check_author_or_staff(user: &User, recipe: &Recipe) -> AppResult<()> {
        if user.id == recipe.author_id || user.is_staff {
            Ok(())
        } else {
            Err(AppError::permission_denied(
                "Only the author or staff may modify this recipe",
            ))
        }
    }

    fn validate_name(name: &str) -> AppResult<()> {
        if name.is_empty() || name.len() > MAX_RECIPE_NAME_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Recipe name must be 1-{MAX_RECIPE_NAME_LENGTH} characters"
            )));
        }
        Ok(())
    }

    fn validate_text(text: &str) -> AppResult<()> {
        if text.is_empty() {
            return Err(AppError::invalid_input("Recipe text must not be empty"));
        }
        Ok(())
    }

    fn validate_ingredients(ingredients: &[IngredientRef]) -> AppResult<()> {
        if ingredients.is_empty() {
            return Err(AppError::invalid_input(
                "At least one ingredient is required",
            ));
        }
        for item in ingredients {
            item.validate()?;
        }
        Ok(())
    }

    /// De-duplicate submitted tag ids and verify they all exist
    async fn resolve_tag_ids(
        resources: &Arc<ServerResources>,
        tag_ids: &[i64],
    ) -> AppResult<Vec<i64>> {
        let mut unique = tag_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let found = CatalogManager::new(resources.database.pool().clone())
            .get_tags_by_ids(&unique)
            .await?;
        if found.len() != unique.len() {
            let found_ids: HashSet<i64> = found.iter().map(|t| t.id).collect();
            if let Some(id) = unique.iter().find(|id| !found_ids.contains(id)) {
                return Err(AppError::not_found(format!("Tag {id}")));
            }
        }
        Ok(unique)
    }

    /// Verify every referenced foodstuff exists
    async fn check_foodstuffs_exist(
        resources: &Arc<ServerResources>,
        ingredients: &[IngredientRef],
    ) -> AppResult<()> {
        let mut ids: Vec<i64> = ingredients.iter().map(|item| item.id).collect();
        ids.sort_unstable();
        ids.dedup();

        let found = CatalogManager::new(resources.database.pool().clone())
            .get_foodstuffs_by_ids(&ids)
            .await?;
        if found.len() != ids.len() {
            let found_ids: HashSet<i64> = found.iter().map(|f| f.id).collect();
            if let Some(id) = ids.iter().find(|id| !found_ids.contains(id)) {
                return Err(AppError::not_found(format!("Ingredient {id}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_with(tags: &[&str]) -> RecipesListQuery {
        RecipesListQuery {
            tags: tags.iter().map(|s| (*s).to_owned()).collect(),
            ..RecipesListQuery::default()
        }
    }

    #[test]
    fn test_tag_slugs_deduplicated() {
        let query = query_with(&["breakfast", "lunch", "breakfast"]);
        let filter = RecipeRoutes::resolve_filters(&query, None).unwrap();
        assert_eq!(filter.tag_slugs, vec!["breakfast", "lunch"]);
    }

    #[test]
    fn test_membership_filter_requires_viewer() {
        let query = RecipesListQuery {
            is_favorited: Some("1".into()),
            ..RecipesListQuery::default()
        };
        assert!(RecipeRoutes::resolve_filters(&query, None).is_none());

        let viewer = Uuid::new_v4();
        let filter = RecipeRoutes::resolve_filters(&query, Some(viewer)).unwrap();
        assert_eq!(filter.favorited_by, Some(viewer));
    }

    #[test]
    fn test_membership_filter_only_enabled_by_literal_one() {
        let query = RecipesListQuery {
            is_favorited: Some("true".into()),
            is_in_shopping_cart: Some("0".into()),
            ..RecipesListQuery::default()
        };
        // Non-"1" values disable the filters entirely, even for anonymous
        let filter = RecipeRoutes::resolve_filters(&query, None).unwrap();
        assert_eq!(filter.favorited_by, None);
        assert_eq!(filter.in_basket_of, None);
    }

    #[test]
    fn test_unparseable_author_matches_nothing() {
        let query = RecipesListQuery {
            author: Some("not-a-uuid".into()),
            ..RecipesListQuery::default()
        };
        assert!(RecipeRoutes::resolve_filters(&query, None).is_none());
    }

    #[test]
    fn test_filter_path_carries_filters_only() {
        let query = RecipesListQuery {
            page: Some(3),
            limit: Some(6),
            author: None,
            tags: vec!["vegan".into()],
            is_favorited: Some("1".into()),
            is_in_shopping_cart: None,
        };
        assert_eq!(
            RecipeRoutes::filter_path(&query),
            "/api/recipes?tags=vegan&is_favorited=1"
        );
        assert_eq!(
            RecipeRoutes::filter_path(&RecipesListQuery::default()),
            "/api/recipes"
        );
    }
}
