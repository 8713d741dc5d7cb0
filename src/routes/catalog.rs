// ABOUTME: Route handlers for the public tag and foodstuff catalog
// ABOUTME: Unpaginated reads with name-prefix search over foodstuffs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! Catalog routes
//!
//! Tags and foodstuffs are reference data maintained out of band; these
//! endpoints are read-only, public, and unpaginated.

use crate::database::CatalogManager;
use crate::errors::AppError;
use crate::server::ServerResources;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for the foodstuff listing
#[derive(Debug, Deserialize, Default)]
pub struct IngredientsQuery {
    /// Case-insensitive name prefix to search for
    pub name: Option<String>,
}

/// Catalog routes handler
pub struct CatalogRoutes;

impl CatalogRoutes {
    /// Create all catalog routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/tags", get(Self::handle_list_tags))
            .route("/api/tags/:id", get(Self::handle_get_tag))
            .route("/api/ingredients", get(Self::handle_list_ingredients))
            .route("/api/ingredients/:id", get(Self::handle_get_ingredient))
            .with_state(resources)
    }

    fn manager(resources: &Arc<ServerResources>) -> CatalogManager {
        CatalogManager::new(resources.database.pool().clone())
    }

    /// Handle GET /api/tags - List all tags
    async fn handle_list_tags(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let tags = Self::manager(&resources).list_tags().await?;
        Ok((StatusCode::OK, Json(tags)).into_response())
    }

    /// Handle GET /api/tags/:id - Get one tag
    async fn handle_get_tag(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let tag = Self::manager(&resources)
            .get_tag(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tag {id}")))?;
        Ok((StatusCode::OK, Json(tag)).into_response())
    }

    /// Handle GET /api/ingredients - List foodstuffs, optionally by name prefix
    async fn handle_list_ingredients(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<IngredientsQuery>,
    ) -> Result<Response, AppError> {
        let foodstuffs = Self::manager(&resources)
            .list_foodstuffs(query.name.as_deref())
            .await?;
        Ok((StatusCode::OK, Json(foodstuffs)).into_response())
    }

    /// Handle GET /api/ingredients/:id - Get one foodstuff
    async fn handle_get_ingredient(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let foodstuff = Self::manager(&resources)
            .get_foodstuff(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {id}")))?;
        Ok((StatusCode::OK, Json(foodstuff)).into_response())
    }
}
