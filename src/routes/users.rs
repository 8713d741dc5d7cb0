// ABOUTME: Route handlers for user profiles and author subscriptions
// ABOUTME: Provides user listing, the current-user endpoint, and subscribe/unsubscribe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! User routes
//!
//! Profile reads are public; the `is_subscribed` flag on every profile is
//! computed against the requester and stays false for anonymous reads.
//! Subscription endpoints require authentication.

use crate::database::{RecipesManager, SocialManager, UsersManager};
use crate::errors::{AppError, AppResult};
use crate::models::{RecipeSummary, User, UserProfile};
use crate::pagination::{Page, PageQuery, Pagination};
use crate::server::ServerResources;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// One entry in a subscriptions listing: the author plus their recipes
#[derive(Debug, Serialize)]
pub struct SubscriptionItem {
    /// The subscribed-to author's profile
    #[serde(flatten)]
    pub profile: UserProfile,
    /// The author's recipes, newest first, possibly trimmed
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes the author has published
    pub recipes_count: i64,
}

/// Query parameters for the subscriptions listing
#[derive(Debug, Deserialize, Default)]
pub struct SubscriptionsQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Requested page size
    pub limit: Option<u32>,
    /// Trim each author's recipe list to this many entries (non-negative)
    pub recipes_limit: Option<i64>,
}

/// Query parameters accepted by the subscribe endpoint
#[derive(Debug, Deserialize, Default)]
pub struct RecipesLimitQuery {
    /// Trim the returned recipe list to this many entries (non-negative)
    pub recipes_limit: Option<i64>,
}

/// User routes handler
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users", get(Self::handle_list))
            .route("/api/users/me", get(Self::handle_me))
            .route("/api/users/subscriptions", get(Self::handle_subscriptions))
            .route("/api/users/:id", get(Self::handle_get))
            .route(
                "/api/users/:id/subscribe",
                post(Self::handle_subscribe).delete(Self::handle_unsubscribe),
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

    fn parse_user_id(id: &str) -> AppResult<Uuid> {
        Uuid::parse_str(id).map_err(|_| AppError::not_found(format!("User {id}")))
    }

    /// Handle GET /api/users - Paginated user listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<PageQuery>,
    ) -> Result<Response, AppError> {
        let viewer = Self::authenticate_optional(&headers, &resources).await?;
        let params = Pagination::resolve(query, resources.config.app_behavior.page_size);

        let users = UsersManager::new(resources.database.pool().clone());
        let page_users = users.list(params.fetch(), params.offset()).await?;
        let count = users.count().await?;

        let subscribed = match &viewer {
            Some(viewer) => {
                let author_ids: Vec<Uuid> = page_users.iter().map(|u| u.id).collect();
                SocialManager::new(resources.database.pool().clone())
                    .subscribed_ids_among(viewer.id, &author_ids)
                    .await?
            }
            None => std::collections::HashSet::new(),
        };

        let profiles: Vec<UserProfile> = page_users
            .iter()
            .map(|u| UserProfile::from_user(u, subscribed.contains(&u.id)))
            .collect();

        let page = Page::assemble(profiles, count, params, "/api/users");
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle GET /api/users/me - Current user's profile
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;
        let profile = UserProfile::from_user(&user, false);
        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Handle GET /api/users/:id - Public profile
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let viewer = Self::authenticate_optional(&headers, &resources).await?;
        let user_id = Self::parse_user_id(&id)?;

        let users = UsersManager::new(resources.database.pool().clone());
        let user = users
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id}")))?;

        let is_subscribed = match viewer {
            Some(viewer) => {
                SocialManager::new(resources.database.pool().clone())
                    .is_subscribed(viewer.id, user.id)
                    .await?
            }
            None => false,
        };

        let profile = UserProfile::from_user(&user, is_subscribed);
        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Handle GET /api/users/subscriptions - Authors the requester follows
    async fn handle_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<SubscriptionsQuery>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;
        let params = Pagination::resolve(
            PageQuery {
                page: query.page,
                limit: query.limit,
            },
            resources.config.app_behavior.page_size,
        );
        let recipes_limit = query.recipes_limit.filter(|n| *n >= 0);

        let social = SocialManager::new(resources.database.pool().clone());
        let authors = social
            .list_subscribed_authors(user.id, params.fetch(), params.offset())
            .await?;
        let count = social.count_subscribed_authors(user.id).await?;

        let mut results = Vec::with_capacity(authors.len());
        for author in &authors {
            results.push(Self::build_subscription_item(&resources, author, recipes_limit).await?);
        }

        let page = Page::assemble(results, count, params, "/api/users/subscriptions");
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/users/:id/subscribe - Follow an author
    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Query(query): Query<RecipesLimitQuery>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;
        let author_id = Self::parse_user_id(&id)?;

        let users = UsersManager::new(resources.database.pool().clone());
        let author = users
            .get(author_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id}")))?;

        if user.id == author.id {
            return Err(AppError::invalid_input("Cannot subscribe to yourself"));
        }

        let social = SocialManager::new(resources.database.pool().clone());
        if social.is_subscribed(user.id, author.id).await? {
            return Err(AppError::invalid_input("Already subscribed to this author"));
        }
        social.subscribe(user.id, author.id).await?;

        let recipes_limit = query.recipes_limit.filter(|n| *n >= 0);
        let item = Self::build_subscription_item(&resources, &author, recipes_limit).await?;
        Ok((StatusCode::CREATED, Json(item)).into_response())
    }

    /// Handle DELETE /api/users/:id/subscribe - Unfollow an author
    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;
        let author_id = Self::parse_user_id(&id)?;

        let users = UsersManager::new(resources.database.pool().clone());
        if users.get(author_id).await?.is_none() {
            return Err(AppError::not_found(format!("User {id}")));
        }

        let removed = SocialManager::new(resources.database.pool().clone())
            .unsubscribe(user.id, author_id)
            .await?;
        if !removed {
            return Err(AppError::not_found("Subscription"));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    /// Assemble an author's subscription entry with their recipe summaries
    async fn build_subscription_item(
        resources: &Arc<ServerResources>,
        author: &User,
        recipes_limit: Option<i64>,
    ) -> AppResult<SubscriptionItem> {
        let recipes = RecipesManager::new(resources.database.pool().clone());
        let summaries = recipes.summaries_by_author(author.id, recipes_limit).await?;
        let recipes_count = recipes.count_by_author(author.id).await?;

        Ok(SubscriptionItem {
            profile: UserProfile::from_user(author, true),
            recipes: summaries,
            recipes_count,
        })
    }
}
