// ABOUTME: Request authentication middleware resolving bearer tokens to user records
// ABOUTME: Distinguishes required and optional authentication for read endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::AuthManager;
use crate::database::UsersManager;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Middleware for HTTP request authentication
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: Arc<AuthManager>,
    users: Arc<UsersManager>,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub fn new(auth_manager: Arc<AuthManager>, pool: SqlitePool) -> Self {
        Self {
            auth_manager,
            users: Arc::new(UsersManager::new(pool)),
        }
    }

    /// Authenticate a request and load the current user
    ///
    /// # Errors
    ///
    /// Returns an authentication error when the header is missing or not a
    /// bearer token, when the token fails validation, or when the token's
    /// subject no longer resolves to a user.
    pub async fn authenticate_request(&self, auth_header: Option<&str>) -> AppResult<User> {
        let Some(auth_str) = auth_header else {
            warn!("Authentication failed: missing authorization header");
            return Err(AppError::auth_required());
        };

        let Some(token) = auth_str.strip_prefix("Bearer ") else {
            warn!("Authentication failed: invalid authorization header format");
            return Err(AppError::auth_invalid(
                "Invalid authorization header format - must be 'Bearer <token>'",
            ));
        };

        let claims = self.auth_manager.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_invalid("Invalid user id in token"))?;

        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Token subject no longer exists"))?;

        debug!(user_id = %user.id, "Request authenticated");
        Ok(user)
    }

    /// Authenticate when credentials are present, pass through when absent
    ///
    /// Read endpoints accept anonymous requests but still reject bad
    /// credentials: a present-but-invalid token is an error, not anonymity.
    ///
    /// # Errors
    ///
    /// Returns an authentication error only when a header is present and
    /// fails validation.
    pub async fn authenticate_optional(
        &self,
        auth_header: Option<&str>,
    ) -> AppResult<Option<User>> {
        match auth_header {
            None => Ok(None),
            Some(_) => self.authenticate_request(auth_header).await.map(Some),
        }
    }
}
