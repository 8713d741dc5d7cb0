// ABOUTME: Authentication route handlers for registration, login, and password changes
// ABOUTME: AuthService carries the business logic, AuthRoutes the axum wiring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! Authentication routes
//!
//! Registration creates an account and returns its public profile; login
//! exchanges credentials for an HS256 JWT; `set_password` rotates the
//! bcrypt hash after re-verifying the current password.

use crate::auth::{hash_password, verify_password, AuthManager};
use crate::constants::{
    MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, MIN_PASSWORD_LENGTH,
};
use crate::database::UsersManager;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{User, UserProfile};
use crate::server::ServerResources;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Email address, used for login
    pub email: String,
    /// Public username
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Plain-text password, hashed before storage
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// User login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub auth_token: String,
    /// Token expiry as an RFC 3339 timestamp
    pub expires_at: String,
    /// The authenticated user's profile
    pub user: UserProfile,
}

/// Password change request
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    /// The replacement password
    pub new_password: String,
    /// The current password, re-verified before the change
    pub current_password: String,
}

/// Authentication service for business logic
pub struct AuthService {
    users: UsersManager,
    auth_manager: Arc<AuthManager>,
}

impl AuthService {
    /// Create an auth service over the given managers
    #[must_use]
    pub const fn new(users: UsersManager, auth_manager: Arc<AuthManager>) -> Self {
        Self {
            users,
            auth_manager,
        }
    }

    fn from_resources(resources: &Arc<ServerResources>) -> Self {
        Self::new(
            UsersManager::new(resources.database.pool().clone()),
            resources.auth_manager.clone(),
        )
    }

    /// Handle user registration
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed fields or a taken
    /// email/username, and a database error when storage fails.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserProfile> {
        tracing::info!("User registration attempt for email: {}", request.email);

        Self::validate_registration(&request)?;

        // Pre-check both unique columns so callers get a validation error;
        // a concurrent insert still surfaces as a conflict from storage.
        if self.users.get_by_email(&request.email).await?.is_some() {
            return Err(AppError::invalid_input(
                "A user with this email already exists",
            ));
        }
        if self
            .users
            .get_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::invalid_input(
                "A user with this username already exists",
            ));
        }

        let password_hash = hash_password(request.password).await?;
        let user = User::new(
            request.email,
            request.username,
            request.first_name,
            request.last_name,
            password_hash,
        );
        self.users.create(&user).await?;

        AppLogger::log_auth_event(&user.id.to_string(), "register", true, None);
        tracing::info!("User registered successfully: {} ({})", user.email, user.id);

        Ok(UserProfile::from_user(&user, false))
    }

    /// Handle user login
    ///
    /// # Errors
    ///
    /// Returns an authentication error for unknown emails or wrong
    /// passwords, and an internal error when token generation fails.
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        tracing::info!("User login attempt for email: {}", request.email);

        let Some(user) = self.users.get_by_email(&request.email).await? else {
            AppLogger::log_security_event(
                "login_failed",
                "warning",
                "Login attempt for unknown email",
                None,
            );
            return Err(AppError::auth_invalid("Invalid email or password"));
        };

        let is_valid =
            verify_password(request.password, user.password_hash.clone()).await?;
        if !is_valid {
            AppLogger::log_auth_event(
                &user.id.to_string(),
                "login",
                false,
                Some("invalid password"),
            );
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        let auth_token = self.auth_manager.generate_token(&user)?;
        let expires_at = self.auth_manager.token_expiry().to_rfc3339();

        AppLogger::log_auth_event(&user.id.to_string(), "login", true, None);

        Ok(LoginResponse {
            auth_token,
            expires_at,
            user: UserProfile::from_user(&user, false),
        })
    }

    /// Handle a password change for an authenticated user
    ///
    /// # Errors
    ///
    /// Returns a validation error when the current password does not match
    /// or the new password is too weak.
    pub async fn set_password(&self, user: &User, request: SetPasswordRequest) -> AppResult<()> {
        let current_ok =
            verify_password(request.current_password, user.password_hash.clone()).await?;
        if !current_ok {
            AppLogger::log_auth_event(
                &user.id.to_string(),
                "password_change",
                false,
                Some("current password mismatch"),
            );
            return Err(AppError::invalid_input("Current password is incorrect"));
        }

        if !Self::is_valid_password(&request.new_password) {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let password_hash = hash_password(request.new_password).await?;
        let updated = self.users.update_password(user.id, &password_hash).await?;
        if !updated {
            return Err(AppError::not_found(format!("User {}", user.id)));
        }

        AppLogger::log_auth_event(&user.id.to_string(), "password_change", true, None);
        Ok(())
    }

    fn validate_registration(request: &RegisterRequest) -> AppResult<()> {
        if !Self::is_valid_email(&request.email) || request.email.len() > MAX_EMAIL_LENGTH {
            return Err(AppError::invalid_input("Invalid email format"));
        }
        if !Self::is_valid_username(&request.username) {
            return Err(AppError::invalid_input(format!(
                "Username must be 1-{MAX_USERNAME_LENGTH} characters of letters, digits, or @.+-_"
            )));
        }
        if request.first_name.is_empty() || request.first_name.len() > MAX_NAME_LENGTH {
            return Err(AppError::invalid_input(format!(
                "First name must be 1-{MAX_NAME_LENGTH} characters"
            )));
        }
        if request.last_name.is_empty() || request.last_name.len() > MAX_NAME_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Last name must be 1-{MAX_NAME_LENGTH} characters"
            )));
        }
        if !Self::is_valid_password(&request.password) {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }

    /// Validate email format
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        if email.len() < 5 {
            return false;
        }
        let Some(at_pos) = email.find('@') else {
            return false;
        };
        if at_pos == 0 || at_pos == email.len() - 1 {
            return false;
        }
        let domain = &email[at_pos + 1..];
        domain.contains('.')
    }

    /// Validate username shape
    #[must_use]
    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty()
            && username.len() <= MAX_USERNAME_LENGTH
            && username
                .chars()
                .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    }

    /// Validate password strength
    #[must_use]
    pub const fn is_valid_password(password: &str) -> bool {
        password.len() >= MIN_PASSWORD_LENGTH
    }
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/users", post(Self::handle_register))
            .route("/api/users/set_password", post(Self::handle_set_password))
            .route("/api/auth/login", post(Self::handle_login))
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

    /// Handle POST /api/users - Register a new account
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let service = AuthService::from_resources(&resources);
        let profile = service.register(request).await?;
        Ok((StatusCode::CREATED, Json(profile)).into_response())
    }

    /// Handle POST /api/auth/login - Exchange credentials for a token
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let service = AuthService::from_resources(&resources);
        let response = service.login(request).await?;
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle POST /api/users/set_password - Change the current user's password
    async fn handle_set_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SetPasswordRequest>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources).await?;
        let service = AuthService::from_resources(&resources);
        service.set_password(&user, request).await?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}
