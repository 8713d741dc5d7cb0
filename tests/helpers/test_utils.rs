// ABOUTME: Fixture builders for integration tests: resources, users, catalog rows, recipes
// ABOUTME: Seeds storage directly through the managers so tests can focus on HTTP behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use anyhow::Result;
use ladle::{
    auth::AuthManager,
    config::{
        AppBehaviorConfig, AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel,
        SecurityConfig, ServerConfig,
    },
    database::{CatalogManager, Database, NewRecipe, RecipesManager, UsersManager},
    models::{Foodstuff, IngredientRef, Tag, User},
    server::ServerResources,
};
use std::path::Path;
use std::sync::{Arc, Once};
use tempfile::TempDir;
use uuid::Uuid;

/// Password every seeded user can log in with
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// JWT signing secret shared by all test resources
const TEST_JWT_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Build a testing configuration rooted at the given media directory
pub fn test_config(media_dir: &Path) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        log_level: LogLevel::Warn,
        environment: Environment::Testing,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        auth: AuthConfig {
            jwt_secret: String::from_utf8_lossy(TEST_JWT_SECRET).into_owned(),
            jwt_expiry_hours: 24,
        },
        security: SecurityConfig {
            cors_origins: vec!["*".to_owned()],
        },
        app_behavior: AppBehaviorConfig {
            page_size: 6,
            media_dir: media_dir.to_path_buf(),
            server_name: "ladle-test".to_owned(),
            server_version: env!("CARGO_PKG_VERSION").to_owned(),
        },
    }
}

/// Create full server resources over an in-memory database
///
/// Returns the media temp directory alongside the resources; dropping it
/// removes any images the test wrote.
pub async fn create_test_resources() -> Result<(Arc<ServerResources>, TempDir)> {
    init_test_logging();

    let media_dir = tempfile::tempdir()?;
    let config = test_config(media_dir.path());

    let database = Database::new(&config.database.url).await?;
    let auth_manager = AuthManager::new(TEST_JWT_SECRET, config.auth.jwt_expiry_hours);

    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    ));
    Ok((resources, media_dir))
}

/// Hash of [`TEST_PASSWORD`] at the minimum bcrypt cost
///
/// Cost 4 keeps fixture setup fast; login round trips still verify.
fn fixture_password_hash() -> String {
    bcrypt::hash(TEST_PASSWORD, 4).expect("bcrypt hash")
}

/// Insert a regular user directly into storage
pub async fn seed_user(resources: &Arc<ServerResources>, email: &str, username: &str) -> Result<User> {
    let user = User::new(
        email.to_owned(),
        username.to_owned(),
        "Test".to_owned(),
        "User".to_owned(),
        fixture_password_hash(),
    );
    UsersManager::new(resources.database.pool().clone())
        .create(&user)
        .await?;
    Ok(user)
}

/// Insert a staff user directly into storage
pub async fn seed_staff_user(
    resources: &Arc<ServerResources>,
    email: &str,
    username: &str,
) -> Result<User> {
    let mut user = User::new(
        email.to_owned(),
        username.to_owned(),
        "Staff".to_owned(),
        "User".to_owned(),
        fixture_password_hash(),
    );
    user.is_staff = true;
    UsersManager::new(resources.database.pool().clone())
        .create(&user)
        .await?;
    Ok(user)
}

/// Issue a bearer token for a seeded user
pub fn token_for(resources: &Arc<ServerResources>, user: &User) -> String {
    resources
        .auth_manager
        .generate_token(user)
        .expect("token generation")
}

/// Insert a tag
pub async fn seed_tag(
    resources: &Arc<ServerResources>,
    name: &str,
    color: &str,
    slug: &str,
) -> Result<Tag> {
    let tag = CatalogManager::new(resources.database.pool().clone())
        .create_tag(name, color, slug)
        .await?;
    Ok(tag)
}

/// Insert a foodstuff
pub async fn seed_foodstuff(
    resources: &Arc<ServerResources>,
    name: &str,
    measurement_unit: &str,
) -> Result<Foodstuff> {
    let foodstuff = CatalogManager::new(resources.database.pool().clone())
        .create_foodstuff(name, measurement_unit)
        .await?;
    Ok(foodstuff)
}

/// Insert a recipe directly into storage, bypassing image intake
pub async fn seed_recipe(
    resources: &Arc<ServerResources>,
    author_id: Uuid,
    name: &str,
    tag_ids: &[i64],
    ingredients: &[(i64, i64)],
) -> Result<i64> {
    let input = NewRecipe {
        name: name.to_owned(),
        image: format!("recipes/{}.png", Uuid::new_v4().simple()),
        text: format!("How to make {name}."),
        cooking_time: 15,
        tag_ids: tag_ids.to_vec(),
        ingredients: ingredients
            .iter()
            .map(|&(id, amount)| IngredientRef { id, amount })
            .collect(),
    };
    let recipe_id = RecipesManager::new(resources.database.pool().clone())
        .create(author_id, &input)
        .await?;
    Ok(recipe_id)
}

/// A 1x1 transparent PNG as a base64 data URI for image-intake paths
pub fn png_data_uri() -> String {
    "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==".to_owned()
}
