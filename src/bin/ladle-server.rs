// ABOUTME: Server binary wiring configuration, storage and authentication into the HTTP service
// ABOUTME: Loads environment configuration, runs migrations and serves the recipe API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! # Ladle Server Binary
//!
//! Starts the recipe-sharing API: loads configuration from the environment,
//! connects to storage, and serves the HTTP API until shutdown.

use anyhow::Result;
use clap::Parser;
use ladle::{
    auth::AuthManager,
    config::environment::ServerConfig,
    database::Database,
    logging,
    server::{LadleServer, ServerResources},
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "ladle-server")]
#[command(about = "Ladle - recipe sharing API server")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Container entrypoints sometimes pass stray arguments; fall back to
    // environment-only configuration instead of refusing to start.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Argument parsing failed: {e}");
            eprintln!("Using environment configuration");
            Args { http_port: None }
        }
    };

    let mut config = ServerConfig::from_env()?;

    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Ladle recipe API");
    info!("{}", config.summary());

    let database = Database::new(&config.database.url).await?;
    info!("Database initialized: {}", config.database.url);

    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_expiry_hours,
    );
    info!("Authentication manager initialized");

    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config.clone()),
    ));
    let server = LadleServer::new(resources);

    info!("Server starting on port {}", config.http_port);
    display_available_endpoints(&config);
    info!("Ready to serve recipes!");

    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Display all available API endpoints with their ports
fn display_available_endpoints(config: &ServerConfig) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    info!("=== Available API Endpoints ===");
    display_auth_endpoints(&host, config.http_port);
    display_user_endpoints(&host, config.http_port);
    display_catalog_endpoints(&host, config.http_port);
    display_recipe_endpoints(&host, config.http_port);
    display_health_endpoints(&host, config.http_port);
    info!("=== End of Endpoint List ===");
}

#[allow(clippy::cognitive_complexity)]
fn display_auth_endpoints(host: &str, port: u16) {
    info!("Authentication:");
    info!("   Registration:      POST http://{host}:{port}/api/users");
    info!("   Login:             POST http://{host}:{port}/api/auth/login");
    info!("   Change Password:   POST http://{host}:{port}/api/users/set_password");
}

#[allow(clippy::cognitive_complexity)]
fn display_user_endpoints(host: &str, port: u16) {
    info!("Users & Subscriptions:");
    info!("   List Users:        GET  http://{host}:{port}/api/users");
    info!("   Current User:      GET  http://{host}:{port}/api/users/me");
    info!("   User Profile:      GET  http://{host}:{port}/api/users/{{id}}");
    info!("   My Subscriptions:  GET  http://{host}:{port}/api/users/subscriptions");
    info!("   Subscribe:         POST http://{host}:{port}/api/users/{{id}}/subscribe");
    info!("   Unsubscribe:       DELETE http://{host}:{port}/api/users/{{id}}/subscribe");
}

#[allow(clippy::cognitive_complexity)]
fn display_catalog_endpoints(host: &str, port: u16) {
    info!("Catalog:");
    info!("   List Tags:         GET  http://{host}:{port}/api/tags");
    info!("   Get Tag:           GET  http://{host}:{port}/api/tags/{{id}}");
    info!("   List Ingredients:  GET  http://{host}:{port}/api/ingredients");
    info!("   Get Ingredient:    GET  http://{host}:{port}/api/ingredients/{{id}}");
}

#[allow(clippy::cognitive_complexity)]
fn display_recipe_endpoints(host: &str, port: u16) {
    info!("Recipes:");
    info!("   List Recipes:      GET  http://{host}:{port}/api/recipes");
    info!("   Create Recipe:     POST http://{host}:{port}/api/recipes");
    info!("   Get Recipe:        GET  http://{host}:{port}/api/recipes/{{id}}");
    info!("   Update Recipe:     PATCH http://{host}:{port}/api/recipes/{{id}}");
    info!("   Delete Recipe:     DELETE http://{host}:{port}/api/recipes/{{id}}");
    info!("   Favorite:          POST http://{host}:{port}/api/recipes/{{id}}/favorite");
    info!("   Shopping Cart:     POST http://{host}:{port}/api/recipes/{{id}}/shopping_cart");
    info!("   Download List:     GET  http://{host}:{port}/api/recipes/download_shopping_cart");
}

#[allow(clippy::cognitive_complexity)]
fn display_health_endpoints(host: &str, port: u16) {
    info!("Monitoring:");
    info!("   Health Check:      GET  http://{host}:{port}/health");
    info!("   Readiness:         GET  http://{host}:{port}/ready");
}
