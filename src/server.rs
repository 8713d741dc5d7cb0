// ABOUTME: Centralized resource container and the HTTP server entry point
// ABOUTME: Assembles the router from per-domain route structs and serves it with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! # Server Module
//!
//! `ServerResources` holds the shared resources every handler needs so
//! expensive objects are created once and shared via `Arc`. `LadleServer`
//! assembles the per-domain routers, applies the middleware stack, and
//! runs the axum server until a shutdown signal arrives.

use crate::auth::AuthManager;
use crate::config::environment::ServerConfig;
use crate::constants::{MAX_REQUEST_BODY_BYTES, REQUEST_TIMEOUT_SECS};
use crate::database::Database;
use crate::media::MediaStore;
use crate::middleware::{setup_cors, AuthMiddleware};
use crate::routes::{AuthRoutes, CatalogRoutes, HealthRoutes, RecipeRoutes, UserRoutes};
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Centralized resource container for dependency injection
///
/// Holds all shared server resources so route handlers construct only
/// cheap per-request managers around the shared pool.
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle owning the connection pool
    pub database: Arc<Database>,
    /// JWT token issuing and validation
    pub auth_manager: Arc<AuthManager>,
    /// Request authentication over the auth manager and user storage
    pub auth_middleware: Arc<AuthMiddleware>,
    /// Decoded recipe image storage
    pub media_store: Arc<MediaStore>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        let database = Arc::new(database);
        let auth_manager = Arc::new(auth_manager);

        let auth_middleware = Arc::new(AuthMiddleware::new(
            auth_manager.clone(),
            database.pool().clone(),
        ));
        let media_store = Arc::new(MediaStore::new(config.app_behavior.media_dir.clone()));

        Self {
            database,
            auth_manager,
            auth_middleware,
            media_store,
            config,
        }
    }
}

/// The Ladle HTTP server
pub struct LadleServer {
    resources: Arc<ServerResources>,
}

impl LadleServer {
    /// Create a server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Assemble the full application router with middleware
    ///
    /// Exposed so tests can drive the router directly without binding a
    /// socket.
    #[must_use]
    pub fn router(resources: &Arc<ServerResources>) -> Router {
        Router::new()
            .merge(HealthRoutes::routes(resources.clone()))
            .merge(AuthRoutes::routes(resources.clone()))
            .merge(UserRoutes::routes(resources.clone()))
            .merge(CatalogRoutes::routes(resources.clone()))
            .merge(RecipeRoutes::routes(resources.clone()))
            .nest_service(
                "/media",
                ServeDir::new(&resources.config.app_behavior.media_dir),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(setup_cors(&resources.config))
                    .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
                    .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES)),
            )
    }

    /// Run the HTTP server until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind the configured port or
    /// the accept loop fails.
    pub async fn run(self) -> Result<()> {
        let app = Self::router(&self.resources);

        let address = format!("0.0.0.0:{}", self.resources.config.http_port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        info!("HTTP server listening on {address}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("Server shut down cleanly");
        Ok(())
    }
}

/// Resolve when the process receives Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
