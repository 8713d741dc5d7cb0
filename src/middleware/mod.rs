// ABOUTME: HTTP middleware for request authentication and CORS configuration
// ABOUTME: Resolves bearer tokens to users and builds the cross-origin policy layer

pub mod auth;
pub mod cors;

// Authentication middleware
pub use auth::AuthMiddleware;

// CORS configuration
pub use cors::setup_cors;
