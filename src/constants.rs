// ABOUTME: Domain constants for field limits, defaults, and fixed output formats
// ABOUTME: Named constants shared by validation, pagination, and shopping-list rendering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

//! Application constants
//!
//! Field limits mirror the relational schema; changing one here without a
//! matching migration will reject rows the database would accept.

// ============================================================================
// Field length limits
// ============================================================================

/// Maximum email address length (RFC 5321 mailbox limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum first/last name length
pub const MAX_NAME_LENGTH: usize = 150;

/// Maximum tag name length
pub const MAX_TAG_NAME_LENGTH: usize = 200;

/// Maximum tag slug length
pub const MAX_SLUG_LENGTH: usize = 200;

/// Maximum foodstuff name length
pub const MAX_FOODSTUFF_NAME_LENGTH: usize = 200;

/// Maximum measurement unit length
pub const MAX_MEASUREMENT_UNIT_LENGTH: usize = 200;

/// Maximum recipe name length
pub const MAX_RECIPE_NAME_LENGTH: usize = 200;

// ============================================================================
// Value minimums
// ============================================================================

/// Minimum cooking time in minutes
pub const MIN_COOKING_TIME: i64 = 1;

/// Minimum ingredient amount
pub const MIN_INGREDIENT_AMOUNT: i64 = 1;

/// Minimum password length for registration and password changes
pub const MIN_PASSWORD_LENGTH: usize = 8;

// ============================================================================
// Pagination
// ============================================================================

/// Default page size for paginated list endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Upper bound on caller-requested page sizes
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Shopping list rendering
// ============================================================================

/// First line of the exported shopping list
pub const SHOPPING_LIST_HEADER: &str = "Shopping list:";

/// Width of the dashed separator line under the header
pub const SHOPPING_LIST_SEPARATOR_WIDTH: usize = 40;

/// Line ending used in the exported text file
pub const SHOPPING_LIST_LINE_ENDING: &str = "\r\n";

/// Download filename for the shopping list attachment
pub const SHOPPING_LIST_FILENAME: &str = "Ingredients.txt";

// ============================================================================
// Auth defaults
// ============================================================================

/// Default JWT expiry in hours when `JWT_EXPIRY_HOURS` is unset
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// bcrypt cost factor for password hashing
pub const BCRYPT_COST: u32 = 12;

// ============================================================================
// HTTP server limits
// ============================================================================

/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Request body size cap; recipe images arrive base64-inflated in JSON
pub const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Environment-based configuration
pub mod env_config {
    use std::env;

    /// Get HTTP server port from environment or default
    #[must_use]
    pub fn http_port() -> u16 {
        env::var("HTTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080)
    }

    /// Get media storage directory from environment or default
    #[must_use]
    pub fn media_dir() -> String {
        env::var("MEDIA_DIR").unwrap_or_else(|_| "./media".into())
    }
}
