// ABOUTME: Test utilities for creating User structs and other test data in a consistent way
// ABOUTME: Centralizes test data creation to avoid duplication and ensure consistency across tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use crate::models::{IngredientRef, User};
use chrono::Utc;
use uuid::Uuid;

/// Password used by all test fixtures
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Hash the fixture password at the minimum bcrypt cost
///
/// Cost 4 keeps test setup fast while producing a hash `verify_password`
/// accepts. A hashing failure yields an empty string, which fails
/// verification and surfaces in the calling test.
#[must_use]
pub fn test_password_hash() -> String {
    bcrypt::hash(TEST_PASSWORD, 4).unwrap_or_default()
}

/// Create a test regular user with default values
#[must_use]
pub fn create_test_user(email: &str, username: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        username: username.to_owned(),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        password_hash: test_password_hash(),
        is_staff: false,
        created_at: Utc::now(),
    }
}

/// Create a test staff user with default values
#[must_use]
pub fn create_test_staff_user(email: &str, username: &str) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_owned(),
        username: username.to_owned(),
        first_name: "Staff".to_owned(),
        last_name: "User".to_owned(),
        password_hash: test_password_hash(),
        is_staff: true,
        created_at: Utc::now(),
    }
}

/// Create an ingredient reference for recipe submissions
#[must_use]
pub const fn ingredient_ref(id: i64, amount: i64) -> IngredientRef {
    IngredientRef { id, amount }
}

/// A tiny valid PNG as a data URI for image-intake paths
#[must_use]
pub fn test_image_data_uri() -> String {
    // 1x1 transparent PNG
    "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==".to_owned()
}
