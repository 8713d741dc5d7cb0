// ABOUTME: User account model and the public profile representation
// ABOUTME: User rows carry the bcrypt hash; UserProfile is the wire-safe projection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Email address (unique, used for login)
    pub email: String,
    /// Public username (unique)
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt password hash, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Staff accounts may edit and delete any recipe
    pub is_staff: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new regular user from registration fields and a password hash
    #[must_use]
    pub fn new(
        email: String,
        username: String,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            first_name,
            last_name,
            password_hash,
            is_staff: false,
            created_at: Utc::now(),
        }
    }
}

/// Public profile representation with the requester-dependent subscription flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub id: Uuid,
    /// Email address
    pub email: String,
    /// Public username
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the requesting user follows this user (false for anonymous)
    pub is_subscribed: bool,
}

impl UserProfile {
    /// Build a profile for `user` as seen by a requester
    #[must_use]
    pub fn from_user(user: &User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
        }
    }
}
