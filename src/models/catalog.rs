// ABOUTME: Catalog models: recipe tags and the foodstuff reference list
// ABOUTME: Carries the hex color and slug validation used when tags are created
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use crate::constants::{MAX_SLUG_LENGTH, MAX_TAG_NAME_LENGTH};
use crate::errors::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Hex color: `#RGB` or `#RRGGBB`
/// Stored as Option to handle compilation failures gracefully (should never fail for static patterns)
static HEX_COLOR_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").ok());

/// URL slug: letters, digits, hyphens and underscores
static SLUG_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").ok());

/// A recipe tag (e.g. breakfast, vegan) with a display color and URL slug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Unique tag identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Display color as `#RGB` or `#RRGGBB`
    pub color: String,
    /// Unique URL slug
    pub slug: String,
}

impl Tag {
    /// Validate name, color and slug for a tag about to be stored
    ///
    /// # Errors
    ///
    /// Returns a validation error when a field is empty, too long, or the
    /// color/slug does not match its required shape.
    pub fn validate_fields(name: &str, color: &str, slug: &str) -> AppResult<()> {
        if name.is_empty() || name.len() > MAX_TAG_NAME_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Tag name must be 1-{MAX_TAG_NAME_LENGTH} characters"
            )));
        }
        if !is_valid_hex_color(color) {
            return Err(AppError::invalid_input(format!(
                "Tag color must be #RGB or #RRGGBB, got {color:?}"
            )));
        }
        if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH || !is_valid_slug(slug) {
            return Err(AppError::invalid_input(format!(
                "Tag slug must be 1-{MAX_SLUG_LENGTH} characters of [-a-zA-Z0-9_]"
            )));
        }
        Ok(())
    }
}

/// A canonical named ingredient with its unit of measure
///
/// Foodstuffs are the reference catalog recipes point into; the pair
/// (name, `measurement_unit`) is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Foodstuff {
    /// Unique foodstuff identifier
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Unit of measure (g, ml, pcs, ...)
    pub measurement_unit: String,
}

/// Check a hex color string (`#RGB` or `#RRGGBB`)
#[must_use]
pub fn is_valid_hex_color(color: &str) -> bool {
    HEX_COLOR_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(color))
}

/// Check a URL slug string
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_PATTERN.as_ref().is_some_and(|re| re.is_match(slug))
}
