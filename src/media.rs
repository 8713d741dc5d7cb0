// ABOUTME: Media intake for recipe images submitted as base64 data URIs
// ABOUTME: Decodes and validates payloads, writes them under the media directory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Contributors

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Image formats accepted from clients
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Subdirectory of the media root that recipe images land in
const RECIPE_IMAGE_DIR: &str = "recipes";

/// A decoded image payload ready to be written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// File extension derived from the data URI media type
    pub extension: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

/// Parse a `data:image/<ext>;base64,<payload>` URI into raw bytes
///
/// # Errors
///
/// Returns a validation error when the URI prefix is malformed, the image
/// format is not in the accepted set, or the payload is not valid base64.
pub fn parse_data_uri(data_uri: &str) -> AppResult<DecodedImage> {
    let rest = data_uri
        .strip_prefix("data:image/")
        .ok_or_else(|| AppError::invalid_input("Image must be a data:image/<format>;base64 URI"))?;
    let (format, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| AppError::invalid_input("Image data URI is missing the base64 payload"))?;

    let extension = match format.to_lowercase() {
        ext if ext == "jpeg" => "jpg".to_owned(),
        ext if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => ext,
        ext => {
            return Err(AppError::invalid_input(format!(
                "Unsupported image format: {ext}"
            )))
        }
    };

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| AppError::invalid_input(format!("Image payload is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(AppError::invalid_input("Image payload is empty"));
    }

    Ok(DecodedImage { extension, bytes })
}

/// Relative media path -> URL path clients can fetch it at
#[must_use]
pub fn url_path(relative: &str) -> String {
    format!("/media/{relative}")
}

/// Writes decoded images under the configured media directory
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Create a store rooted at the configured media directory
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Decode a data URI and persist it as a recipe image
    ///
    /// Returns the path relative to the media root, which is what gets
    /// stored on the recipe row. Filenames are random so concurrent uploads
    /// never collide.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad payload, or an internal error
    /// when the media directory cannot be written.
    pub async fn store_recipe_image(&self, data_uri: &str) -> AppResult<String> {
        let image = parse_data_uri(data_uri)?;

        let dir = self.root.join(RECIPE_IMAGE_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create media directory: {e}")))?;

        let filename = format!("{}.{}", Uuid::new_v4().simple(), image.extension);
        let target = dir.join(&filename);
        tokio::fs::write(&target, &image.bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write image file: {e}")))?;

        Ok(format!("{RECIPE_IMAGE_DIR}/{filename}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn png_uri(bytes: &[u8]) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    #[test]
    fn test_parse_valid_data_uri() {
        let image = parse_data_uri(&png_uri(b"pixels")).unwrap();
        assert_eq!(image.extension, "png");
        assert_eq!(image.bytes, b"pixels");
    }

    #[test]
    fn test_jpeg_normalized_to_jpg() {
        let uri = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"pixels"));
        let image = parse_data_uri(&uri).unwrap();
        assert_eq!(image.extension, "jpg");
    }

    #[test]
    fn test_rejects_non_image_uri() {
        let err = parse_data_uri("data:text/plain;base64,aGVsbG8=").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_rejects_missing_payload_marker() {
        let err = parse_data_uri("data:image/png,rawbytes").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_rejects_unknown_format() {
        let uri = format!("data:image/tiff;base64,{}", STANDARD.encode(b"pixels"));
        let err = parse_data_uri(&uri).unwrap_err();
        assert!(err.message.contains("tiff"));
    }

    #[test]
    fn test_rejects_invalid_base64() {
        let err = parse_data_uri("data:image/png;base64,not!!valid@@").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_rejects_empty_payload() {
        let err = parse_data_uri("data:image/png;base64,").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path("recipes/abc.png"), "/media/recipes/abc.png");
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf());

        let relative = store.store_recipe_image(&png_uri(b"pixels")).await.unwrap();
        assert!(relative.starts_with("recipes/"));
        assert!(relative.ends_with(".png"));

        let written = tokio::fs::read(dir.path().join(&relative)).await.unwrap();
        assert_eq!(written, b"pixels");
    }

    #[tokio::test]
    async fn test_store_generates_unique_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf());

        let first = store.store_recipe_image(&png_uri(b"one")).await.unwrap();
        let second = store.store_recipe_image(&png_uri(b"two")).await.unwrap();
        assert_ne!(first, second);
    }
}
