// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use tracing::{debug, warn};

use super::response::ClassifyResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// Multipart field carrying the photo
pub const IMAGE_FIELD: &str = "image";

/// POST /classify - Detect waste items in an uploaded photo
///
/// # Request
/// `multipart/form-data` with the photo in the `image` field
///
/// # Response
/// - `detections`: at least one item with category, bin and tips
/// - `count`, `processing_time_ms`, `mode`, `cached`
///
/// # Errors
/// - 400 Bad Request: no `image` field, or the bytes are not a decodable image
/// - 413 Payload Too Large: image above the upload limit
/// - 500 Internal Server Error: a detector task crashed
pub async fn classify_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read image: {}", e)))?;
        image = Some(bytes);
        break;
    }

    let image = image.ok_or_else(|| {
        warn!("Classify request without an image field");
        ApiError::InvalidRequest("No image provided".to_string())
    })?;
    debug!("Classify request with {} byte image", image.len());

    let classification = state.classifier.classify_bytes(&image).await.map_err(|e| {
        warn!("Classification failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(ClassifyResponse::new(
        classification,
        state.classifier.mode(),
    )))
}
