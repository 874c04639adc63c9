// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Sheet splitting endpoint handler

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::Multipart;
use bytes::Bytes;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::http_server::{ApiErrorResponse, AppState};
use crate::archive::{build_archive, ARCHIVE_FILENAME};
use crate::pipeline::split_blocks;
use crate::vision::{decode_image_bytes, ImageError};

/// Wall-clock budget for one split request, covering every OCR pass
pub const REQUEST_BUDGET: Duration = Duration::from_secs(120);

/// POST /split - Split a care label sheet into named block images
///
/// Accepts a multipart form with a `file` part holding the scanned
/// sheet and returns a zip archive with one JPEG per detected block,
/// each named after the reference code read underneath it.
///
/// # Request
/// - `file`: The sheet image (png, jpg, webp, gif, bmp or tiff)
///
/// # Response
/// - `application/zip` offered as `care_blocks.zip`, entries ordered
///   top to bottom then left to right
///
/// # Errors
/// - 400 Bad Request: missing `file` part, oversized or undecodable
///   image, or a sheet the pipeline refuses to process
/// - 500 Internal Server Error: recognition or archive assembly failed
pub async fn split_handler(State(state): State<AppState>, multipart: Multipart) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let started = Instant::now();
    debug!("Split request {} received", request_id);

    // 1. Pull the file part out of the form
    let data = match read_file_part(multipart).await {
        Ok(data) => data,
        Err(e) => {
            warn!("Split request {} rejected: {}", request_id, e);
            return ApiErrorResponse(e, Some(request_id)).into_response();
        }
    };

    // 2. Decode the sheet
    let (image, info) = match decode_image_bytes(&data) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Split request {} has an unreadable image: {}", request_id, e);
            let api_error = match e {
                ImageError::TooLarge(_, limit) => ApiError::UploadTooLarge { limit_bytes: limit },
                other => ApiError::InvalidRequest(format!("Could not read image: {}", other)),
            };
            return ApiErrorResponse(api_error, Some(request_id)).into_response();
        }
    };
    debug!(
        "Decoded sheet: {}x{}, {} bytes, {:?}",
        info.width, info.height, info.size_bytes, info.format
    );

    // 3. Run the pipeline under the request budget
    let pipeline = split_blocks(&image, state.engine.as_ref());
    let artifacts = match tokio::time::timeout(REQUEST_BUDGET, pipeline).await {
        Ok(Ok(artifacts)) => artifacts,
        Ok(Err(e)) if e.is_client_error() => {
            warn!("Split request {} rejected: {}", request_id, e);
            return ApiErrorResponse(ApiError::InvalidRequest(e.to_string()), Some(request_id))
                .into_response();
        }
        Ok(Err(e)) => {
            error!("Split request {} failed: {}", request_id, e);
            return ApiErrorResponse(
                ApiError::InternalError("Failed to process sheet".to_string()),
                Some(request_id),
            )
            .into_response();
        }
        Err(_) => {
            error!(
                "Split request {} exceeded the {:?} processing budget",
                request_id, REQUEST_BUDGET
            );
            return ApiErrorResponse(
                ApiError::InternalError("Processing budget exceeded".to_string()),
                Some(request_id),
            )
            .into_response();
        }
    };

    // 4. Assemble the archive
    let archive = match build_archive(&artifacts) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Split request {} could not assemble archive: {}", request_id, e);
            return ApiErrorResponse(
                ApiError::InternalError("Failed to assemble archive".to_string()),
                Some(request_id),
            )
            .into_response();
        }
    };

    info!(
        "Split request {} complete: {} blocks, {} bytes in {}ms",
        request_id,
        artifacts.len(),
        archive.len(),
        started.elapsed().as_millis()
    );

    zip_response(archive)
}

/// Find the `file` part in the form, skipping unrelated parts
async fn read_file_part(mut multipart: Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::InvalidRequest(format!("Malformed multipart form: {}", e))
    })? {
        if field.name() == Some("file") {
            return field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidRequest(format!("Failed to read file part: {}", e)));
        }
    }

    Err(ApiError::ValidationError {
        field: "file".to_string(),
        message: "No `file` part in the form".to_string(),
    })
}

/// Wrap archive bytes in a download response
fn zip_response(archive: Vec<u8>) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", ARCHIVE_FILENAME),
        )
        .body(Body::from(archive))
        .unwrap()
}
