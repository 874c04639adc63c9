// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1

//! Endpoint tests for POST /split
//!
//! These tests verify that the split_handler correctly:
//! - Validates multipart uploads and returns appropriate errors
//! - Runs the block splitting pipeline over the uploaded sheet
//! - Streams back a zip archive with reading-order entries
//! - Reports engine health through GET /health

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
};
use careloom::{
    api::{
        errors::ErrorResponse,
        http_server::{build_router, AppState, HealthResponse},
    },
    ocr::{OcrEngine, OcrError, RecognizeOptions, SegmentationMode},
    vision::image_utils::MAX_IMAGE_SIZE,
};
use image::{DynamicImage, GrayImage, ImageFormat, Rgb, RgbImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};
use std::collections::VecDeque;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

const BOUNDARY: &str = "careloom-test-boundary";

/// Helper: Engine stub replaying scripted text, one code reply per block
struct ScriptedEngine {
    block_reply: String,
    code_replies: Mutex<VecDeque<String>>,
}

impl ScriptedEngine {
    fn new(block_reply: &str, code_replies: &[&str]) -> Self {
        Self {
            block_reply: block_reply.to_string(),
            code_replies: Mutex::new(code_replies.iter().map(|s| s.to_string()).collect()),
        }
    }
}

#[async_trait]
impl OcrEngine for ScriptedEngine {
    async fn recognize(
        &self,
        _image: &GrayImage,
        options: &RecognizeOptions,
    ) -> Result<String, OcrError> {
        match options.segmentation {
            SegmentationMode::SingleColumn => Ok(self.block_reply.clone()),
            SegmentationMode::UniformBlock => Ok(self
                .code_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default()),
        }
    }
}

/// Helper: Engine stub that fails every recognition pass
struct FailingEngine;

#[async_trait]
impl OcrEngine for FailingEngine {
    async fn recognize(
        &self,
        _image: &GrayImage,
        _options: &RecognizeOptions,
    ) -> Result<String, OcrError> {
        Err(OcrError::Timeout(Duration::from_secs(30)))
    }
}

/// Helper: PNG-encode a white sheet with filled black rectangles
fn sheet_png(width: u32, height: u32, blocks: &[(i32, i32, u32, u32)]) -> Vec<u8> {
    let mut sheet = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for &(x, y, w, h) in blocks {
        draw_filled_rect_mut(&mut sheet, Rect::at(x, y).of_size(w, h), Rgb([0, 0, 0]));
    }

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(sheet)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

/// Helper: Build a multipart/form-data request for POST /split
fn multipart_request(field_name: &str, payload: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"sheet.png\"\r\n",
            field_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/split")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Helper: Collect a response body into memory
async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[cfg(test)]
mod split_endpoint_tests {
    use super::*;

    // =============================================================================
    // Routing Tests
    // =============================================================================

    /// Test 1: Split route rejects GET requests
    ///
    /// Verifies that GET /split returns Method Not Allowed.
    #[tokio::test]
    async fn test_split_route_rejects_get() {
        let engine = Arc::new(ScriptedEngine::new("", &[]));
        let app = build_router(AppState::new(engine, true));

        let request = Request::builder()
            .method(Method::GET)
            .uri("/split")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "GET requests should be rejected with 405"
        );
    }

    // =============================================================================
    // Request Validation Tests
    // =============================================================================

    /// Test 2: Validation error when the file part is missing
    ///
    /// A form whose only part has a different name must be rejected
    /// without running the pipeline.
    #[tokio::test]
    async fn test_missing_file_part_is_rejected() {
        let engine = Arc::new(ScriptedEngine::new("", &[]));
        let app = build_router(AppState::new(engine, true));

        let payload = sheet_png(200, 200, &[]);
        let request = multipart_request("document", &payload);

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_body(response).await;
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error_type, "validation_error");
        assert!(
            error.message.contains("file"),
            "Error should mention the missing part: {}",
            error.message
        );
        assert!(error.request_id.is_some(), "Errors should carry a request id");
        let details = error.details.expect("validation errors should carry details");
        assert_eq!(
            details.get("field"),
            Some(&serde_json::Value::String("file".to_string()))
        );
    }

    /// Test 3: Bad request when the upload is not a decodable image
    #[tokio::test]
    async fn test_unreadable_image_is_rejected() {
        let engine = Arc::new(ScriptedEngine::new("", &[]));
        let app = build_router(AppState::new(engine, true));

        let request = multipart_request("file", b"this is not an image");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_body(response).await;
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error_type, "invalid_request");
        assert!(
            error.message.contains("Could not read image"),
            "Error should explain the decode failure: {}",
            error.message
        );
    }

    /// Test 4: Oversized uploads are rejected with the byte limit
    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let engine = Arc::new(ScriptedEngine::new("", &[]));
        let app = build_router(AppState::new(engine, true));

        let payload = vec![0u8; MAX_IMAGE_SIZE + 1];
        let request = multipart_request("file", &payload);
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_body(response).await;
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error_type, "upload_too_large");
        let details = error.details.expect("the limit should be reported");
        assert!(details.contains_key("limit_bytes"));
    }

    // =============================================================================
    // Splitting Tests
    // =============================================================================

    /// Test 5: Successful split returns named blocks in reading order
    ///
    /// Two blocks stacked vertically: the upper one carries a care code
    /// underneath, the lower one does not and falls back to its index.
    #[tokio::test]
    async fn test_split_returns_named_blocks_in_reading_order() {
        let engine = Arc::new(ScriptedEngine::new(
            "lavage 30",
            &["care 12", "no code printed here"],
        ));
        let app = build_router(AppState::new(engine, true));

        let payload = sheet_png(600, 500, &[(50, 40, 150, 120), (50, 260, 200, 100)]);
        let request = multipart_request("file", &payload);

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/zip"
        );
        assert_eq!(
            response.headers().get("content-disposition").unwrap(),
            "attachment; filename=\"care_blocks.zip\""
        );

        let body = read_body(response).await;
        let mut archive = zip::ZipArchive::new(Cursor::new(body)).unwrap();
        assert_eq!(archive.len(), 2, "One entry per detected block");

        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["CARE_12.jpg", "block_2.jpg"]);

        // Every entry is a JPEG crop
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            assert_eq!(&bytes[..2], &[0xFF, 0xD8], "Entry {} should be a JPEG", i);
        }
    }

    /// Test 6: A sheet without blocks yields an empty archive
    #[tokio::test]
    async fn test_blank_sheet_yields_empty_archive() {
        let engine = Arc::new(ScriptedEngine::new("", &[]));
        let app = build_router(AppState::new(engine, true));

        let payload = sheet_png(300, 200, &[]);
        let request = multipart_request("file", &payload);

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = read_body(response).await;
        let archive = zip::ZipArchive::new(Cursor::new(body)).unwrap();
        assert_eq!(archive.len(), 0, "No blocks means an empty archive");
    }

    // =============================================================================
    // Failure Handling Tests
    // =============================================================================

    /// Test 7: Engine failures surface as a generic internal error
    ///
    /// The response must not leak engine internals to the client.
    #[tokio::test]
    async fn test_engine_failure_is_internal_error() {
        let app = build_router(AppState::new(Arc::new(FailingEngine), true));

        let payload = sheet_png(400, 300, &[(60, 50, 150, 120)]);
        let request = multipart_request("file", &payload);

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = read_body(response).await;
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error_type, "internal_error");
        assert_eq!(error.message, "Failed to process sheet");
    }

    // =============================================================================
    // Health Tests
    // =============================================================================

    /// Test 8: Health reports healthy when the engine probe passed
    #[tokio::test]
    async fn test_health_reports_healthy_engine() {
        let engine = Arc::new(ScriptedEngine::new("", &[]));
        let app = build_router(AppState::new(engine, true));

        let request = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = read_body(response).await;
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "healthy");
        assert!(!health.version.is_empty());
        assert!(health.issues.is_none(), "Healthy status carries no issues");
    }

    /// Test 9: Health reports degraded when the engine probe failed
    #[tokio::test]
    async fn test_health_reports_degraded_engine() {
        let engine = Arc::new(ScriptedEngine::new("", &[]));
        let app = build_router(AppState::new(engine, false));

        let request = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = read_body(response).await;
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "degraded");
        let issues = health.issues.expect("degraded status should list issues");
        assert!(issues.iter().any(|i| i.contains("OCR engine")));
    }
}
