use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::errors::ApiError;
use super::split::split_handler;
use crate::ocr::OcrEngine;
use crate::vision::image_utils::MAX_IMAGE_SIZE;

/// Request body ceiling: the image cap plus room for multipart framing
pub const UPLOAD_LIMIT_BYTES: usize = MAX_IMAGE_SIZE + 512 * 1024;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Recognition engine used by the splitting pipeline
    pub engine: Arc<dyn OcrEngine>,
    /// Result of the startup engine probe, reported by /health
    pub engine_ready: bool,
}

impl AppState {
    pub fn new(engine: Arc<dyn OcrEngine>, engine_ready: bool) -> Self {
        Self {
            engine,
            engine_ready,
        }
    }
}

/// Build the service router with CORS and the upload size limit
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Sheet splitting endpoint
        .route("/split", post(split_handler))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, issues) = if state.engine_ready {
        ("healthy".to_string(), None)
    } else {
        (
            "degraded".to_string(),
            Some(vec!["OCR engine unavailable".to_string()]),
        )
    };

    Json(HealthResponse {
        status,
        version: crate::version::VERSION_NUMBER.to_string(),
        issues,
    })
}

// Error response wrapper carrying the request id
pub struct ApiErrorResponse(pub ApiError, pub Option<String>);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_response = self.0.to_response(self.1);

        (status, Json(error_response)).into_response()
    }
}
