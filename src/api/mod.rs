// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod http_server;
pub mod split;

pub use errors::{ApiError, ErrorResponse};
pub use http_server::{build_router, start_server, AppState, HealthResponse, UPLOAD_LIMIT_BYTES};
pub use split::{split_handler, REQUEST_BUDGET};
