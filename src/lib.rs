// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod archive;
pub mod config;
pub mod ocr;
pub mod pipeline;
pub mod version;
pub mod vision;

// Re-export the types most callers need
pub use api::{build_router, start_server, ApiError, AppState, ErrorResponse, HealthResponse};
pub use archive::{build_archive, ArchiveError, ARCHIVE_FILENAME};
pub use config::ServiceConfig;
pub use ocr::{OcrEngine, OcrError, RecognizeOptions, TesseractEngine};
pub use pipeline::{split_blocks, NamedArtifact, PipelineError, MAX_BLOCKS};
pub use vision::{decode_image_bytes, encode_jpeg, Block, BoundingBox, ImageError, ImageInfo};
