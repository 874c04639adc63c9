// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Text recognition for label blocks
//!
//! This module provides:
//! - The `OcrEngine` trait the pipeline recognizes text through
//! - A tesseract-backed engine invoked as a subprocess
//! - Cleanup of recurring misreads in recognized text

pub mod engine;
pub mod normalize;
pub mod tesseract;

pub use engine::{EngineMode, Language, OcrEngine, OcrError, RecognizeOptions, SegmentationMode};
pub use normalize::normalize_recognized_text;
pub use tesseract::{TesseractEngine, OCR_TIMEOUT};
