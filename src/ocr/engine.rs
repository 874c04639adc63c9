// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Text recognition engine trait and invocation options

use std::time::Duration;

use async_trait::async_trait;
use image::GrayImage;
use thiserror::Error;

/// Custom error types for text recognition
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Failed to launch OCR engine `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("OCR engine exited with {status}: {stderr}")]
    Engine {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("OCR engine timed out after {0:?}")]
    Timeout(Duration),

    #[error("OCR engine produced non-UTF-8 output")]
    InvalidOutput(#[from] std::string::FromUtf8Error),

    #[error("Failed to stage image for OCR: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode image for OCR: {0}")]
    Encode(#[from] image::ImageError),
}

/// Recognition languages installed alongside the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    French,
    Spanish,
}

impl Language {
    /// Three-letter language code understood by the engine
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::French => "fra",
            Language::Spanish => "spa",
        }
    }
}

/// Page segmentation strategy for a recognition pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationMode {
    /// Single column of text of variable sizes
    SingleColumn,
    /// Single uniform block of text
    UniformBlock,
}

impl SegmentationMode {
    /// Numeric `--psm` value for the engine command line
    pub fn psm(&self) -> u8 {
        match self {
            SegmentationMode::SingleColumn => 4,
            SegmentationMode::UniformBlock => 6,
        }
    }
}

/// Recognition engine variant selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineMode {
    Legacy,
    LstmOnly,
    LegacyWithLstm,
    /// Let the engine pick from what is installed
    #[default]
    Auto,
}

impl EngineMode {
    /// Numeric `--oem` value for the engine command line
    pub fn oem(&self) -> u8 {
        match self {
            EngineMode::Legacy => 0,
            EngineMode::LstmOnly => 1,
            EngineMode::LegacyWithLstm => 2,
            EngineMode::Auto => 3,
        }
    }
}

/// Options for a single recognition call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizeOptions {
    /// Languages to recognize, tried jointly in the given order
    pub languages: Vec<Language>,
    /// Page segmentation strategy
    pub segmentation: SegmentationMode,
    /// Engine variant selection
    pub engine_mode: EngineMode,
}

impl RecognizeOptions {
    /// Options for reading the full multilingual content of a label block
    pub fn block_profile() -> Self {
        Self {
            languages: vec![Language::English, Language::French, Language::Spanish],
            segmentation: SegmentationMode::SingleColumn,
            engine_mode: EngineMode::Auto,
        }
    }

    /// Options for spotting the short reference code printed on a block
    pub fn code_profile() -> Self {
        Self {
            languages: vec![Language::English],
            segmentation: SegmentationMode::UniformBlock,
            engine_mode: EngineMode::Auto,
        }
    }

    /// Joined `-l` argument, e.g. `eng+fra+spa`
    pub fn lang_arg(&self) -> String {
        self.languages
            .iter()
            .map(Language::code)
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Trait for text recognition backends
///
/// The splitting pipeline only needs one operation: turn a grayscale
/// image into the text printed on it. Keeping the surface this small
/// lets tests substitute a scripted engine for the real binary.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in a grayscale image
    ///
    /// # Arguments
    /// * `image` - The image to read
    /// * `options` - Languages and segmentation for this pass
    ///
    /// # Returns
    /// The recognized text, untrimmed, or an error
    async fn recognize(&self, image: &GrayImage, options: &RecognizeOptions)
        -> Result<String, OcrError>;
}
