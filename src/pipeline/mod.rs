// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Sheet splitting pipeline
//!
//! Turns one scanned care label sheet into a set of named JPEG
//! artifacts: binarize, detect blocks, read each block, then cut a
//! padded crop per block and name it after the reference code found
//! underneath.

pub mod crop;
pub mod naming;

use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, info};

use crate::ocr::{normalize_recognized_text, OcrEngine, OcrError, RecognizeOptions};
use crate::vision::{
    binarize, detect_blocks, encode_jpeg, prepare_block, reading_order, Block, BoundingBox,
    ImageError,
};
use crop::{crop_color, crop_gray, CropSpec};
use naming::{resolve_filename, NameRegistry};

pub use crop::{CROP_PAD_BOTTOM, CROP_PAD_SIDE, CROP_PAD_TOP};

/// Upper bound on blocks processed per sheet.
///
/// Real label sheets carry a handful of blocks. Far more than that
/// means runaway detection on a noisy scan, and each block costs two
/// OCR passes, so the request is refused instead.
pub const MAX_BLOCKS: usize = 64;

/// A named JPEG artifact ready to be archived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedArtifact {
    /// Filename inside the result archive, unique per sheet
    pub filename: String,
    /// JPEG-encoded crop bytes
    pub bytes: Vec<u8>,
}

/// Custom error types for the splitting pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Found {found} blocks, more than the {limit} supported per sheet")]
    TooManyBlocks { found: usize, limit: usize },

    #[error("Crop for block {index} covers no pixels")]
    EmptyCrop { index: usize },

    #[error("Failed to encode block {index}: {source}")]
    Encode {
        index: usize,
        #[source]
        source: ImageError,
    },

    #[error(transparent)]
    Ocr(#[from] OcrError),
}

impl PipelineError {
    /// Whether the failure was caused by the uploaded content rather
    /// than by the service or its OCR engine
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::EmptyImage | PipelineError::TooManyBlocks { .. }
        )
    }
}

/// Split a decoded sheet into named block artifacts.
///
/// Blocks are emitted in reading order (top to bottom, then left to
/// right) and filenames are unique within the returned set. Returns an
/// empty vector when the sheet contains no block-sized regions. Any
/// failure on any block fails the whole sheet; partial results are
/// never returned.
pub async fn split_blocks(
    image: &DynamicImage,
    engine: &dyn OcrEngine,
) -> Result<Vec<NamedArtifact>, PipelineError> {
    let gray = image.to_luma8();
    let mask = binarize(&gray).map_err(|_| PipelineError::EmptyImage)?;

    let boxes = detect_blocks(&mask);
    if boxes.len() > MAX_BLOCKS {
        return Err(PipelineError::TooManyBlocks {
            found: boxes.len(),
            limit: MAX_BLOCKS,
        });
    }
    info!("Detected {} label blocks", boxes.len());

    let mut blocks = Vec::with_capacity(boxes.len());
    for bounds in boxes {
        let raw_text = read_block_text(&gray, &bounds, engine).await?;
        debug!(
            "Block at ({}, {}) size {}x{} reads: {:?}",
            bounds.x, bounds.y, bounds.width, bounds.height, raw_text
        );
        blocks.push(Block { bounds, raw_text });
    }
    reading_order(&mut blocks);

    let mut names = NameRegistry::new();
    let mut artifacts = Vec::with_capacity(blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        let artifact = cut_block(image, &gray, block, index, engine, &mut names).await?;
        artifacts.push(artifact);
    }

    info!("Split sheet into {} named blocks", artifacts.len());
    Ok(artifacts)
}

/// First recognition pass: read the full multilingual content of a
/// block at upscaled resolution. The text rides along on the block for
/// logging and inspection.
async fn read_block_text(
    gray: &image::GrayImage,
    bounds: &BoundingBox,
    engine: &dyn OcrEngine,
) -> Result<String, PipelineError> {
    let region = crop_gray(gray, &CropSpec::exact(bounds));
    let prepared = prepare_block(&region);
    let text = engine
        .recognize(&prepared, &RecognizeOptions::block_profile())
        .await?;
    Ok(normalize_recognized_text(&text).trim().to_string())
}

/// Second recognition pass plus the cut itself: spot the reference
/// code in the padded window below the block, resolve the filename and
/// encode the color crop.
async fn cut_block(
    image: &DynamicImage,
    gray: &image::GrayImage,
    block: &Block,
    index: usize,
    engine: &dyn OcrEngine,
    names: &mut NameRegistry,
) -> Result<NamedArtifact, PipelineError> {
    let spec = CropSpec::for_block(&block.bounds, image.width(), image.height());
    if spec.is_empty() {
        return Err(PipelineError::EmptyCrop { index });
    }

    let code_region = crop_gray(gray, &spec);
    let code_text = engine
        .recognize(&code_region, &RecognizeOptions::code_profile())
        .await?;
    let filename = names.claim(resolve_filename(code_text.trim(), index));

    let color_crop = crop_color(image, &spec);
    let bytes =
        encode_jpeg(&color_crop).map_err(|source| PipelineError::Encode { index, source })?;

    debug!("Block {} -> {} ({} bytes)", index, filename, bytes.len());
    Ok(NamedArtifact { filename, bytes })
}
