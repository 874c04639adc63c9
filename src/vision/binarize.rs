// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Global thresholding of grayscale scans into ink/background masks

use image::GrayImage;
use imageproc::contrast::{threshold, ThresholdType};
use thiserror::Error;

/// Binary mask where ink pixels are 255 and background pixels are 0
pub type BinaryMask = GrayImage;

/// Global threshold separating ink from paper.
///
/// Scans of care label sheets are dark print on a light background, so any
/// pixel at or below this intensity is treated as ink.
pub const INK_THRESHOLD: u8 = 180;

#[derive(Debug, Error)]
#[error("cannot binarize an empty image")]
pub struct EmptyBitmap;

/// Produce an inverted binary mask from a grayscale image.
///
/// Pixels with intensity `<= INK_THRESHOLD` become foreground (255),
/// lighter pixels become background (0). The mask has the same
/// dimensions as the input.
pub fn binarize(gray: &GrayImage) -> Result<BinaryMask, EmptyBitmap> {
    if gray.width() == 0 || gray.height() == 0 {
        return Err(EmptyBitmap);
    }
    Ok(threshold(gray, INK_THRESHOLD, ThresholdType::BinaryInverted))
}
