// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Block image preparation ahead of text recognition
//!
//! Small label print recognizes poorly at scan resolution, so block
//! regions are upscaled and rebinarized against their local background
//! before being handed to the OCR engine.

use image::{imageops, GrayImage, Luma};
use imageproc::integral_image::{integral_image, sum_image_pixels};

/// Upscale factor applied to block regions before recognition
pub const OCR_UPSCALE_FACTOR: u32 = 3;

/// Side length of the square neighborhood used for local thresholding
pub const ADAPTIVE_WINDOW: u32 = 31;

/// Offset subtracted from the local mean when thresholding.
///
/// A pixel must sit this far below its neighborhood mean to count as
/// ink, which keeps faint paper texture from surviving as speckle.
pub const ADAPTIVE_OFFSET: i32 = 9;

/// Prepare a grayscale block region for text recognition.
///
/// Upscales by `OCR_UPSCALE_FACTOR` with cubic interpolation, then
/// applies a local mean threshold, yielding black text on a white
/// background regardless of uneven lighting across the sheet.
pub fn prepare_block(region: &GrayImage) -> GrayImage {
    adaptive_binarize(&upscale_for_ocr(region))
}

/// Upscale a block region with cubic interpolation
pub fn upscale_for_ocr(region: &GrayImage) -> GrayImage {
    imageops::resize(
        region,
        region.width() * OCR_UPSCALE_FACTOR,
        region.height() * OCR_UPSCALE_FACTOR,
        imageops::FilterType::CatmullRom,
    )
}

/// Threshold each pixel against the mean of its local neighborhood.
///
/// A pixel maps to white (255) when its intensity exceeds the mean of
/// the surrounding `ADAPTIVE_WINDOW` square minus `ADAPTIVE_OFFSET`,
/// and to black (0) otherwise. Windows are clamped at the image
/// borders.
pub fn adaptive_binarize(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut out = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let integral = integral_image::<Luma<u8>, u64>(gray);
    let radius = ADAPTIVE_WINDOW / 2;

    for y in 0..height {
        let top = y.saturating_sub(radius);
        let bottom = (y + radius).min(height - 1);
        for x in 0..width {
            let left = x.saturating_sub(radius);
            let right = (x + radius).min(width - 1);

            let sum = sum_image_pixels(&integral, left, top, right, bottom)[0];
            let count = ((right - left + 1) as u64) * ((bottom - top + 1) as u64);
            let mean = (sum / count) as i32;

            let value: u8 = if i32::from(gray.get_pixel(x, y)[0]) > mean - ADAPTIVE_OFFSET {
                255
            } else {
                0
            };
            out.put_pixel(x, y, Luma([value]));
        }
    }

    out
}
