// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Crop window derivation for detected blocks

use image::{imageops, DynamicImage, GrayImage};

use crate::vision::BoundingBox;

/// Padding above a block, in pixels
pub const CROP_PAD_TOP: u32 = 20;

/// Padding below a block, in pixels.
///
/// Much larger than the other paddings because the reference code for
/// a block is printed underneath it, outside the detected ink region.
pub const CROP_PAD_BOTTOM: u32 = 150;

/// Padding to the left and right of a block, in pixels
pub const CROP_PAD_SIDE: u32 = 20;

/// Half-open crop window in source image coordinates.
///
/// Rows `top..bottom` and columns `left..right` are included. Windows
/// are always clamped to the image, so `bottom <= image height` and
/// `right <= image width` hold by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSpec {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl CropSpec {
    /// Window covering exactly the block bounds
    pub fn exact(bounds: &BoundingBox) -> Self {
        Self {
            top: bounds.y,
            bottom: bounds.y + bounds.height,
            left: bounds.x,
            right: bounds.x + bounds.width,
        }
    }

    /// Padded window around a block, clamped to the image edges
    pub fn for_block(bounds: &BoundingBox, image_width: u32, image_height: u32) -> Self {
        Self {
            top: bounds.y.saturating_sub(CROP_PAD_TOP),
            bottom: (bounds.y + bounds.height + CROP_PAD_BOTTOM).min(image_height),
            left: bounds.x.saturating_sub(CROP_PAD_SIDE),
            right: (bounds.x + bounds.width + CROP_PAD_SIDE).min(image_width),
        }
    }

    /// Width of the window in pixels
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Height of the window in pixels
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Whether the window covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Cut the window out of a color image
pub fn crop_color(image: &DynamicImage, spec: &CropSpec) -> DynamicImage {
    image.crop_imm(spec.left, spec.top, spec.width(), spec.height())
}

/// Cut the window out of a grayscale image
pub fn crop_gray(gray: &GrayImage, spec: &CropSpec) -> GrayImage {
    imageops::crop_imm(gray, spec.left, spec.top, spec.width(), spec.height()).to_image()
}
