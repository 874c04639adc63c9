// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Block region detection on binarized care label sheets
//!
//! Finds the outermost connected ink regions in a binary mask and keeps
//! the ones large enough to be whole label blocks rather than stray
//! glyphs or scanner noise.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;
use tracing::debug;

/// Minimum block span in pixels.
///
/// A detected region becomes a candidate block only when both its width
/// and its height strictly exceed this value. Individual characters and
/// dust specks fall well below it on 300dpi label sheet scans.
pub const MIN_BLOCK_SPAN: u32 = 80;

/// Axis-aligned bounding box of a detected block, in source image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// X coordinate of the top-left corner
    pub x: u32,
    /// Y coordinate of the top-left corner
    pub y: u32,
    /// Width of the bounding box
    pub width: u32,
    /// Height of the bounding box
    pub height: u32,
}

impl BoundingBox {
    /// Area of the bounding box in pixels
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Detect candidate label blocks in a binary mask.
///
/// Only outermost contours count: regions nested inside another ink
/// region (text lines inside a bordered block, for example) are folded
/// into their enclosing block instead of reported separately. The
/// returned boxes are unordered; callers impose reading order.
pub fn detect_blocks(mask: &GrayImage) -> Vec<BoundingBox> {
    let contours: Vec<Contour<u32>> = find_contours(mask);

    let mut boxes = Vec::new();
    for contour in &contours {
        // Outer borders without a parent are the outermost regions
        if contour.border_type != BorderType::Outer || contour.parent.is_some() {
            continue;
        }

        let Some(bounds) = bounding_rect(&contour.points) else {
            continue;
        };

        if bounds.width > MIN_BLOCK_SPAN && bounds.height > MIN_BLOCK_SPAN {
            boxes.push(bounds);
        }
    }

    debug!(
        "Detected {} block candidates from {} contours",
        boxes.len(),
        contours.len()
    );

    boxes
}

/// Tightest axis-aligned rectangle covering all contour points
fn bounding_rect(points: &[Point<u32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);

    for point in points {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }

    Some(BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}
