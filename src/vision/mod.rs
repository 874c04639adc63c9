// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for CPU-based label sheet analysis
//!
//! This module provides:
//! - Image decoding and JPEG encoding
//! - Binarization of grayscale scans
//! - Block region detection and reading order
//! - Block preparation ahead of text recognition

pub mod binarize;
pub mod blocks;
pub mod image_utils;
pub mod preprocess;
pub mod regions;

pub use binarize::{binarize, BinaryMask, EmptyBitmap, INK_THRESHOLD};
pub use blocks::{reading_order, Block};
pub use image_utils::{decode_image_bytes, detect_format, encode_jpeg, ImageError, ImageInfo};
pub use preprocess::prepare_block;
pub use regions::{detect_blocks, BoundingBox, MIN_BLOCK_SPAN};
