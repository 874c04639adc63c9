// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Reading order for detected label blocks

use super::regions::BoundingBox;

/// A detected label block paired with the text recognized inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Location of the block in the source image
    pub bounds: BoundingBox,
    /// Normalized text recognized inside the block
    pub raw_text: String,
}

impl Block {
    /// Sort key for reading order: top edge first, then left edge
    pub fn order_key(&self) -> (u32, u32) {
        (self.bounds.y, self.bounds.x)
    }
}

/// Sort blocks into reading order, top to bottom then left to right.
///
/// The sort is stable, so blocks whose top-left corners coincide keep
/// their detection order.
pub fn reading_order(blocks: &mut [Block]) {
    blocks.sort_by_key(Block::order_key);
}
