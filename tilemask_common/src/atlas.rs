// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mask atlas addressing.
//!
//! Mask tiles live in a single wide texture, filled row-major. These
//! functions are the one place that maps a linear tile index to texel
//! coordinates, so the allocator and the rasterizer cannot disagree.

use crate::tile::{TILE_HEIGHT, TILE_WIDTH};

/// Texel origin of the atlas cell for `tile_index`.
pub fn tile_offset(tile_index: u32, atlas_width: u32) -> (u32, u32) {
    let tiles_per_row = atlas_width / TILE_WIDTH;
    debug_assert!(tiles_per_row > 0);
    (
        tile_index % tiles_per_row * TILE_WIDTH,
        tile_index / tiles_per_row * TILE_HEIGHT,
    )
}

/// Linear tile index of the atlas cell containing texel `(x, y)`.
pub fn tile_index_at(x: u32, y: u32, atlas_width: u32) -> u32 {
    let tiles_per_row = atlas_width / TILE_WIDTH;
    y / TILE_HEIGHT * tiles_per_row + x / TILE_WIDTH
}

/// Number of cells in an atlas of the given texel dimensions.
pub fn tile_capacity(atlas_width: u32, atlas_height: u32) -> u32 {
    (atlas_width / TILE_WIDTH) * (atlas_height / TILE_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_walk_rows() {
        assert_eq!(tile_offset(0, 4096), (0, 0));
        assert_eq!(tile_offset(1, 4096), (16, 0));
        assert_eq!(tile_offset(255, 4096), (4080, 0));
        assert_eq!(tile_offset(256, 4096), (0, 16));
    }

    #[test]
    fn index_and_offset_are_inverse() {
        let (width, height) = (256, 128);
        for tile_index in 0..tile_capacity(width, height) {
            let (x, y) = tile_offset(tile_index, width);
            assert!(x + TILE_WIDTH <= width && y + TILE_HEIGHT <= height);
            assert_eq!(tile_index_at(x, y, width), tile_index);
            // Every texel of the cell maps back to the same index.
            assert_eq!(tile_index_at(x + 15, y + 15, width), tile_index);
        }
    }
}
