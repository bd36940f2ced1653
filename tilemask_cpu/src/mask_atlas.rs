// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `f16` mask atlas that fills accumulate coverage into.

use half::f16;

use tilemask_common::atlas;
use tilemask_common::tile::{NO_MASK, TILE_HEIGHT, TILE_WIDTH};

/// A single-channel `f16` texture holding one 16x16 coverage mask per
/// allocated alpha tile, addressed row-major via [`atlas::tile_offset`].
///
/// Signed values are expected during accumulation; the compositor takes the
/// absolute value against the backdrop.
pub struct MaskAtlas {
    width: u32,
    height: u32,
    texels: Vec<f16>,
}

impl MaskAtlas {
    /// Creates an atlas. Dimensions must be multiples of the tile size, and
    /// the cell count must stay below [`NO_MASK`] so the sentinel can never
    /// collide with a real cell index.
    pub fn new(width: u32, height: u32) -> MaskAtlas {
        assert!(width % TILE_WIDTH == 0 && height % TILE_HEIGHT == 0);
        assert!(atlas::tile_capacity(width, height) <= NO_MASK as u32);
        MaskAtlas {
            width,
            height,
            texels: vec![f16::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_capacity(&self) -> u32 {
        atlas::tile_capacity(self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.texels.fill(f16::ZERO);
    }

    /// Adds `value` to the texel, with an `f16` round-trip per add as GPU
    /// additive blending into an `R16F` target would.
    pub fn accumulate(&mut self, x: u32, y: u32, value: f32) {
        let index = y as usize * self.width as usize + x as usize;
        self.texels[index] = f16::from_f32(self.texels[index].to_f32() + value);
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.texels[y as usize * self.width as usize + x as usize].to_f32()
    }
}
