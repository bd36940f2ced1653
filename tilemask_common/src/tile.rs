// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile geometry, dense per-tile maps, and the packed tile primitives.

use bytemuck::{Pod, Zeroable};

/// Width of a tile in pixels.
pub const TILE_WIDTH: u32 = 16;
/// Height of a tile in pixels.
pub const TILE_HEIGHT: u32 = 16;

/// Sentinel mask index meaning "this tile has no mask".
///
/// Alpha tiles carrying this index composite from their backdrop alone; the
/// mask atlas is never allowed to grow large enough for it to be a valid
/// cell index.
pub const NO_MASK: u16 = u16::MAX;

/// An axis-aligned rectangle of tile coordinates, max-exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl TileRect {
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> TileRect {
        TileRect {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> i32 {
        (self.max_x - self.min_x).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.max_y - self.min_y).max(0)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    pub fn intersect(&self, other: &TileRect) -> TileRect {
        TileRect {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        }
    }
}

/// A dense rectangular map from tile coordinates to `T`, in row-major order.
#[derive(Clone, Debug)]
pub struct DenseTileMap<T> {
    pub data: Vec<T>,
    pub rect: TileRect,
}

impl<T> DenseTileMap<T> {
    pub fn from_builder(mut build: impl FnMut() -> T, rect: TileRect) -> DenseTileMap<T> {
        let len = rect.width() as usize * rect.height() as usize;
        let mut data = Vec::with_capacity(len);
        data.resize_with(len, &mut build);
        DenseTileMap { data, rect }
    }

    pub fn coords_to_index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.rect.contains(x, y) {
            return None;
        }
        Some(self.coords_to_index_unchecked(x, y))
    }

    pub fn coords_to_index_unchecked(&self, x: i32, y: i32) -> usize {
        (y - self.rect.min_y) as usize * self.rect.width() as usize + (x - self.rect.min_x) as usize
    }

    pub fn index_to_coords(&self, index: usize) -> (i32, i32) {
        let w = self.rect.width() as usize;
        (
            (index % w) as i32 + self.rect.min_x,
            (index / w) as i32 + self.rect.min_y,
        )
    }
}

/// A tile with partial coverage, packed for the alpha compositor.
///
/// Tile coordinates are split into two low bytes and a shared high byte of
/// two nibbles, giving 12 bits per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct AlphaTile {
    pub tile_x_lo: u8,
    pub tile_y_lo: u8,
    /// Bits 0..4: tile x high nibble; bits 4..8: tile y high nibble.
    pub tile_hi: u8,
    /// Winding entering this tile from below, added to the mask coverage.
    pub backdrop: i8,
    /// Index of the object this tile belongs to, for paint lookup.
    pub object_index: u16,
    /// Mask atlas cell, or [`NO_MASK`].
    pub tile_index: u16,
}

impl AlphaTile {
    pub fn new(
        tile_x: i32,
        tile_y: i32,
        backdrop: i8,
        object_index: u16,
        tile_index: u16,
    ) -> AlphaTile {
        debug_assert!((0..0x1000).contains(&tile_x) && (0..0x1000).contains(&tile_y));
        AlphaTile {
            tile_x_lo: tile_x as u8,
            tile_y_lo: tile_y as u8,
            tile_hi: ((tile_x >> 8) & 0xf) as u8 | ((tile_y >> 8) << 4) as u8,
            backdrop,
            object_index,
            tile_index,
        }
    }

    pub fn tile_x(&self) -> i32 {
        self.tile_x_lo as i32 | ((self.tile_hi as i32 & 0xf) << 8)
    }

    pub fn tile_y(&self) -> i32 {
        self.tile_y_lo as i32 | ((self.tile_hi as i32 >> 4) << 8)
    }
}

/// A fully covered tile of an opaque object, drawn without a mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct SolidTile {
    pub tile_x: i16,
    pub tile_y: i16,
    pub object_index: u16,
}

impl SolidTile {
    pub fn new(tile_x: i32, tile_y: i32, object_index: u16) -> SolidTile {
        SolidTile {
            tile_x: tile_x as i16,
            tile_y: tile_y as i16,
            object_index,
        }
    }
}
