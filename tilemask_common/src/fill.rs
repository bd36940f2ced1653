// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The 64-bit fill record.
//!
//! A fill is one line segment clipped to a single 16x16 tile, expressed in
//! tile-local 4.8 fixed point, together with the index of the mask tile it
//! accumulates coverage into. Fills are the unit of work streamed from the
//! tiling workers to the mask rasterizer.

use bytemuck::{Pod, Zeroable};

use crate::kurbo::Point;

/// Largest representable tile-local coordinate, in 4.8 fixed point.
///
/// 4 integer bits cover 0..16 pixels; 8 fractional bits give 1/256 px
/// resolution. `16.0` itself is not representable and clamps to this.
pub const MAX_FIXED_COORD: i32 = 0x0fff;

/// One line segment clipped to a tile, in 4.8 fixed point.
///
/// Layout matches the rasterizer's vertex fetch: `subpx` packs the four
/// 8-bit fractional parts (from.x, from.y, to.x, to.y, low byte first) and
/// `px` packs the four 4-bit integer parts in the same order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Fill {
    /// Packed 8-bit subpixel parts of the two endpoints.
    pub subpx: u32,
    /// Packed 4-bit pixel parts of the two endpoints.
    pub px: u16,
    /// Index of the mask tile this fill accumulates into.
    pub tile_index: u16,
}

impl Fill {
    /// Encodes a segment in tile-local pixel coordinates.
    ///
    /// Coordinates are quantized to 1/256 px and clamped to the tile, so
    /// callers must pass segments already clipped to the tile of
    /// `tile_index`. Returns `None` for fills that cannot contribute
    /// coverage, i.e. those whose endpoints quantize to the same x
    /// coordinate (vertical or degenerate segments).
    pub fn from_segment(from: Point, to: Point, tile_index: u16) -> Option<Fill> {
        let from_x = quantize(from.x);
        let from_y = quantize(from.y);
        let to_x = quantize(to.x);
        let to_y = quantize(to.y);
        if from_x == to_x {
            return None;
        }
        let subpx = (from_x as u32 & 0xff)
            | ((from_y as u32 & 0xff) << 8)
            | ((to_x as u32 & 0xff) << 16)
            | ((to_y as u32 & 0xff) << 24);
        let px =
            ((from_x >> 8) | ((from_y >> 8) << 4) | ((to_x >> 8) << 8) | ((to_y >> 8) << 12)) as u16;
        Some(Fill {
            subpx,
            px,
            tile_index,
        })
    }

    /// Tile-local `from` endpoint, in pixels.
    pub fn from(self) -> [f32; 2] {
        [
            unpack(self.subpx & 0xff, self.px as u32 & 0xf),
            unpack((self.subpx >> 8) & 0xff, (self.px as u32 >> 4) & 0xf),
        ]
    }

    /// Tile-local `to` endpoint, in pixels.
    pub fn to(self) -> [f32; 2] {
        [
            unpack((self.subpx >> 16) & 0xff, (self.px as u32 >> 8) & 0xf),
            unpack((self.subpx >> 24) & 0xff, (self.px as u32 >> 12) & 0xf),
        ]
    }
}

fn quantize(coord: f64) -> i32 {
    ((coord * 256.0).round() as i32).clamp(0, MAX_FIXED_COORD)
}

fn unpack(subpx: u32, px: u32) -> f32 {
    ((px << 8) | subpx) as f32 * (1.0 / 256.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_eight_bytes() {
        assert_eq!(core::mem::size_of::<Fill>(), 8);
    }

    #[test]
    fn round_trips_within_quantization_error() {
        let from = Point::new(1.375, 15.0625);
        let to = Point::new(12.25, 0.5);
        let fill = Fill::from_segment(from, to, 42).unwrap();
        assert_eq!(fill.tile_index, 42);
        let [fx, fy] = fill.from();
        let [tx, ty] = fill.to();
        assert!((fx as f64 - from.x).abs() <= 1.0 / 256.0);
        assert!((fy as f64 - from.y).abs() <= 1.0 / 256.0);
        assert!((tx as f64 - to.x).abs() <= 1.0 / 256.0);
        assert!((ty as f64 - to.y).abs() <= 1.0 / 256.0);
    }

    #[test]
    fn clamps_to_tile_bounds() {
        let fill = Fill::from_segment(Point::new(-3.0, 20.0), Point::new(16.0, -1.0), 0).unwrap();
        assert_eq!(fill.from(), [0.0, 4095.0 / 256.0]);
        assert_eq!(fill.to(), [4095.0 / 256.0, 0.0]);
    }

    #[test]
    fn culls_vertical_segments() {
        assert!(Fill::from_segment(Point::new(4.0, 1.0), Point::new(4.0, 13.0), 0).is_none());
        // Distinct x coordinates closer than the quantization step also
        // collapse to a degenerate fill.
        assert!(Fill::from_segment(Point::new(4.001, 1.0), Point::new(4.0, 13.0), 0).is_none());
        assert!(Fill::from_segment(Point::new(4.0, 2.0), Point::new(4.0, 2.0), 0).is_none());
    }

    #[test]
    fn packs_high_bits() {
        let fill = Fill::from_segment(Point::new(15.5, 0.25), Point::new(0.75, 14.0), 7).unwrap();
        // 15.5 = 0xf80, 0.25 = 0x040, 0.75 = 0x0c0, 14.0 = 0xe00.
        assert_eq!(fill.px, 0xe00f);
        assert_eq!(fill.subpx, 0x00c0_4080);
    }
}
