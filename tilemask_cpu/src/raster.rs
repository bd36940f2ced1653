// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fill kernel: accumulates signed analytic coverage into mask tiles.
//!
//! This is the CPU expression of the GPU fill stage, which draws one quad
//! per fill with additive blending into the `R16F` atlas. Per pixel, the
//! fill's segment is windowed to the pixel's x extent; the area lookup table
//! then gives the fraction of the pixel above the segment, which is weighted
//! by the window width. Left-to-right fills carry negative weight and
//! right-to-left fills positive, so opposite passes over the same geometry
//! cancel and accumulation order cannot matter beyond float rounding.

use tilemask_common::atlas;
use tilemask_common::fill::Fill;
use tilemask_common::tile::{TILE_HEIGHT, TILE_WIDTH};

use crate::area_lut::AreaLut;
use crate::mask_atlas::MaskAtlas;

pub(crate) fn draw_fills(atlas: &mut MaskAtlas, area_lut: &AreaLut, fills: &[Fill]) {
    for fill in fills {
        draw_fill(atlas, area_lut, fill);
    }
}

fn draw_fill(atlas: &mut MaskAtlas, area_lut: &AreaLut, fill: &Fill) {
    if fill.tile_index as u32 >= atlas.tile_capacity() {
        // A fill referencing a cell outside the atlas must never wrap into
        // another tile's mask.
        debug_assert!(false, "fill tile index {} out of range", fill.tile_index);
        return;
    }
    let (tile_x, tile_y) = atlas::tile_offset(fill.tile_index as u32, atlas.width());

    let [from_x, from_y] = fill.from();
    let [to_x, to_y] = fill.to();
    debug_assert!(from_x != to_x);
    let (left, right) = if from_x < to_x {
        ([from_x, from_y], [to_x, to_y])
    } else {
        ([to_x, to_y], [from_x, from_y])
    };
    let dxdy = (right[1] - left[1]) / (right[0] - left[0]);

    for pixel_y in 0..TILE_HEIGHT {
        let center_y = pixel_y as f32 + 0.5;
        for pixel_x in 0..TILE_WIDTH {
            let center_x = pixel_x as f32 + 0.5;
            let window_from = (from_x - center_x).clamp(-0.5, 0.5);
            let window_to = (to_x - center_x).clamp(-0.5, 0.5);
            let dx = window_from - window_to;
            if dx == 0.0 {
                continue;
            }
            let window_mid = 0.5 * (window_from + window_to) + center_x;
            let y_mid = left[1] + (window_mid - left[0]) * dxdy - center_y;
            let coverage = area_lut.sample(
                (y_mid + 8.0) * (1.0 / 16.0),
                (dxdy * dx).abs() * (1.0 / 16.0),
            ) * dx;
            atlas.accumulate(tile_x + pixel_x, tile_y + pixel_y, coverage);
        }
    }
}
