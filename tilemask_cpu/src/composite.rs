// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile compositors: solid tiles overwrite, alpha tiles blend through the
//! mask atlas.

use tilemask_common::atlas;
use tilemask_common::peniko::Color;
use tilemask_common::scene::color_components;
use tilemask_common::tile::{AlphaTile, SolidTile, NO_MASK, TILE_HEIGHT, TILE_WIDTH};

use crate::framebuffer::Framebuffer;
use crate::mask_atlas::MaskAtlas;

/// Draws fully covered opaque tiles by overwriting their pixels.
pub(crate) fn draw_solid_tiles(framebuffer: &mut Framebuffer, tiles: &[(SolidTile, Color)]) {
    for &(tile, color) in tiles {
        let [r, g, b, _] = color_components(color);
        let origin_x = tile.tile_x as i64 * TILE_WIDTH as i64;
        let origin_y = tile.tile_y as i64 * TILE_HEIGHT as i64;
        for_each_tile_pixel(framebuffer, origin_x, origin_y, |framebuffer, x, y, _, _| {
            framebuffer.put_pixel(x, y, [r, g, b, 1.0]);
        });
    }
}

/// Draws partially covered tiles, in slice order, blending each pixel by
/// `min(|mask + backdrop|, 1)` coverage.
///
/// Callers must pass tiles grouped by object in draw order; `colors` is
/// indexed by the tiles' object indices.
pub(crate) fn draw_alpha_tiles(
    framebuffer: &mut Framebuffer,
    atlas: &MaskAtlas,
    tiles: &[AlphaTile],
    colors: &[[f32; 4]],
) {
    for tile in tiles {
        let [r, g, b, a] = colors[tile.object_index as usize];
        let backdrop = tile.backdrop as f32;
        let mask_origin = if tile.tile_index == NO_MASK {
            None
        } else {
            Some(atlas::tile_offset(tile.tile_index as u32, atlas.width()))
        };
        let origin_x = tile.tile_x() as i64 * TILE_WIDTH as i64;
        let origin_y = tile.tile_y() as i64 * TILE_HEIGHT as i64;
        for_each_tile_pixel(
            framebuffer,
            origin_x,
            origin_y,
            |framebuffer, x, y, local_x, local_y| {
                let mask = match mask_origin {
                    Some((mask_x, mask_y)) => atlas.get(mask_x + local_x, mask_y + local_y),
                    None => 0.0,
                };
                let coverage = (mask + backdrop).abs().min(1.0);
                if coverage > 0.0 {
                    framebuffer.blend_over(x, y, [r, g, b, a * coverage]);
                }
            },
        );
    }
}

/// Visits the tile's pixels that fall inside the framebuffer.
fn for_each_tile_pixel(
    framebuffer: &mut Framebuffer,
    origin_x: i64,
    origin_y: i64,
    mut f: impl FnMut(&mut Framebuffer, u32, u32, u32, u32),
) {
    for local_y in 0..TILE_HEIGHT {
        let y = origin_y + local_y as i64;
        if y < 0 || y >= framebuffer.height() as i64 {
            continue;
        }
        for local_x in 0..TILE_WIDTH {
            let x = origin_x + local_x as i64;
            if x < 0 || x >= framebuffer.width() as i64 {
                continue;
            }
            f(framebuffer, x as u32, y as u32, local_x, local_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area_lut::AreaLut;
    use crate::raster;
    use tilemask_common::fill::Fill;
    use tilemask_common::kurbo::Point;

    #[test]
    fn solid_tiles_overwrite_and_clip() {
        let mut fb = Framebuffer::new(20, 20);
        fb.clear([1.0, 1.0, 1.0, 1.0]);
        let tiles = [(SolidTile::new(1, 0, 0), Color::rgb8(255, 0, 0))];
        draw_solid_tiles(&mut fb, &tiles);
        assert_eq!(fb.pixel(17, 3), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(fb.pixel(15, 3), [1.0, 1.0, 1.0, 1.0]);
        // Columns 20..32 of the tile fall outside and are dropped.
        assert_eq!(fb.pixel(19, 0), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn sentinel_tiles_composite_from_backdrop_alone() {
        let mut fb = Framebuffer::new(16, 16);
        fb.clear([1.0, 1.0, 1.0, 1.0]);
        let atlas = MaskAtlas::new(16, 16);
        let tiles = [AlphaTile::new(0, 0, 1, 0, NO_MASK)];
        draw_alpha_tiles(&mut fb, &atlas, &tiles, &[[0.0, 0.0, 1.0, 0.5]]);
        let px = fb.pixel(8, 8);
        assert!((px[0] - 0.5).abs() < 1e-6);
        assert!((px[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn negative_winding_covers_like_positive() {
        let mut fb = Framebuffer::new(16, 16);
        fb.clear([1.0, 1.0, 1.0, 1.0]);
        let atlas = MaskAtlas::new(16, 16);
        let tiles = [AlphaTile::new(0, 0, -1, 0, NO_MASK)];
        draw_alpha_tiles(&mut fb, &atlas, &tiles, &[[0.0, 0.0, 0.0, 1.0]]);
        assert_eq!(fb.pixel(4, 4), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn mask_and_backdrop_sum_before_clamping() {
        // A full-coverage mask plus backdrop 0 behaves like backdrop 1 with
        // no mask.
        let mut atlas = MaskAtlas::new(16, 16);
        let fill =
            Fill::from_segment(Point::new(16.0, 16.0), Point::new(0.0, 16.0), 0).unwrap();
        raster::draw_fills(&mut atlas, &AreaLut::new(), &[fill]);
        let mut fb = Framebuffer::new(16, 16);
        fb.clear([1.0, 1.0, 1.0, 1.0]);
        let tiles = [AlphaTile::new(0, 0, 0, 0, 0)];
        draw_alpha_tiles(&mut fb, &atlas, &tiles, &[[0.0, 1.0, 0.0, 1.0]]);
        let px = fb.pixel(8, 8);
        assert!(px[1] > 0.99 && px[0] < 0.02);
    }
}
