// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fill encoder.
//!
//! Tiling walks each outline segment across the 16x16 tile grid and turns it
//! into per-tile fills plus winding bookkeeping:
//!
//! * Each subsegment clipped to a tile becomes a [`Fill`] for that tile's
//!   mask.
//! * Where a segment crosses a horizontal tile boundary, an auxiliary fill
//!   running to the bottom-left corner of the upper tile closes that tile's
//!   coverage, so every mask is self-contained.
//! * Where a segment crosses a vertical tile boundary, the tile right of the
//!   crossing gets a winding delta: +1 entering through its right edge, -1
//!   leaving through it.
//!
//! Deltas are then summed up each column from the bottom of the scene, giving
//! every tile the winding that enters it from below (its backdrop). Tiles
//! never touched by an edge but holding nonzero winding are fully covered and
//! bypass the mask pipeline entirely.

use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;

use crate::clip::clip_segment;
use crate::fill::Fill;
use crate::kurbo::{Affine, Point, Rect};
use crate::scene::Outline;
use crate::tile::{AlphaTile, DenseTileMap, TileRect, NO_MASK, TILE_HEIGHT, TILE_WIDTH};
use crate::z_buffer::ZBuffer;

/// Hands out mask atlas cells to tiling workers.
///
/// A single allocator is shared by all workers of a frame, so indices are
/// unique across objects. The counter keeps running past `limit`, but
/// allocation fails there; comparing the final count against the limit
/// tells the renderer how far the frame overflowed.
#[derive(Debug)]
pub struct AlphaTileAllocator {
    next: AtomicU32,
    limit: u32,
}

impl AlphaTileAllocator {
    pub fn new(limit: u32) -> AlphaTileAllocator {
        AlphaTileAllocator {
            next: AtomicU32::new(0),
            limit: limit.min(NO_MASK as u32),
        }
    }

    pub fn allocate(&self) -> Option<u32> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        (index < self.limit).then_some(index)
    }

    /// Total cells demanded so far, including failed allocations.
    pub fn count(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }
}

/// Per-object tiling context.
pub struct TileCtx<'a> {
    pub object_index: u16,
    /// `None` runs the occluder-only pass: no fills or alpha tiles are
    /// produced, only fully covered tiles.
    pub allocator: Option<&'a AlphaTileAllocator>,
    /// Nearest-opaque depths to cull against, with this object's depth.
    pub occlusion: Option<(&'a ZBuffer, u32)>,
}

/// A fully covered tile and the winding that covers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullTile {
    pub tile_x: i32,
    pub tile_y: i32,
    pub winding: i32,
}

/// The tiling output for one object.
#[derive(Debug, Default)]
pub struct TiledObject {
    pub fills: Vec<Fill>,
    pub alpha_tiles: Vec<AlphaTile>,
    pub full_tiles: Vec<FullTile>,
}

#[derive(Clone, Copy)]
struct TileEntry {
    alpha_tile_index: u16,
    backdrop_delta: i32,
    crossed: bool,
    overflowed: bool,
}

impl Default for TileEntry {
    fn default() -> TileEntry {
        TileEntry {
            alpha_tile_index: NO_MASK,
            backdrop_delta: 0,
            crossed: false,
            overflowed: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepDirection {
    X,
    Y,
}

/// Tiles one object's outline into fills, alpha tiles, and full tiles.
///
/// `view_box` bounds the scene in pixels; geometry above it is discarded and
/// geometry below it is retained for its winding contribution.
pub fn tile_outline(
    outline: &Outline,
    transform: Affine,
    view_box: &Rect,
    ctx: &TileCtx<'_>,
) -> TiledObject {
    let Some(bounds) = transformed_bounds(outline, transform) else {
        return TiledObject::default();
    };
    let rect = tiles_covering(&bounds).intersect(&tiles_covering(view_box));
    let mut builder = ObjectBuilder::new(rect, ctx);
    for contour in &outline.contours {
        for (from, to) in contour.segments() {
            builder.process_segment(transform * from, transform * to, view_box);
        }
    }
    builder.build()
}

fn transformed_bounds(outline: &Outline, transform: Affine) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    for contour in &outline.contours {
        for &point in &contour.points {
            let p = transform * point;
            bounds = Some(match bounds {
                None => Rect::new(p.x, p.y, p.x, p.y),
                Some(r) => Rect::new(r.x0.min(p.x), r.y0.min(p.y), r.x1.max(p.x), r.y1.max(p.y)),
            });
        }
    }
    bounds
}

fn tiles_covering(rect: &Rect) -> TileRect {
    TileRect::new(
        (rect.x0 / TILE_WIDTH as f64).floor() as i32,
        (rect.y0 / TILE_HEIGHT as f64).floor() as i32,
        (rect.x1 / TILE_WIDTH as f64).floor() as i32 + 1,
        (rect.y1 / TILE_HEIGHT as f64).floor() as i32 + 1,
    )
}

struct ObjectBuilder<'a> {
    tiles: DenseTileMap<TileEntry>,
    /// Winding entering each column from below the tile rect.
    column_seeds: Vec<i32>,
    fills: Vec<Fill>,
    ctx: &'a TileCtx<'a>,
}

impl<'a> ObjectBuilder<'a> {
    fn new(rect: TileRect, ctx: &'a TileCtx<'a>) -> ObjectBuilder<'a> {
        ObjectBuilder {
            tiles: DenseTileMap::from_builder(TileEntry::default, rect),
            column_seeds: vec![0; rect.width() as usize],
            fills: Vec::new(),
            ctx,
        }
    }

    fn process_segment(&mut self, from: Point, to: Point, view_box: &Rect) {
        // Open toward +y: winding flows up the columns from below.
        let clip_box = Rect::new(view_box.x0, view_box.y0, view_box.x1, f64::INFINITY);
        let Some((from, to)) = clip_segment(from, to, &clip_box) else {
            return;
        };

        let tile_w = TILE_WIDTH as f64;
        let tile_h = TILE_HEIGHT as f64;
        let (mut tile_x, mut tile_y) = (
            (from.x / tile_w).floor() as i32,
            (from.y / tile_h).floor() as i32,
        );
        let to_tile = ((to.x / tile_w).floor() as i32, (to.y / tile_h).floor() as i32);
        let vector = to - from;
        let (step_x, step_y) = (
            if vector.x < 0.0 { -1 } else { 1 },
            if vector.y < 0.0 { -1 } else { 1 },
        );

        let first_crossing_x = (tile_x + i32::from(vector.x >= 0.0)) as f64 * tile_w;
        let first_crossing_y = (tile_y + i32::from(vector.y >= 0.0)) as f64 * tile_h;
        let mut t_max_x = if vector.x == 0.0 {
            f64::INFINITY
        } else {
            (first_crossing_x - from.x) / vector.x
        };
        let mut t_max_y = if vector.y == 0.0 {
            f64::INFINITY
        } else {
            (first_crossing_y - from.y) / vector.y
        };
        let t_delta_x = (tile_w / vector.x).abs();
        let t_delta_y = (tile_h / vector.y).abs();

        let mut current = from;
        loop {
            let mut next_step = if (tile_x, tile_y) == to_tile {
                None
            } else if t_max_x < t_max_y {
                Some(StepDirection::X)
            } else if t_max_x > t_max_y {
                Some(StepDirection::Y)
            } else if step_x > 0 {
                // Exactly through a tile corner; cross in x first.
                Some(StepDirection::X)
            } else {
                Some(StepDirection::Y)
            };
            // A crossing at or past the endpoint is the endpoint.
            if let Some(direction) = next_step {
                let t = match direction {
                    StepDirection::X => t_max_x,
                    StepDirection::Y => t_max_y,
                };
                if t >= 1.0 {
                    next_step = None;
                }
            }

            let subsegment_end = match next_step {
                None => to,
                Some(StepDirection::X) => from + vector * t_max_x,
                Some(StepDirection::Y) => from + vector * t_max_y,
            };
            self.add_fill(current, subsegment_end, tile_x, tile_y);

            match next_step {
                None => break,
                Some(StepDirection::X) => {
                    if step_x > 0 {
                        self.adjust_backdrop(tile_x, tile_y, -1);
                    }
                    tile_x += step_x;
                    if step_x < 0 {
                        self.adjust_backdrop(tile_x, tile_y, 1);
                    }
                    t_max_x += t_delta_x;
                }
                Some(StepDirection::Y) => {
                    if step_y > 0 {
                        // Leaving through the bottom boundary; close this
                        // tile against its bottom-left corner.
                        let corner =
                            Point::new(tile_x as f64 * tile_w, (tile_y + 1) as f64 * tile_h);
                        self.add_fill(subsegment_end, corner, tile_x, tile_y);
                        tile_y += 1;
                    } else {
                        tile_y -= 1;
                        // Entered the new tile through its bottom boundary.
                        let corner =
                            Point::new(tile_x as f64 * tile_w, (tile_y + 1) as f64 * tile_h);
                        self.add_fill(corner, subsegment_end, tile_x, tile_y);
                    }
                    t_max_y += t_delta_y;
                }
            }
            current = subsegment_end;
        }
    }

    fn add_fill(&mut self, from: Point, to: Point, tile_x: i32, tile_y: i32) {
        let Some(map_index) = self.tiles.coords_to_index(tile_x, tile_y) else {
            return;
        };
        self.tiles.data[map_index].crossed = true;
        let Some(allocator) = self.ctx.allocator else {
            return;
        };
        if let Some((z_buffer, depth)) = self.ctx.occlusion {
            if !z_buffer.test(tile_x, tile_y, depth) {
                return;
            }
        }
        let origin_x = tile_x as f64 * TILE_WIDTH as f64;
        let origin_y = tile_y as f64 * TILE_HEIGHT as f64;
        let local_from = Point::new(from.x - origin_x, from.y - origin_y);
        let local_to = Point::new(to.x - origin_x, to.y - origin_y);
        let Some(mut fill) = Fill::from_segment(local_from, local_to, 0) else {
            return;
        };
        let entry = &mut self.tiles.data[map_index];
        if entry.alpha_tile_index == NO_MASK {
            if entry.overflowed {
                return;
            }
            match allocator.allocate() {
                Some(index) => entry.alpha_tile_index = index as u16,
                None => {
                    entry.overflowed = true;
                    return;
                }
            }
        }
        fill.tile_index = entry.alpha_tile_index;
        self.fills.push(fill);
    }

    fn adjust_backdrop(&mut self, tile_x: i32, tile_y: i32, delta: i32) {
        let rect = self.tiles.rect;
        if tile_x < rect.min_x || tile_x >= rect.max_x || tile_y < rect.min_y {
            return;
        }
        if tile_y >= rect.max_y {
            // Below the tile rect; feeds the column's incoming winding.
            self.column_seeds[(tile_x - rect.min_x) as usize] += delta;
        } else {
            let index = self.tiles.coords_to_index_unchecked(tile_x, tile_y);
            self.tiles.data[index].backdrop_delta += delta;
        }
    }

    /// Sums winding up each column and classifies tiles.
    fn build(self) -> TiledObject {
        let rect = self.tiles.rect;
        let mut alpha_tiles = Vec::new();
        let mut full_tiles = Vec::new();
        for col in 0..rect.width() {
            let mut winding = self.column_seeds[col as usize];
            for row in (0..rect.height()).rev() {
                let tile_x = rect.min_x + col;
                let tile_y = rect.min_y + row;
                let index = self.tiles.coords_to_index_unchecked(tile_x, tile_y);
                let entry = self.tiles.data[index];
                if entry.crossed {
                    if entry.alpha_tile_index != NO_MASK {
                        alpha_tiles.push(AlphaTile::new(
                            tile_x,
                            tile_y,
                            winding.clamp(i8::MIN as i32, i8::MAX as i32) as i8,
                            self.ctx.object_index,
                            entry.alpha_tile_index,
                        ));
                    }
                } else if winding != 0 {
                    let visible = match self.ctx.occlusion {
                        Some((z_buffer, depth)) => z_buffer.test(tile_x, tile_y, depth),
                        None => true,
                    };
                    if visible {
                        full_tiles.push(FullTile {
                            tile_x,
                            tile_y,
                            winding,
                        });
                    }
                }
                winding += entry.backdrop_delta;
            }
        }
        debug!(
            "tiled object {}: {} fills, {} alpha tiles, {} full tiles",
            self.ctx.object_index,
            self.fills.len(),
            alpha_tiles.len(),
            full_tiles.len()
        );
        TiledObject {
            fills: self.fills,
            alpha_tiles,
            full_tiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::z_buffer::DepthMetadata;
    use peniko::Color;

    fn tile_rect_object(rect: Rect, view: Rect, ctx: &TileCtx<'_>) -> TiledObject {
        tile_outline(&Outline::from_rect(rect), Affine::IDENTITY, &view, ctx)
    }

    fn find_alpha(tiles: &[AlphaTile], x: i32, y: i32) -> &AlphaTile {
        tiles
            .iter()
            .find(|t| t.tile_x() == x && t.tile_y() == y)
            .unwrap()
    }

    #[test]
    fn rectangle_classifies_interior_as_full() {
        let allocator = AlphaTileAllocator::new(1024);
        let ctx = TileCtx {
            object_index: 0,
            allocator: Some(&allocator),
            occlusion: None,
        };
        let out = tile_rect_object(
            Rect::new(2.0, 2.0, 46.0, 46.0),
            Rect::new(0.0, 0.0, 48.0, 48.0),
            &ctx,
        );
        assert_eq!(
            out.full_tiles,
            vec![FullTile {
                tile_x: 1,
                tile_y: 1,
                winding: 1
            }]
        );
        // The eight boundary tiles are all edge-crossed.
        assert_eq!(out.alpha_tiles.len(), 8);
        assert!(!out.fills.is_empty());
        assert_eq!(allocator.count(), 8);
    }

    #[test]
    fn backdrop_accumulates_from_below() {
        let allocator = AlphaTileAllocator::new(1024);
        let ctx = TileCtx {
            object_index: 0,
            allocator: Some(&allocator),
            occlusion: None,
        };
        // Two columns, three rows; every tile is edge-crossed.
        let out = tile_rect_object(
            Rect::new(2.0, 2.0, 30.0, 46.0),
            Rect::new(0.0, 0.0, 32.0, 48.0),
            &ctx,
        );
        assert_eq!(out.alpha_tiles.len(), 6);
        assert!(out.full_tiles.is_empty());
        // The bottom edge crosses x = 16 in row 2; the delta lands right of
        // the crossing and propagates upward through column 0.
        assert_eq!(find_alpha(&out.alpha_tiles, 0, 2).backdrop, 0);
        assert_eq!(find_alpha(&out.alpha_tiles, 0, 1).backdrop, 1);
        assert_eq!(find_alpha(&out.alpha_tiles, 0, 0).backdrop, 1);
        // The crossing-free column keeps backdrop zero.
        assert_eq!(find_alpha(&out.alpha_tiles, 1, 2).backdrop, 0);
        assert_eq!(find_alpha(&out.alpha_tiles, 1, 1).backdrop, 0);
        assert_eq!(find_alpha(&out.alpha_tiles, 1, 0).backdrop, 0);
    }

    #[test]
    fn occluder_pass_reports_full_tiles_only() {
        let ctx = TileCtx {
            object_index: 3,
            allocator: None,
            occlusion: None,
        };
        let out = tile_rect_object(
            Rect::new(2.0, 2.0, 46.0, 46.0),
            Rect::new(0.0, 0.0, 48.0, 48.0),
            &ctx,
        );
        assert!(out.fills.is_empty());
        assert!(out.alpha_tiles.is_empty());
        assert_eq!(out.full_tiles.len(), 1);
    }

    #[test]
    fn occluded_tiles_generate_no_fills() {
        let mut z_buffer = ZBuffer::new(TileRect::new(0, 0, 1, 1));
        z_buffer.update(
            &[(0, 0)],
            5,
            DepthMetadata {
                color: Color::rgb8(0, 0, 0),
            },
        );
        let allocator = AlphaTileAllocator::new(1024);
        let shape = Rect::new(2.0, 2.0, 14.0, 14.0);
        let view = Rect::new(0.0, 0.0, 16.0, 16.0);

        let behind = TileCtx {
            object_index: 0,
            allocator: Some(&allocator),
            occlusion: Some((&z_buffer, 1)),
        };
        let out = tile_rect_object(shape, view, &behind);
        assert!(out.fills.is_empty());
        assert!(out.alpha_tiles.is_empty());
        assert!(out.full_tiles.is_empty());

        let in_front = TileCtx {
            object_index: 6,
            allocator: Some(&allocator),
            occlusion: Some((&z_buffer, 7)),
        };
        let out = tile_rect_object(shape, view, &in_front);
        assert!(!out.fills.is_empty());
        assert_eq!(out.alpha_tiles.len(), 1);
    }

    #[test]
    fn geometry_below_the_viewport_seeds_columns() {
        let allocator = AlphaTileAllocator::new(1024);
        let ctx = TileCtx {
            object_index: 0,
            allocator: Some(&allocator),
            occlusion: None,
        };
        // The rectangle's bottom edge lies below the viewport; its winding
        // must still arrive in the visible rows.
        let out = tile_rect_object(
            Rect::new(2.0, 2.0, 46.0, 100.0),
            Rect::new(0.0, 0.0, 48.0, 48.0),
            &ctx,
        );
        // Columns are resolved bottom-up.
        assert_eq!(
            out.full_tiles,
            vec![
                FullTile {
                    tile_x: 1,
                    tile_y: 2,
                    winding: 1
                },
                FullTile {
                    tile_x: 1,
                    tile_y: 1,
                    winding: 1
                }
            ]
        );
    }

    #[test]
    fn shared_allocator_yields_disjoint_indices() {
        let allocator = AlphaTileAllocator::new(1024);
        let view = Rect::new(0.0, 0.0, 48.0, 48.0);
        let mut indices = Vec::new();
        for object_index in 0..2 {
            let ctx = TileCtx {
                object_index,
                allocator: Some(&allocator),
                occlusion: None,
            };
            let out = tile_rect_object(Rect::new(2.0, 2.0, 46.0, 46.0), view, &ctx);
            indices.extend(out.alpha_tiles.iter().map(|t| t.tile_index));
        }
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), 16);
        assert_eq!(allocator.count(), 16);
    }

    #[test]
    fn transform_is_applied_before_tiling() {
        let allocator = AlphaTileAllocator::new(1024);
        let ctx = TileCtx {
            object_index: 0,
            allocator: Some(&allocator),
            occlusion: None,
        };
        let out = tile_outline(
            &Outline::from_rect(Rect::new(1.0, 1.0, 23.0, 23.0)),
            Affine::scale(2.0),
            &Rect::new(0.0, 0.0, 48.0, 48.0),
            &ctx,
        );
        assert_eq!(
            out.full_tiles,
            vec![FullTile {
                tile_x: 1,
                tile_y: 1,
                winding: 1
            }]
        );
    }
}
