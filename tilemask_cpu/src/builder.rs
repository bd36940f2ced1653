// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame building: the occlusion pass, parallel tiling, and the fill
//! stream.
//!
//! Building runs in two passes. First, opaque objects are tiled in draw
//! order on the calling thread and their fully covered tiles recorded in the
//! depth buffer; this must complete before fill generation so every worker
//! can cull against the final buffer. Then one tiling job per object runs on
//! the worker pool. Workers push fill batches into a bounded channel and the
//! calling thread rasterizes them into the mask atlas as they arrive, so
//! rasterization overlaps tiling and the channel bound applies backpressure
//! when tiling runs ahead. The channel draining after every worker has
//! dropped its sender is the frame's fill fence: all masks are complete
//! before compositing reads them.

use crossbeam_channel::bounded;
use log::debug;

use tilemask_common::fill::Fill;
use tilemask_common::peniko::Color;
use tilemask_common::scene::Scene;
use tilemask_common::tile::{AlphaTile, SolidTile, NO_MASK};
use tilemask_common::tiler::{tile_outline, AlphaTileAllocator, TileCtx};
use tilemask_common::z_buffer::{DepthMetadata, ZBuffer};

use crate::area_lut::AreaLut;
use crate::mask_atlas::MaskAtlas;
use crate::raster;

/// Fills per channel message.
const FILL_BATCH_SIZE: usize = 4096;
/// Bounded channel depth; tiling blocks once this many batches are queued.
const FILL_QUEUE_DEPTH: usize = 64;

pub(crate) struct FrameOutput {
    pub solid_tiles: Vec<(SolidTile, Color)>,
    /// Grouped by object, in draw order.
    pub alpha_tiles: Vec<AlphaTile>,
    /// Mask tiles the frame demanded, for overflow detection.
    pub required_tiles: u32,
}

enum WorkerMessage {
    Fills(Vec<Fill>),
    Tiles {
        object_index: u16,
        tiles: Vec<AlphaTile>,
    },
}

pub(crate) fn build_frame(
    scene: &Scene,
    pool: &rayon::ThreadPool,
    mask_atlas: &mut MaskAtlas,
    area_lut: &AreaLut,
) -> FrameOutput {
    assert!(scene.objects.len() <= u16::MAX as usize);
    let view_box = scene.view_box();

    let mut z_buffer = ZBuffer::new(scene.tile_rect());
    for (index, object) in scene.objects.iter().enumerate() {
        if !object.is_opaque() {
            continue;
        }
        let ctx = TileCtx {
            object_index: index as u16,
            allocator: None,
            occlusion: None,
        };
        let tiled = tile_outline(&object.outline, scene.transform, &view_box, &ctx);
        let covered: Vec<_> = tiled
            .full_tiles
            .iter()
            .map(|tile| (tile.tile_x, tile.tile_y))
            .collect();
        z_buffer.update(
            &covered,
            index as u32 + 1,
            DepthMetadata {
                color: object.color,
            },
        );
    }

    let allocator = AlphaTileAllocator::new(mask_atlas.tile_capacity());
    let (sender, receiver) = bounded::<WorkerMessage>(FILL_QUEUE_DEPTH);
    let mut alpha_slots: Vec<Vec<AlphaTile>> = vec![Vec::new(); scene.objects.len()];
    let mut fill_count = 0usize;

    let z_buffer_ref = &z_buffer;
    let allocator_ref = &allocator;
    pool.in_place_scope(|scope| {
        for (index, object) in scene.objects.iter().enumerate() {
            let sender = sender.clone();
            scope.spawn(move |_| {
                let ctx = TileCtx {
                    object_index: index as u16,
                    allocator: Some(allocator_ref),
                    occlusion: Some((z_buffer_ref, index as u32 + 1)),
                };
                let tiled = tile_outline(&object.outline, scene.transform, &view_box, &ctx);
                for batch in tiled.fills.chunks(FILL_BATCH_SIZE) {
                    if sender.send(WorkerMessage::Fills(batch.to_vec())).is_err() {
                        return;
                    }
                }
                let mut tiles = tiled.alpha_tiles;
                if !object.is_opaque() {
                    // Fully covered tiles of translucent objects composite
                    // from their backdrop alone.
                    tiles.extend(tiled.full_tiles.iter().map(|tile| {
                        AlphaTile::new(
                            tile.tile_x,
                            tile.tile_y,
                            tile.winding.clamp(i8::MIN as i32, i8::MAX as i32) as i8,
                            index as u16,
                            NO_MASK,
                        )
                    }));
                }
                let _ = sender.send(WorkerMessage::Tiles {
                    object_index: index as u16,
                    tiles,
                });
            });
        }
        drop(sender);
        // Rasterize while tiling continues; ends when every worker is done.
        while let Ok(message) = receiver.recv() {
            match message {
                WorkerMessage::Fills(fills) => {
                    fill_count += fills.len();
                    raster::draw_fills(mask_atlas, area_lut, &fills);
                }
                WorkerMessage::Tiles {
                    object_index,
                    tiles,
                } => alpha_slots[object_index as usize] = tiles,
            }
        }
    });

    let mut alpha_tiles = Vec::new();
    for slot in alpha_slots {
        alpha_tiles.extend(slot);
    }
    let solid_tiles = z_buffer.build_solid_tiles();
    debug!(
        "built frame: {} fills, {} alpha tiles, {} solid tiles, {} mask tiles demanded",
        fill_count,
        alpha_tiles.len(),
        solid_tiles.len(),
        allocator.count()
    );
    FrameOutput {
        solid_tiles,
        alpha_tiles,
        required_tiles: allocator.count(),
    }
}
