// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coarse per-tile occlusion culling.
//!
//! Opaque objects record their fully covered tiles here before any fills
//! are generated. Each tile stores the depth of the nearest opaque solid
//! tile covering it (`object_index + 1`; zero means none), so later work
//! for anything behind that depth can be skipped per tile.

use peniko::Color;

use crate::tile::{DenseTileMap, SolidTile, TileRect};

/// Depth value meaning "no opaque solid tile here".
const EMPTY: u32 = 0;

/// Paint metadata recorded per depth, used to turn the resolved buffer back
/// into a solid tile batch.
#[derive(Clone, Copy, Debug)]
pub struct DepthMetadata {
    pub color: Color,
}

pub struct ZBuffer {
    buffer: DenseTileMap<u32>,
    metadata: Vec<Option<DepthMetadata>>,
}

impl ZBuffer {
    pub fn new(rect: TileRect) -> ZBuffer {
        ZBuffer {
            buffer: DenseTileMap::from_builder(|| EMPTY, rect),
            metadata: Vec::new(),
        }
    }

    /// Whether work at `depth` is visible at the given tile, i.e. not
    /// covered by a strictly nearer opaque solid tile.
    pub fn test(&self, tile_x: i32, tile_y: i32, depth: u32) -> bool {
        match self.buffer.coords_to_index(tile_x, tile_y) {
            Some(index) => self.buffer.data[index] <= depth,
            None => true,
        }
    }

    /// Records the fully covered tiles of the opaque object at `depth`.
    ///
    /// Later objects are nearer, so ties cannot occur and `max` resolves
    /// overlap to the nearest object regardless of call order.
    pub fn update(&mut self, solid_tiles: &[(i32, i32)], depth: u32, metadata: DepthMetadata) {
        debug_assert!(depth > EMPTY);
        let depth_index = depth as usize - 1;
        if self.metadata.len() <= depth_index {
            self.metadata.resize(depth_index + 1, None);
        }
        self.metadata[depth_index] = Some(metadata);
        for &(tile_x, tile_y) in solid_tiles {
            if let Some(index) = self.buffer.coords_to_index(tile_x, tile_y) {
                let stored = &mut self.buffer.data[index];
                *stored = (*stored).max(depth);
            }
        }
    }

    /// Resolves the buffer into a batch of solid tiles with their paints.
    pub fn build_solid_tiles(&self) -> Vec<(SolidTile, Color)> {
        let mut tiles = Vec::new();
        for (index, &depth) in self.buffer.data.iter().enumerate() {
            if depth == EMPTY {
                continue;
            }
            let (tile_x, tile_y) = self.buffer.index_to_coords(index);
            let object_index = depth - 1;
            if let Some(Some(metadata)) = self.metadata.get(object_index as usize) {
                tiles.push((
                    SolidTile::new(tile_x, tile_y, object_index as u16),
                    metadata.color,
                ));
            }
        }
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> DepthMetadata {
        DepthMetadata {
            color: Color::rgb8(255, 0, 0),
        }
    }

    #[test]
    fn nearest_object_wins_overlap() {
        let mut z = ZBuffer::new(TileRect::new(0, 0, 4, 4));
        z.update(&[(1, 1), (2, 1)], 1, metadata());
        z.update(
            &[(2, 1)],
            5,
            DepthMetadata {
                color: Color::rgb8(0, 255, 0),
            },
        );
        let tiles = z.build_solid_tiles();
        let at = |x: i16, y: i16| {
            tiles
                .iter()
                .find(|(t, _)| t.tile_x == x && t.tile_y == y)
                .unwrap()
        };
        assert_eq!(at(1, 1).0.object_index, 0);
        assert_eq!(at(2, 1).0.object_index, 4);
        assert_eq!(at(2, 1).1, Color::rgb8(0, 255, 0));
        assert_eq!(tiles.len(), 2);
    }

    #[test]
    fn test_culls_only_strictly_behind() {
        let mut z = ZBuffer::new(TileRect::new(0, 0, 4, 4));
        z.update(&[(0, 0)], 3, metadata());
        assert!(!z.test(0, 0, 2));
        assert!(z.test(0, 0, 3));
        assert!(z.test(0, 0, 4));
        // Uncovered tiles and out-of-bounds tiles never cull.
        assert!(z.test(1, 0, 1));
        assert!(z.test(-5, 0, 1));
    }

    #[test]
    fn update_ignores_out_of_bounds_tiles() {
        let mut z = ZBuffer::new(TileRect::new(0, 0, 2, 2));
        z.update(&[(-1, 0), (5, 5), (1, 1)], 2, metadata());
        assert_eq!(z.build_solid_tiles().len(), 1);
    }
}
