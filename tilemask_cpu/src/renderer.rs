// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer: owns the worker pool, lookup tables, and mask atlas, and
//! drives the per-frame passes.

use log::debug;
use thiserror::Error;

use tilemask_common::kurbo::Affine;
use tilemask_common::peniko::Color;
use tilemask_common::scene::{color_components, Scene};

use crate::area_lut::AreaLut;
use crate::builder;
use crate::composite;
use crate::framebuffer::Framebuffer;
use crate::gamma_lut::GammaLut;
use crate::mask_atlas::MaskAtlas;
use crate::postprocess::{postprocess, PostprocessOptions};
use crate::reproject;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The frame demanded more mask tiles than the atlas holds. No partial
    /// frame is produced; grow the atlas with
    /// [`Renderer::resize_mask_atlas`] and render again.
    #[error("mask atlas overflow: frame needs {required} tiles, atlas holds {capacity}")]
    AtlasOverflow { required: u32, capacity: u32 },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Clone, Debug)]
pub struct RendererOptions {
    pub background_color: Color,
    /// Tiling worker threads; zero selects the default for the machine.
    pub thread_count: usize,
    /// Mask atlas texel dimensions, multiples of the tile size.
    pub mask_atlas_size: (u32, u32),
    /// When set, objects render as monochrome coverage which is resolved
    /// against the post-process foreground and background colors.
    pub postprocess: Option<PostprocessOptions>,
}

impl Default for RendererOptions {
    fn default() -> RendererOptions {
        RendererOptions {
            background_color: Color::WHITE,
            thread_count: 0,
            mask_atlas_size: (4096, 256),
            postprocess: None,
        }
    }
}

pub struct Renderer {
    options: RendererOptions,
    pool: rayon::ThreadPool,
    mask_atlas: MaskAtlas,
    area_lut: AreaLut,
    gamma_lut: GammaLut,
}

impl Renderer {
    pub fn new(options: RendererOptions) -> Result<Renderer, RenderError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.thread_count)
            .build()?;
        let (atlas_width, atlas_height) = options.mask_atlas_size;
        Ok(Renderer {
            mask_atlas: MaskAtlas::new(atlas_width, atlas_height),
            pool,
            area_lut: AreaLut::new(),
            gamma_lut: GammaLut::new(),
            options,
        })
    }

    /// Renders a frame.
    ///
    /// Passes run in order: occlusion, tiling with concurrent mask
    /// rasterization, solid compositing, alpha compositing, and optional
    /// post-processing.
    pub fn render(&mut self, scene: &Scene) -> Result<Framebuffer, RenderError> {
        self.mask_atlas.clear();
        let output = builder::build_frame(scene, &self.pool, &mut self.mask_atlas, &self.area_lut);
        let capacity = self.mask_atlas.tile_capacity();
        if output.required_tiles > capacity {
            debug!(
                "dropping frame: {} mask tiles demanded, {} available",
                output.required_tiles, capacity
            );
            return Err(RenderError::AtlasOverflow {
                required: output.required_tiles,
                capacity,
            });
        }

        let monochrome = self.options.postprocess.is_some();
        let mut framebuffer = Framebuffer::new(scene.width, scene.height);
        let clear_color = if monochrome {
            // Coverage accumulates white-on-black for the resolve pass.
            [0.0, 0.0, 0.0, 1.0]
        } else {
            color_components(self.options.background_color)
        };
        framebuffer.clear(clear_color);

        let solid_tiles: Vec<_> = if monochrome {
            output
                .solid_tiles
                .iter()
                .map(|&(tile, _)| (tile, Color::WHITE))
                .collect()
        } else {
            output.solid_tiles
        };
        composite::draw_solid_tiles(&mut framebuffer, &solid_tiles);

        let colors: Vec<[f32; 4]> = scene
            .objects
            .iter()
            .map(|object| {
                let [_, _, _, a] = color_components(object.color);
                if monochrome {
                    [1.0, 1.0, 1.0, a]
                } else {
                    color_components(object.color)
                }
            })
            .collect();
        composite::draw_alpha_tiles(
            &mut framebuffer,
            &self.mask_atlas,
            &output.alpha_tiles,
            &colors,
        );

        match &self.options.postprocess {
            Some(options) => Ok(postprocess(&framebuffer, options, &self.gamma_lut)),
            None => Ok(framebuffer),
        }
    }

    /// Resamples a previously rendered frame under a new view transform.
    pub fn reproject(
        &self,
        previous: &Framebuffer,
        old_transform: Affine,
        new_transform: Affine,
    ) -> Framebuffer {
        reproject::reproject(previous, old_transform, new_transform)
    }

    pub fn mask_atlas_capacity(&self) -> u32 {
        self.mask_atlas.tile_capacity()
    }

    /// Replaces the mask atlas, typically after an
    /// [overflow](RenderError::AtlasOverflow). Dimensions must be multiples
    /// of the tile size.
    pub fn resize_mask_atlas(&mut self, width: u32, height: u32) {
        self.mask_atlas = MaskAtlas::new(width, height);
    }
}
