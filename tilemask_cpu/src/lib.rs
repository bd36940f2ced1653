// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A CPU renderer built on sparse tile-based coverage rasterization.
//!
//! Scenes are flattened outlines with paints. Rendering runs in passes:
//! opaque objects first claim fully covered tiles in a per-tile depth
//! buffer, then tiling workers encode each remaining edge as per-tile
//! [fills](tilemask_common::fill::Fill) which are accumulated into an `f16`
//! mask atlas, and finally solid and alpha tiles are composited into an RGBA
//! framebuffer. Optional post-processing applies LCD defringing and gamma
//! correction to monochrome output, and a reprojection helper resamples the
//! previous frame under a new view transform while the next one is built.
//!
//! ```no_run
//! use tilemask_cpu::common::scene::{PathObject, Outline, Scene};
//! use tilemask_cpu::kurbo::Rect;
//! use tilemask_cpu::peniko::Color;
//! use tilemask_cpu::{Renderer, RendererOptions};
//!
//! # fn main() -> Result<(), tilemask_cpu::RenderError> {
//! let mut scene = Scene::new(256, 256);
//! let outline = Outline::from_rect(Rect::new(32.0, 32.0, 224.0, 224.0));
//! scene.push_object(PathObject::new(outline, Color::rgb8(220, 40, 40)));
//! let mut renderer = Renderer::new(RendererOptions::default())?;
//! let frame = renderer.render(&scene)?;
//! let _pixels = frame.to_rgba8();
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(clippy::print_stdout, clippy::print_stderr)]
#![forbid(unsafe_code)]

mod area_lut;
mod builder;
mod composite;
mod framebuffer;
mod gamma_lut;
mod mask_atlas;
mod postprocess;
mod raster;
mod renderer;
mod reproject;

pub use framebuffer::Framebuffer;
pub use postprocess::{
    DefringingKernel, PostprocessOptions, DEFRINGING_KERNEL_CORE_GRAPHICS,
    DEFRINGING_KERNEL_FREETYPE,
};
pub use renderer::{RenderError, Renderer, RendererOptions};

pub use tilemask_common as common;
pub use tilemask_common::{kurbo, peniko};
