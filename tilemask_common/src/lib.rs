// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared data model and CPU-side tiling logic for the tilemask renderer.
//!
//! This crate holds everything that is meaningful to both sides of the
//! pipeline: the 64-bit [fill record](fill::Fill) and its 4.8 fixed-point
//! encoding, the [tile atlas addressing](atlas) function that the CPU
//! allocator and the GPU-kernel code must agree on, dense per-tile maps and
//! the packed tile primitives, the [fill encoder](tiler) that converts
//! flattened outlines into per-tile fills and backdrops, and the coarse
//! [occlusion culler](z_buffer).
//!
//! It should not be used on its own; use the `tilemask_cpu` renderer, which
//! drives these pieces as a pipeline.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(clippy::print_stdout, clippy::print_stderr)]
#![forbid(unsafe_code)]

pub mod atlas;
pub mod clip;
pub mod fill;
pub mod scene;
pub mod tile;
pub mod tiler;
pub mod z_buffer;

pub use peniko;
pub use peniko::kurbo;
