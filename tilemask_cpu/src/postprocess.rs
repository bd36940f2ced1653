// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monochrome post-processing: LCD defringing and gamma correction.
//!
//! Operates on a coverage buffer (coverage in the red channel, rendered
//! white-on-black) and resolves it against a solid foreground and background
//! color. Defringing convolves coverage horizontally with a 7-tap kernel,
//! sampling the taps one subpixel apart per RGB channel to spread glyph
//! edges across the LCD stripe.

use tilemask_common::peniko::Color;
use tilemask_common::scene::color_components;

use crate::framebuffer::Framebuffer;
use crate::gamma_lut::GammaLut;

/// A symmetric 7-tap defringing kernel, outermost tap first. The center tap
/// is the last element; a zero center tap disables defringing entirely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefringingKernel(pub [f32; 4]);

/// Kernel matching Core Graphics font smoothing.
pub const DEFRINGING_KERNEL_CORE_GRAPHICS: DefringingKernel =
    DefringingKernel([0.033165660, 0.102074051, 0.221434336, 0.286651906]);

/// Kernel matching FreeType's LCD filtering.
pub const DEFRINGING_KERNEL_FREETYPE: DefringingKernel =
    DefringingKernel([0.0, 0.031372549, 0.301960784, 0.337254902]);

impl DefringingKernel {
    pub fn is_enabled(&self) -> bool {
        self.0[3] != 0.0
    }
}

/// How to resolve a monochrome coverage buffer into colors.
#[derive(Clone, Debug)]
pub struct PostprocessOptions {
    pub fg_color: Color,
    pub bg_color: Color,
    pub defringing_kernel: Option<DefringingKernel>,
    pub gamma_correction: bool,
}

pub(crate) fn postprocess(
    source: &Framebuffer,
    options: &PostprocessOptions,
    gamma_lut: &GammaLut,
) -> Framebuffer {
    let fg = color_components(options.fg_color);
    let bg = color_components(options.bg_color);
    let kernel = options
        .defringing_kernel
        .filter(DefringingKernel::is_enabled);
    let mut out = Framebuffer::new(source.width(), source.height());
    for y in 0..source.height() {
        for x in 0..source.width() {
            let mut alpha = match kernel {
                Some(kernel) => defringed_coverage(source, x, y, kernel),
                None => [coverage_at(source, x as i64, y); 3],
            };
            if options.gamma_correction {
                for channel in 0..3 {
                    alpha[channel] = gamma_lut.sample(alpha[channel], bg[channel]);
                }
            }
            out.put_pixel(
                x,
                y,
                [
                    bg[0] + (fg[0] - bg[0]) * alpha[0],
                    bg[1] + (fg[1] - bg[1]) * alpha[1],
                    bg[2] + (fg[2] - bg[2]) * alpha[2],
                    1.0,
                ],
            );
        }
    }
    out
}

/// Per-channel coverage from nine horizontal taps, the RGB windows offset by
/// one source pixel each.
fn defringed_coverage(source: &Framebuffer, x: u32, y: u32, kernel: DefringingKernel) -> [f32; 3] {
    let mut taps = [0.0f32; 9];
    for (i, tap) in taps.iter_mut().enumerate() {
        let offset = i as i64 - 4;
        // The outermost taps only matter for kernels with a nonzero edge
        // coefficient.
        if offset.abs() == 4 && kernel.0[0] == 0.0 {
            continue;
        }
        *tap = coverage_at(source, x as i64 + offset, y);
    }
    [
        convolve_7_tap(&taps[0..7], kernel),
        convolve_7_tap(&taps[1..8], kernel),
        convolve_7_tap(&taps[2..9], kernel),
    ]
}

fn convolve_7_tap(taps: &[f32], kernel: DefringingKernel) -> f32 {
    let [k0, k1, k2, k3] = kernel.0;
    taps[0] * k0
        + taps[1] * k1
        + taps[2] * k2
        + taps[3] * k3
        + taps[4] * k2
        + taps[5] * k1
        + taps[6] * k0
}

/// Coverage at a source pixel, clamped to the buffer edge.
fn coverage_at(source: &Framebuffer, x: i64, y: u32) -> f32 {
    let x = x.clamp(0, source.width() as i64 - 1) as u32;
    source.pixel(x, y)[0]
}
