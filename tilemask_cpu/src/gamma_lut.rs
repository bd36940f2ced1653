// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gamma correction lookup table.
//!
//! Maps a coverage value and the background level it will be blended onto to
//! a corrected coverage, compensating for blending happening in a
//! gamma-encoded (sRGB) framebuffer. Built once at startup; an R8 texture on
//! the GPU side.

const SIZE: usize = 256;

pub struct GammaLut {
    /// Row per background level, column per input coverage.
    data: Vec<u8>,
}

impl Default for GammaLut {
    fn default() -> GammaLut {
        GammaLut::new()
    }
}

impl GammaLut {
    pub fn new() -> GammaLut {
        let mut data = Vec::with_capacity(SIZE * SIZE);
        for bg_index in 0..SIZE {
            let bg = bg_index as f32 / (SIZE - 1) as f32;
            for alpha_index in 0..SIZE {
                let alpha = alpha_index as f32 / (SIZE - 1) as f32;
                data.push((corrected_alpha(alpha, bg) * 255.0).round() as u8);
            }
        }
        GammaLut { data }
    }

    /// Corrected coverage for blending `alpha` onto a background of the
    /// given level, nearest-texel like the GPU path.
    pub fn sample(&self, alpha: f32, bg: f32) -> f32 {
        let alpha_index = (alpha.clamp(0.0, 1.0) * (SIZE - 1) as f32).round() as usize;
        let bg_index = (bg.clamp(0.0, 1.0) * (SIZE - 1) as f32).round() as usize;
        self.data[bg_index * SIZE + alpha_index] as f32 * (1.0 / 255.0)
    }
}

/// The coverage that, blended in gamma space, reproduces a linear-space
/// blend of full foreground over the background.
fn corrected_alpha(alpha: f32, bg: f32) -> f32 {
    if bg >= 1.0 - 1e-6 {
        return alpha;
    }
    let linear = srgb_to_linear(bg) * (1.0 - alpha) + alpha;
    ((linear_to_srgb(linear) - bg) / (1.0 - bg)).clamp(0.0, 1.0)
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c * (1.0 / 12.92)
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
