// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The analytic area lookup table used by the fill kernel.
//!
//! Cell `(u, v)` answers: for a line crossing a 1px-wide pixel column with
//! midpoint height `y` relative to the pixel center (`u` maps [0, 1] to
//! [-8, 8]) and vertical extent `dy` across the column (`v` maps [0, 1] to
//! [0, 16]), what fraction of the pixel lies above the line? The table is
//! built once from the closed form rather than loaded from an asset.

/// Texels per axis. 65 puts half-pixel offsets exactly on grid points, so
/// edges through pixel-center rows look up exact values.
const SIZE: usize = 65;

const Y_RANGE: f32 = 16.0;
const DY_RANGE: f32 = 16.0;

pub struct AreaLut {
    data: Vec<f32>,
}

impl Default for AreaLut {
    fn default() -> AreaLut {
        AreaLut::new()
    }
}

impl AreaLut {
    pub fn new() -> AreaLut {
        let mut data = Vec::with_capacity(SIZE * SIZE);
        for dy_index in 0..SIZE {
            let dy = dy_index as f32 / (SIZE - 1) as f32 * DY_RANGE;
            for y_index in 0..SIZE {
                let y = y_index as f32 / (SIZE - 1) as f32 * Y_RANGE - Y_RANGE * 0.5;
                data.push(area_above(y, dy));
            }
        }
        AreaLut { data }
    }

    /// Bilinear sample at normalized coordinates, clamped to [0, 1].
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let x = u.clamp(0.0, 1.0) * (SIZE - 1) as f32;
        let y = v.clamp(0.0, 1.0) * (SIZE - 1) as f32;
        let x0 = (x as usize).min(SIZE - 2);
        let y0 = (y as usize).min(SIZE - 2);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;
        let at = |xi: usize, yi: usize| self.data[yi * SIZE + xi];
        let top = at(x0, y0) * (1.0 - fx) + at(x0 + 1, y0) * fx;
        let bottom = at(x0, y0 + 1) * (1.0 - fx) + at(x0 + 1, y0 + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

/// Fraction of a unit pixel above a line of midpoint height `y` and vertical
/// extent `dy` across the pixel: the mean over x in [-1/2, 1/2] of
/// `clamp(1/2 + y + dy*x, 0, 1)`.
fn area_above(y: f32, dy: f32) -> f32 {
    clamped_linear_mean(0.5 + y - 0.5 * dy, 0.5 + y + 0.5 * dy)
}

/// Mean of `clamp(t, 0, 1)` for `t` uniform over `[a, b]`, `a <= b`.
fn clamped_linear_mean(a: f32, b: f32) -> f32 {
    if b <= 0.0 {
        return 0.0;
    }
    if a >= 1.0 {
        return 1.0;
    }
    if b - a < 1e-6 {
        return (0.5 * (a + b)).clamp(0.0, 1.0);
    }
    let u0 = a.clamp(0.0, 1.0);
    let u1 = b.clamp(0.0, 1.0);
    // Integral of t over the unclamped span, plus the span clamped to 1.
    let ramp = 0.5 * (u1 * u1 - u0 * u0);
    let saturated = (b - a.max(1.0)).max(0.0);
    (ramp + saturated) / (b - a)
}
