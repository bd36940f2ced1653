// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame reprojection: resamples the previous frame under a new view
//! transform, hiding latency while the real frame is still being built.

use tilemask_common::kurbo::{Affine, Point};

use crate::framebuffer::Framebuffer;

/// Warps `previous` (rendered with `old_transform`) so it approximates a
/// frame rendered with `new_transform`.
///
/// Transforms act on the normalized `[0, 1]^2` viewport; each output pixel
/// is mapped through `old_transform * new_transform^-1` and bilinearly
/// sampled with clamp-to-edge. A non-invertible `new_transform` yields a
/// cleared buffer.
pub(crate) fn reproject(
    previous: &Framebuffer,
    old_transform: Affine,
    new_transform: Affine,
) -> Framebuffer {
    let width = previous.width();
    let height = previous.height();
    let mut out = Framebuffer::new(width, height);
    if new_transform.determinant().abs() < 1e-12 {
        debug_assert!(false, "reprojection with a singular view transform");
        return out;
    }
    let map = old_transform * new_transform.inverse();
    let inv_w = 1.0 / width as f64;
    let inv_h = 1.0 / height as f64;
    for y in 0..height {
        for x in 0..width {
            let normalized = Point::new(
                (x as f64 + 0.5) * inv_w,
                (y as f64 + 0.5) * inv_h,
            );
            let source = map * normalized;
            let pixel = sample_bilinear(
                previous,
                (source.x * width as f64 - 0.5) as f32,
                (source.y * height as f64 - 0.5) as f32,
            );
            out.put_pixel(x, y, pixel);
        }
    }
    out
}

/// Bilinear sample with clamp-to-edge.
fn sample_bilinear(fb: &Framebuffer, x: f32, y: f32) -> [f32; 4] {
    let max_x = fb.width() as i64 - 1;
    let max_y = fb.height() as i64 - 1;
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let at = |xi: i64, yi: i64| fb.pixel(xi.clamp(0, max_x) as u32, yi.clamp(0, max_y) as u32);
    let p00 = at(x0, y0);
    let p10 = at(x0 + 1, y0);
    let p01 = at(x0, y0 + 1);
    let p11 = at(x0 + 1, y0 + 1);
    let mut out = [0.0; 4];
    for c in 0..4 {
        let top = p00[c] * (1.0 - fx) + p10[c] * fx;
        let bottom = p01[c] * (1.0 - fx) + p11[c] * fx;
        out[c] = top * (1.0 - fy) + bottom * fy;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkered(width: u32, height: u32) -> Framebuffer {
        let mut fb = Framebuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((x / 8 + y / 8) % 2) as f32;
                fb.put_pixel(x, y, [v, 1.0 - v, 0.25, 1.0]);
            }
        }
        fb
    }

    #[test]
    fn identity_reprojection_is_lossless() {
        let previous = checkered(32, 32);
        let out = reproject(&previous, Affine::IDENTITY, Affine::IDENTITY);
        for y in 0..32 {
            for x in 0..32 {
                let a = previous.pixel(x, y);
                let b = out.pixel(x, y);
                for c in 0..4 {
                    assert!((a[c] - b[c]).abs() < 1e-4, "pixel ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn translation_shifts_content() {
        let previous = checkered(32, 32);
        // The new view moves everything half a viewport right, so output
        // pixels sample half a viewport to the left.
        let out = reproject(
            &previous,
            Affine::IDENTITY,
            Affine::translate((0.5, 0.0)),
        );
        let a = out.pixel(20, 4);
        let b = previous.pixel(4, 4);
        for c in 0..4 {
            assert!((a[c] - b[c]).abs() < 1e-4);
        }
    }

    #[test]
    fn edges_clamp_rather_than_wrap() {
        let previous = checkered(32, 32);
        let out = reproject(
            &previous,
            Affine::IDENTITY,
            Affine::translate((-0.5, 0.0)),
        );
        // Pixels past the right edge of the source repeat the edge column.
        let edge = previous.pixel(31, 10);
        let sampled = out.pixel(28, 10);
        for c in 0..4 {
            assert!((sampled[c] - edge[c]).abs() < 1e-4);
        }
    }
}
