// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The RGBA render target.

/// A render target of non-premultiplied `f32` RGBA pixels.
#[derive(Clone, Debug)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    data: Vec<[f32; 4]>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Framebuffer {
        Framebuffer {
            width,
            height,
            data: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: [f32; 4]) {
        self.data.fill(color);
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        self.data[y as usize * self.width as usize + x as usize] = color;
    }

    /// Composites `src` over the stored pixel (non-premultiplied src-over).
    pub fn blend_over(&mut self, x: u32, y: u32, src: [f32; 4]) {
        let index = y as usize * self.width as usize + x as usize;
        let dst = self.data[index];
        let src_a = src[3];
        if dst[3] == 1.0 {
            // Opaque destination, the common case after a clear.
            self.data[index] = [
                src[0] * src_a + dst[0] * (1.0 - src_a),
                src[1] * src_a + dst[1] * (1.0 - src_a),
                src[2] * src_a + dst[2] * (1.0 - src_a),
                1.0,
            ];
            return;
        }
        let out_a = src_a + dst[3] * (1.0 - src_a);
        if out_a <= 0.0 {
            self.data[index] = [0.0; 4];
            return;
        }
        let mut out = [0.0; 4];
        for c in 0..3 {
            out[c] = (src[c] * src_a + dst[c] * dst[3] * (1.0 - src_a)) / out_a;
        }
        out[3] = out_a;
        self.data[index] = out;
    }

    /// The raw pixel data as a flat component slice, row-major RGBA.
    pub fn as_components(&self) -> &[f32] {
        bytemuck::cast_slice(&self.data)
    }

    /// Converts to 8-bit RGBA, clamping each component.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for pixel in &self.data {
            for &component in pixel {
                out.push((component.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        out
    }
}
