// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenes: flattened outlines with paints, in draw order.

use peniko::Color;

use crate::kurbo::{Affine, Point, Rect};
use crate::tile::{TileRect, TILE_HEIGHT, TILE_WIDTH};

/// A closed polyline. Contours do not repeat the first point; the closing
/// segment back to it is implicit.
#[derive(Clone, Debug, Default)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Contour {
        Contour { points }
    }

    /// Iterates the contour's segments, including the closing one.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// A filled shape: one or more contours, filled with the nonzero rule.
#[derive(Clone, Debug, Default)]
pub struct Outline {
    pub contours: Vec<Contour>,
}

impl Outline {
    pub fn new() -> Outline {
        Outline::default()
    }

    pub fn push_contour(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    /// An axis-aligned rectangle, wound clockwise.
    pub fn from_rect(rect: Rect) -> Outline {
        Outline {
            contours: vec![Contour::new(vec![
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x1, rect.y1),
                Point::new(rect.x0, rect.y1),
            ])],
        }
    }
}

/// An outline with its paint.
#[derive(Clone, Debug)]
pub struct PathObject {
    pub outline: Outline,
    pub color: Color,
}

impl PathObject {
    pub fn new(outline: Outline, color: Color) -> PathObject {
        PathObject { outline, color }
    }

    /// Whether this object can occlude content behind it.
    pub fn is_opaque(&self) -> bool {
        self.color.a == u8::MAX
    }
}

/// A viewport, a view transform, and objects in back-to-front draw order.
#[derive(Clone, Debug)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub transform: Affine,
    pub objects: Vec<PathObject>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Scene {
        Scene {
            width,
            height,
            transform: Affine::IDENTITY,
            objects: Vec::new(),
        }
    }

    pub fn push_object(&mut self, object: PathObject) {
        self.objects.push(object);
    }

    /// The viewport in pixels.
    pub fn view_box(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    /// The viewport rounded out to whole tiles.
    pub fn tile_rect(&self) -> TileRect {
        TileRect::new(
            0,
            0,
            self.width.div_ceil(TILE_WIDTH) as i32,
            self.height.div_ceil(TILE_HEIGHT) as i32,
        )
    }
}

/// Converts a color to non-premultiplied RGBA components in [0, 1].
pub fn color_components(color: Color) -> [f32; 4] {
    [
        color.r as f32 * (1.0 / 255.0),
        color.g as f32 * (1.0 / 255.0),
        color.b as f32 * (1.0 / 255.0),
        color.a as f32 * (1.0 / 255.0),
    ]
}
