// Copyright 2026 the Tilemask Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segment clipping against the view box.
//!
//! The tiler clips each segment to a half-open box before grid traversal:
//! bounded on the left, right, and top, open toward +y. Geometry below the
//! viewport still contributes winding to the columns above it, so it must
//! survive the clip; geometry above the viewport cannot affect anything
//! visible and is discarded.

use crate::kurbo::{Point, Rect};

/// Clips `from..to` to `rect` with the Liang-Barsky algorithm.
///
/// Infinite rect bounds are valid and simply impose no constraint on that
/// side. Returns `None` if the segment lies entirely outside.
pub fn clip_segment(from: Point, to: Point, rect: &Rect) -> Option<(Point, Point)> {
    let d = to - from;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    // (denominator, numerator) per boundary; t = num / den where den != 0.
    let bounds = [
        (-d.x, from.x - rect.x0),
        (d.x, rect.x1 - from.x),
        (-d.y, from.y - rect.y0),
        (d.y, rect.y1 - from.y),
    ];
    for (den, num) in bounds {
        if num.is_infinite() {
            continue;
        }
        if den == 0.0 {
            // Parallel to this boundary; outside it means fully clipped.
            if num < 0.0 {
                return None;
            }
            continue;
        }
        let t = num / den;
        if den < 0.0 {
            // Entering.
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            // Leaving.
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    Some((from + d * t0, from + d * t1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 64.0, f64::INFINITY)
    }

    #[test]
    fn inside_is_unchanged() {
        let (a, b) = (Point::new(3.0, 5.0), Point::new(60.0, 100.0));
        assert_eq!(clip_segment(a, b, &rect()), Some((a, b)));
    }

    #[test]
    fn clips_at_the_left_edge() {
        let (a, b) = clip_segment(Point::new(-8.0, 0.0), Point::new(8.0, 16.0), &rect()).unwrap();
        assert_eq!(a, Point::new(0.0, 8.0));
        assert_eq!(b, Point::new(8.0, 16.0));
    }

    #[test]
    fn discards_segments_above_the_viewport() {
        assert!(clip_segment(Point::new(2.0, -9.0), Point::new(50.0, -1.0), &rect()).is_none());
    }

    #[test]
    fn keeps_segments_below_the_viewport() {
        // The box is open toward +y; winding flows up from below.
        let (a, b) =
            clip_segment(Point::new(10.0, 500.0), Point::new(20.0, 900.0), &rect()).unwrap();
        assert_eq!(a, Point::new(10.0, 500.0));
        assert_eq!(b, Point::new(20.0, 900.0));
    }

    #[test]
    fn discards_fully_outside_horizontally() {
        assert!(clip_segment(Point::new(70.0, 1.0), Point::new(90.0, 50.0), &rect()).is_none());
    }
}
