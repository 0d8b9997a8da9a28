//! Cohen–Sutherland segment clipping against an axis-aligned rectangle.
//!
//! Screen convention: `y_min` is the top edge, `y_max` the bottom edge.
use nalgebra::Point2;

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

/// Clip rectangle given by its min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl ClipRect {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    fn outcode(&self, p: &Point2<f32>) -> u8 {
        let mut code = INSIDE;

        if p.x < self.x_min {
            code |= LEFT;
        } else if p.x > self.x_max {
            code |= RIGHT;
        }

        if p.y < self.y_min {
            code |= TOP;
        } else if p.y > self.y_max {
            code |= BOTTOM;
        }

        code
    }
}

/// Clip the segment `p0`-`p1` to `rect`.
///
/// Returns the visible part, or `None` when the segment lies entirely outside.
pub fn clip_line(
    p0: Point2<f32>,
    p1: Point2<f32>,
    rect: &ClipRect,
) -> Option<(Point2<f32>, Point2<f32>)> {
    let (mut p0, mut p1) = (p0, p1);
    let mut code0 = rect.outcode(&p0);
    let mut code1 = rect.outcode(&p1);

    loop {
        if code0 | code1 == INSIDE {
            return Some((p0, p1));
        }
        if code0 & code1 != 0 {
            return None;
        }

        let out = if code0 != INSIDE { code0 } else { code1 };

        // One boundary per iteration, checked top, bottom, right, left.
        let clipped = if out & TOP != 0 {
            Point2::new(
                p0.x + (p1.x - p0.x) * (rect.y_min - p0.y) / (p1.y - p0.y),
                rect.y_min,
            )
        } else if out & BOTTOM != 0 {
            Point2::new(
                p0.x + (p1.x - p0.x) * (rect.y_max - p0.y) / (p1.y - p0.y),
                rect.y_max,
            )
        } else if out & RIGHT != 0 {
            Point2::new(
                rect.x_max,
                p0.y + (p1.y - p0.y) * (rect.x_max - p0.x) / (p1.x - p0.x),
            )
        } else {
            Point2::new(
                rect.x_min,
                p0.y + (p1.y - p0.y) * (rect.x_min - p0.x) / (p1.x - p0.x),
            )
        };

        if out == code0 {
            p0 = clipped;
            code0 = rect.outcode(&p0);
        } else {
            p1 = clipped;
            code1 = rect.outcode(&p1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> ClipRect {
        ClipRect::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn test_inside_segment_unchanged() {
        let (a, b) = clip_line(Point2::new(1.0, 2.0), Point2::new(8.0, 9.0), &rect()).unwrap();
        assert_eq!(a, Point2::new(1.0, 2.0));
        assert_eq!(b, Point2::new(8.0, 9.0));
    }

    #[test]
    fn test_outside_segment_rejected() {
        assert!(clip_line(Point2::new(20.0, 1.0), Point2::new(20.0, 9.0), &rect()).is_none());
        assert!(clip_line(Point2::new(-5.0, -1.0), Point2::new(15.0, -3.0), &rect()).is_none());
    }

    #[test]
    fn test_crossing_left_edge() {
        let (a, b) = clip_line(Point2::new(-10.0, 0.0), Point2::new(10.0, 10.0), &rect()).unwrap();
        assert_eq!(a.x, 0.0);
        assert!((a.y - 5.0).abs() < 1e-6);
        assert_eq!(b, Point2::new(10.0, 10.0));
    }

    #[test]
    fn test_both_endpoints_clipped() {
        let (a, b) = clip_line(Point2::new(-5.0, 5.0), Point2::new(15.0, 5.0), &rect()).unwrap();
        assert_eq!(a, Point2::new(0.0, 5.0));
        assert_eq!(b, Point2::new(10.0, 5.0));
    }

    #[test]
    fn test_corner_crossing_needs_two_passes() {
        // Starts above-left; the top edge is fixed first, then the left edge.
        let (a, _) = clip_line(Point2::new(-4.0, -2.0), Point2::new(6.0, 8.0), &rect()).unwrap();
        assert!((a.x - 0.0).abs() < 1e-5);
        assert!((a.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_diagonal_miss_is_rejected() {
        // Outcodes share no bit, but the segment passes outside the corner.
        assert!(clip_line(Point2::new(-3.0, 2.0), Point2::new(2.0, -3.0), &rect()).is_none());
    }
}
