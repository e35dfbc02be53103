use std::{cmp::min, ops::Range};

use nalgebra::{point, Point2};

/// A 2D range, rectangle described by two points.
/// Coordinates are normalized to the viewport, `<0;1>` is on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBox {
    pub lower: Point2<f32>,
    pub upper: Point2<f32>,
}

impl ViewportBox {
    /// Empty viewport, flipped so that any added point becomes both bounds
    pub fn new() -> Self {
        Self {
            lower: point![f32::INFINITY, f32::INFINITY],
            upper: point![f32::NEG_INFINITY, f32::NEG_INFINITY],
        }
    }

    /// Whole screen
    pub fn full() -> Self {
        Self {
            lower: point![0.0, 0.0],
            upper: point![1.0, 1.0],
        }
    }

    pub fn add_point(&mut self, x: f32, y: f32) {
        self.upper.x = f32::max(self.upper.x, x);
        self.upper.y = f32::max(self.upper.y, y);
        self.lower.x = f32::min(self.lower.x, x);
        self.lower.y = f32::min(self.lower.y, y);
    }

    /// Pixels touched by the box, clipped to the resolution
    pub fn get_pixel_range(&self, resolution: (usize, usize)) -> (Range<usize>, Range<usize>) {
        let (width, height) = resolution;

        let axis = |low: f32, high: f32, len: usize| {
            let len_f = len as f32;
            // `as` saturates, negative values land on 0
            let start = min(f32::floor(low * len_f) as usize, len);
            let end = min(f32::ceil(high * len_f) as usize, len);
            start..usize::max(start, end)
        };

        (
            axis(self.lower.x, self.upper.x, width),
            axis(self.lower.y, self.upper.y, height),
        )
    }
}

impl Default for ViewportBox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn viewport() {
        let mut vp = ViewportBox::new();

        vp.add_point(0.5, 0.5);

        assert_eq!(vp.lower, point![0.5, 0.5]);
        assert_eq!(vp.upper, point![0.5, 0.5]);

        vp.add_point(0.6, 0.6);

        assert_eq!(vp.lower, point![0.5, 0.5]);
        assert_eq!(vp.upper, point![0.6, 0.6]);

        vp.add_point(0.5, 0.4);

        assert_eq!(vp.lower, point![0.5, 0.4]);
        assert_eq!(vp.upper, point![0.6, 0.6]);

        vp.add_point(0.2, 0.8);

        assert_eq!(vp.lower, point![0.2, 0.4]);
        assert_eq!(vp.upper, point![0.6, 0.8]);
    }

    #[test]
    fn pixel_range_is_clipped() {
        let vp = ViewportBox {
            lower: point![-0.5, 0.25],
            upper: point![0.5, 1.5],
        };

        let (xs, ys) = vp.get_pixel_range((100, 40));

        assert_eq!(xs, 0..50);
        assert_eq!(ys, 10..40);
    }

    #[test]
    fn offscreen_range_is_empty() {
        let vp = ViewportBox {
            lower: point![1.5, 0.0],
            upper: point![2.0, 1.0],
        };

        let (xs, _) = vp.get_pixel_range((100, 100));

        assert!(xs.is_empty());
    }

    #[test]
    fn full_viewport() {
        let (xs, ys) = ViewportBox::full().get_pixel_range((64, 32));
        assert_eq!(xs, 0..64);
        assert_eq!(ys, 0..32);
    }
}
