use nalgebra::{point, Point3};

use super::Ray;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundBox {
    pub lower: Point3<f32>,
    pub upper: Point3<f32>,
}

impl BoundBox {
    pub fn new(lower: Point3<f32>, upper: Point3<f32>) -> BoundBox {
        BoundBox { lower, upper }
    }

    /// Canonical volume cube `<0;1>^3`
    pub fn unit() -> BoundBox {
        BoundBox {
            lower: point![0.0, 0.0, 0.0],
            upper: point![1.0, 1.0, 1.0],
        }
    }

    /// Raw slab test, returns `(t_enter, t_exit)` without any clamping.
    ///
    /// The ray misses the box when `t_enter > t_exit`.
    /// Zero direction components produce infinite slab bounds,
    /// `f32::min` and `f32::max` keep them from restricting the interval.
    pub fn slab_interval(&self, ray: &Ray) -> (f32, f32) {
        let inv_dir = ray.direction.map(|d| 1.0 / d);

        // t value of intersection with the 6 planes of a bounding box
        let t0 = (self.lower - ray.origin).component_mul(&inv_dir);
        let t1 = (self.upper - ray.origin).component_mul(&inv_dir);

        let t_near = t0.zip_map(&t1, f32::min);
        let t_far = t0.zip_map(&t1, f32::max);

        let t_enter = f32::max(f32::max(t_near.x, t_near.y), t_near.z);
        let t_exit = f32::min(f32::min(t_far.x, t_far.y), t_far.z);

        (t_enter, t_exit)
    }

    /// Traversable part of the ray inside the box.
    ///
    /// Entry is clamped to `0.0`, so a ray starting inside the box
    /// begins at its origin. `None` if the ray misses the box or the box
    /// lies behind the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<(f32, f32)> {
        let (t_enter, t_exit) = self.slab_interval(ray);

        if t_enter.is_nan() || t_exit.is_nan() || t_enter > t_exit {
            return None;
        }

        let t_enter = f32::max(t_enter, 0.0);

        // whole box behind the origin
        if t_enter > t_exit {
            return None;
        }

        Some((t_enter, t_exit))
    }
}

pub struct BoundBoxIterator {
    pub lower: Point3<f32>,
    pub upper: Point3<f32>,
    state: u8,
}

impl Iterator for BoundBoxIterator {
    type Item = Point3<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        let p = match self.state {
            0 => self.lower,
            1 => point![self.upper.x, self.lower.y, self.lower.z],
            2 => point![self.upper.x, self.upper.y, self.lower.z],
            3 => point![self.lower.x, self.upper.y, self.lower.z],
            4 => point![self.lower.x, self.lower.y, self.upper.z],
            5 => point![self.upper.x, self.lower.y, self.upper.z],
            6 => self.upper,
            7 => point![self.lower.x, self.upper.y, self.upper.z],
            _ => return None,
        };
        self.state += 1;
        Some(p)
    }
}

impl IntoIterator for BoundBox {
    type Item = Point3<f32>;

    type IntoIter = BoundBoxIterator;

    fn into_iter(self) -> Self::IntoIter {
        BoundBoxIterator {
            lower: self.lower,
            upper: self.upper,
            state: 0,
        }
    }
}
