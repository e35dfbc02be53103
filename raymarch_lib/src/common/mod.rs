mod bound_box;
mod ray;
mod value_range;
mod viewport_box;

pub use bound_box::{BoundBox, BoundBoxIterator};
pub use ray::{Ray, RaySegment};
pub use value_range::ValueRange;
pub use viewport_box::ViewportBox;

/// Linear interpolation between `a` and `b`.
///
/// Returns exactly `a` when `a == b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
