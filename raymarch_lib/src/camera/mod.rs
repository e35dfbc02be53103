use nalgebra::Point3;

use crate::common::{BoundBox, Ray, ViewportBox};

mod arcball_camera;
mod perspective_camera;

pub use arcball_camera::ArcballCamera;
pub use perspective_camera::PerspectiveCamera;

/// Anything that can cast primary rays into the scene
pub trait Camera {
    /// Camera position in world coordinates
    fn position(&self) -> Point3<f32>;

    /// Get ray originating in the camera position crossing view plane in coordinates `pixel_coord`
    ///
    /// # Arguments
    ///
    /// * pixel_coord - Coordinates in the range of `<0;1>x<0;1>`, point \[0,0\] being upper left corner
    fn get_ray(&self, pixel_coord: (f32, f32)) -> Ray;

    /// Project world point onto the view plane.
    /// Result uses the same coordinates as [`Camera::get_ray`].
    /// `None` for points not in front of the camera.
    fn project_point(&self, point: &Point3<f32>) -> Option<(f32, f32)>;

    /// Project bounding box to viewport
    ///
    /// Resulting viewport box is the minimal orthogonal rectangular projection.
    /// `None` if some corner is behind the camera, the projection is then unbounded.
    fn project_box(&self, bound_box: BoundBox) -> Option<ViewportBox> {
        let mut viewbox = ViewportBox::new();
        for corner in bound_box {
            let (x, y) = self.project_point(&corner)?;
            viewbox.add_point(x, y);
        }
        Some(viewbox)
    }
}
