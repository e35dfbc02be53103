use nalgebra::Point3;

use super::VolumeScale;
use crate::common::{BoundBox, Ray, RaySegment};

impl Ray {
    /// Ray in volume space from the camera through a point on the proxy cube.
    ///
    /// Both points are in world space. `None` if they coincide.
    pub fn from_fragment(
        camera_pos: &Point3<f32>,
        frag_pos: &Point3<f32>,
        scale: &VolumeScale,
    ) -> Option<Ray> {
        let direction = (frag_pos - camera_pos)
            .component_div(scale.as_vector())
            .try_normalize(0.0)?;
        let origin = scale.to_volume_space(camera_pos);
        Some(Ray::new(origin, direction))
    }
}

/// Part of the camera ray that crosses the unit volume cube.
///
/// `None` means the pixel is discarded: the ray misses the cube, the cube
/// is behind the camera or the fragment coincides with the camera.
pub fn setup_ray(
    camera_pos: &Point3<f32>,
    frag_pos: &Point3<f32>,
    scale: &VolumeScale,
) -> Option<RaySegment> {
    let ray = Ray::from_fragment(camera_pos, frag_pos, scale)?;
    let (t_enter, t_exit) = BoundBox::unit().intersect(&ray)?;
    Some(RaySegment {
        ray,
        t_enter,
        t_exit,
    })
}
