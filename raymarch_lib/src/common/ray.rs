use nalgebra::{Point3, Vector3};

/// Ray cast by camera, or a ray transformed into volume space.
/// Main usecase is getting intersections with the volume cube ([`super::BoundBox::intersect`]),
/// then iterating over the intersected line segment in steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Construct new ray using `origin` and `direction`.
    /// `direction` must be unit vector.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Ray {
        Ray { origin, direction }
    }

    /// Ray from `origin` through `target`, `None` if the points coincide
    pub fn through(origin: Point3<f32>, target: Point3<f32>) -> Option<Ray> {
        let direction = (target - origin).try_normalize(f32::EPSILON)?;
        Some(Ray { origin, direction })
    }

    /// Returns point `t` units far from ray origin in ray direction
    pub fn point_from_t(&self, t: f32) -> Point3<f32> {
        self.origin + t * self.direction
    }
}

/// Part of a ray inside the volume cube, `t_enter <= t_exit`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySegment {
    pub ray: Ray,
    pub t_enter: f32,
    pub t_exit: f32,
}

impl RaySegment {
    pub fn length(&self) -> f32 {
        self.t_exit - self.t_enter
    }

    pub fn entry_point(&self) -> Point3<f32> {
        self.ray.point_from_t(self.t_enter)
    }

    pub fn exit_point(&self) -> Point3<f32> {
        self.ray.point_from_t(self.t_exit)
    }
}

#[cfg(test)]
mod test {

    use nalgebra::{point, vector};

    use super::*;

    #[test]
    fn point_along_ray() {
        let ray = Ray::new(point![1.0, 0.0, 0.0], vector![0.0, 1.0, 0.0]);
        assert_eq!(ray.point_from_t(2.5), point![1.0, 2.5, 0.0]);
    }

    #[test]
    fn through_normalizes() {
        let ray = Ray::through(point![0.0, 0.0, 0.0], point![0.0, 3.0, 4.0]).unwrap();
        assert!((ray.direction - vector![0.0, 0.6, 0.8]).norm() < 1e-6);
    }

    #[test]
    fn through_same_point() {
        let p = point![0.2, 0.2, 0.2];
        assert!(Ray::through(p, p).is_none());
    }
}
