use nalgebra::{vector, Point3, Vector2, Vector3};

use crate::common::Ray;

use super::Camera;

/// Vertical field of view of a new camera, in degrees
pub const DEFAULT_FOV_Y: f32 = 45.0;

/// Ray-casting pinhole camera
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Position of the camera in world coordinates
    position: Point3<f32>,
    /// Unit look direction
    direction: Vector3<f32>,
    /// Up direction from the camera's perspective
    up: Vector3<f32>,
    /// Right direction from the camera's perspective
    right: Vector3<f32>,
    /// Aspect ratio of image plane, width / height
    aspect: f32,
    /// Vertical Field of View in degrees
    fov_y: f32,
    /// Size of image plane at distance 1, calculated from fov_y and aspect
    img_plane_size: Vector2<f32>,
    /// Direction of ray passing through the upper left corner of the image plane
    dir_00: Vector3<f32>,
    /// Offset across the whole image plane width, left to right
    du: Vector3<f32>,
    /// Offset across the whole image plane height, top to bottom
    dv: Vector3<f32>,
}

impl PerspectiveCamera {
    /// Construct new camera
    ///
    /// # Arguments
    ///
    /// * `position` - Position of the camera in world coordinates
    /// * `direction` - Looking direction of the camera
    ///
    /// # Notes
    ///
    /// World up is the positive y axis. Default fov is 45 degrees, default aspect ratio is 1.
    pub fn new(position: Point3<f32>, direction: Vector3<f32>) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera {
            position,
            direction,
            up: Vector3::y(),
            right: Vector3::x(),
            aspect: 1.0,
            fov_y: DEFAULT_FOV_Y,
            img_plane_size: vector![1.0, 1.0],
            dir_00: direction,
            du: Vector3::x(),
            dv: -Vector3::y(),
        };
        camera.recalc_plane_size();
        camera.recalc_plane();
        camera
    }

    /// Camera at `position` looking at `target`
    pub fn look_at(position: Point3<f32>, target: Point3<f32>) -> PerspectiveCamera {
        PerspectiveCamera::new(position, target - position)
    }

    /// Changes aspect ratio to match `(width, height)` resolution
    pub fn change_aspect_from_resolution(&mut self, width: usize, height: usize) {
        if width == 0 || height == 0 {
            return;
        }
        self.change_aspect(width as f32 / height as f32);
    }

    /// Change vertical FoV of camera, in degrees.
    /// Values outside of `(0;180)` are ignored.
    pub fn change_fov(&mut self, vertical_fov_deg: f32) {
        if !(vertical_fov_deg > 0.0 && vertical_fov_deg < 180.0) {
            return;
        }
        self.fov_y = vertical_fov_deg;
        self.recalc_plane_size();
        self.recalc_dudv();
    }

    /// Change aspect ratio of camera
    ///
    /// For example 1.7777 for 16:9 ratio
    pub fn change_aspect(&mut self, aspect_ratio: f32) {
        self.aspect = aspect_ratio;
        self.recalc_plane_size();
        self.recalc_dudv();
    }

    pub fn set_pos(&mut self, pos: Point3<f32>) {
        self.position = pos;
    }

    /// Set new direction of camera
    pub fn set_direction(&mut self, direction: Vector3<f32>) {
        self.direction = direction;
        self.recalc_plane();
    }

    pub fn get_dir(&self) -> Vector3<f32> {
        self.direction
    }

    pub fn get_up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn get_right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn get_fov(&self) -> f32 {
        self.fov_y
    }

    pub fn get_aspect(&self) -> f32 {
        self.aspect
    }

    // Call when camera direction changed
    fn recalc_plane(&mut self) {
        self.direction = self
            .direction
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| -Vector3::z());
        self.recalc_up_right();
        self.recalc_dudv();
    }

    fn recalc_up_right(&mut self) {
        let world_up = Vector3::y();
        // looking straight up or down, any horizontal right vector will do
        self.right = self
            .direction
            .cross(&world_up)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| self.direction.cross(&Vector3::z()).normalize());
        self.up = self.right.cross(&self.direction);
    }

    // Call when fov or aspect ratio changed
    fn recalc_plane_size(&mut self) {
        let height = 2.0 * f32::tan(f32::to_radians(0.5 * self.fov_y));
        self.img_plane_size = vector![height * self.aspect, height];
    }

    fn recalc_dudv(&mut self) {
        self.du = self.img_plane_size.x * self.right;
        self.dv = -self.img_plane_size.y * self.up; // negative, rows go downwards
        self.dir_00 = self.direction - 0.5 * self.du - 0.5 * self.dv;
    }
}

impl Camera for PerspectiveCamera {
    fn position(&self) -> Point3<f32> {
        self.position
    }

    fn get_ray(&self, pixel_coord: (f32, f32)) -> Ray {
        let dir = self.dir_00 + self.du * pixel_coord.0 + self.dv * pixel_coord.1;
        Ray::new(self.position, dir.normalize())
    }

    fn project_point(&self, point: &Point3<f32>) -> Option<(f32, f32)> {
        let v = point - self.position;
        let depth = v.dot(&self.direction);
        if depth <= f32::EPSILON {
            return None;
        }

        // point on the image plane at distance 1
        let screen_dir = v / depth - self.dir_00;
        let x = screen_dir.dot(&self.du) / self.du.norm_squared();
        let y = screen_dir.dot(&self.dv) / self.dv.norm_squared();
        Some((x, y))
    }
}
