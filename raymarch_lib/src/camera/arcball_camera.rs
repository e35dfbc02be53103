use nalgebra::{point, vector, Point3};

use crate::common::Ray;

use super::{Camera, PerspectiveCamera};

/// Pitch limit in degrees, the view would flip over the poles
const PITCH_LIMIT: f32 = 89.0;

/// Target pan per pixel of mouse movement, per unit of distance
const PAN_FACTOR: f32 = 0.001;

/// Camera orbiting a target point.
/// Angles are in degrees.
#[derive(Debug, Clone)]
pub struct ArcballCamera {
    target: Point3<f32>,
    distance: f32,
    yaw: f32,
    pitch: f32,
    /// Degrees per pixel of mouse movement
    pub sensitivity: f32,
    /// Distance change per unit of scroll
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Derived from the orbit parameters after every change
    camera: PerspectiveCamera,
}

impl ArcballCamera {
    pub fn new(target: Point3<f32>, distance: f32, yaw: f32, pitch: f32) -> ArcballCamera {
        let mut arcball = ArcballCamera {
            target,
            distance,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            sensitivity: 0.3,
            zoom_speed: 1.0,
            min_distance: 0.1,
            max_distance: 100.0,
            camera: PerspectiveCamera::look_at(point![0.0, 0.0, 1.0], target),
        };
        arcball.distance = arcball.distance.clamp(arcball.min_distance, arcball.max_distance);
        arcball.update_camera();
        arcball
    }

    pub fn get_target(&self) -> Point3<f32> {
        self.target
    }

    pub fn get_distance(&self) -> f32 {
        self.distance
    }

    pub fn get_yaw(&self) -> f32 {
        self.yaw
    }

    pub fn get_pitch(&self) -> f32 {
        self.pitch
    }

    /// Underlying ray-casting camera
    pub fn perspective(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Image aspect ratio, forwarded to the inner camera
    pub fn change_aspect_from_resolution(&mut self, width: usize, height: usize) {
        self.camera.change_aspect_from_resolution(width, height);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update_camera();
    }

    /// Rotate around the target by mouse movement in pixels
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_camera();
    }

    /// Zoom, positive offset moves closer to the target
    pub fn process_scroll(&mut self, scroll_offset: f32) {
        self.distance = (self.distance - scroll_offset * self.zoom_speed)
            .clamp(self.min_distance, self.max_distance);
        self.update_camera();
    }

    /// Move the orbit center in the camera plane by mouse movement in pixels
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let factor = self.distance * PAN_FACTOR;
        let right = self.camera.get_right();
        let up = self.camera.get_up();
        self.target += -right * dx * factor + up * dy * factor;
        self.update_camera();
    }

    fn update_camera(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let offset = self.distance
            * vector![
                pitch.cos() * yaw.cos(),
                pitch.sin(),
                pitch.cos() * yaw.sin()
            ];
        let position = self.target + offset;
        self.camera.set_pos(position);
        self.camera.set_direction(-offset);
    }
}

impl Default for ArcballCamera {
    /// Looks at the center of the volume cube from below and behind
    fn default() -> Self {
        ArcballCamera::new(point![0.5, 0.5, 0.5], 2.5, -135.0, -30.0)
    }
}

impl Camera for ArcballCamera {
    fn position(&self) -> Point3<f32> {
        self.camera.position()
    }

    fn get_ray(&self, pixel_coord: (f32, f32)) -> Ray {
        self.camera.get_ray(pixel_coord)
    }

    fn project_point(&self, point: &Point3<f32>) -> Option<(f32, f32)> {
        self.camera.project_point(point)
    }
}
