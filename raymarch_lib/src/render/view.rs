use nalgebra::{point, vector, Point3, Vector3};

use crate::{
    color::{self, RGB},
    common::ValueRange,
    error::RenderError,
};

/// How a density sample is turned into color and opacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Solid color, opacity equal to density inside the isovalue window
    Isovalue = 0,
    /// Color and opacity looked up in the transfer function
    TransferFunction = 1,
}

impl ViewMode {
    /// Mode from the integer used by GUI radio buttons and shader uniforms
    pub fn from_index(index: i32) -> Option<ViewMode> {
        match index {
            0 => Some(ViewMode::Isovalue),
            1 => Some(ViewMode::TransferFunction),
            _ => None,
        }
    }
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Isovalue
    }
}

/// Densities of interest in isovalue mode.
/// Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsovalueWindow {
    range: ValueRange,
}

impl IsovalueWindow {
    pub fn new(min: f32, max: f32) -> Result<IsovalueWindow, RenderError> {
        let valid = (0.0..=1.0).contains(&min) && (0.0..=1.0).contains(&max) && min <= max;
        if !valid {
            return Err(RenderError::InvalidIsovalueWindow { min, max });
        }
        Ok(IsovalueWindow {
            range: ValueRange {
                low: min,
                high: max,
            },
        })
    }

    /// Window from 8bit slider values, normalized by 255
    pub fn from_bytes(min: u8, max: u8) -> Result<IsovalueWindow, RenderError> {
        IsovalueWindow::new(min as f32 / 255.0, max as f32 / 255.0)
    }

    pub fn min(&self) -> f32 {
        self.range.low
    }

    pub fn max(&self) -> f32 {
        self.range.high
    }

    /// `min < density < max`
    pub fn contains(&self, density: f32) -> bool {
        self.range.contains_exclusive(density)
    }
}

impl Default for IsovalueWindow {
    /// Whole density range
    fn default() -> Self {
        IsovalueWindow {
            range: ValueRange {
                low: 0.0,
                high: 1.0,
            },
        }
    }
}

/// Maps the physical aspect ratio of the voxel grid into the unit cube.
/// All components are positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeScale(Vector3<f32>);

impl VolumeScale {
    /// Components must lie in `(0;1]`, the volume fits the world cube `<0;1>^3`
    pub fn new(scale: Vector3<f32>) -> Result<VolumeScale, RenderError> {
        if scale.iter().all(|&c| c.is_finite() && c > 0.0 && c <= 1.0) {
            Ok(VolumeScale(scale))
        } else {
            Err(RenderError::InvalidScale([scale.x, scale.y, scale.z]))
        }
    }

    pub fn uniform() -> VolumeScale {
        VolumeScale(vector![1.0, 1.0, 1.0])
    }

    pub fn as_vector(&self) -> &Vector3<f32> {
        &self.0
    }

    /// World point into volume space
    pub fn to_volume_space(&self, world: &Point3<f32>) -> Point3<f32> {
        Point3::from(world.coords.component_div(&self.0))
    }
}

impl Default for VolumeScale {
    fn default() -> Self {
        VolumeScale::uniform()
    }
}

/// Per-frame configuration, immutable while the frame renders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParameters {
    /// Camera position, world space
    pub camera_pos: Point3<f32>,
    pub mode: ViewMode,
    pub window: IsovalueWindow,
    /// Used only in isovalue mode
    pub volume_color: RGB,
}

impl ViewParameters {
    pub fn isovalue(window: IsovalueWindow, volume_color: RGB) -> ViewParameters {
        ViewParameters {
            mode: ViewMode::Isovalue,
            window,
            volume_color,
            ..Default::default()
        }
    }

    pub fn transfer_function() -> ViewParameters {
        ViewParameters {
            mode: ViewMode::TransferFunction,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_camera(mut self, camera_pos: Point3<f32>) -> ViewParameters {
        self.camera_pos = camera_pos;
        self
    }
}

impl Default for ViewParameters {
    fn default() -> Self {
        ViewParameters {
            camera_pos: point![0.0, 0.0, 0.0],
            mode: ViewMode::Isovalue,
            window: IsovalueWindow::default(),
            volume_color: color::rgb_from_bytes(255, 100, 100),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn scale_rejects_non_positive() {
        assert!(VolumeScale::new(vector![1.0, 0.5, 0.25]).is_ok());
        assert_eq!(
            VolumeScale::new(vector![1.0, 0.0, 1.0]),
            Err(RenderError::InvalidScale([1.0, 0.0, 1.0]))
        );
        assert!(VolumeScale::new(vector![1.0, -0.5, 1.0]).is_err());
        assert!(VolumeScale::new(vector![f32::NAN, 1.0, 1.0]).is_err());
        assert!(VolumeScale::new(vector![f32::INFINITY, 1.0, 1.0]).is_err());
        assert_eq!(
            VolumeScale::new(vector![1.0, 1.0, 2.0]),
            Err(RenderError::InvalidScale([1.0, 1.0, 2.0]))
        );
        assert!(VolumeScale::new(vector![1.0, 1.0, 1.0]).is_ok());
    }

    #[test]
    fn scale_to_volume_space() {
        let scale = VolumeScale::new(vector![1.0, 0.5, 0.25]).unwrap();
        let p = scale.to_volume_space(&point![0.5, 0.5, 0.5]);
        assert_eq!(p, point![0.5, 1.0, 2.0]);
    }

    #[test]
    fn window_validation() {
        assert!(IsovalueWindow::new(0.2, 0.8).is_ok());
        assert!(IsovalueWindow::new(0.5, 0.5).is_ok());
        assert!(IsovalueWindow::new(0.8, 0.2).is_err());
        assert!(IsovalueWindow::new(-0.1, 0.2).is_err());
        assert!(IsovalueWindow::new(0.1, 1.2).is_err());
        assert!(IsovalueWindow::new(f32::NAN, 0.2).is_err());
    }

    #[test]
    fn window_is_exclusive() {
        let window = IsovalueWindow::new(0.2, 0.8).unwrap();
        assert!(!window.contains(0.2));
        assert!(!window.contains(0.8));
        assert!(window.contains(0.2001));
        assert!(window.contains(0.7999));
        assert!(!window.contains(0.9));
    }

    #[test]
    fn window_from_slider_bytes() {
        let window = IsovalueWindow::from_bytes(0, 255).unwrap();
        assert_eq!(window.min(), 0.0);
        assert_eq!(window.max(), 1.0);
    }

    #[test]
    fn view_mode_index() {
        assert_eq!(ViewMode::from_index(0), Some(ViewMode::Isovalue));
        assert_eq!(ViewMode::from_index(1), Some(ViewMode::TransferFunction));
        assert_eq!(ViewMode::from_index(2), None);
    }
}
