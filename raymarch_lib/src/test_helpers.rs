//! Module with helper functions
//! Saves repetition in unit tests, integration tests and benchmarks

use std::path::PathBuf;

use nalgebra::{point, vector, Point3};

use crate::{
    camera::PerspectiveCamera,
    render::{IsovalueWindow, ViewParameters, VolumeScale},
    transfer_function::TransferLut,
    volumetric::{DensityField, Volume},
};

pub fn uniform_volume(sizes: [usize; 3], density: f32) -> Volume {
    Volume::from_field(DensityField::uniform(sizes, density), VolumeScale::uniform())
}

/// Density grows along x from 0 to 1
pub fn ramp_volume(sizes: [usize; 3]) -> Volume {
    let denom = usize::max(sizes[0].saturating_sub(1), 1) as f32;
    let field = DensityField::from_fn(sizes, |x, _, _| x as f32 / denom);
    Volume::from_field(field, VolumeScale::uniform())
}

/// Ball of density 1 in the middle, zero outside
pub fn sphere_volume(size: usize) -> Volume {
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 3.0;
    let field = DensityField::from_fn([size; 3], |x, y, z| {
        let d = vector![x as f32 - center, y as f32 - center, z as f32 - center];
        if d.norm() < radius {
            1.0
        } else {
            0.0
        }
    });
    Volume::from_field(field, VolumeScale::uniform())
}

/// Looks at the volume center along +z, from `distance` in front of the cube
pub fn front_camera(resolution: (usize, usize), distance: f32) -> PerspectiveCamera {
    let position: Point3<f32> = point![0.5, 0.5, -distance];
    let mut camera = PerspectiveCamera::look_at(position, point![0.5, 0.5, 0.5]);
    camera.change_aspect_from_resolution(resolution.0, resolution.1);
    camera
}

/// Isovalue window `(0.2;0.8)`, red volume
pub fn red_isovalue_view() -> ViewParameters {
    let window = IsovalueWindow::new(0.2, 0.8).unwrap_or_default();
    ViewParameters::isovalue(window, vector![1.0, 0.0, 0.0])
}

/// Same opacity as isovalue mode with window `(0;1)`, constant color
pub fn linear_alpha_lut(size: usize, rgb: [f32; 3]) -> TransferLut {
    let [r, g, b] = rgb;
    TransferLut::from_fn(size, |i| vector![r, g, b, (i as f32 + 0.5) / size as f32])
        .unwrap_or_default()
}

/// Unique path in the system temp directory
pub fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("raymarch_{}_{}", std::process::id(), name));
    path
}
