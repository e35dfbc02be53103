//! Per-pixel ray marching and front-to-back compositing.

use nalgebra::Point3;

use super::{setup_ray, ViewMode, ViewParameters};
use crate::{
    color::{self, RGBA},
    common::RaySegment,
    error::RenderError,
    transfer_function::TransferLut,
    volumetric::{DensityField, Volume},
};

/// Distance between two samples, in volume space
pub const STEP_SIZE: f32 = 0.0001;

/// Accumulated opacity at which a ray stops
pub const ALPHA_THRESHOLD: f32 = 0.95;

/// Multiplies sample opacity into an extinction coefficient
pub const EXTINCTION_SCALE: f32 = 50.0;

/// Constants of the marching loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchSettings {
    pub step_size: f32,
    pub alpha_threshold: f32,
    pub extinction_scale: f32,
    /// Stop once `alpha_threshold` is reached
    pub early_termination: bool,
}

impl MarchSettings {
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(RenderError::InvalidStepSize(self.step_size));
        }
        if !(self.alpha_threshold > 0.0 && self.alpha_threshold <= 1.0) {
            return Err(RenderError::InvalidAlphaThreshold(self.alpha_threshold));
        }
        if !(self.extinction_scale.is_finite() && self.extinction_scale >= 0.0) {
            return Err(RenderError::InvalidExtinction(self.extinction_scale));
        }
        Ok(())
    }
}

impl Default for MarchSettings {
    fn default() -> Self {
        MarchSettings {
            step_size: STEP_SIZE,
            alpha_threshold: ALPHA_THRESHOLD,
            extinction_scale: EXTINCTION_SCALE,
            early_termination: true,
        }
    }
}

/// Outcome of marching one ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    /// Straight alpha, channels in `<0;1>`
    pub color: RGBA,
    /// Number of samples taken
    pub steps: usize,
    pub terminated_early: bool,
}

/// Color and opacity of one density sample
pub fn classify(density: f32, view: &ViewParameters, lut: &TransferLut) -> RGBA {
    match view.mode {
        ViewMode::Isovalue => {
            let alpha = if view.window.contains(density) {
                density
            } else {
                0.0
            };
            color::from_rgb(view.volume_color, alpha)
        }
        ViewMode::TransferFunction => lut.lookup(density),
    }
}

/// Opacity of one step through a medium with opacity `alpha` (Beer-Lambert)
#[inline]
pub fn step_opacity(alpha: f32, settings: &MarchSettings) -> f32 {
    let sigma = alpha * settings.extinction_scale;
    1.0 - f32::exp(-sigma * settings.step_size)
}

/// Front-to-back "under" operator.
/// `sample.w` is the opacity of the current step.
#[inline]
pub fn composite(acc: &mut RGBA, sample: &RGBA) {
    let weight = (1.0 - acc.w) * sample.w;
    acc.x += weight * sample.x;
    acc.y += weight * sample.y;
    acc.z += weight * sample.z;
    acc.w = f32::min(acc.w + weight, 1.0);
}

/// March through the segment, sampling every `step_size`
pub fn march(
    segment: &RaySegment,
    field: &DensityField,
    lut: &TransferLut,
    view: &ViewParameters,
    settings: &MarchSettings,
) -> MarchResult {
    let mut acc = color::zero();

    // step count is fixed up front, `t += step` stalls for large t
    let n_steps = (segment.length() / settings.step_size).ceil() as usize;
    let start = segment.entry_point();
    let step = segment.ray.direction * settings.step_size;

    for i in 0..n_steps {
        let pos = start + step * i as f32;

        let density = field.sample(&pos);
        let sample = classify(density, view, lut);
        let step_alpha = step_opacity(sample.w, settings);
        composite(&mut acc, &color::from_rgb(sample.xyz(), step_alpha));

        if settings.early_termination && acc.w >= settings.alpha_threshold {
            return MarchResult {
                color: acc,
                steps: i + 1,
                terminated_early: true,
            };
        }
    }

    MarchResult {
        color: acc,
        steps: n_steps,
        terminated_early: false,
    }
}

/// Ray setup and march for the proxy cube point `frag_pos` (world space).
/// Camera position comes from `view`.
///
/// `None` means the pixel is discarded.
pub fn shade_fragment(
    frag_pos: &Point3<f32>,
    volume: &Volume,
    lut: &TransferLut,
    view: &ViewParameters,
    settings: &MarchSettings,
) -> Option<RGBA> {
    let segment = setup_ray(&view.camera_pos, frag_pos, &volume.get_scale())?;
    let result = march(&segment, volume.get_field(), lut, view, settings);
    Some(result.color)
}

#[cfg(test)]
mod test {

    use nalgebra::{point, vector};

    use super::*;
    use crate::{
        common::Ray,
        render::{IsovalueWindow, VolumeScale},
    };

    fn z_segment() -> RaySegment {
        RaySegment {
            ray: Ray::new(point![0.5, 0.5, -2.0], vector![0.0, 0.0, 1.0]),
            t_enter: 2.0,
            t_exit: 3.0,
        }
    }

    fn red_iso(min: f32, max: f32) -> ViewParameters {
        ViewParameters::isovalue(IsovalueWindow::new(min, max).unwrap(), vector![1.0, 0.0, 0.0])
    }

    #[test]
    fn settings_validation() {
        assert!(MarchSettings::default().validate().is_ok());

        let bad_step = [0.0, -0.1, f32::NAN, f32::INFINITY];
        for step_size in bad_step {
            let settings = MarchSettings {
                step_size,
                ..Default::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(RenderError::InvalidStepSize(_))
            ));
        }

        let settings = MarchSettings {
            alpha_threshold: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = MarchSettings {
            extinction_scale: -1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn step_opacity_beer_lambert() {
        let settings = MarchSettings::default();
        assert_eq!(step_opacity(0.0, &settings), 0.0);
        let expected = 1.0 - f32::exp(-0.005);
        assert!((step_opacity(1.0, &settings) - expected).abs() < 1e-7);
    }

    #[test]
    fn iso_window_is_exclusive() {
        let view = red_iso(0.2, 0.8);
        let lut = TransferLut::default();

        assert_eq!(classify(0.2, &view, &lut).w, 0.0);
        assert_eq!(classify(0.8, &view, &lut).w, 0.0);
        assert_eq!(classify(0.5, &view, &lut), vector![1.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn composite_accumulates() {
        let mut acc = color::zero();
        composite(&mut acc, &vector![1.0, 0.0, 0.0, 0.5]);
        assert_eq!(acc, vector![0.5, 0.0, 0.0, 0.5]);
        composite(&mut acc, &vector![0.0, 1.0, 0.0, 0.5]);
        assert_eq!(acc, vector![0.5, 0.25, 0.0, 0.75]);
    }

    #[test]
    fn alpha_is_monotonic_and_bounded() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let mut acc = color::zero();
        for _ in 0..10_000 {
            let sample = vector![rng.f32(), rng.f32(), rng.f32(), rng.f32()];
            let before = acc.w;
            composite(&mut acc, &sample);
            assert!(acc.w >= before);
            assert!((0.0..=1.0).contains(&acc.w));
            assert!(acc.xyz().iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn opaque_medium_terminates_early() {
        let field = DensityField::uniform([4, 4, 4], 1.0);
        let view = red_iso(0.0, 1.0);
        // density 1.0 is outside an exclusive window, use the transfer function
        let lut = TransferLut::from_fn(256, |_| vector![1.0, 1.0, 1.0, 1.0]).unwrap();
        let view = ViewParameters {
            mode: ViewMode::TransferFunction,
            ..view
        };
        let settings = MarchSettings::default();

        let result = march(&z_segment(), &field, &lut, &view, &settings);

        let bound = (f32::ln(20.0) / (EXTINCTION_SCALE * STEP_SIZE)).ceil() as usize + 2;
        assert!(result.terminated_early);
        assert!(result.steps <= bound, "{} steps", result.steps);
        assert!(result.color.w >= ALPHA_THRESHOLD);
    }

    #[test]
    fn no_termination_when_disabled() {
        let field = DensityField::uniform([4, 4, 4], 1.0);
        let lut = TransferLut::from_fn(256, |_| vector![1.0, 1.0, 1.0, 1.0]).unwrap();
        let view = ViewParameters::transfer_function();
        let settings = MarchSettings {
            early_termination: false,
            step_size: 0.001,
            ..Default::default()
        };

        let result = march(&z_segment(), &field, &lut, &view, &settings);
        assert!(!result.terminated_early);
        assert_eq!(result.steps, 1000);
        assert!(result.color.w > 0.99);
    }

    #[test]
    fn empty_segment_takes_no_steps() {
        let segment = RaySegment {
            t_exit: 2.0,
            ..z_segment()
        };
        let field = DensityField::uniform([2, 2, 2], 0.5);
        let result = march(
            &segment,
            &field,
            &TransferLut::default(),
            &red_iso(0.2, 0.8),
            &MarchSettings::default(),
        );
        assert_eq!(result.steps, 0);
        assert_eq!(result.color, color::zero());
    }

    #[test]
    fn shade_fragment_scenario() {
        let volume = Volume::from_field(DensityField::uniform([8, 8, 8], 0.5), VolumeScale::uniform());
        let view = red_iso(0.2, 0.8).with_camera(point![0.5, 0.5, -2.0]);

        let color = shade_fragment(
            &point![0.5, 0.5, 0.0],
            &volume,
            &TransferLut::default(),
            &view,
            &MarchSettings::default(),
        )
        .unwrap();

        assert!(color.w >= ALPHA_THRESHOLD);
        assert!(color.x > 0.9);
        assert_eq!(color.y, 0.0);
        assert_eq!(color.z, 0.0);
    }

    #[test]
    fn shade_fragment_miss() {
        let volume = Volume::from_field(DensityField::uniform([8, 8, 8], 0.5), VolumeScale::uniform());
        let view = red_iso(0.2, 0.8).with_camera(point![0.5, 0.5, -2.0]);

        let color = shade_fragment(
            &point![0.5, 0.5, -3.0],
            &volume,
            &TransferLut::default(),
            &view,
            &MarchSettings::default(),
        );
        assert!(color.is_none());
    }
}
