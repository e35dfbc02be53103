use nalgebra::vector;

use super::vol_reader::sample_count;
use crate::{common::ValueRange, error::VolumeError, render::VolumeScale};

/// Map samples into `<0;1>` and compute the scale that fits the volume's
/// physical extent into the unit cube.
///
/// Densities are `(v - min) / (max - min)`, a constant volume maps to zeros.
/// Scale is `size * spacing / max(size * spacing)` per axis, the longest axis becomes 1.
pub fn normalize(
    sizes: [usize; 3],
    spacings: [f32; 3],
    samples: &[f32],
) -> Result<(Vec<f32>, VolumeScale), VolumeError> {
    if sizes.iter().any(|&s| s == 0) || samples.is_empty() {
        return Err(VolumeError::Empty);
    }

    let expected = sample_count(&sizes).ok_or(VolumeError::TooLarge(sizes))?;
    if samples.len() != expected {
        return Err(VolumeError::SizeMismatch {
            expected,
            actual: samples.len(),
        });
    }

    if !spacings.iter().all(|&s| s.is_finite() && s > 0.0) {
        return Err(VolumeError::InvalidSpacing(spacings));
    }

    let physical = vector![
        sizes[0] as f32 * spacings[0],
        sizes[1] as f32 * spacings[1],
        sizes[2] as f32 * spacings[2]
    ];
    let scale = VolumeScale::new(physical / physical.max())?;

    let range = ValueRange::from_samples(samples.iter().copied());
    let width = range.width();

    let densities = if range.is_empty() || width <= 0.0 {
        vec![0.0; samples.len()]
    } else {
        samples
            .iter()
            .map(|&v| {
                if v.is_finite() {
                    ((v - range.low) / width).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect()
    };

    Ok((densities, scale))
}
