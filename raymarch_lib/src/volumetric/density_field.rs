use nalgebra::Point3;

use super::vol_reader::sample_count;
use crate::{common::lerp, error::VolumeError};

/// Regular grid of densities in `<0;1>`, x varies fastest
#[derive(Debug, Clone, PartialEq)]
pub struct DensityField {
    sizes: [usize; 3],
    data: Vec<f32>,
}

impl DensityField {
    pub fn new(sizes: [usize; 3], data: Vec<f32>) -> Result<DensityField, VolumeError> {
        let expected = sample_count(&sizes).ok_or(VolumeError::TooLarge(sizes))?;
        if expected == 0 {
            return Err(VolumeError::Empty);
        }
        if data.len() != expected {
            return Err(VolumeError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(DensityField { sizes, data })
    }

    /// Every sample is `density`.
    /// Zero sizes are raised to 1.
    pub fn uniform(sizes: [usize; 3], density: f32) -> DensityField {
        let sizes = sizes.map(|s| s.max(1));
        DensityField {
            sizes,
            data: vec![density; sizes.iter().product()],
        }
    }

    /// Field with samples `f(x, y, z)`.
    /// Zero sizes are raised to 1.
    pub fn from_fn<F>(sizes: [usize; 3], f: F) -> DensityField
    where
        F: Fn(usize, usize, usize) -> f32,
    {
        let sizes = sizes.map(|s| s.max(1));
        let mut data = Vec::with_capacity(sizes.iter().product());
        for z in 0..sizes[2] {
            for y in 0..sizes[1] {
                for x in 0..sizes[0] {
                    data.push(f(x, y, z));
                }
            }
        }
        DensityField { sizes, data }
    }

    pub fn sizes(&self) -> [usize; 3] {
        self.sizes
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.sizes[0] + z * self.sizes[0] * self.sizes[1]
    }

    /// Sample at grid point, `None` outside of the grid
    pub fn get_data(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        if x >= self.sizes[0] || y >= self.sizes[1] || z >= self.sizes[2] {
            return None;
        }
        self.data.get(self.index(x, y, z)).copied()
    }

    /// Trilinear sample at texture coordinates `<0;1>^3`.
    ///
    /// Samples sit at texel centers, coordinates outside the cube are clamped
    /// to the edge texels. The result is clamped to `<0;1>`.
    pub fn sample(&self, pos: &Point3<f32>) -> f32 {
        let axis = |coord: f32, len: usize| {
            let hi = (len - 1) as f32;
            // max() also maps NaN to the first texel
            let x = (coord * len as f32 - 0.5).max(0.0).min(hi);
            let i0 = x.floor() as usize;
            let i1 = usize::min(i0 + 1, len - 1);
            (i0, i1, x - i0 as f32)
        };

        let (x0, x1, tx) = axis(pos.x, self.sizes[0]);
        let (y0, y1, ty) = axis(pos.y, self.sizes[1]);
        let (z0, z1, tz) = axis(pos.z, self.sizes[2]);

        let at = |x, y, z| self.data[self.index(x, y, z)];

        let c00 = lerp(at(x0, y0, z0), at(x1, y0, z0), tx);
        let c10 = lerp(at(x0, y1, z0), at(x1, y1, z0), tx);
        let c01 = lerp(at(x0, y0, z1), at(x1, y0, z1), tx);
        let c11 = lerp(at(x0, y1, z1), at(x1, y1, z1), tx);

        let c0 = lerp(c00, c10, ty);
        let c1 = lerp(c01, c11, ty);

        lerp(c0, c1, tz).clamp(0.0, 1.0)
    }
}
