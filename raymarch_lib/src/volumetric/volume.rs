use super::{normalize::normalize, DensityField, VolumeData};
use crate::{error::VolumeError, render::VolumeScale};

/// Normalized volume, ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    sizes: [usize; 3],
    spacings: [f32; 3],
    field: DensityField,
    scale: VolumeScale,
}

impl Volume {
    /// Normalize raw samples, x varies fastest
    pub fn new(sizes: [usize; 3], spacings: [f32; 3], samples: &[f32]) -> Result<Volume, VolumeError> {
        let (densities, scale) = normalize(sizes, spacings, samples)?;
        let field = DensityField::new(sizes, densities)?;
        Ok(Volume {
            sizes,
            spacings,
            field,
            scale,
        })
    }

    /// Volume from already normalized densities
    pub fn from_field(field: DensityField, scale: VolumeScale) -> Volume {
        Volume {
            sizes: field.sizes(),
            spacings: [1.0, 1.0, 1.0],
            field,
            scale,
        }
    }

    pub fn get_sizes(&self) -> [usize; 3] {
        self.sizes
    }

    pub fn get_spacings(&self) -> [f32; 3] {
        self.spacings
    }

    pub fn get_field(&self) -> &DensityField {
        &self.field
    }

    pub fn get_scale(&self) -> VolumeScale {
        self.scale
    }
}

impl TryFrom<VolumeData> for Volume {
    type Error = VolumeError;

    fn try_from(data: VolumeData) -> Result<Self, Self::Error> {
        Volume::new(data.sizes, data.spacings, &data.samples)
    }
}
