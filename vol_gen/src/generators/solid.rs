use nalgebra::Vector3;

use crate::config::{Config, GeneratorConfig};

use super::SampleGenerator;

/// Generate solid volume
/// All samples inside the padding have the same value
pub struct SolidGenerator {
    density: f32,
    pad: Vector3<u32>,
    dims: Vector3<u32>,
}

impl SolidGenerator {
    pub fn from_config(config: &Config) -> SolidGenerator {
        let sample = match config.generator {
            GeneratorConfig::Solid { sample } => sample,
            _ => 0,
        };

        // empty border of at most 5 voxels
        let pad = config.dims.map(|d| u32::min(5, d / 4));

        SolidGenerator {
            density: sample as f32 / u8::MAX as f32,
            pad,
            dims: config.dims,
        }
    }
}

impl SampleGenerator for SolidGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> f32 {
        let inside = (0..3).all(|i| coords[i] >= self.pad[i] && coords[i] < self.dims[i] - self.pad[i]);
        if inside {
            self.density
        } else {
            0.0
        }
    }
}
