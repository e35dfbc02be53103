use nalgebra::Vector3;

use crate::config::Config;

use super::SampleGenerator;

/// Density 1 in the center falling linearly to 0 at the corners.
/// Isovalue windows of this volume are nested spherical shells.
pub struct GradientGenerator {
    center: Vector3<f32>,
    max_distance: f32,
}

impl GradientGenerator {
    pub fn from_config(config: &Config) -> GradientGenerator {
        let center = config.dims.cast::<f32>().map(|d| (d - 1.0) / 2.0);
        GradientGenerator {
            center,
            max_distance: center.norm().max(f32::EPSILON),
        }
    }
}

impl SampleGenerator for GradientGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> f32 {
        let distance = (coords.cast::<f32>() - self.center).norm();
        1.0 - distance / self.max_distance
    }
}

#[cfg(test)]
mod test {

    use nalgebra::vector;

    use super::*;
    use crate::config::{GeneratorConfig, SampleType};
    use crate::generators::test::config;

    #[test]
    fn center_and_corners() {
        let cfg = config(vector![5, 5, 5], GeneratorConfig::Gradient, SampleType::UInt8);
        let gen = GradientGenerator::from_config(&cfg);

        assert_eq!(gen.sample_at(vector![2, 2, 2]), 1.0);
        assert!(gen.sample_at(vector![0, 0, 0]).abs() < 1e-6);
        assert!(gen.sample_at(vector![4, 2, 2]) > gen.sample_at(vector![4, 4, 2]));
    }
}
