use std::ops::RangeInclusive;

use nalgebra::{vector, Vector3};

use crate::config::{Config, GeneratorConfig};

use super::SampleGenerator;

/// Generate volume with a number of randomly placed shapes
pub struct ShapesGenerator {
    shapes: Vec<ShapeInfo>,
}

impl ShapesGenerator {
    pub fn from_config(config: &Config) -> ShapesGenerator {
        let (n_of_shapes, sample, obj_size) = match config.generator {
            GeneratorConfig::Shapes {
                n_of_shapes,
                sample,
                obj_size,
            } => (n_of_shapes, sample, obj_size),
            _ => (0, 0, 1),
        };

        let size = vector![obj_size, obj_size, obj_size];
        let variance = size.map(|s| s / 10);

        let random_shape_gen =
            ShapeInfoGenerator::new(config.dims, size, variance, sample, 10, config.seed);
        let shapes = random_shape_gen.get_shapes(n_of_shapes);
        ShapesGenerator { shapes }
    }

    pub fn shapes(&self) -> &[ShapeInfo] {
        &self.shapes
    }
}

impl SampleGenerator for ShapesGenerator {
    fn sample_at(&self, coords: Vector3<u32>) -> f32 {
        self.shapes
            .iter()
            .filter(|shape| shape.contains(coords))
            .map(|shape| shape.render_at(coords - shape.position_low))
            .find(|&v| v > 0.0)
            .unwrap_or(0.0)
    }
}

// # of enum ShapeType variants
const N_OF_SHAPE_KINDS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Cuboid,
    Sphere,
}

/// One shape in volume, bounds are inclusive
#[derive(Debug, Clone)]
pub struct ShapeInfo {
    pub position_low: Vector3<u32>,
    pub position_high: Vector3<u32>,
    pub shape_type: ShapeType,
    pub density: f32,
}

impl ShapeInfo {
    #[must_use]
    pub fn new(
        position_low: Vector3<u32>,
        position_high: Vector3<u32>,
        shape_type: ShapeType,
        sample: u8,
    ) -> Self {
        Self {
            position_low,
            position_high,
            shape_type,
            density: sample as f32 / u8::MAX as f32,
        }
    }

    fn contains(&self, coords: Vector3<u32>) -> bool {
        (0..3).all(|i| coords[i] >= self.position_low[i] && coords[i] <= self.position_high[i])
    }

    fn render_at(&self, offset: Vector3<u32>) -> f32 {
        match self.shape_type {
            ShapeType::Cuboid => self.density,
            ShapeType::Sphere => self.render_sphere(offset),
        }
    }

    fn render_sphere(&self, offset: Vector3<u32>) -> f32 {
        let extent = (self.position_high - self.position_low).cast::<f32>();
        let center = extent / 2.0;
        let r = extent.min() / 2.0;

        if (offset.cast::<f32>() - center).norm() <= r {
            self.density
        } else {
            0.0
        }
    }
}

/// Generate shapes
/// Helper type
pub struct ShapeInfoGenerator {
    rng: fastrand::Rng,
    vol_dims: Vector3<u32>,
    size: Vector3<u32>,
    size_variance: Vector3<u32>,
    sample: u8,
    sample_variance: u8,
}

impl ShapeInfoGenerator {
    #[must_use]
    pub fn new(
        vol_dims: Vector3<u32>,
        size: Vector3<u32>,
        size_variance: Vector3<u32>,
        sample: u8,
        sample_variance: u8,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Self {
            rng,
            vol_dims,
            size,
            size_variance,
            sample,
            sample_variance,
        }
    }

    fn random_shape(&self) -> ShapeType {
        match self.rng.u8(0..N_OF_SHAPE_KINDS) {
            0 => ShapeType::Cuboid,
            _ => ShapeType::Sphere,
        }
    }

    fn random_vector(&self, ranges: [RangeInclusive<u32>; 3]) -> Vector3<u32> {
        let [x, y, z] = ranges;
        vector![self.rng.u32(x), self.rng.u32(y), self.rng.u32(z)]
    }

    pub fn get_shapes(&self, n: usize) -> Vec<ShapeInfo> {
        (0..n).map(|_| self.get_shape()).collect()
    }

    pub fn get_shape(&self) -> ShapeInfo {
        let shape_type = self.random_shape();

        // sizes are voxel counts, shapes must fit the volume
        let size_range = |i: usize| {
            let max_size = self.vol_dims[i].max(1);
            let low = self.size[i].saturating_sub(self.size_variance[i]).clamp(1, max_size);
            let high = self.size[i].saturating_add(self.size_variance[i]).clamp(low, max_size);
            low..=high
        };
        let size = self.random_vector([size_range(0), size_range(1), size_range(2)]);

        // Spawn shape in positions it fits
        let pos_range = |i: usize| 0..=(self.vol_dims[i].saturating_sub(size[i]));
        let position_low = self.random_vector([pos_range(0), pos_range(1), pos_range(2)]);

        let position_high = position_low + size.map(|s| s - 1);

        ShapeInfo::new(position_low, position_high, shape_type, self.random_sample())
    }

    fn random_sample(&self) -> u8 {
        // Uses saturating intrinsics, so there is no overflow
        let low = self.sample.saturating_sub(self.sample_variance).max(1);
        let high = self.sample.saturating_add(self.sample_variance).max(low);
        self.rng.u8(low..=high)
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::config::SampleType;
    use crate::generators::test::config;

    fn shapes_config(n_of_shapes: usize, obj_size: u32) -> Config {
        config(
            vector![32, 32, 16],
            GeneratorConfig::Shapes {
                n_of_shapes,
                sample: 200,
                obj_size,
            },
            SampleType::UInt8,
        )
    }

    #[test]
    fn shapes_fit_volume() {
        let gen = ShapesGenerator::from_config(&shapes_config(20, 10));
        assert_eq!(gen.shapes().len(), 20);

        for shape in gen.shapes() {
            assert!(shape.position_high.x < 32);
            assert!(shape.position_high.y < 32);
            assert!(shape.position_high.z < 16);
            assert!(shape.density > 0.7 && shape.density < 0.9);
        }
    }

    #[test]
    fn oversized_objects_are_clamped() {
        let gen = ShapesGenerator::from_config(&shapes_config(3, 100));
        for shape in gen.shapes() {
            assert_eq!(shape.position_low.z, 0);
            assert_eq!(shape.position_high.z, 15);
        }
    }

    #[test]
    fn seed_replicates_shapes() {
        let a = ShapesGenerator::from_config(&shapes_config(5, 8));
        let b = ShapesGenerator::from_config(&shapes_config(5, 8));
        let lows_a: Vec<_> = a.shapes().iter().map(|s| s.position_low).collect();
        let lows_b: Vec<_> = b.shapes().iter().map(|s| s.position_low).collect();
        assert_eq!(lows_a, lows_b);
    }

    #[test]
    fn cuboid_fills_bounds() {
        let shape = ShapeInfo::new(vector![2, 2, 2], vector![4, 4, 4], ShapeType::Cuboid, 255);
        let gen = ShapesGenerator {
            shapes: vec![shape],
        };
        assert_eq!(gen.sample_at(vector![2, 4, 3]), 1.0);
        assert_eq!(gen.sample_at(vector![5, 4, 3]), 0.0);
    }

    #[test]
    fn sphere_leaves_corners_empty() {
        let shape = ShapeInfo::new(vector![0, 0, 0], vector![8, 8, 8], ShapeType::Sphere, 255);
        assert_eq!(shape.render_at(vector![4, 4, 4]), 1.0);
        assert_eq!(shape.render_at(vector![0, 0, 0]), 0.0);
    }
}
