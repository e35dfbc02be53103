use byteorder::{ByteOrder, LittleEndian};
use indicatif::ProgressBar;
use nalgebra::{vector, Vector3};
use rayon::prelude::*;

use crate::config::{Config, GeneratorConfig, SampleType};

mod gradient;
mod shapes;
mod solid;

/// Generates one sample at a time, at any location
pub trait SampleGenerator: Sync {
    /// Density in `<0;1>`
    fn sample_at(&self, coords: Vector3<u32>) -> f32;
}

pub fn get_sample_generator(config: &Config) -> Box<dyn SampleGenerator> {
    match config.generator {
        GeneratorConfig::Shapes { .. } => Box::new(shapes::ShapesGenerator::from_config(config)),
        GeneratorConfig::Solid { .. } => Box::new(solid::SolidGenerator::from_config(config)),
        GeneratorConfig::Gradient => Box::new(gradient::GradientGenerator::from_config(config)),
    }
}

/// Quantize density into sample bytes
fn write_sample(density: f32, sample_type: SampleType, out: &mut [u8]) {
    let density = density.clamp(0.0, 1.0);
    match sample_type {
        SampleType::UInt8 => out[0] = (density * u8::MAX as f32).round() as u8,
        SampleType::UInt16 => {
            LittleEndian::write_u16(out, (density * u16::MAX as f32).round() as u16)
        }
    }
}

/// Samples of the whole volume, x varies fastest.
/// Z slices are generated in parallel, `progress` advances once per slice.
pub fn generate_samples(
    generator: &dyn SampleGenerator,
    config: &Config,
    progress: &ProgressBar,
) -> Vec<u8> {
    let width = config.sample_type.byte_width();
    let dims = config.dims;
    let slice_len = dims.x as usize * dims.y as usize * width;

    let mut buffer = vec![0; config.sample_count() * width];
    if slice_len == 0 {
        return buffer;
    }

    buffer
        .par_chunks_mut(slice_len)
        .enumerate()
        .for_each(|(z, slice)| {
            for (i, out) in slice.chunks_exact_mut(width).enumerate() {
                let x = (i % dims.x as usize) as u32;
                let y = (i / dims.x as usize) as u32;
                let density = generator.sample_at(vector![x, y, z as u32]);
                write_sample(density, config.sample_type, out);
            }
            progress.inc(1);
        });

    buffer
}

#[cfg(test)]
pub(crate) mod test {

    use std::path::PathBuf;

    use super::*;

    pub fn config(dims: Vector3<u32>, generator: GeneratorConfig, sample_type: SampleType) -> Config {
        Config {
            dims,
            spacing: vector![1.0, 1.0, 1.0],
            generator,
            sample_type,
            output_dir: PathBuf::from("."),
            nhdr: false,
            seed: Some(3),
        }
    }

    #[test]
    fn quantization() {
        let mut out = [0u8; 2];
        write_sample(1.0, SampleType::UInt16, &mut out);
        assert_eq!(out, [0xff, 0xff]);
        write_sample(0.5, SampleType::UInt8, &mut out);
        assert_eq!(out[0], 128);
        write_sample(-1.0, SampleType::UInt8, &mut out);
        assert_eq!(out[0], 0);
    }

    #[test]
    fn samples_are_x_fastest() {
        struct XRamp;
        impl SampleGenerator for XRamp {
            fn sample_at(&self, coords: Vector3<u32>) -> f32 {
                (coords.x + 2 * coords.y + 4 * coords.z) as f32 / 255.0
            }
        }

        let cfg = config(vector![2, 2, 3], GeneratorConfig::Gradient, SampleType::UInt8);
        let bytes = generate_samples(&XRamp, &cfg, &ProgressBar::hidden());
        assert_eq!(bytes, (0..12).collect::<Vec<u8>>());
    }

    #[test]
    fn uint16_little_endian() {
        let cfg = config(
            vector![3, 1, 1],
            GeneratorConfig::Solid { sample: 255 },
            SampleType::UInt16,
        );
        let gen = get_sample_generator(&cfg);
        let bytes = generate_samples(gen.as_ref(), &cfg, &ProgressBar::hidden());
        assert_eq!(bytes, vec![0xff; 6]);
    }
}
