use std::{path::PathBuf, str::FromStr};

use clap::ArgMatches;
use nalgebra::{vector, Vector3};

/// Transform `Values` into `Vector`
fn values_to_vector3<T>(args: &ArgMatches, key: &str) -> Result<Vector3<T>, String>
where
    T: FromStr + Copy,
{
    let vals = args
        .values_of(key)
        .ok_or_else(|| format!("Missing {key}"))?
        .map(|v| v.parse::<T>().map_err(|_| format!("Invalid {key} value {v}")))
        .collect::<Result<Vec<T>, String>>()?;
    match vals[..] {
        [x, y, z] => Ok(vector![x, y, z]),
        _ => Err(format!("{key} needs 3 values")),
    }
}

fn parse_value<T>(args: &ArgMatches, key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
{
    args.value_of(key)
        .map(|v| v.parse::<T>().map_err(|_| format!("Invalid {key} value {v}")))
        .transpose()
}

fn required_value<T>(args: &ArgMatches, key: &str) -> Result<T, String>
where
    T: FromStr,
{
    parse_value(args, key)?.ok_or_else(|| format!("Missing {key}"))
}

/// Type of samples written to file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    UInt8,
    /// Little endian
    UInt16,
}

impl SampleType {
    pub fn byte_width(&self) -> usize {
        match self {
            SampleType::UInt8 => 1,
            SampleType::UInt16 => 2,
        }
    }

    /// Name used in file names and NRRD headers
    pub fn name(&self) -> &'static str {
        match self {
            SampleType::UInt8 => "uint8",
            SampleType::UInt16 => "uint16",
        }
    }
}

impl FromStr for SampleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uint8" => Ok(SampleType::UInt8),
            "uint16" => Ok(SampleType::UInt16),
            _ => Err(format!("Unknown sample type {s}")),
        }
    }
}

/// App configuration
/// Config is built from args parsed by `clap`
#[derive(Debug)]
pub struct Config {
    /// Dimensions of volume
    pub dims: Vector3<u32>,
    /// Physical size of a voxel
    pub spacing: Vector3<f32>,
    /// Type of generator to be used
    pub generator: GeneratorConfig,
    pub sample_type: SampleType,
    /// Directory for the output files
    pub output_dir: PathBuf,
    /// Write `.nhdr` next to the raw file
    pub nhdr: bool,
    /// Optional seed for RNG, to replicate results
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_args(args: ArgMatches) -> Result<Config, String> {
        let dims = values_to_vector3(&args, "dims")?;
        let spacing = values_to_vector3(&args, "spacing")?;
        let generator = GeneratorConfig::from_args(&args)?;
        let sample_type = required_value(&args, "type")?;
        let output_dir = args
            .value_of_os("output")
            .map(PathBuf::from)
            .ok_or("Missing output directory")?;
        let nhdr = args.is_present("nhdr");
        let seed = parse_value(&args, "seed")?;

        Ok(Config {
            dims,
            spacing,
            generator,
            sample_type,
            output_dir,
            nhdr,
            seed,
        })
    }

    /// `{X}x{Y}x{Z}_{TYPE}.raw`
    pub fn raw_file_name(&self) -> String {
        format!(
            "{}x{}x{}_{}.raw",
            self.dims.x,
            self.dims.y,
            self.dims.z,
            self.sample_type.name()
        )
    }

    pub fn raw_path(&self) -> PathBuf {
        self.output_dir.join(self.raw_file_name())
    }

    pub fn nhdr_path(&self) -> PathBuf {
        self.raw_path().with_extension("nhdr")
    }

    pub fn sample_count(&self) -> usize {
        self.dims.iter().map(|&d| d as usize).product()
    }
}

/// Settings specific to generator variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeneratorConfig {
    /// Generate shapes
    Shapes {
        n_of_shapes: usize,
        sample: u8,
        obj_size: u32,
    },
    /// Generate solid volume
    Solid { sample: u8 },
    /// Density falling off from the center
    Gradient,
}

impl GeneratorConfig {
    pub fn from_args(args: &ArgMatches) -> Result<GeneratorConfig, String> {
        let name = args.value_of("generator").ok_or("Missing generator")?;

        match name {
            "shapes" => Ok(GeneratorConfig::Shapes {
                n_of_shapes: required_value(args, "n-of-shapes")?,
                sample: required_value(args, "sample")?,
                obj_size: required_value(args, "object-size")?,
            }),
            "solid" => Ok(GeneratorConfig::Solid {
                sample: required_value(args, "sample")?,
            }),
            "gradient" => Ok(GeneratorConfig::Gradient),
            _ => Err(format!("Unknown generator {name}")),
        }
    }
}
