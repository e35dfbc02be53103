use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while reading and preparing volumetric data
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid raw file name `{0}`, expected {{X}}x{{Y}}x{{Z}}_{{TYPE}}.raw")]
    InvalidFileName(String),

    #[error("unknown sample type `{0}`")]
    UnknownDataType(String),

    #[error("unexpected data size: expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("missing `{0}` field in NHDR header")]
    MissingField(&'static str),

    #[error("invalid `{field}` field in NHDR header: `{value}`")]
    InvalidField { field: &'static str, value: String },

    #[error("unsupported volume dimension {0}, only 3D volumes are supported")]
    UnsupportedDimension(usize),

    #[error("unsupported NHDR encoding `{0}`, only raw data is supported")]
    UnsupportedEncoding(String),

    #[error("malformed NHDR header: {0}")]
    Header(String),

    #[error("unknown volume file extension `{0}`")]
    UnknownExtension(String),

    #[error("volume has no samples")]
    Empty,

    #[error("volume of {0:?} samples is too large")]
    TooLarge([usize; 3]),

    #[error("voxel spacing must be positive, got {0:?}")]
    InvalidSpacing([f32; 3]),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors raised by transfer function construction and `.tfl` files
#[derive(Debug, Error)]
pub enum TransferFunctionError {
    #[error("cannot access `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("transfer function needs at least 2 entries, got {0}")]
    InvalidSize(usize),
}

/// Invalid render configuration, or a render thread that went away
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("volume scale components must lie in (0;1], got {0:?}")]
    InvalidScale([f32; 3]),

    #[error("step size must be positive and finite, got {0}")]
    InvalidStepSize(f32),

    #[error("alpha threshold must lie in (0;1], got {0}")]
    InvalidAlphaThreshold(f32),

    #[error("extinction scale must be non-negative and finite, got {0}")]
    InvalidExtinction(f32),

    #[error("isovalue window [{min};{max}] must satisfy 0 <= min <= max <= 1")]
    InvalidIsovalueWindow { min: f32, max: f32 },

    #[error("resolution must be non-zero, got {0}x{1}")]
    InvalidResolution(usize, usize),

    #[error("render thread is not running")]
    Disconnected,
}
