//! Loading volumes from disk and sampling them.

use std::path::Path;

use crate::error::VolumeError;

mod data_type;
mod density_field;
mod normalize;
pub mod parse;
mod vol_reader;
mod volume;

pub use data_type::{half_to_f32, DataType, Endianness};
pub use density_field::DensityField;
pub use normalize::normalize;
pub use vol_reader::{
    read_nhdr, read_raw, ByteSkip, DataSource, NhdrHeader, RawFileName, VolumeData,
};
pub use volume::Volume;

/// Read `.raw` or `.nhdr` file, chosen by extension
pub fn read_file<P>(path: P) -> Result<VolumeData, VolumeError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "raw" => read_raw(path),
        "nhdr" => read_nhdr(path),
        _ => Err(VolumeError::UnknownExtension(extension)),
    }
}

/// Read and normalize volume
pub fn from_file<P>(path: P) -> Result<Volume, VolumeError>
where
    P: AsRef<Path>,
{
    Volume::try_from(read_file(path)?)
}
