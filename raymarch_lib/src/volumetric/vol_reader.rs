use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use log::{debug, info};
use memmap::{Mmap, MmapOptions};
use nom::combinator::all_consuming;

use super::{
    data_type::{DataType, Endianness},
    parse,
};
use crate::error::VolumeError;

/// Bytes of a volume file, either owned or memory mapped
pub enum DataSource {
    Vec(Vec<u8>),
    Mmap(Mmap),
}

impl DataSource {
    pub fn from_vec(vec: Vec<u8>) -> DataSource {
        DataSource::Vec(vec)
    }

    /// Memory map the whole file.
    /// Empty files cannot be mapped and are returned as an empty `Vec`.
    pub fn from_file<P>(path: P) -> Result<DataSource, VolumeError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let io_err = |source| VolumeError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();
        if len == 0 {
            return Ok(DataSource::Vec(vec![]));
        }

        // The file must not be truncated while mapped
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(io_err)?;
        Ok(DataSource::Mmap(mmap))
    }

    pub fn get_slice(&self) -> &[u8] {
        match self {
            DataSource::Vec(v) => v.as_slice(),
            DataSource::Mmap(m) => &m[..],
        }
    }
}

/// Samples as read from disk, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeData {
    /// Number of samples along x, y, z
    pub sizes: [usize; 3],
    /// Physical size of a voxel
    pub spacings: [f32; 3],
    pub data_type: DataType,
    /// x varies fastest
    pub samples: Vec<f32>,
}

/// Metadata encoded in a `{X}x{Y}x{Z}_{TYPE}.raw` file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFileName {
    pub sizes: [usize; 3],
    pub data_type: DataType,
}

impl RawFileName {
    /// The pattern may be preceded by anything, `skull_256x256x113_uint8.raw` is valid
    pub fn parse(name: &str) -> Result<RawFileName, VolumeError> {
        let invalid = || VolumeError::InvalidFileName(name.to_string());

        let (sizes, type_name) = name
            .char_indices()
            .find_map(|(start, _)| {
                all_consuming(parse::raw_file_name)(&name[start..])
                    .ok()
                    .map(|(_, res)| res)
            })
            .ok_or_else(invalid)?;

        let data_type = type_name.parse()?;
        let meta = RawFileName { sizes, data_type };
        meta.byte_len()?;
        Ok(meta)
    }

    /// Parse the file name of `path`
    pub fn from_path(path: &Path) -> Result<RawFileName, VolumeError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| VolumeError::InvalidFileName(path.display().to_string()))?;
        RawFileName::parse(name)
    }

    pub fn sample_count(&self) -> Result<usize, VolumeError> {
        sample_count(&self.sizes).ok_or_else(|| VolumeError::InvalidFileName(self.to_string()))
    }

    /// Expected size of the file
    pub fn byte_len(&self) -> Result<usize, VolumeError> {
        self.sample_count()?
            .checked_mul(self.data_type.byte_width())
            .ok_or_else(|| VolumeError::InvalidFileName(self.to_string()))
    }
}

/// Product of `sizes`, `None` on overflow
pub(crate) fn sample_count(sizes: &[usize; 3]) -> Option<usize> {
    sizes.iter().try_fold(1usize, |acc, &s| acc.checked_mul(s))
}

impl std::fmt::Display for RawFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.sizes;
        write!(f, "{}x{}x{}_{}.raw", x, y, z, self.data_type)
    }
}

/// Decode exactly `expected` samples
fn decode_samples(
    bytes: &[u8],
    data_type: DataType,
    endianness: Endianness,
    expected: usize,
) -> Result<Vec<f32>, VolumeError> {
    let width = data_type.byte_width();
    if expected.checked_mul(width) != Some(bytes.len()) {
        return Err(VolumeError::SizeMismatch {
            expected,
            actual: bytes.len() / width,
        });
    }
    Ok(data_type.decode(bytes, endianness))
}

/// Read headerless file, metadata comes from the file name.
/// Voxel spacing is `(1,1,1)`, samples are little endian.
pub fn read_raw<P>(path: P) -> Result<VolumeData, VolumeError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let meta = RawFileName::from_path(path)?;

    let source = DataSource::from_file(path)?;
    let samples = decode_samples(
        source.get_slice(),
        meta.data_type,
        Endianness::Little,
        meta.sample_count()?,
    )?;

    info!(
        "Loaded raw volume {} | {}x{}x{} {}",
        path.display(),
        meta.sizes[0],
        meta.sizes[1],
        meta.sizes[2],
        meta.data_type
    );

    Ok(VolumeData {
        sizes: meta.sizes,
        spacings: [1.0, 1.0, 1.0],
        data_type: meta.data_type,
        samples,
    })
}

/// Where the samples start in a detached data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteSkip {
    Bytes(usize),
    /// `byte skip: -1`, data is at the end of the file
    FromEnd,
}

/// Fields of a detached NRRD header needed to load a volume
#[derive(Debug, Clone, PartialEq)]
pub struct NhdrHeader {
    pub version: u32,
    pub data_type: DataType,
    pub sizes: [usize; 3],
    pub spacings: [f32; 3],
    pub endianness: Endianness,
    pub data_file: PathBuf,
    pub line_skip: usize,
    pub byte_skip: ByteSkip,
}

impl NhdrHeader {
    /// Parse header text.
    /// The header ends at the first empty line or at the end of text.
    pub fn parse(text: &str) -> Result<NhdrHeader, VolumeError> {
        let mut lines = text.lines();

        let first = lines.next().ok_or(VolumeError::Header("empty header".into()))?;
        let (_, version) = parse::nrrd_magic(first.trim_end())
            .map_err(|_| VolumeError::Header(format!("bad magic line `{}`", first)))?;

        let mut dimension = None;
        let mut data_type = None;
        let mut sizes = None;
        let mut directions = None;
        let mut spacings = None;
        let mut endianness = Endianness::default();
        let mut data_file = None;
        let mut line_skip = 0;
        let mut byte_skip = ByteSkip::Bytes(0);

        for line in lines {
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if line.starts_with('#') || parse::key_value_pair(line).is_ok() {
                continue;
            }

            let (_, (key, value)) = parse::header_field(line)
                .map_err(|_| VolumeError::Header(format!("cannot parse line `{}`", line)))?;

            match key.as_str() {
                "dimension" => {
                    let dim = parse_number::<usize>("dimension", value)?;
                    if dim != 3 {
                        return Err(VolumeError::UnsupportedDimension(dim));
                    }
                    dimension = Some(dim);
                }
                "type" => data_type = Some(value.parse::<DataType>()?),
                "sizes" => sizes = Some(parse_sizes(value)?),
                "space directions" => directions = Some(parse_directions(value)?),
                "spacings" => spacings = Some(parse_spacings(value)?),
                "endian" => endianness = value.parse()?,
                "encoding" => {
                    if !value.trim().eq_ignore_ascii_case("raw") {
                        return Err(VolumeError::UnsupportedEncoding(value.to_string()));
                    }
                }
                "data file" | "datafile" => {
                    if value.starts_with("LIST") || value.contains('%') {
                        return Err(VolumeError::InvalidField {
                            field: "data file",
                            value: value.to_string(),
                        });
                    }
                    data_file = Some(PathBuf::from(value.trim()));
                }
                "line skip" | "lineskip" => line_skip = parse_number::<usize>("line skip", value)?,
                "byte skip" | "byteskip" => {
                    byte_skip = match value.trim() {
                        "-1" => ByteSkip::FromEnd,
                        other => ByteSkip::Bytes(parse_number::<usize>("byte skip", other)?),
                    }
                }
                _ => debug!("Ignoring NHDR field `{}`", key),
            }
        }

        dimension.ok_or(VolumeError::MissingField("dimension"))?;

        let header = NhdrHeader {
            version,
            data_type: data_type.ok_or(VolumeError::MissingField("type"))?,
            sizes: sizes.ok_or(VolumeError::MissingField("sizes"))?,
            spacings: directions
                .or(spacings)
                .ok_or(VolumeError::MissingField("space directions"))?,
            endianness,
            data_file: data_file.ok_or(VolumeError::MissingField("data file"))?,
            line_skip,
            byte_skip,
        };
        header.byte_len()?;
        debug!("Parsed NHDR header {:?}", header);
        Ok(header)
    }

    /// Location of the data file, relative paths start at the header's directory
    pub fn data_path(&self, header_path: &Path) -> PathBuf {
        if self.data_file.is_absolute() {
            return self.data_file.clone();
        }
        match header_path.parent() {
            Some(dir) => dir.join(&self.data_file),
            None => self.data_file.clone(),
        }
    }

    pub fn sample_count(&self) -> Result<usize, VolumeError> {
        sample_count(&self.sizes).ok_or_else(|| self.invalid_sizes())
    }

    /// Size of the sample payload in the data file
    pub fn byte_len(&self) -> Result<usize, VolumeError> {
        self.sample_count()?
            .checked_mul(self.data_type.byte_width())
            .ok_or_else(|| self.invalid_sizes())
    }

    fn invalid_sizes(&self) -> VolumeError {
        let [x, y, z] = self.sizes;
        VolumeError::InvalidField {
            field: "sizes",
            value: format!("{} {} {}", x, y, z),
        }
    }

    /// Sample bytes of the data file
    fn payload<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8], VolumeError> {
        let mut bytes = bytes;
        for _ in 0..self.line_skip {
            let newline = bytes
                .iter()
                .position(|&b| b == b'\n')
                .ok_or(VolumeError::Header("line skip past end of data file".into()))?;
            bytes = &bytes[newline + 1..];
        }

        let data_len = self.byte_len()?;
        let start = match self.byte_skip {
            ByteSkip::Bytes(skip) => skip,
            ByteSkip::FromEnd => bytes.len().saturating_sub(data_len),
        };
        bytes
            .get(start..)
            .ok_or(VolumeError::Header("byte skip past end of data file".into()))
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, VolumeError> {
    value.trim().parse::<T>().map_err(|_| VolumeError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn parse_sizes(value: &str) -> Result<[usize; 3], VolumeError> {
    let invalid = || VolumeError::InvalidField {
        field: "sizes",
        value: value.to_string(),
    };
    let (_, list) = parse::usize_list(value).map_err(|_| invalid())?;
    match list.as_slice() {
        &[x, y, z] => Ok([x, y, z]),
        _ => Err(invalid()),
    }
}

/// Spacing is the length of each axis vector
fn parse_directions(value: &str) -> Result<[f32; 3], VolumeError> {
    let invalid = || VolumeError::InvalidField {
        field: "space directions",
        value: value.to_string(),
    };
    let (_, list) = parse::space_directions(value).map_err(|_| invalid())?;
    let norms: Vec<f32> = list
        .into_iter()
        .flatten()
        .map(|v| v.iter().map(|c| c * c).sum::<f64>().sqrt() as f32)
        .collect();
    match norms.as_slice() {
        &[x, y, z] => Ok([x, y, z]),
        _ => Err(invalid()),
    }
}

fn parse_spacings(value: &str) -> Result<[f32; 3], VolumeError> {
    let invalid = || VolumeError::InvalidField {
        field: "spacings",
        value: value.to_string(),
    };
    let (_, list) = parse::float_list(value).map_err(|_| invalid())?;
    match list.as_slice() {
        &[x, y, z] => Ok([x as f32, y as f32, z as f32]),
        _ => Err(invalid()),
    }
}

/// Read detached NRRD header and its data file
pub fn read_nhdr<P>(path: P) -> Result<VolumeData, VolumeError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| VolumeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let header = NhdrHeader::parse(&text)?;

    let data_path = header.data_path(path);
    let source = DataSource::from_file(&data_path)?;
    let samples = decode_samples(
        header.payload(source.get_slice())?,
        header.data_type,
        header.endianness,
        header.sample_count()?,
    )?;

    info!(
        "Loaded NHDR volume {} | {}x{}x{} {} | spacing {:?}",
        path.display(),
        header.sizes[0],
        header.sizes[1],
        header.sizes[2],
        header.data_type,
        header.spacings
    );

    Ok(VolumeData {
        sizes: header.sizes,
        spacings: header.spacings,
        data_type: header.data_type,
        samples,
    })
}
