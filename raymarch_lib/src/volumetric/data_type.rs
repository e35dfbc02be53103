use std::{fmt, str::FromStr};

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::VolumeError;

/// Byte order of multi-byte samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Default for Endianness {
    fn default() -> Self {
        Endianness::Little
    }
}

impl FromStr for Endianness {
    type Err = VolumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "little" => Ok(Endianness::Little),
            "big" => Ok(Endianness::Big),
            _ => Err(VolumeError::InvalidField {
                field: "endian",
                value: s.to_string(),
            }),
        }
    }
}

/// Type of a single sample stored in a volume file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
    Float16,
    Float32,
    Float64,
    Bool,
}

impl DataType {
    /// Size of one sample in bytes
    pub fn byte_width(&self) -> usize {
        match self {
            DataType::UInt8 | DataType::Int8 | DataType::Bool => 1,
            DataType::UInt16 | DataType::Int16 | DataType::Float16 => 2,
            DataType::UInt32 | DataType::Int32 | DataType::Float32 => 4,
            DataType::UInt64 | DataType::Int64 | DataType::Float64 => 8,
        }
    }

    /// Name used in raw file names and NHDR headers
    pub fn name(&self) -> &'static str {
        match self {
            DataType::UInt8 => "uint8",
            DataType::Int8 => "int8",
            DataType::UInt16 => "uint16",
            DataType::Int16 => "int16",
            DataType::UInt32 => "uint32",
            DataType::Int32 => "int32",
            DataType::UInt64 => "uint64",
            DataType::Int64 => "int64",
            DataType::Float16 => "float16",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Bool => "bool",
        }
    }

    /// Number of whole samples in `byte_len` bytes
    pub fn sample_count(&self, byte_len: usize) -> usize {
        byte_len / self.byte_width()
    }

    /// Decode samples into `f32`.
    /// Trailing bytes that do not form a whole sample are ignored.
    pub fn decode(&self, bytes: &[u8], endianness: Endianness) -> Vec<f32> {
        match endianness {
            Endianness::Little => self.decode_with::<LittleEndian>(bytes),
            Endianness::Big => self.decode_with::<BigEndian>(bytes),
        }
    }

    fn decode_with<B: ByteOrder>(&self, bytes: &[u8]) -> Vec<f32> {
        let chunks = bytes.chunks_exact(self.byte_width());
        match self {
            DataType::UInt8 => bytes.iter().map(|&b| b as f32).collect(),
            DataType::Int8 => bytes.iter().map(|&b| b as i8 as f32).collect(),
            DataType::Bool => bytes
                .iter()
                .map(|&b| if b != 0 { 1.0 } else { 0.0 })
                .collect(),
            DataType::UInt16 => chunks.map(|c| B::read_u16(c) as f32).collect(),
            DataType::Int16 => chunks.map(|c| B::read_i16(c) as f32).collect(),
            DataType::UInt32 => chunks.map(|c| B::read_u32(c) as f32).collect(),
            DataType::Int32 => chunks.map(|c| B::read_i32(c) as f32).collect(),
            DataType::UInt64 => chunks.map(|c| B::read_u64(c) as f32).collect(),
            DataType::Int64 => chunks.map(|c| B::read_i64(c) as f32).collect(),
            DataType::Float16 => chunks.map(|c| half_to_f32(B::read_u16(c))).collect(),
            DataType::Float32 => chunks.map(B::read_f32).collect(),
            DataType::Float64 => chunks.map(|c| B::read_f64(c) as f32).collect(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = VolumeError;

    /// Case-insensitive, accepts NRRD type names as well
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let data_type = match normalized.as_str() {
            "uint8" | "uchar" | "unsigned char" | "uint8_t" => DataType::UInt8,
            "int8" | "signed char" | "int8_t" => DataType::Int8,
            "uint16" | "ushort" | "unsigned short" | "unsigned short int" | "uint16_t" => {
                DataType::UInt16
            }
            "int16" | "short" | "short int" | "signed short" | "signed short int" | "int16_t" => {
                DataType::Int16
            }
            "uint32" | "uint" | "unsigned int" | "uint32_t" => DataType::UInt32,
            "int32" | "int" | "signed int" | "int32_t" => DataType::Int32,
            "uint64" | "ulonglong" | "unsigned long long" | "unsigned long long int"
            | "uint64_t" => DataType::UInt64,
            "int64" | "longlong" | "long long" | "long long int" | "signed long long"
            | "signed long long int" | "int64_t" => DataType::Int64,
            "float16" => DataType::Float16,
            "float32" | "float" => DataType::Float32,
            "float64" | "double" => DataType::Float64,
            "bool" => DataType::Bool,
            _ => return Err(VolumeError::UnknownDataType(s.to_string())),
        };
        Ok(data_type)
    }
}

/// IEEE 754 half precision bits to `f32`
pub fn half_to_f32(bits: u16) -> f32 {
    let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = ((bits >> 10) & 0x1f) as i32;
    let mantissa = (bits & 0x03ff) as f32;

    match exponent {
        // subnormal
        0 => sign * mantissa * f32::powi(2.0, -24),
        0x1f if mantissa == 0.0 => sign * f32::INFINITY,
        0x1f => f32::NAN,
        e => sign * (1.0 + mantissa / 1024.0) * f32::powi(2.0, e - 15),
    }
}
