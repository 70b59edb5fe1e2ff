//! # pfm-io
//!
//! Portable Float Map (PFM) I/O, plus TIFF to PFM batch conversion.
//!
//! PFM is a minimal floating-point image format: a three line ASCII header
//! followed by raw 32-bit floats. It is common for disparity and depth maps.
//!
//! - [`pfm`] - PFM codec ([`pfm::decode`], [`pfm::encode`], file helpers)
//! - [`tiff`] - TIFF reader glue on top of the `tiff` crate
//! - [`batch`] - directory-wide TIFF to PFM conversion
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pfm_io::{pfm, ImageData};
//!
//! let image = ImageData::from_f32(5, 10, 1, vec![0.0; 50]);
//! pfm::write("depth.pfm", &image, 1.0)?;
//!
//! let decoded = pfm::read("depth.pfm")?;
//! assert_eq!(decoded.scale, 1.0);
//! ```
//!
//! # Sample Layout
//!
//! [`ImageData`] stores samples row-major as `[row][col][channel]` with
//! row 0 at the top. PFM stores rows bottom-to-top; the codec flips rows on
//! both read and write so callers never see the on-disk order.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod traits;
mod transform;

pub mod batch;
pub mod pfm;
pub mod tiff;

pub use error::{IoError, IoResult};
pub use pfm::{Endianness, PfmImage};
pub use traits::{ImageReader, ImageWriter};

use std::fmt;

/// Image data container for I/O operations.
///
/// A `width x height` grid with `channels` samples per pixel. PFM accepts
/// one channel (the `H x W` and `H x W x 1` shapes) or three (`H x W x 3`).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of samples per pixel.
    pub channels: u32,
    /// Raw sample data.
    pub data: PixelData,
}

/// Sample element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

/// Raw sample storage, one variant per element type.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    /// 8-bit unsigned data.
    U8(Vec<u8>),
    /// 16-bit unsigned data.
    U16(Vec<u16>),
    /// 32-bit unsigned data.
    U32(Vec<u32>),
    /// 8-bit signed data.
    I8(Vec<i8>),
    /// 16-bit signed data.
    I16(Vec<i16>),
    /// 32-bit signed data.
    I32(Vec<i32>),
    /// 32-bit float data.
    F32(Vec<f32>),
    /// 64-bit float data.
    F64(Vec<f64>),
}

impl ImageData {
    /// Creates ImageData from f32 sample data.
    pub fn from_f32(width: u32, height: u32, channels: u32, data: Vec<f32>) -> Self {
        Self::from_data(width, height, channels, PixelData::F32(data))
    }

    /// Creates ImageData from any sample buffer.
    pub fn from_data(width: u32, height: u32, channels: u32, data: PixelData) -> Self {
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    /// Returns the element type of the sample buffer.
    pub fn format(&self) -> PixelFormat {
        self.data.format()
    }

    /// Returns the total number of pixels, or `None` if it overflows `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Returns the number of samples the dimensions call for, or `None` if
    /// it overflows `usize`.
    pub fn sample_count(&self) -> Option<usize> {
        self.pixel_count()?.checked_mul(self.channels as usize)
    }

    /// Returns the f32 samples without copying, if the buffer is f32.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            PixelData::F32(data) => Some(data),
            _ => None,
        }
    }

    /// Converts samples to f32 by numeric cast. Values are not rescaled,
    /// so an 8-bit 255 becomes 255.0.
    pub fn to_f32(&self) -> Vec<f32> {
        match &self.data {
            PixelData::U8(data) => data.iter().map(|&v| v as f32).collect(),
            PixelData::U16(data) => data.iter().map(|&v| v as f32).collect(),
            PixelData::U32(data) => data.iter().map(|&v| v as f32).collect(),
            PixelData::I8(data) => data.iter().map(|&v| v as f32).collect(),
            PixelData::I16(data) => data.iter().map(|&v| v as f32).collect(),
            PixelData::I32(data) => data.iter().map(|&v| v as f32).collect(),
            PixelData::F32(data) => data.clone(),
            PixelData::F64(data) => data.iter().map(|&v| v as f32).collect(),
        }
    }

    /// Returns a copy of this image with samples cast to f32.
    pub fn into_f32(self) -> Self {
        let data = match self.data {
            PixelData::F32(data) => data,
            _ => self.to_f32(),
        };
        Self::from_f32(self.width, self.height, self.channels, data)
    }
}

impl PixelData {
    /// Returns the element type.
    pub fn format(&self) -> PixelFormat {
        match self {
            Self::U8(_) => PixelFormat::U8,
            Self::U16(_) => PixelFormat::U16,
            Self::U32(_) => PixelFormat::U32,
            Self::I8(_) => PixelFormat::I8,
            Self::I16(_) => PixelFormat::I16,
            Self::I32(_) => PixelFormat::I32,
            Self::F32(_) => PixelFormat::F32,
            Self::F64(_) => PixelFormat::F64,
        }
    }

    /// Returns the number of stored samples.
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    /// Returns true if no samples are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::F32 => "float32",
            Self::F64 => "float64",
        };
        f.write_str(name)
    }
}
