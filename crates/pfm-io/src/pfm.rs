//! Portable Float Map (PFM) format support.
//!
//! PFM stores 32-bit float samples behind a three line ASCII header.
//!
//! # Format Details
//!
//! ```text
//! PF | Pf              color (3 channels) | grayscale (1 channel)
//! <width> <height>     unsigned decimal, single space, trailing whitespace
//! <scale>              signed float; negative means little-endian body
//! <body>               width*height*channels f32 values, bottom row first
//! ```
//!
//! The sign of the scale line only signals byte order. Decoded images
//! always report the positive magnitude in [`PfmImage::scale`], and rows are
//! flipped so row 0 is the top of the image.
//!
//! # Example
//!
//! ```rust,ignore
//! use pfm_io::{pfm, ImageData};
//!
//! let image = ImageData::from_f32(4, 2, 3, vec![0.25; 24]);
//! let bytes = pfm::encode(&image, 1.0)?;
//! let decoded = pfm::decode(&bytes)?;
//! assert_eq!(decoded.image, image);
//! ```

use crate::transform::flip_v;
use crate::{ImageData, ImageReader, ImageWriter, IoError, IoResult, PixelData};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use regex::Regex;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

/// Magic line for 3-channel images.
const COLOR_MAGIC: &str = "PF";
/// Magic line for 1-channel images.
const GRAY_MAGIC: &str = "Pf";

const SHAPE_MESSAGE: &str = "image must have H x W x 3, H x W x 1, or H x W dimensions";

lazy_static::lazy_static! {
    // `\n?\z` stands in for a `$` that also matches before a final newline.
    static ref DIMENSIONS: Regex =
        Regex::new(r"^([0-9]+)\s([0-9]+)\s\n?\z").expect("dimension pattern is valid");
}

// === Byte Order ===

/// Byte order of the binary body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Host byte order. Resolved to `Little` or `Big` when writing.
    #[default]
    Native,
    /// Little-endian, written with a negative scale.
    Little,
    /// Big-endian, written with a non-negative scale.
    Big,
}

impl Endianness {
    /// Resolves `Native` against the host's byte order.
    pub fn resolve(self) -> Self {
        match self {
            Self::Native if cfg!(target_endian = "little") => Self::Little,
            Self::Native => Self::Big,
            other => other,
        }
    }

    /// Returns true if this order, once resolved, is little-endian.
    pub fn is_little(self) -> bool {
        self.resolve() == Self::Little
    }

    /// Byte order signalled by a raw (signed) scale value.
    ///
    /// Only strictly negative values mean little-endian, so `0.0` and
    /// `-0.0` both read as big-endian.
    pub fn from_scale(scale_raw: f64) -> Self {
        if scale_raw < 0.0 {
            Self::Little
        } else {
            Self::Big
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Native => "native",
            Self::Little => "little",
            Self::Big => "big",
        };
        f.write_str(name)
    }
}

impl FromStr for Endianness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" | "=" => Ok(Self::Native),
            "little" | "le" | "<" => Ok(Self::Little),
            "big" | "be" | ">" => Ok(Self::Big),
            other => Err(format!(
                "unknown byte order '{}' (expected native, little or big)",
                other
            )),
        }
    }
}

// === Decoded Image ===

/// Result of decoding a PFM stream.
#[derive(Debug, Clone, PartialEq)]
pub struct PfmImage {
    /// f32 samples, 1 or 3 channels, top row first.
    pub image: ImageData,
    /// Scale factor with the byte-order sign stripped.
    pub scale: f64,
    /// Byte order the body was stored in (`Little` or `Big`).
    pub byte_order: Endianness,
}

impl PfmImage {
    /// Returns true for 3-channel (`PF`) images.
    pub fn is_color(&self) -> bool {
        self.image.channels == 3
    }
}

/// Parsed PFM header.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PfmHeader {
    width: u32,
    height: u32,
    channels: u32,
    scale: f64,
    byte_order: Endianness,
}

impl PfmHeader {
    fn read<R: BufRead>(reader: &mut R) -> IoResult<Self> {
        let magic = read_ascii_line(reader, "not a PFM file")?;
        let channels = match magic.trim_end() {
            COLOR_MAGIC => 3,
            GRAY_MAGIC => 1,
            _ => return Err(IoError::format("not a PFM file")),
        };

        let dims = read_ascii_line(reader, "malformed header")?;
        let (width, height) =
            parse_dimensions(&dims).ok_or_else(|| IoError::format("malformed header"))?;

        let scale_line = read_ascii_line(reader, "malformed scale")?;
        let scale_raw: f64 = scale_line
            .trim()
            .parse()
            .map_err(|_| IoError::format("malformed scale"))?;

        let byte_order = Endianness::from_scale(scale_raw);
        let scale = if byte_order == Endianness::Little {
            -scale_raw
        } else {
            scale_raw
        };

        Ok(Self {
            width,
            height,
            channels,
            scale,
            byte_order,
        })
    }

    fn sample_count(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels as usize)
    }
}

// === PfmReader ===

/// PFM format reader.
///
/// # Example
///
/// ```rust,ignore
/// use pfm_io::pfm::PfmReader;
/// use pfm_io::ImageReader;
///
/// let decoded = PfmReader::new().read("disp0.pfm")?;
/// println!("{}x{} scale {}", decoded.image.width, decoded.image.height, decoded.scale);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PfmReader;

impl PfmReader {
    /// Creates a new PFM reader.
    pub fn new() -> Self {
        Self
    }

    /// Internal read implementation from any buffered source.
    fn read_from<R: BufRead>(&self, reader: &mut R) -> IoResult<PfmImage> {
        let header = PfmHeader::read(reader)?;
        debug!(
            width = header.width,
            height = header.height,
            channels = header.channels,
            scale = header.scale,
            byte_order = %header.byte_order,
            "PFM header"
        );

        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;

        // A partial trailing value is dropped, as a whole-item float read would.
        let available = body.len() / 4;
        let expected = header
            .sample_count()
            .ok_or_else(|| IoError::format("truncated data"))?;
        if available < expected {
            return Err(IoError::format("truncated data"));
        }
        if available > expected {
            return Err(IoError::format("unexpected trailing data"));
        }

        let mut samples = vec![0.0f32; expected];
        let raw = &body[..expected * 4];
        match header.byte_order {
            Endianness::Little => LittleEndian::read_f32_into(raw, &mut samples),
            _ => BigEndian::read_f32_into(raw, &mut samples),
        }

        let samples = flip_v(
            &samples,
            header.width as usize,
            header.height as usize,
            header.channels as usize,
        );

        Ok(PfmImage {
            image: ImageData::from_f32(header.width, header.height, header.channels, samples),
            scale: header.scale,
            byte_order: header.byte_order,
        })
    }
}

impl ImageReader for PfmReader {
    type Output = PfmImage;

    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<PfmImage> {
        let path = path.as_ref();
        trace!(path = %path.display(), "pfm::read");
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_from(&mut reader)
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<PfmImage> {
        let mut cursor = Cursor::new(data);
        self.read_from(&mut cursor)
    }
}

// === Writer Options ===

/// Options for writing PFM files.
///
/// ```rust,ignore
/// use pfm_io::pfm::{Endianness, PfmWriterOptions};
///
/// let options = PfmWriterOptions {
///     scale: 2.0,
///     byte_order: Endianness::Big,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PfmWriterOptions {
    /// Scale factor written to the header. Default: 1.0.
    pub scale: f64,
    /// Body byte order. Default: host order.
    pub byte_order: Endianness,
}

impl Default for PfmWriterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            byte_order: Endianness::Native,
        }
    }
}

// === PfmWriter ===

/// PFM format writer.
///
/// Only f32 buffers with 1 or 3 channels can be written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PfmWriter {
    options: PfmWriterOptions,
}

impl PfmWriter {
    /// Creates a new PFM writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with the given options.
    pub fn with_options(options: PfmWriterOptions) -> Self {
        Self { options }
    }

    /// Internal write implementation to any sink.
    fn write_to<W: Write>(&self, writer: &mut W, image: &ImageData) -> IoResult<()> {
        let (samples, magic) = validate(image)?;

        let flipped = flip_v(
            samples,
            image.width as usize,
            image.height as usize,
            image.channels as usize,
        );

        let little = self.options.byte_order.is_little();
        let scale = if little {
            -self.options.scale
        } else {
            self.options.scale
        };

        writeln!(writer, "{}", magic)?;
        writeln!(writer, "{} {}", image.width, image.height)?;
        writeln!(writer, "{:?}", scale)?;

        let mut body = vec![0u8; flipped.len() * 4];
        if little {
            LittleEndian::write_f32_into(&flipped, &mut body);
        } else {
            BigEndian::write_f32_into(&flipped, &mut body);
        }
        writer.write_all(&body)?;

        Ok(())
    }
}

impl ImageWriter for PfmWriter {
    fn write<P: AsRef<Path>>(&self, path: P, image: &ImageData) -> IoResult<()> {
        let path = path.as_ref();
        trace!(path = %path.display(), "pfm::write");
        // Nothing is created on disk for an image that cannot be stored.
        validate(image)?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, image)?;
        writer.flush()?;
        Ok(())
    }

    fn write_to_memory(&self, image: &ImageData) -> IoResult<Vec<u8>> {
        let (samples, _) = validate(image)?;
        let mut buffer = Vec::with_capacity(samples.len() * 4 + 32);
        self.write_to(&mut buffer, image)?;
        Ok(buffer)
    }
}

// === Convenience Functions ===

/// Decodes a PFM byte stream.
pub fn decode(data: &[u8]) -> IoResult<PfmImage> {
    PfmReader::new().read_from_memory(data)
}

/// Encodes an image as PFM in host byte order.
pub fn encode(image: &ImageData, scale: f64) -> IoResult<Vec<u8>> {
    writer_for(scale).write_to_memory(image)
}

/// Reads a PFM file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PfmImage> {
    PfmReader::new().read(path)
}

/// Writes an image to a PFM file in host byte order.
///
/// For a specific byte order, use [`PfmWriter`] directly.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData, scale: f64) -> IoResult<()> {
    writer_for(scale).write(path, image)
}

fn writer_for(scale: f64) -> PfmWriter {
    PfmWriter::with_options(PfmWriterOptions {
        scale,
        ..Default::default()
    })
}

// === Internal Helpers ===

/// Checks that `image` is storable as PFM, returning its samples and magic line.
fn validate(image: &ImageData) -> IoResult<(&[f32], &'static str)> {
    let samples = match &image.data {
        PixelData::F32(data) => data.as_slice(),
        other => return Err(IoError::Type(other.format())),
    };

    let magic = match image.channels {
        3 => COLOR_MAGIC,
        1 => GRAY_MAGIC,
        _ => return Err(IoError::Shape(SHAPE_MESSAGE.to_string())),
    };

    let expected = image.sample_count().ok_or_else(|| {
        IoError::Shape(format!(
            "{}x{}x{} does not fit in memory",
            image.height, image.width, image.channels
        ))
    })?;
    if samples.len() != expected {
        return Err(IoError::Shape(format!(
            "sample buffer holds {} values, {}x{}x{} needs {}",
            samples.len(),
            image.height,
            image.width,
            image.channels,
            expected
        )));
    }

    Ok((samples, magic))
}

/// Reads one line (newline included) that must be pure ASCII.
fn read_ascii_line<R: BufRead>(reader: &mut R, error: &str) -> IoResult<String> {
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf)?;
    if !buf.is_ascii() {
        return Err(IoError::format(error));
    }
    String::from_utf8(buf).map_err(|_| IoError::format(error))
}

fn parse_dimensions(line: &str) -> Option<(u32, u32)> {
    let caps = DIMENSIONS.captures(line)?;
    let width = caps.get(1)?.as_str().parse().ok()?;
    let height = caps.get(2)?.as_str().parse().ok()?;
    Some((width, height))
}

// === Tests ===
