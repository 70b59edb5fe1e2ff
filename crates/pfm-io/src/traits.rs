//! I/O traits for image readers and writers.
//!
//! These traits define the interface shared by the PFM codec and the TIFF
//! reader glue.

use crate::{ImageData, IoResult};
use std::path::Path;

/// Trait for image format readers.
///
/// # Example
///
/// ```rust,ignore
/// use pfm_io::{ImageReader, pfm::PfmReader};
///
/// let decoded = PfmReader::new().read("disparity.pfm")?;
/// println!("scale = {}", decoded.scale);
/// ```
pub trait ImageReader {
    /// Value produced by a successful read.
    type Output;

    /// Reads an image from a file path.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<Self::Output>;

    /// Reads an image from memory.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<Self::Output>;
}

/// Trait for image format writers.
pub trait ImageWriter {
    /// Writes an image to a file path.
    fn write<P: AsRef<Path>>(&self, path: P, image: &ImageData) -> IoResult<()>;

    /// Writes an image to memory.
    fn write_to_memory(&self, image: &ImageData) -> IoResult<Vec<u8>>;
}
