//! Directory-wide TIFF to PFM conversion.
//!
//! Every `.tiff` / `.tif` entry of the input directory is decoded, cast to
//! f32 and written as `<stem>.pfm` into the output directory. A file that
//! cannot be converted is logged and skipped; it never stops the batch.
//!
//! # Example
//!
//! ```rust,ignore
//! use pfm_io::batch::{convert_dir, BatchOptions};
//!
//! let report = convert_dir("scans", "pfm", &BatchOptions::default())?;
//! println!("{} converted, {} skipped", report.converted.len(), report.skipped.len());
//! ```

use crate::pfm::{PfmWriter, PfmWriterOptions};
use crate::tiff::TiffReader;
use crate::{Endianness, ImageReader, ImageWriter, IoResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, trace, warn};

/// File name suffixes picked up by [`convert_dir`] (case-sensitive).
pub const TIFF_SUFFIXES: &[&str] = &[".tiff", ".tif"];

/// Options for a batch run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOptions {
    /// Scale written to every PFM header. Default: 1.0.
    pub scale: f64,
    /// Body byte order of the written files. Default: host order.
    pub byte_order: Endianness,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            byte_order: Endianness::Native,
        }
    }
}

impl From<BatchOptions> for PfmWriterOptions {
    fn from(options: BatchOptions) -> Self {
        Self {
            scale: options.scale,
            byte_order: options.byte_order,
        }
    }
}

/// A candidate file that was not converted.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    /// Input file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// PFM files written, in processing order.
    pub converted: Vec<PathBuf>,
    /// TIFF candidates that failed to convert.
    pub skipped: Vec<SkippedFile>,
}

impl BatchReport {
    /// Total number of TIFF candidates seen.
    pub fn total(&self) -> usize {
        self.converted.len() + self.skipped.len()
    }
}

/// Returns true if `name` ends in one of [`TIFF_SUFFIXES`].
pub fn is_tiff_name(name: &str) -> bool {
    TIFF_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Returns the PFM path for a TIFF input: same stem, `.pfm` extension.
pub fn pfm_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.pfm", stem))
}

/// Converts a single TIFF file into a PFM file.
pub fn convert_file(input: &Path, output: &Path, options: &BatchOptions) -> IoResult<()> {
    trace!(input = %input.display(), output = %output.display(), "batch::convert_file");
    let image = TiffReader::new().read(input)?.into_f32();
    PfmWriter::with_options((*options).into()).write(output, &image)?;
    info!(path = %output.display(), "Written PFM file");
    Ok(())
}

/// Converts every TIFF in `input_dir` into a PFM file in `output_dir`.
///
/// `output_dir` is created if absent. Entries are processed in file name
/// order. Errors listing the input or creating the output directory are
/// returned; per-file errors end up in [`BatchReport::skipped`].
pub fn convert_dir<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
) -> IoResult<BatchReport> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();
    trace!(input = %input_dir.display(), output = %output_dir.display(), "batch::convert_dir");

    fs::create_dir_all(output_dir)?;

    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if is_tiff_name(&name) {
            names.push(name);
        }
    }
    names.sort();

    info!(files = names.len(), input = %input_dir.display(), "Starting batch conversion");

    let mut report = BatchReport::default();
    for name in names {
        let input = input_dir.join(&name);
        let output = pfm_path_for(&input, output_dir);

        match convert_file(&input, &output, options) {
            Ok(()) => report.converted.push(output),
            Err(e) => {
                warn!(path = %input.display(), error = %e, "Skipping file");
                report.skipped.push(SkippedFile {
                    path: input,
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        converted = report.converted.len(),
        skipped = report.skipped.len(),
        "Batch conversion complete"
    );
    Ok(report)
}
