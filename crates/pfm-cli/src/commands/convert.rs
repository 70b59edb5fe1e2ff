//! Single-file TIFF to PFM conversion command.

use crate::ConvertArgs;
use anyhow::{Context, Result};
use pfm_io::batch::{BatchOptions, convert_file};
use tracing::trace;

/// Runs the convert command.
pub fn run(args: ConvertArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "convert::run");

    let options = BatchOptions::from(args.encode);
    convert_file(&args.input, &args.output, &options)
        .with_context(|| format!("Failed to convert: {}", args.input.display()))?;

    if verbose {
        println!("Written PFM file: {}", args.output.display());
    }

    Ok(())
}
