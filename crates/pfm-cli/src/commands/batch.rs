//! Batch TIFF to PFM conversion command

use crate::BatchArgs;
use anyhow::{Context, Result};
use pfm_io::batch::{BatchOptions, convert_dir};
use tracing::trace;

/// Runs the batch command.
pub fn run(args: BatchArgs, verbose: bool) -> Result<()> {
    trace!(input = %args.input_dir.display(), output = %args.output_dir.display(), "batch::run");

    let options = BatchOptions::from(args.encode);
    let report = convert_dir(&args.input_dir, &args.output_dir, &options).with_context(|| {
        format!(
            "Failed to convert {} -> {}",
            args.input_dir.display(),
            args.output_dir.display()
        )
    })?;

    if verbose {
        for path in &report.converted {
            println!("Written PFM file: {}", path.display());
        }
    }
    for skipped in &report.skipped {
        eprintln!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    println!(
        "Processed: {} converted, {} skipped",
        report.converted.len(),
        report.skipped.len()
    );

    Ok(())
}
