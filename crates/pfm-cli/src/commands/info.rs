//! PFM info command.
//!
//! Displays the header fields of PFM files and, optionally, sample stats.

use crate::InfoArgs;
use anyhow::{Context, Result};
use pfm_io::PfmImage;
use std::fs;
use std::path::Path;

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    for path in &args.input {
        let file_size = fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?
            .len();
        let decoded = pfm_io::pfm::read(path)
            .with_context(|| format!("Failed to load: {}", path.display()))?;

        print_text(path, &decoded, file_size, args.stats, verbose);

        if args.input.len() > 1 {
            println!();
        }
    }

    Ok(())
}

fn print_text(path: &Path, decoded: &PfmImage, file_size: u64, stats: bool, verbose: bool) {
    let image = &decoded.image;
    println!("{}", path.display());
    println!("  Resolution: {}x{}", image.width, image.height);
    println!(
        "  Channels:   {} ({})",
        image.channels,
        if decoded.is_color() { "color" } else { "grayscale" }
    );
    println!("  Scale:      {}", decoded.scale);
    println!("  Byte order: {}", decoded.byte_order);
    println!("  File size:  {}", super::format_size(file_size));

    if verbose {
        println!("  Pixels:     {}", image.width as u64 * image.height as u64);
        println!("  Samples:    {}", image.data.len());
    }

    if stats {
        let (min, max, avg) = compute_stats(image.as_f32().unwrap_or_default());
        println!("  Min value:  {:.6}", min);
        println!("  Max value:  {:.6}", max);
        println!("  Avg value:  {:.6}", avg);
    }
}

/// Min, max and mean over the finite samples.
fn compute_stats(data: &[f32]) -> (f32, f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    let mut sum = 0.0f64;
    let mut count = 0usize;

    for &v in data.iter().filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
        sum += v as f64;
        count += 1;
    }

    if count == 0 {
        return (0.0, 0.0, 0.0);
    }
    (min, max, (sum / count as f64) as f32)
}
