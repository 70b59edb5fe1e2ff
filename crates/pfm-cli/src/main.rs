//! pfm - Portable Float Map command-line tool
//!
//! Converts TIFF images to PFM and inspects PFM files.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pfm_io::Endianness;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "pfm")]
#[command(author, version, about = "Portable Float Map conversion and inspection")]
#[command(long_about = "
Reads and writes Portable Float Map (PFM) images and converts TIFF files to PFM.

Examples:
  pfm batch scans/ pfm/                 # Convert every .tif/.tiff in scans/
  pfm batch scans/ pfm/ --scale 0.5 --byte-order big
  pfm convert depth.tiff depth.pfm      # Convert a single file
  pfm info disp0.pfm --stats            # Show header and sample stats

Log filtering follows RUST_LOG (e.g. RUST_LOG=pfm_io=debug).
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every TIFF in a directory to PFM
    #[command(visible_alias = "b")]
    Batch(BatchArgs),

    /// Convert a single TIFF file to PFM
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Display PFM header information
    #[command(visible_alias = "i")]
    Info(InfoArgs),
}

/// Options shared by the commands that write PFM files.
#[derive(Args, Clone, Copy)]
struct EncodeArgs {
    /// Scale factor written to the PFM header
    #[arg(short, long, default_value = "1.0", allow_negative_numbers = true)]
    scale: f64,

    /// Body byte order: native, little, big
    #[arg(short, long = "byte-order", default_value = "native")]
    byte_order: Endianness,
}

/// Arguments for the `batch` command.
#[derive(Args)]
struct BatchArgs {
    /// Directory containing .tif/.tiff files
    input_dir: PathBuf,

    /// Output directory (created if absent)
    output_dir: PathBuf,

    #[command(flatten)]
    encode: EncodeArgs,
}

/// Arguments for the `convert` command.
#[derive(Args)]
struct ConvertArgs {
    /// Input TIFF image
    input: PathBuf,

    /// Output PFM image
    output: PathBuf,

    #[command(flatten)]
    encode: EncodeArgs,
}

/// Arguments for the `info` command.
#[derive(Args)]
struct InfoArgs {
    /// Input PFM file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Show min/max/average of the samples
    #[arg(short, long)]
    stats: bool,
}

impl From<EncodeArgs> for pfm_io::batch::BatchOptions {
    fn from(args: EncodeArgs) -> Self {
        Self {
            scale: args.scale,
            byte_order: args.byte_order,
        }
    }
}

/// Initializes the tracing subscriber.
///
/// The returned guard flushes the log file on drop and must outlive `main`'s work.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_filter = if verbose {
        "pfm_io=debug,pfm=debug"
    } else {
        "pfm_io=info,pfm=info"
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log.as_deref())?;

    match cli.command {
        Commands::Batch(args) => commands::batch::run(args, cli.verbose),
        Commands::Convert(args) => commands::convert::run(args, cli.verbose),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
    }
}
