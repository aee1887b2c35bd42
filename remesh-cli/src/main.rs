//! remesh: batch topology-aware polygon reduction.
//!
//! Every `*.obj` file in the input directory is imported, merged into one
//! mesh, classified and reduced, then written to the output directory
//! together with before/after wireframe previews.
//!
//! # Logging
//!
//! Set `RUST_LOG` to override the `-v` flags:
//! - `RUST_LOG=remesh_decimation=debug` - strategy by strategy progress
//! - `RUST_LOG=remesh_engine=debug` - engine operation details
//!
//! # Example
//!
//! ```bash
//! remesh --input models --output reduced -r 0.6 -v
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use remesh_decimation::{parse_target_reduction, ReductionConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod batch;
mod output;

use batch::BatchOptions;

/// remesh - reduce the polygon count of OBJ meshes while respecting their topology.
#[derive(Parser)]
#[command(name = "remesh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the OBJ files to process
    #[arg(long, default_value = "input")]
    input: PathBuf,

    /// Directory for reduced meshes and previews
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Fraction of faces to remove, between 0.0 and 1.0
    #[arg(long, short = 'r')]
    reduction: Option<String>,

    /// Skip the before/after preview images
    #[arg(long)]
    no_preview: bool,

    /// Skip normal recalculation and smooth shading after reduction
    #[arg(long)]
    no_post_process: bool,

    /// Output format for the summary
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short)]
    pub quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over the -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn,remesh=info",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let target = parse_target_reduction(cli.reduction.as_deref());
    let config = ReductionConfig::new(target).with_post_process(!cli.no_post_process);
    let options = BatchOptions {
        input_dir: cli.input.clone(),
        output_dir: cli.output.clone(),
        config,
        preview: !cli.no_preview,
    };

    match batch::run(&options) {
        Ok(summary) => {
            output::print_summary(&summary, cli.format, cli.quiet);
            Ok(())
        }
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
                for cause in e.chain().skip(1) {
                    eprintln!("  Caused by: {}", cause);
                }
            }
            std::process::exit(1);
        }
    }
}
