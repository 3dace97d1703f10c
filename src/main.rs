//! surfjson -- convert FreeSurfer data files to JSON documents for the brain viewer.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;
use std::process::ExitCode;

use surfjson::{Converter, ConverterConfig};

#[derive(Parser, Debug)]
#[command(name = "surfjson", about = "Convert FreeSurfer data files to JSON format", version)]
struct Cli {
    /// Input directory containing FreeSurfer data
    #[arg(short, long, default_value = "../freesurfer_data")]
    input_dir: PathBuf,

    /// Output directory for JSON files
    #[arg(short, long, default_value = "../public/brain-data")]
    output_dir: PathBuf,

    /// Suppress verbose output
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    if !cli.input_dir.exists() {
        eprintln!("Error: Input directory does not exist: {}", cli.input_dir.display());
        return ExitCode::FAILURE;
    }

    let config = ConverterConfig {
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
    };

    match Converter::new(config).and_then(|converter| converter.convert_all()) {
        Ok(summary) => {
            println!();
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error during conversion: {}", e);
            ExitCode::FAILURE
        }
    }
}
