//! brace-count
//!
//! Counts `{` characters in a JSON-like vertex dump. Each opening brace is
//! taken to start one vertex record.

use clap::Parser;
use std::path::PathBuf;
use tetra_app::{LoggingConfig, parse_args};
use tracing::debug;

/// Count vertex records in a JSON file by tallying opening braces
#[derive(Parser, Debug)]
#[command(name = "brace-count")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to scan, e.g. vertices.json
    file: PathBuf,

    /// Stream spans to a Tracy profiler
    #[cfg(feature = "tracy")]
    #[arg(long)]
    tracy: bool,
}

fn main() {
    let args: Args = parse_args();
    let logging = LoggingConfig::default();
    #[cfg(feature = "tracy")]
    let logging = logging.with_tracy(args.tracy);
    logging.init();
    debug!("Scanning {}", args.file.display());

    match tetra_data::count_braces_in_file(&args.file) {
        Ok(count) => {
            println!("Number of vertices processed: {}", count);
            println!("Processing completed successfully!");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
