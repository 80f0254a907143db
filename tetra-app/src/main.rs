//! tetra-convert
//!
//! Turns a PLY surface mesh into a tetrahedral mesh with TetGen and writes the
//! result as ASCII PLY.

use clap::Parser;
use std::path::PathBuf;
use tetra_app::{AppError, ConvertConfig, LoggingConfig, parse_args};
use tetra_data::{
    ConvertRequest, DEFAULT_OUTPUT, DEFAULT_SWITCHES, FaceExport, Stage, TetOptions, TetgenCommand,
    convert,
};
use tracing::info;

/// Tetra - PLY surface to tetrahedral mesh converter
#[derive(Parser, Debug)]
#[command(name = "tetra-convert")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the PLY surface mesh
    input: PathBuf,

    /// Where to write the converted mesh
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// TetGen switches, e.g. "pqa200" (may be empty). Numbers may use
    /// exponents ("a1e-3"); switches other than p, q, a, Y, A, V, Q are
    /// passed to TetGen unchecked

    #[arg(short, long, default_value = DEFAULT_SWITCHES, allow_hyphen_values = true)]
    switches: String,

    /// Faces to export (boundary, tet-faces)
    #[arg(short, long, default_value = "boundary")]
    mode: FaceExport,

    /// TetGen executable
    #[arg(long, default_value = "tetgen")]
    tetgen: PathBuf,

    /// Also print the conversion report as JSON
    #[arg(long)]
    json: bool,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Stream spans to a Tracy profiler
    #[cfg(feature = "tracy")]
    #[arg(long)]
    tracy: bool,
}

impl Args {
    fn logging(&self) -> LoggingConfig {
        let logging = LoggingConfig::with_level(&self.log_level);
        #[cfg(feature = "tracy")]
        let logging = logging.with_tracy(self.tracy);
        logging
    }
}

impl From<Args> for ConvertConfig {
    fn from(args: Args) -> Self {
        Self {
            output: args.output,
            switches: args.switches,
            mode: args.mode,
            tetgen: args.tetgen,
            json: args.json,
            ..ConvertConfig::new(args.input)
        }
    }
}

fn run(config: &ConvertConfig) -> Result<(), AppError> {
    println!("Processing file: {}", config.input.display());

    let options = TetOptions::parse(&config.switches)?;
    let request = ConvertRequest::new(&config.input)
        .with_output(&config.output)
        .with_options(options)
        .with_mode(config.mode);
    let engine = TetgenCommand::new(&config.tetgen);
    info!(
        "Using {} with switches \"{}\" ({} faces)",
        engine.program().display(),
        request.options,
        config.mode
    );

    let report = convert(&request, &engine, |stage| match stage {
        Stage::Loaded { points, faces } => {
            println!("Loaded {} points and {} faces", points, faces);
        }
        Stage::Meshed {
            points,
            tetrahedra,
            boundary,
        } => {
            println!(
                "Tetrahedralization produced {} points, {} tetrahedra, {} boundary triangles",
                points, tetrahedra, boundary
            );
        }
        Stage::Written { path, faces } => println!("Wrote {} ({} faces)", path.display(), faces),
    })?;

    if config.json {
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}

fn main() {
    let args: Args = parse_args();
    args.logging().init();

    let config = ConvertConfig::from(args);
    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
