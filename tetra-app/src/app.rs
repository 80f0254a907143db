//! Shared plumbing for the tetra binaries: configuration, logging and
//! argument handling.

use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;
use tetra_data::{DEFAULT_OUTPUT, DEFAULT_SWITCHES, DataError, FaceExport};
use thiserror::Error;

/// Errors surfaced by the binaries.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
    pub enable_tracy: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            enable_tracy: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    /// Add the Tracy layer on top of the fmt layer. Only takes effect when
    /// built with the `tracy` feature.
    pub fn with_tracy(mut self, enable: bool) -> Self {
        self.enable_tracy = enable;
        self
    }

    /// Install the global subscriber. Logs go to stderr; stdout is reserved
    /// for the tool's report.
    pub fn init(&self) {
        #[cfg(feature = "tracy")]
        {
            if self.enable_tracy {
                use tracing_subscriber::Layer;
                use tracing_subscriber::layer::SubscriberExt;
                use tracing_subscriber::util::SubscriberInitExt;
                tracing_subscriber::registry()
                    .with(tracing_tracy::TracyLayer::default())
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(std::io::stderr)
                            .with_filter(
                                tracing_subscriber::EnvFilter::try_from_default_env()
                                    .unwrap_or_else(|_| self.level.clone().into()),
                            ),
                    )
                    .init();
                return;
            }
        }

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.level)),
            )
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

/// Settings for one `tetra-convert` run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub switches: String,
    pub mode: FaceExport,
    pub tetgen: PathBuf,
    pub json: bool,
}

impl ConvertConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            switches: DEFAULT_SWITCHES.to_string(),
            mode: FaceExport::default(),
            tetgen: PathBuf::from("tetgen"),
            json: false,
        }
    }
}

/// Parse arguments, exiting with status 1 on usage errors.
///
/// clap exits with 2 on bad usage; these tools promise 1. Help and version
/// requests still exit 0.
pub fn parse_args<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            e.print().ok();
            std::process::exit(1);
        }
    }
}
