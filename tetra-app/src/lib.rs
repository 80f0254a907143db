//! Tetra Application
//!
//! Command-line front ends for the tetra tools:
//! - `brace-count`: tally `{` characters in a JSON-like vertex dump
//! - `tetra-convert`: PLY surface mesh to tetrahedral PLY via TetGen

mod app;

pub use app::{AppError, ConvertConfig, LoggingConfig, parse_args};
