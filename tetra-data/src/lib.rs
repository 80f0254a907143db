//! Tetra Data Crate
//!
//! Mesh loading, tetrahedralization and export for the tetra command-line tools.
//! The meshing algorithm itself lives in TetGen; this crate shapes its input
//! and serializes its output.

pub mod braces;
pub mod convert;
pub mod error;
pub mod faces;
pub mod ply;
pub mod tetgen;
pub mod types;

pub use braces::{count_braces, count_braces_in_file};
pub use convert::{ConversionReport, ConvertRequest, Stage, convert, DEFAULT_OUTPUT, DEFAULT_SWITCHES};
pub use error::{DataError, DataResult};
pub use faces::FaceExport;
pub use ply::{load_surface_mesh, write_ascii_ply_file};
pub use tetgen::{TetOptions, TetgenCommand, Tetrahedralizer};
pub use types::{SurfaceMesh, TetMesh};
