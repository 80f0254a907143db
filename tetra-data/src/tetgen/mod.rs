//! Tetrahedral meshing.
//!
//! The meshing itself is delegated to TetGen. This module owns the seam
//! (`Tetrahedralizer`), the switch string model and the process backend that
//! shells out to the `tetgen` executable.

mod command;
mod files;
mod options;

pub use command::TetgenCommand;
pub use options::{Quality, TetOptions};

use crate::error::DataResult;
use crate::types::{SurfaceMesh, TetMesh};

/// Anything that can turn a closed surface into tetrahedra.
pub trait Tetrahedralizer {
    /// Mesh the volume bounded by `surface`.
    ///
    /// Implementations return a mesh whose indices are all in bounds.
    fn tetrahedralize(&self, surface: &SurfaceMesh, options: &TetOptions) -> DataResult<TetMesh>;
}
