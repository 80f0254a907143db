//! PLY file loading and writing

mod loader;
mod writer;

pub use loader::{load_surface_mesh, read_surface_mesh};
pub use writer::{write_ascii_ply, write_ascii_ply_file};
