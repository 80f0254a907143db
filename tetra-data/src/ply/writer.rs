//! ASCII PLY export

use crate::error::{DataError, DataResult};
use glam::DVec3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Write points and triangles as ASCII PLY 1.0.
///
/// Vertices carry `x y z` float properties; faces use a
/// `uchar int vertex_indices` list, always prefixed with `3`.
pub fn write_ascii_ply<W: Write>(
    mut writer: W,
    points: &[DVec3],
    faces: &[[usize; 3]],
) -> std::io::Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", points.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for p in points {
        writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    for [a, b, c] in faces {
        writeln!(writer, "3 {} {} {}", a, b, c)?;
    }

    writer.flush()
}

/// Create `path` and write the mesh into it.
pub fn write_ascii_ply_file(
    path: impl AsRef<Path>,
    points: &[DVec3],
    faces: &[[usize; 3]],
) -> DataResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DataError::create(path, e))?;
    write_ascii_ply(BufWriter::new(file), points, faces)?;
    debug!(
        "Wrote {} vertices and {} faces to {}",
        points.len(),
        faces.len(),
        path.display()
    );
    Ok(())
}
