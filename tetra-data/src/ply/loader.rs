//! PLY surface mesh loading

use crate::error::{DataError, DataResult};
use crate::types::SurfaceMesh;
use glam::DVec3;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

// Both property names are common in the wild
#[derive(Deserialize, Debug)]
struct PlyFace {
    #[serde(alias = "vertex_index")]
    vertex_indices: Vec<i64>,
}

// Rows are maps so that extra vertex properties (normals, colors) are tolerated
#[derive(Deserialize, Debug)]
struct PlyFile {
    #[serde(rename = "vertex")]
    vertex: Vec<HashMap<String, JsonValue>>,
    #[serde(default, rename = "face")]
    face: Vec<PlyFace>,
}

/// Load a triangulated surface mesh from an ASCII or binary PLY file.
///
/// Polygons with more than three corners are fan-triangulated.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_surface_mesh(path: impl AsRef<Path>) -> DataResult<SurfaceMesh> {
    let path = path.as_ref();
    debug!("Loading PLY mesh from: {}", path.display());
    let file = File::open(path).map_err(|e| DataError::open(path, e))?;
    read_surface_mesh(BufReader::new(file), path)
}

/// Parse a surface mesh from an already opened PLY stream.
///
/// `path` is only used to label errors.
pub fn read_surface_mesh<R: BufRead>(reader: R, path: &Path) -> DataResult<SurfaceMesh> {
    let ply_data: PlyFile = serde_ply::from_reader(reader).map_err(|e| {
        warn!("Failed to parse PLY file: {}", e);
        DataError::PlyParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    info!(
        "PLY file parsed: {} vertices, {} faces",
        ply_data.vertex.len(),
        ply_data.face.len()
    );

    fn get_f64(prop: Option<&JsonValue>) -> Option<f64> {
        prop.and_then(JsonValue::as_f64)
    }

    let missing = |axis: &str, i: usize| DataError::PlyParse {
        path: path.to_path_buf(),
        message: format!("Missing '{}' at vertex {}", axis, i),
    };

    let mut points = Vec::with_capacity(ply_data.vertex.len());
    for (i, vertex) in ply_data.vertex.iter().enumerate() {
        let x = get_f64(vertex.get("x")).ok_or_else(|| missing("x", i))?;
        let y = get_f64(vertex.get("y")).ok_or_else(|| missing("y", i))?;
        let z = get_f64(vertex.get("z")).ok_or_else(|| missing("z", i))?;
        points.push(DVec3::new(x, y, z));
    }

    let mut faces = Vec::with_capacity(ply_data.face.len());
    for (index, face) in ply_data.face.iter().enumerate() {
        let corners = &face.vertex_indices;
        if corners.len() < 3 {
            return Err(DataError::InvalidFace {
                index,
                len: corners.len(),
            });
        }

        let mut resolved = Vec::with_capacity(corners.len());
        for &value in corners {
            if value < 0 || value as usize >= points.len() {
                return Err(DataError::IndexOutOfBounds {
                    element: "face",
                    index,
                    value,
                    points: points.len(),
                });
            }
            resolved.push(value as usize);
        }

        for k in 1..resolved.len() - 1 {
            faces.push([resolved[0], resolved[k], resolved[k + 1]]);
        }
    }

    if faces.len() != ply_data.face.len() {
        debug!(
            "Fan-triangulated {} polygons into {} triangles",
            ply_data.face.len(),
            faces.len()
        );
    }

    Ok(SurfaceMesh::new(points, faces).with_source_faces(ply_data.face.len()))
}
