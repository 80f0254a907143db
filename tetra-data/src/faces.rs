//! Face enumeration for exporting tetrahedral meshes as triangle soups.

use crate::types::TetMesh;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which triangles of a tetrahedral mesh end up in the exported PLY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaceExport {
    /// Only triangles on the domain boundary.
    #[default]
    Boundary,
    /// All four faces of every tetrahedron. Internal faces appear twice.
    TetFaces,
}

impl FaceExport {
    pub fn as_str(self) -> &'static str {
        match self {
            FaceExport::Boundary => "boundary",
            FaceExport::TetFaces => "tet-faces",
        }
    }

    /// Produce the triangles to write for `mesh`.
    pub fn faces(self, mesh: &TetMesh) -> Vec<[usize; 3]> {
        match self {
            FaceExport::Boundary if mesh.boundary.is_empty() && !mesh.tetrahedra.is_empty() => {
                debug!("Engine returned no boundary, deriving it from tetrahedra");
                boundary_from_tetrahedra(&mesh.tetrahedra)
            }
            FaceExport::Boundary => mesh.boundary.clone(),
            FaceExport::TetFaces => tetrahedron_faces(&mesh.tetrahedra),
        }
    }
}

impl fmt::Display for FaceExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaceExport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boundary" => Ok(FaceExport::Boundary),
            "tet-faces" | "all" => Ok(FaceExport::TetFaces),
            other => Err(format!(
                "unknown face export mode '{}', expected boundary or tet-faces",
                other
            )),
        }
    }
}

/// The four faces of a tetrahedron `[a, b, c, d]`.
pub fn faces_of(tet: [usize; 4]) -> [[usize; 3]; 4] {
    let [a, b, c, d] = tet;
    [[a, b, c], [a, b, d], [a, c, d], [b, c, d]]
}

/// Every face of every tetrahedron, in tetrahedron order, without deduplication.
pub fn tetrahedron_faces(tetrahedra: &[[usize; 4]]) -> Vec<[usize; 3]> {
    tetrahedra.iter().flat_map(|&t| faces_of(t)).collect()
}

/// Faces owned by exactly one tetrahedron, in first-occurrence order.
pub fn boundary_from_tetrahedra(tetrahedra: &[[usize; 4]]) -> Vec<[usize; 3]> {
    let mut uses: HashMap<[usize; 3], usize> = HashMap::new();
    for face in tetrahedron_faces(tetrahedra) {
        *uses.entry(sorted(face)).or_default() += 1;
    }

    tetrahedron_faces(tetrahedra)
        .into_iter()
        .filter(|&face| uses[&sorted(face)] == 1)
        .collect()
}

fn sorted(mut face: [usize; 3]) -> [usize; 3] {
    face.sort_unstable();
    face
}
