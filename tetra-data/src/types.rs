//! Core mesh types shared by the loader, the meshing engines and the exporter.
//!
//! Elements reference points by zero-based index into the owning mesh's
//! point list.

use crate::error::{DataError, DataResult};
use glam::DVec3;

/// A triangulated surface mesh, as loaded from a PLY file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    /// Point positions in file order.
    pub points: Vec<DVec3>,
    /// Triangles as point index triplets.
    pub faces: Vec<[usize; 3]>,
    /// Number of polygons in the source file, before triangulation.
    pub source_faces: usize,
}

impl SurfaceMesh {
    pub fn new(points: Vec<DVec3>, faces: Vec<[usize; 3]>) -> Self {
        let source_faces = faces.len();
        Self {
            points,
            faces,
            source_faces,
        }
    }

    /// Record that `faces` came from `polygons` source polygons.
    pub fn with_source_faces(mut self, polygons: usize) -> Self {
        self.source_faces = polygons;
        self
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Face count as declared by the source file.
    pub fn source_face_count(&self) -> usize {
        self.source_faces
    }

    /// Check that every face index lies within the point list.
    pub fn validate(&self) -> DataResult<()> {
        check_elements("face", &self.faces, self.points.len())
    }
}

/// A volumetric mesh produced by a tetrahedralizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TetMesh {
    /// Point positions in engine order.
    pub points: Vec<DVec3>,
    /// Tetrahedra as point index quadruples.
    pub tetrahedra: Vec<[usize; 4]>,
    /// Triangles lying on the domain boundary.
    pub boundary: Vec<[usize; 3]>,
}

impl TetMesh {
    pub fn new(points: Vec<DVec3>, tetrahedra: Vec<[usize; 4]>, boundary: Vec<[usize; 3]>) -> Self {
        Self {
            points,
            tetrahedra,
            boundary,
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn tetrahedron_count(&self) -> usize {
        self.tetrahedra.len()
    }

    pub fn boundary_count(&self) -> usize {
        self.boundary.len()
    }

    /// Check that every tetrahedron and boundary index lies within the point list.
    pub fn validate(&self) -> DataResult<()> {
        check_elements("tetrahedron", &self.tetrahedra, self.points.len())?;
        check_elements("boundary triangle", &self.boundary, self.points.len())
    }
}

fn check_elements<const N: usize>(
    element: &'static str,
    elements: &[[usize; N]],
    points: usize,
) -> DataResult<()> {
    for (index, indices) in elements.iter().enumerate() {
        if let Some(&value) = indices.iter().find(|&&i| i >= points) {
            return Err(DataError::IndexOutOfBounds {
                element,
                index,
                value: value as i64,
                points,
            });
        }
    }
    Ok(())
}
