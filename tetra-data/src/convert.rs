//! Surface PLY to tetrahedral PLY conversion pipeline.

use crate::error::DataResult;
use crate::faces::FaceExport;
use crate::ply::{load_surface_mesh, write_ascii_ply_file};
use crate::tetgen::{TetOptions, Tetrahedralizer};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default destination when the caller does not name one.
pub const DEFAULT_OUTPUT: &str = "models/ply/tetgen_output.ply";

/// Default TetGen switches: PLC input, quality bound, volume cap of 200.
pub const DEFAULT_SWITCHES: &str = "pqa200";

/// One conversion job.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: TetOptions,
    pub mode: FaceExport,
}

impl ConvertRequest {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            options: TetOptions::quality_preset(),
            mode: FaceExport::default(),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_options(mut self, options: TetOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_mode(mut self, mode: FaceExport) -> Self {
        self.mode = mode;
        self
    }
}

/// Milestones reported while a conversion runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage<'a> {
    Loaded { points: usize, faces: usize },
    Meshed { points: usize, tetrahedra: usize, boundary: usize },
    Written { path: &'a Path, faces: usize },
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub switches: String,
    pub mode: FaceExport,
    pub input_points: usize,
    pub input_faces: usize,
    pub output_points: usize,
    pub tetrahedra: usize,
    pub boundary_triangles: usize,
    pub faces_written: usize,
}

/// Load `request.input`, tetrahedralize it with `engine` and write the result.
///
/// `on_stage` is called after each step succeeds. The first failing step
/// aborts the conversion; nothing is written unless meshing succeeded.
#[tracing::instrument(skip_all, fields(input = %request.input.display()))]
pub fn convert<E, F>(request: &ConvertRequest, engine: &E, mut on_stage: F) -> DataResult<ConversionReport>
where
    E: Tetrahedralizer + ?Sized,
    F: FnMut(Stage<'_>),
{
    let surface = load_surface_mesh(&request.input)?;
    on_stage(Stage::Loaded {
        points: surface.point_count(),
        faces: surface.source_face_count(),
    });

    let volume = engine.tetrahedralize(&surface, &request.options)?;
    on_stage(Stage::Meshed {
        points: volume.point_count(),
        tetrahedra: volume.tetrahedron_count(),
        boundary: volume.boundary_count(),
    });

    let faces = request.mode.faces(&volume);
    write_ascii_ply_file(&request.output, &volume.points, &faces)?;
    on_stage(Stage::Written {
        path: &request.output,
        faces: faces.len(),
    });

    info!(
        "Converted {} -> {} ({} mode, {} faces)",
        request.input.display(),
        request.output.display(),
        request.mode,
        faces.len()
    );

    Ok(ConversionReport {
        input: request.input.clone(),
        output: request.output.clone(),
        switches: request.options.to_string(),
        mode: request.mode,
        input_points: surface.point_count(),
        input_faces: surface.source_face_count(),
        output_points: volume.point_count(),
        tetrahedra: volume.tetrahedron_count(),
        boundary_triangles: volume.boundary_count(),
        faces_written: faces.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::types::{SurfaceMesh, TetMesh};
    use glam::DVec3;
    use std::cell::RefCell;
    use std::fs;

    const TETRA_PLY: &str = "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
element face 4
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
0 0 1
3 0 2 1
3 0 1 3
3 0 3 2
3 1 2 3
";

    const CUBE_PLY: &str = "ply
format ascii 1.0
element vertex 8
property float x
property float y
property float z
element face 6
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
1 1 0
0 1 0
0 0 1
1 0 1
1 1 1
0 1 1
4 0 3 2 1
4 4 5 6 7
4 0 1 5 4
4 1 2 6 5
4 2 3 7 6
4 3 0 4 7
";

    /// Returns the input points, one tetrahedron and the surface triangles as boundary.
    struct Echo {
        faces_seen: RefCell<usize>,
    }

    impl Tetrahedralizer for Echo {
        fn tetrahedralize(&self, surface: &SurfaceMesh, _: &TetOptions) -> DataResult<TetMesh> {
            *self.faces_seen.borrow_mut() = surface.face_count();
            Ok(TetMesh::new(
                surface.points.clone(),
                vec![[0, 1, 3, 4]],
                surface.faces.clone(),
            ))
        }
    }

    /// Like `CentroidSplit`, but reports no boundary triangles.
    struct NoBoundary;

    impl Tetrahedralizer for NoBoundary {
        fn tetrahedralize(&self, surface: &SurfaceMesh, options: &TetOptions) -> DataResult<TetMesh> {
            let mut mesh = CentroidSplit::new().tetrahedralize(surface, options)?;
            mesh.boundary.clear();
            Ok(mesh)
        }
    }

    /// Splits the unit tetrahedron at an interior point into four tetrahedra.
    struct CentroidSplit {
        seen: RefCell<Vec<String>>,
    }

    impl CentroidSplit {
        fn new() -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Tetrahedralizer for CentroidSplit {
        fn tetrahedralize(&self, surface: &SurfaceMesh, options: &TetOptions) -> DataResult<TetMesh> {
            self.seen.borrow_mut().push(options.to_string());
            let mut points = surface.points.clone();
            points.push(DVec3::splat(0.25));
            let tetrahedra = vec![[0, 1, 2, 4], [0, 1, 3, 4], [0, 2, 3, 4], [1, 2, 3, 4]];
            Ok(TetMesh::new(points, tetrahedra, surface.faces.clone()))
        }
    }

    struct Broken;

    impl Tetrahedralizer for Broken {
        fn tetrahedralize(&self, _: &SurfaceMesh, _: &TetOptions) -> DataResult<TetMesh> {
            Err(DataError::Engine("input is not closed".into()))
        }
    }

    fn input_file(dir: &Path) -> PathBuf {
        let path = dir.join("Monke.ply");
        fs::write(&path, TETRA_PLY).unwrap();
        path
    }

    fn body_lines(path: &Path) -> Vec<String> {
        let text = fs::read_to_string(path).unwrap();
        text.split("end_header\n").nth(1).unwrap().lines().map(String::from).collect()
    }

    #[test]
    fn test_boundary_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.ply");
        let request = ConvertRequest::new(input_file(dir.path())).with_output(&output);
        let engine = CentroidSplit::new();

        let mut stages = Vec::new();
        let report = convert(&request, &engine, |stage| stages.push(format!("{:?}", stage))).unwrap();

        assert_eq!(engine.seen.borrow().as_slice(), ["pqa200"]);
        assert_eq!(report.input_points, 4);
        assert_eq!(report.input_faces, 4);
        assert_eq!(report.output_points, 5);
        assert_eq!(report.tetrahedra, 4);
        assert_eq!(report.faces_written, 4);
        assert_eq!(stages.len(), 3);

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("element vertex 5\n"));
        assert!(text.contains("element face 4\n"));
        assert_eq!(body_lines(&output).len(), 5 + 4);
    }

    #[test]
    fn test_tet_faces_conversion_writes_four_per_tet() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.ply");
        let request = ConvertRequest::new(input_file(dir.path()))
            .with_output(&output)
            .with_mode(FaceExport::TetFaces)
            .with_options(TetOptions::default());

        let report = convert(&request, &CentroidSplit::new(), |_| {}).unwrap();
        assert_eq!(report.faces_written, 4 * report.tetrahedra);
        assert_eq!(report.switches, "");

        let lines = body_lines(&output);
        let face_lines = lines.iter().filter(|l| l.starts_with("3 ")).count();
        assert_eq!(lines.len(), report.output_points + face_lines);
        assert_eq!(face_lines, 16);
    }

    #[test]
    fn test_missing_input_stops_before_engine() {
        let dir = tempfile::tempdir().unwrap();
        let engine = CentroidSplit::new();
        let request = ConvertRequest::new(dir.path().join("nope.ply")).with_output(dir.path().join("out.ply"));
        let err = convert(&request, &engine, |_| {}).unwrap_err();
        assert!(matches!(err, DataError::Open { .. }));
        assert!(engine.seen.borrow().is_empty());
    }

    #[test]
    fn test_engine_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.ply");
        let request = ConvertRequest::new(input_file(dir.path())).with_output(&output);
        let mut stages = 0;
        let err = convert(&request, &Broken, |_| stages += 1).unwrap_err();
        assert!(matches!(err, DataError::Engine(_)));
        assert_eq!(stages, 1);
        assert!(!output.exists());
    }

    #[test]
    fn test_unwritable_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("no").join("such").join("dir.ply");
        let request = ConvertRequest::new(input_file(dir.path())).with_output(&output);
        let mut written = false;
        let err = convert(&request, &CentroidSplit::new(), |stage| {
            written |= matches!(stage, Stage::Written { .. });
        })
        .unwrap_err();
        assert!(matches!(err, DataError::Create { .. }));
        assert!(!written);
    }

    #[test]
    fn test_quad_mesh_reports_header_face_count() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cube.ply");
        fs::write(&input, CUBE_PLY).unwrap();
        let request = ConvertRequest::new(&input).with_output(dir.path().join("out.ply"));
        let engine = Echo {
            faces_seen: RefCell::new(0),
        };

        let mut loaded = None;
        let report = convert(&request, &engine, |stage| {
            if let Stage::Loaded { points, faces } = stage {
                loaded = Some((points, faces));
            }
        })
        .unwrap();

        assert_eq!(loaded, Some((8, 6)));
        assert_eq!(report.input_points, 8);
        assert_eq!(report.input_faces, 6);
        assert_eq!(*engine.faces_seen.borrow(), 12);
    }

    #[test]
    fn test_derived_boundary_is_counted_when_written() {
        let dir = tempfile::tempdir().unwrap();
        let request = ConvertRequest::new(input_file(dir.path())).with_output(dir.path().join("o.ply"));

        let mut meshed_boundary = None;
        let mut written_faces = None;
        let report = convert(&request, &NoBoundary, |stage| match stage {
            Stage::Meshed { boundary, .. } => meshed_boundary = Some(boundary),
            Stage::Written { faces, .. } => written_faces = Some(faces),
            Stage::Loaded { .. } => {}
        })
        .unwrap();

        assert_eq!(meshed_boundary, Some(0));
        assert_eq!(written_faces, Some(4));
        assert_eq!(report.boundary_triangles, 0);
        assert_eq!(report.faces_written, 4);
    }

    #[test]
    fn test_report_serializes() {
        let dir = tempfile::tempdir().unwrap();
        let request = ConvertRequest::new(input_file(dir.path())).with_output(dir.path().join("o.ply"));
        let report = convert(&request, &CentroidSplit::new(), |_| {}).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "boundary");
        assert_eq!(json["tetrahedra"], 4);
        assert_eq!(json["switches"], "pqa200");
    }
}
