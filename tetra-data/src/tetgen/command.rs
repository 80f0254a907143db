//! Process backend that runs the `tetgen` executable.

use super::files::{parse_elements, parse_faces, parse_nodes};
use super::{TetOptions, Tetrahedralizer};
use crate::error::{DataError, DataResult};
use crate::ply::write_ascii_ply_file;
use crate::types::{SurfaceMesh, TetMesh};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

const INPUT_STEM: &str = "input";

/// Runs TetGen as a child process inside a scratch directory.
///
/// The surface is handed over as `input.ply`; TetGen's `input.1.node`,
/// `input.1.ele` and (when present) `input.1.face` are read back.
#[derive(Debug, Clone)]
pub struct TetgenCommand {
    program: PathBuf,
}

impl TetgenCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The full switch argument passed to TetGen.
    ///
    /// `z` keeps output indices zero-based; `Q` silences TetGen unless the
    /// caller asked for verbose or quiet output already.
    pub fn switches(options: &TetOptions) -> String {
        let quiet = if options.verbose || options.quiet { "" } else { "Q" };
        format!("-{}z{}", options, quiet)
    }

    fn read_output(dir: &Path, suffix: &str) -> DataResult<Option<(String, String)>> {
        let name = format!("{}.1.{}", INPUT_STEM, suffix);
        let path = dir.join(&name);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|e| DataError::open(&path, e))?;
        Ok(Some((name, text)))
    }
}

impl Default for TetgenCommand {
    fn default() -> Self {
        Self::new("tetgen")
    }
}

impl Tetrahedralizer for TetgenCommand {
    #[tracing::instrument(skip_all, fields(program = %self.program.display()))]
    fn tetrahedralize(&self, surface: &SurfaceMesh, options: &TetOptions) -> DataResult<TetMesh> {
        let workdir = tempfile::Builder::new().prefix("tetra-").tempdir()?;
        let input = workdir.path().join(format!("{}.ply", INPUT_STEM));
        write_ascii_ply_file(&input, &surface.points, &surface.faces)?;

        let switches = Self::switches(options);
        info!(
            "Running {} {} on {} points, {} faces",
            self.program.display(),
            switches,
            surface.point_count(),
            surface.face_count()
        );

        let output = Command::new(&self.program)
            .arg(&switches)
            .arg(&input)
            .current_dir(workdir.path())
            .output()
            .map_err(|e| {
                DataError::Engine(format!("failed to run {}: {}", self.program.display(), e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            debug!("tetgen stdout: {}", stdout.trim());
        }
        if !output.status.success() {
            // TetGen reports most input errors on stdout
            let detail = [stderr.trim(), stdout.trim()]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or("no output");
            warn!("tetgen exited with {}", output.status);
            return Err(DataError::Engine(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                detail
            )));
        }

        let dir = workdir.path();
        let missing = |suffix: &str| {
            DataError::Engine(format!(
                "{} produced no {}.1.{}",
                self.program.display(),
                INPUT_STEM,
                suffix
            ))
        };
        let (node_name, node_text) = Self::read_output(dir, "node")?.ok_or_else(|| missing("node"))?;
        let (ele_name, ele_text) = Self::read_output(dir, "ele")?.ok_or_else(|| missing("ele"))?;

        let (points, base) = parse_nodes(&node_name, &node_text)?;
        let tetrahedra = parse_elements(&ele_name, &ele_text, base)?;
        let boundary = match Self::read_output(dir, "face")? {
            Some((name, text)) => parse_faces(&name, &text, base)?,
            None => {
                debug!("No face file written, boundary left empty");
                Vec::new()
            }
        };

        let mesh = TetMesh::new(points, tetrahedra, boundary);
        mesh.validate()?;
        info!(
            "TetGen produced {} points, {} tetrahedra, {} boundary triangles",
            mesh.point_count(),
            mesh.tetrahedron_count(),
            mesh.boundary_count()
        );
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn unit_tet_surface() -> SurfaceMesh {
        SurfaceMesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
    }

    #[test]
    fn test_switches() {
        assert_eq!(TetgenCommand::switches(&TetOptions::quality_preset()), "-pqa200zQ");
        assert_eq!(TetgenCommand::switches(&TetOptions::default()), "-zQ");
        let verbose = TetOptions::parse("pV").unwrap();
        assert_eq!(TetgenCommand::switches(&verbose), "-pVz");
    }

    #[test]
    fn test_default_program() {
        assert_eq!(TetgenCommand::default().program(), Path::new("tetgen"));
    }

    // Kept in one test so no other thread forks while a script is being written.
    #[cfg(unix)]
    #[test]
    fn test_process_backend_with_stand_in_program() {
        use std::os::unix::fs::PermissionsExt;

        let bin = tempfile::tempdir().unwrap();
        let install = |name: &str, body: &str| {
            let path = bin.path().join(name);
            fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        };

        // Echoes the input surface back as one tetrahedron plus its hull.
        let good = install(
            "tetgen-ok",
            r#"[ "$1" = "-pqa200zQ" ] || { echo "unexpected switches $1" >&2; exit 3; }
grep -q "element vertex 4" "$2" || exit 4
out="${2%.ply}.1"
printf '4 3 0 0\n0 0 0 0\n1 1 0 0\n2 0 1 0\n3 0 0 1\n' > "$out.node"
printf '1 4 0\n0 0 1 2 3\n' > "$out.ele"
printf '4 0\n0 0 2 1\n1 0 1 3\n2 0 3 2\n3 1 2 3\n' > "$out.face"
"#,
        );
        let mesh = TetgenCommand::new(&good)
            .tetrahedralize(&unit_tet_surface(), &TetOptions::quality_preset())
            .unwrap();
        assert_eq!(mesh.point_count(), 4);
        assert_eq!(mesh.tetrahedra, vec![[0, 1, 2, 3]]);
        assert_eq!(mesh.boundary_count(), 4);

        let failing = install("tetgen-fail", "echo 'Error: self-intersecting facets' >&2\nexit 1\n");
        let err = TetgenCommand::new(&failing)
            .tetrahedralize(&unit_tet_surface(), &TetOptions::default())
            .unwrap_err();
        assert!(matches!(err, DataError::Engine(_)));
        assert!(err.to_string().contains("self-intersecting"));

        let silent = install("tetgen-silent", "exit 0\n");
        let err = TetgenCommand::new(&silent)
            .tetrahedralize(&unit_tet_surface(), &TetOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("input.1.node"));

        let out_of_range = install(
            "tetgen-bad",
            r#"out="${2%.ply}.1"
printf '1 3 0 0\n0 0 0 0\n' > "$out.node"
printf '1 4 0\n0 0 1 2 3\n' > "$out.ele"
"#,
        );
        let err = TetgenCommand::new(&out_of_range)
            .tetrahedralize(&unit_tet_surface(), &TetOptions::default())
            .unwrap_err();
        assert!(matches!(err, DataError::IndexOutOfBounds { .. }));

        let err = TetgenCommand::new(bin.path().join("does-not-exist"))
            .tetrahedralize(&unit_tet_surface(), &TetOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("failed to run"));
    }
}
