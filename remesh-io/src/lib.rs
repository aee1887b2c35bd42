//! Mesh file I/O for remesh
//!
//! OBJ is the only supported format. A file may hold several objects;
//! [`import_mesh`] returns them separately and [`import_merged`] unions them
//! into the single mesh the reduction pipeline works on.

pub mod error;
pub mod obj;

pub use error::*;
pub use obj::{ObjReader, ObjWriter};

use remesh_core::{Error, PolygonMesh, Result};
use std::path::Path;
use tracing::{debug, info};

/// Supported mesh file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
}

impl MeshFormat {
    /// Detect format from file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "obj" => Some(MeshFormat::Obj),
                _ => None,
            })
    }
}

fn detect(path: &Path) -> Result<MeshFormat> {
    MeshFormat::from_path(path).ok_or_else(|| {
        Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))
    })
}

/// Import every mesh in a file
pub fn import_mesh<P: AsRef<Path>>(path: P) -> Result<Vec<PolygonMesh>> {
    let path = path.as_ref();
    let meshes = match detect(path)? {
        MeshFormat::Obj => ObjReader::read(path)?,
    };
    info!(path = %path.display(), meshes = meshes.len(), "Imported mesh file");
    Ok(meshes)
}

/// Import a file and merge all of its meshes into one.
///
/// The merged mesh keeps the name of the first mesh in the file.
pub fn import_merged<P: AsRef<Path>>(path: P) -> Result<PolygonMesh> {
    let path = path.as_ref();
    let mut meshes = import_mesh(path)?.into_iter();
    let mut merged = meshes.next().ok_or_else(|| {
        Error::InvalidMesh(format!("No mesh objects found in {}", path.display()))
    })?;
    let mut parts = 1;
    for mesh in meshes {
        merged.merge(&mesh);
        parts += 1;
    }
    if parts > 1 {
        debug!(
            name = %merged.name,
            parts,
            faces = merged.face_count(),
            "Merged imported meshes"
        );
    }
    Ok(merged)
}

/// Export a mesh, choosing the format from the path's extension
pub fn export_mesh<P: AsRef<Path>>(path: P, mesh: &PolygonMesh) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        MeshFormat::Obj => ObjWriter::write(path, mesh)?,
    }
    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Exported mesh"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_format_detection() {
        assert_eq!(MeshFormat::from_path(Path::new("a.obj")), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path(Path::new("A.OBJ")), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path(Path::new("a.stl")), None);
        assert_eq!(MeshFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_unsupported_format() {
        assert!(matches!(import_mesh("model.stl"), Err(Error::UnsupportedFormat(_))));
        let mesh = PolygonMesh::new();
        assert!(matches!(export_mesh("model.fbx", &mesh), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_merge_keeps_first_name() {
        let path = std::env::temp_dir().join("remesh_io_merge_test.obj");
        fs::write(
            &path,
            "o base\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no lid\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        )
        .unwrap();

        let merged = import_merged(&path).unwrap();
        assert_eq!(merged.name, "base");
        assert_eq!(merged.face_count(), 2);
        assert_eq!(merged.vertex_count(), 6);
        assert_eq!(merged.faces[1], vec![3, 4, 5]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_file_without_faces() {
        let path = std::env::temp_dir().join("remesh_io_no_faces_test.obj");
        fs::write(&path, "v 0 0 0\nv 1 0 0\n").unwrap();

        assert!(import_mesh(&path).unwrap().is_empty());
        assert!(matches!(import_merged(&path), Err(Error::InvalidMesh(_))));

        let _ = fs::remove_file(path);
    }
}
