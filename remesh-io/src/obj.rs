//! OBJ format support
//!
//! Reading goes through the `obj` crate and yields one mesh per object that
//! has faces. Writing emits `o`, `v`, optional `vn`, `s` and `f` records.

use crate::error::IoError;
use remesh_core::{Point3f, PolygonMesh, Shading};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, warn};

pub struct ObjReader;
pub struct ObjWriter;

impl ObjReader {
    /// Read every object with at least one face from an OBJ file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<PolygonMesh>, IoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file), &path.display().to_string())
    }

    /// Parse OBJ data from any reader; `source` is only used in messages
    pub fn read_from<R: Read>(reader: R, source: &str) -> Result<Vec<PolygonMesh>, IoError> {
        let data = obj::ObjData::load_buf(reader).map_err(|e| IoError::ParseError {
            path: source.to_string(),
            message: e.to_string(),
        })?;

        let mut meshes = Vec::new();
        for object in &data.objects {
            let mut mesh = PolygonMesh::new().with_name(object.name.clone());
            let mut local: HashMap<usize, usize> = HashMap::new();

            for group in &object.groups {
                for poly in &group.polys {
                    if poly.0.len() < 3 {
                        warn!(object = %object.name, corners = poly.0.len(), "Skipping degenerate face");
                        continue;
                    }
                    let mut face = Vec::with_capacity(poly.0.len());
                    for tuple in &poly.0 {
                        let global = tuple.0;
                        let position = data.position.get(global).ok_or_else(|| IoError::ParseError {
                            path: source.to_string(),
                            message: format!("vertex index {} out of range", global + 1),
                        })?;
                        let index = *local
                            .entry(global)
                            .or_insert_with(|| mesh.add_vertex(Point3f::new(position[0], position[1], position[2])));
                        face.push(index);
                    }
                    mesh.add_face(face);
                }
            }

            if mesh.face_count() == 0 {
                debug!(object = %object.name, "Object has no faces, skipped");
                continue;
            }
            debug!(
                object = %mesh.name,
                vertices = mesh.vertex_count(),
                faces = mesh.face_count(),
                "Read OBJ object"
            );
            meshes.push(mesh);
        }

        Ok(meshes)
    }
}

impl ObjWriter {
    /// Write a single mesh as one OBJ object
    pub fn write<P: AsRef<Path>>(path: P, mesh: &PolygonMesh) -> Result<(), IoError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        Self::write_to(&mut writer, mesh)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write>(writer: &mut W, mesh: &PolygonMesh) -> Result<(), IoError> {
        mesh.validate().map_err(|e| IoError::WriteError {
            message: e.to_string(),
        })?;

        let name = if mesh.name.is_empty() { "mesh" } else { mesh.name.as_str() };
        writeln!(writer, "o {}", name)?;

        for v in &mesh.vertices {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }

        let normals = mesh
            .normals
            .as_ref()
            .filter(|n| n.len() == mesh.vertex_count());
        if let Some(normals) = normals {
            for n in normals {
                writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
            }
        }

        match mesh.shading {
            Shading::Smooth => writeln!(writer, "s 1")?,
            Shading::Flat => writeln!(writer, "s off")?,
        }

        for face in &mesh.faces {
            write!(writer, "f")?;
            for &i in face {
                if normals.is_some() {
                    write!(writer, " {}//{}", i + 1, i + 1)?;
                } else {
                    write!(writer, " {}", i + 1)?;
                }
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}
