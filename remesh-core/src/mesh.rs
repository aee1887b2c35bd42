//! Polygon mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shading mode requested for a mesh when it is exported or rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shading {
    #[default]
    Flat,
    Smooth,
}

/// A polygon mesh with vertices and faces of arbitrary arity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonMesh {
    pub name: String,
    pub vertices: Vec<Point3f>,
    pub faces: Vec<Vec<usize>>,
    pub normals: Option<Vec<Vector3f>>,
    pub shading: Shading,
}

impl PolygonMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            name: String::new(),
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
            shading: Shading::Flat,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<Vec<usize>>) -> Self {
        Self {
            vertices,
            faces,
            ..Self::new()
        }
    }

    /// Set the mesh name, builder style
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: Vec<usize>) {
        self.faces.push(face);
    }

    /// Check that the mesh is a usable polygonal mesh.
    ///
    /// A mesh without faces, a face with fewer than three corners or a face
    /// referencing a missing vertex makes the mesh invalid.
    pub fn validate(&self) -> Result<()> {
        if self.faces.is_empty() {
            return Err(Error::InvalidMesh("mesh has no polygons".to_string()));
        }
        let nv = self.vertices.len();
        for (fi, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(Error::InvalidMesh(format!(
                    "face {} has only {} vertices",
                    fi,
                    face.len()
                )));
            }
            if let Some(&bad) = face.iter().find(|&&v| v >= nv) {
                return Err(Error::InvalidMesh(format!(
                    "face {} references vertex {} but mesh has {} vertices",
                    fi, bad, nv
                )));
            }
        }
        Ok(())
    }

    /// Whether a face is a quadrilateral
    pub fn is_quad_face(&self, face: usize) -> bool {
        self.faces[face].len() == 4
    }

    /// Unique undirected edges, each as `(min, max)`, in first-seen order
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for face in &self.faces {
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                let key = (a.min(b), a.max(b));
                if a != b && seen.insert(key) {
                    edges.push(key);
                }
            }
        }
        edges
    }

    /// Euclidean length of the edge between two vertices
    pub fn edge_length(&self, a: usize, b: usize) -> f32 {
        (self.vertices[b] - self.vertices[a]).norm()
    }

    /// Unnormalized face normal computed with Newell's method.
    ///
    /// Its length is twice the polygon area, which makes it suitable for
    /// area weighting and for planar polygons of any arity.
    pub fn face_normal_unnormalized(&self, face: usize) -> Vector3f {
        let f = &self.faces[face];
        let mut n = Vector3f::zeros();
        for (i, &a) in f.iter().enumerate() {
            let p = self.vertices[a];
            let q = self.vertices[f[(i + 1) % f.len()]];
            n.x += (p.y - q.y) * (p.z + q.z);
            n.y += (p.z - q.z) * (p.x + q.x);
            n.z += (p.x - q.x) * (p.y + q.y);
        }
        n
    }

    /// Unit face normal, or zero for a degenerate face
    pub fn face_normal(&self, face: usize) -> Vector3f {
        let n = self.face_normal_unnormalized(face);
        let len = n.norm();
        if len > f32::EPSILON {
            n / len
        } else {
            Vector3f::zeros()
        }
    }

    /// Polygon area
    pub fn face_area(&self, face: usize) -> f32 {
        self.face_normal_unnormalized(face).norm() * 0.5
    }

    /// Calculate unit face normals for every face
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        (0..self.faces.len()).map(|f| self.face_normal(f)).collect()
    }

    /// Area-weighted vertex normals
    pub fn calculate_vertex_normals(&self) -> Vec<Vector3f> {
        let mut normals = vec![Vector3f::zeros(); self.vertices.len()];
        for (fi, face) in self.faces.iter().enumerate() {
            let n = self.face_normal_unnormalized(fi);
            for &v in face {
                normals[v] += n;
            }
        }
        for n in normals.iter_mut() {
            let len = n.norm();
            if len > f32::EPSILON {
                *n /= len;
            }
        }
        normals
    }

    /// Split every polygon into a triangle fan.
    ///
    /// Faces that are already triangles are kept as they are.
    pub fn triangulate(&self) -> PolygonMesh {
        let mut faces = Vec::with_capacity(self.faces.len() * 2);
        for face in &self.faces {
            for i in 1..face.len().saturating_sub(1) {
                faces.push(vec![face[0], face[i], face[i + 1]]);
            }
        }
        PolygonMesh {
            name: self.name.clone(),
            vertices: self.vertices.clone(),
            faces,
            normals: self.normals.clone(),
            shading: self.shading,
        }
    }

    /// Append another mesh, offsetting its face indices.
    ///
    /// The receiver keeps its name; normals survive only if both meshes
    /// carry them.
    pub fn merge(&mut self, other: &PolygonMesh) {
        let offset = self.vertices.len();
        self.normals = match (self.normals.take(), other.normals.as_ref()) {
            (Some(mut a), Some(b)) => {
                a.extend_from_slice(b);
                Some(a)
            }
            _ => None,
        };
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| f.iter().map(|&v| v + offset).collect::<Vec<_>>()),
        );
    }

    /// Drop vertices that no face references and reindex the faces.
    ///
    /// Returns the number of vertices removed.
    pub fn remove_unused_vertices(&mut self) -> usize {
        let mut used = vec![false; self.vertices.len()];
        for face in &self.faces {
            for &v in face {
                used[v] = true;
            }
        }
        let mut remap = vec![usize::MAX; self.vertices.len()];
        let mut vertices = Vec::with_capacity(self.vertices.len());
        let mut normals = self.normals.as_ref().map(|_| Vec::new());
        for (i, &keep) in used.iter().enumerate() {
            if keep {
                remap[i] = vertices.len();
                vertices.push(self.vertices[i]);
                if let (Some(out), Some(src)) = (normals.as_mut(), self.normals.as_ref()) {
                    out.push(src[i]);
                }
            }
        }
        let removed = self.vertices.len() - vertices.len();
        for face in self.faces.iter_mut() {
            for v in face.iter_mut() {
                *v = remap[*v];
            }
        }
        self.vertices = vertices;
        self.normals = normals;
        removed
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.normals = None;
        self.shading = Shading::Flat;
    }
}

impl Default for PolygonMesh {
    fn default() -> Self {
        Self::new()
    }
}
