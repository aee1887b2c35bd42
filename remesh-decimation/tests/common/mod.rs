//! Shared fixtures for the decision layer integration tests

#![allow(dead_code)]

use remesh_core::{Error, Point3f, PolygonMesh, Result};
use remesh_engine::MeshEngine;
use std::cell::RefCell;
use std::collections::VecDeque;

/// What the scripted engine answers to the next reducing call
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// Return a quad strip with this many faces
    Faces(usize),
    /// Fail with an engine error
    Fail,
}

/// A recorded engine call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Collapse {
        keep_ratio: f32,
        angle_limit: Option<f32>,
    },
    Unsubdivide {
        iterations: u32,
    },
    Dissolve {
        angle_limit: f32,
        dissolve_boundaries: bool,
    },
    Subdivide {
        levels: u32,
    },
    RecalculateNormals,
    ShadeSmooth,
    EdgeSplit,
}

impl Call {
    pub fn is_post_process(&self) -> bool {
        matches!(
            self,
            Call::RecalculateNormals | Call::ShadeSmooth | Call::EdgeSplit
        )
    }
}

/// Engine whose geometry operations return pre-scripted face counts.
///
/// Collapse, un-subdivide, dissolve and subdivide consume one reply each;
/// once the script runs out they return the input unchanged. Shading
/// operations return the input unchanged, or fail when `fail_post` is set.
#[derive(Default)]
pub struct ScriptedEngine {
    script: RefCell<VecDeque<Reply>>,
    calls: RefCell<Vec<Call>>,
    pub fail_post: bool,
}

impl ScriptedEngine {
    pub fn new(script: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: RefCell::new(script.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls made by the reduction strategies, without post-processing
    pub fn primitive_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| !c.is_post_process()).collect()
    }

    fn answer(&self, call: Call, mesh: &PolygonMesh) -> Result<PolygonMesh> {
        self.calls.borrow_mut().push(call);
        match self.script.borrow_mut().pop_front() {
            Some(Reply::Faces(n)) => Ok(quad_strip(n).with_name(mesh.name.clone())),
            Some(Reply::Fail) => Err(Error::Engine("scripted failure".to_string())),
            None => Ok(mesh.clone()),
        }
    }

    fn post(&self, call: Call, mesh: &PolygonMesh) -> Result<PolygonMesh> {
        self.calls.borrow_mut().push(call);
        if self.fail_post {
            Err(Error::Engine("scripted post-processing failure".to_string()))
        } else {
            Ok(mesh.clone())
        }
    }
}

impl MeshEngine for ScriptedEngine {
    fn collapse(
        &self,
        mesh: &PolygonMesh,
        keep_ratio: f32,
        angle_limit: Option<f32>,
    ) -> Result<PolygonMesh> {
        self.answer(
            Call::Collapse {
                keep_ratio,
                angle_limit,
            },
            mesh,
        )
    }

    fn unsubdivide(&self, mesh: &PolygonMesh, iterations: u32) -> Result<PolygonMesh> {
        self.answer(Call::Unsubdivide { iterations }, mesh)
    }

    fn dissolve(
        &self,
        mesh: &PolygonMesh,
        angle_limit: f32,
        dissolve_boundaries: bool,
    ) -> Result<PolygonMesh> {
        self.answer(
            Call::Dissolve {
                angle_limit,
                dissolve_boundaries,
            },
            mesh,
        )
    }

    fn subdivide(&self, mesh: &PolygonMesh, levels: u32) -> Result<PolygonMesh> {
        self.answer(Call::Subdivide { levels }, mesh)
    }

    fn recalculate_normals(&self, mesh: &PolygonMesh, _inside: bool) -> Result<PolygonMesh> {
        self.post(Call::RecalculateNormals, mesh)
    }

    fn shade_smooth(&self, mesh: &PolygonMesh) -> Result<PolygonMesh> {
        self.post(Call::ShadeSmooth, mesh)
    }

    fn edge_split(&self, mesh: &PolygonMesh, _split_angle: f32) -> Result<PolygonMesh> {
        self.post(Call::EdgeSplit, mesh)
    }
}

/// A row of `n` unit quads: 2(n + 1) vertices, all faces quads
pub fn quad_strip(n: usize) -> PolygonMesh {
    let mut vertices = Vec::with_capacity(2 * (n + 1));
    for i in 0..=n {
        vertices.push(Point3f::new(i as f32, 0.0, 0.0));
        vertices.push(Point3f::new(i as f32, 1.0, 0.0));
    }
    let faces = (0..n)
        .map(|i| vec![2 * i, 2 * i + 2, 2 * i + 3, 2 * i + 1])
        .collect();
    PolygonMesh::from_vertices_and_faces(vertices, faces).with_name("strip")
}

/// Flat grid of `n x n` unit quads, classified structured
pub fn quad_grid(n: usize) -> PolygonMesh {
    let size = n + 1;
    let mut mesh = PolygonMesh::new().with_name("grid");
    for y in 0..size {
        for x in 0..size {
            mesh.add_vertex(Point3f::new(x as f32, y as f32, 0.0));
        }
    }
    for y in 0..n {
        for x in 0..n {
            let a = y * size + x;
            mesh.add_face(vec![a, a + 1, a + 1 + size, a + size]);
        }
    }
    mesh
}

/// A zig-zag strip of `n` triangles: n + 2 vertices, classified dense
pub fn triangle_strip(n: usize) -> PolygonMesh {
    let mut vertices = Vec::with_capacity(n + 2);
    for i in 0..(n + 2) {
        vertices.push(Point3f::new((i / 2) as f32, (i % 2) as f32, 0.0));
    }
    let faces = (0..n)
        .map(|i| {
            if i % 2 == 0 {
                vec![i, i + 2, i + 1]
            } else {
                vec![i, i + 1, i + 2]
            }
        })
        .collect();
    PolygonMesh::from_vertices_and_faces(vertices, faces).with_name("tri-strip")
}

/// Triangulated `n x n` cell grid with a bump: 2n² faces, classified organic
pub fn bumpy_triangle_grid(n: usize) -> PolygonMesh {
    let size = n + 1;
    let mut vertices = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 / n as f32 * std::f32::consts::PI;
            let fy = y as f32 / n as f32 * std::f32::consts::PI;
            vertices.push(Point3f::new(x as f32, y as f32, fx.sin() * fy.sin() * 2.0));
        }
    }
    let mut faces = Vec::with_capacity(2 * n * n);
    for y in 0..n {
        for x in 0..n {
            let tl = y * size + x;
            let tr = tl + 1;
            let bl = tl + size;
            let br = bl + 1;
            faces.push(vec![tl, tr, bl]);
            faces.push(vec![tr, br, bl]);
        }
    }
    PolygonMesh::from_vertices_and_faces(vertices, faces).with_name("bump")
}
