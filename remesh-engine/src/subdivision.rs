//! Catmull-Clark subdivision
//!
//! Every n-gon becomes n quads. Interior edges and vertices use the standard
//! Catmull-Clark weights; boundary edges use their midpoint and boundary
//! vertices the 1/8, 3/4, 1/8 curve rule so open meshes keep their outline.

use crate::topology::{edge_key, EdgeTopology};
use remesh_core::{Error, Point3f, PolygonMesh, Result, Vector3f};
use std::collections::HashMap;
use tracing::debug;

/// Apply `levels` rounds of Catmull-Clark subdivision.
pub fn subdivide(mesh: &PolygonMesh, levels: u32) -> Result<PolygonMesh> {
    if levels == 0 {
        return Err(Error::InvalidData(
            "subdivision needs at least one level".to_string(),
        ));
    }
    mesh.validate()?;

    let mut current = subdivide_once(mesh);
    for _ in 1..levels {
        current = subdivide_once(&current);
    }
    debug!(
        levels,
        faces_before = mesh.face_count(),
        faces_after = current.face_count(),
        "Catmull-Clark subdivision"
    );
    Ok(current)
}

fn centroid<'a>(points: impl Iterator<Item = &'a Point3f>) -> Point3f {
    let mut sum = Vector3f::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    Point3f::from(sum / count.max(1) as f32)
}

fn subdivide_once(mesh: &PolygonMesh) -> PolygonMesh {
    let topology = EdgeTopology::build(mesh);
    let nv = mesh.vertices.len();
    let nf = mesh.faces.len();

    // Step 1: face points
    let face_points: Vec<Point3f> = mesh
        .faces
        .iter()
        .map(|f| centroid(f.iter().map(|&v| &mesh.vertices[v])))
        .collect();

    // Step 2: edge points, indexed after vertices and face points
    let mut edge_index: HashMap<(usize, usize), usize> =
        HashMap::with_capacity(topology.edge_count());
    let mut edge_points = Vec::with_capacity(topology.edge_count());
    let mut edges: Vec<(&(usize, usize), &Vec<usize>)> = topology.edges().collect();
    edges.sort_unstable_by_key(|(key, _)| **key);
    for &(&(a, b), faces) in &edges {
        let pa = mesh.vertices[a].coords;
        let pb = mesh.vertices[b].coords;
        let point = match faces.as_slice() {
            [f, g] => (pa + pb + face_points[*f].coords + face_points[*g].coords) / 4.0,
            _ => (pa + pb) / 2.0,
        };
        edge_index.insert((a, b), nv + nf + edge_points.len());
        edge_points.push(Point3f::from(point));
    }

    // Step 3: move original vertices
    let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); nv];
    for (fi, face) in mesh.faces.iter().enumerate() {
        for &v in face {
            vertex_faces[v].push(fi);
        }
    }
    let mut vertex_edges: Vec<Vec<(usize, bool)>> = vec![Vec::new(); nv];
    for &(&(a, b), faces) in &edges {
        let boundary = faces.len() != 2;
        vertex_edges[a].push((b, boundary));
        vertex_edges[b].push((a, boundary));
    }

    let mut vertices = Vec::with_capacity(nv + nf + edge_points.len());
    for v in 0..nv {
        let p = mesh.vertices[v];
        let incident = &vertex_edges[v];
        let boundary: Vec<usize> = incident.iter().filter(|e| e.1).map(|e| e.0).collect();

        let moved = if incident.is_empty() {
            p
        } else if boundary.is_empty() {
            let n = incident.len() as f32;
            let f = centroid(vertex_faces[v].iter().map(|&fi| &face_points[fi])).coords;
            let r = incident
                .iter()
                .map(|&(o, _)| (p.coords + mesh.vertices[o].coords) / 2.0)
                .sum::<Vector3f>()
                / n;
            Point3f::from((f + r * 2.0 + p.coords * (n - 3.0)) / n)
        } else if boundary.len() == 2 {
            let a = mesh.vertices[boundary[0]].coords;
            let b = mesh.vertices[boundary[1]].coords;
            Point3f::from(a * 0.125 + p.coords * 0.75 + b * 0.125)
        } else {
            // Corners and non-manifold junctions stay fixed
            p
        };
        vertices.push(moved);
    }
    vertices.extend(face_points);
    vertices.extend(edge_points);

    // Step 4: one quad per face corner
    let mut faces = Vec::with_capacity(mesh.faces.iter().map(Vec::len).sum());
    for (fi, face) in mesh.faces.iter().enumerate() {
        let n = face.len();
        let center = nv + fi;
        for i in 0..n {
            let v = face[i];
            let next = face[(i + 1) % n];
            let prev = face[(i + n - 1) % n];
            faces.push(vec![
                v,
                edge_index[&edge_key(v, next)],
                center,
                edge_index[&edge_key(prev, v)],
            ]);
        }
    }

    let mut result = PolygonMesh::from_vertices_and_faces(vertices, faces);
    result.name = mesh.name.clone();
    result.shading = mesh.shading;
    result
}
