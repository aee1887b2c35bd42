//! Small mesh builders for unit tests

use remesh_core::{Point3f, PolygonMesh};

/// Flat grid of `n x n` quads in the XY plane
pub fn quad_grid(n: usize) -> PolygonMesh {
    let size = n + 1;
    let mut vertices = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            vertices.push(Point3f::new(x as f32, y as f32, 0.0));
        }
    }
    let mut faces = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let a = y * size + x;
            faces.push(vec![a, a + 1, a + 1 + size, a + size]);
        }
    }
    PolygonMesh::from_vertices_and_faces(vertices, faces).with_name("grid")
}

/// Triangulated `size x size` vertex grid with a sinusoidal bump
pub fn curved_triangle_grid(size: usize) -> PolygonMesh {
    let mut vertices = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 / (size - 1) as f32 * std::f32::consts::PI;
            let fy = y as f32 / (size - 1) as f32 * std::f32::consts::PI;
            vertices.push(Point3f::new(x as f32, y as f32, (fx.sin() * fy.sin()) * 2.0));
        }
    }
    let mut faces = Vec::new();
    for y in 0..(size - 1) {
        for x in 0..(size - 1) {
            let tl = y * size + x;
            let tr = tl + 1;
            let bl = (y + 1) * size + x;
            let br = bl + 1;
            faces.push(vec![tl, tr, bl]);
            faces.push(vec![tr, br, bl]);
        }
    }
    PolygonMesh::from_vertices_and_faces(vertices, faces).with_name("bump")
}

/// A zig-zag strip of `n` triangles
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
    PolygonMesh::from_vertices_and_faces(vertices, faces).with_name("strip")
}
