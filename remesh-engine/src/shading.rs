//! Normal orientation and shading cleanup

use crate::topology::{face_components, has_directed_edge, EdgeTopology};
use remesh_core::{Drawable, PolygonMesh, Result, Shading, Vector3f};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Make face winding consistent and point normals outward (or inward).
///
/// Winding is propagated across manifold edges inside every connected
/// component; each component is then flipped as a whole if its signed volume
/// has the wrong sign. Vertex normals are recomputed from the result.
pub fn recalculate_normals(mesh: &PolygonMesh, inside: bool) -> Result<PolygonMesh> {
    mesh.validate()?;
    let mut result = mesh.clone();
    let topology = EdgeTopology::build(mesh);
    let components = face_components(mesh, &topology);

    let (min, max) = result.bounding_box();
    let scale = (max - min).norm();
    let volume_epsilon = 1e-6 * scale.powi(3);

    let mut propagated = 0usize;
    let mut flipped_components = 0usize;
    for component in &components {
        propagated += orient_component(&mut result, &topology, component);

        let volume = signed_volume(&result, component);
        let wrong_way = if inside {
            volume > volume_epsilon
        } else {
            volume < -volume_epsilon
        };
        if wrong_way {
            for &f in component {
                result.faces[f].reverse();
            }
            flipped_components += 1;
        }
    }

    let normals = result.calculate_vertex_normals();
    result.set_normals(normals);
    debug!(
        components = components.len(),
        propagated,
        flipped_components,
        inside,
        "Recalculated normals"
    );
    Ok(result)
}

/// Flip faces so neighbours traverse shared edges in opposite directions.
///
/// Returns the number of faces that were reversed.
fn orient_component(
    mesh: &mut PolygonMesh,
    topology: &EdgeTopology,
    component: &[usize],
) -> usize {
    let Some(&seed) = component.first() else {
        return 0;
    };
    let mut visited: HashSet<usize> = HashSet::with_capacity(component.len());
    visited.insert(seed);
    let mut stack = vec![seed];
    let mut reversed = 0usize;

    while let Some(f) = stack.pop() {
        let neighbors: Vec<(usize, (usize, usize))> = topology
            .neighbors(mesh, f)
            .filter(|(_, (a, b))| topology.faces(*a, *b).len() == 2)
            .collect();
        for (g, (a, b)) in neighbors {
            if !visited.insert(g) {
                continue;
            }
            if has_directed_edge(&mesh.faces[g], a, b) {
                mesh.faces[g].reverse();
                reversed += 1;
            }
            stack.push(g);
        }
    }
    reversed
}

/// Signed volume enclosed by a set of faces, measured from their centroid
fn signed_volume(mesh: &PolygonMesh, faces: &[usize]) -> f32 {
    let mut origin = Vector3f::zeros();
    let mut count = 0usize;
    for &f in faces {
        for &v in &mesh.faces[f] {
            origin += mesh.vertices[v].coords;
            count += 1;
        }
    }
    origin /= count.max(1) as f32;

    let mut volume = 0.0f32;
    for &f in faces {
        let face = &mesh.faces[f];
        let p0 = mesh.vertices[face[0]].coords - origin;
        for i in 1..face.len().saturating_sub(1) {
            let p1 = mesh.vertices[face[i]].coords - origin;
            let p2 = mesh.vertices[face[i + 1]].coords - origin;
            volume += p0.dot(&p1.cross(&p2)) / 6.0;
        }
    }
    volume
}

/// Mark the mesh for smooth shading and give it vertex normals
pub fn shade_smooth(mesh: &PolygonMesh) -> Result<PolygonMesh> {
    mesh.validate()?;
    let mut result = mesh.clone();
    result.shading = Shading::Smooth;
    let normals = result.calculate_vertex_normals();
    result.set_normals(normals);
    Ok(result)
}

/// Duplicate vertices along sharp edges so smooth shading keeps hard creases.
///
/// An edge is sharp when its two faces meet at more than `split_angle`
/// radians, or when more than two faces share it. Face count is unchanged.
pub fn edge_split(mesh: &PolygonMesh, split_angle: f32) -> Result<PolygonMesh> {
    mesh.validate()?;
    let topology = EdgeTopology::build(mesh);
    let face_normals = mesh.calculate_face_normals();

    let is_smooth_join = |a: usize, b: usize| -> bool {
        topology
            .dihedral_angle(&face_normals, a, b)
            .map(|angle| angle <= split_angle)
            .unwrap_or(false)
    };

    let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); mesh.vertices.len()];
    for (fi, face) in mesh.faces.iter().enumerate() {
        for &v in face {
            if vertex_faces[v].last() != Some(&fi) {
                vertex_faces[v].push(fi);
            }
        }
    }

    let mut result = mesh.clone();
    let mut split_vertices = 0usize;
    for (v, incident) in vertex_faces.iter().enumerate() {
        if incident.len() < 2 {
            continue;
        }

        // Union faces around v that meet across a smooth edge through v
        let mut parent: Vec<usize> = (0..incident.len()).collect();
        for (i, &f) in incident.iter().enumerate() {
            let face = &mesh.faces[f];
            let Some(k) = face.iter().position(|&x| x == v) else {
                continue;
            };
            for u in [face[(k + 1) % face.len()], face[(k + face.len() - 1) % face.len()]] {
                if !is_smooth_join(v, u) {
                    continue;
                }
                for &g in topology.faces(v, u) {
                    if let Some(j) = incident.iter().position(|&x| x == g) {
                        let (ri, rj) = (find_root(&mut parent, i), find_root(&mut parent, j));
                        if ri != rj {
                            parent[rj] = ri;
                        }
                    }
                }
            }
        }

        // The group of the first incident face keeps the original vertex
        let first_root = find_root(&mut parent, 0);
        let mut copies: HashMap<usize, usize> = HashMap::new();
        for i in 1..incident.len() {
            let root = find_root(&mut parent, i);
            if root == first_root {
                continue;
            }
            let index = *copies.entry(root).or_insert_with(|| {
                split_vertices += 1;
                result.add_vertex(mesh.vertices[v])
            });
            for w in result.faces[incident[i]].iter_mut() {
                if *w == v {
                    *w = index;
                }
            }
        }
    }

    result.normals = None;
    let normals = result.calculate_vertex_normals();
    result.set_normals(normals);
    debug!(
        split_vertices,
        split_angle_deg = split_angle.to_degrees(),
        "Edge split"
    );
    Ok(result)
}

/// Union-find root lookup with path compression
fn find_root(parent: &mut [usize], i: usize) -> usize {
    let mut root = i;
    while parent[root] != root {
        root = parent[root];
    }
    let mut i = i;
    while parent[i] != root {
        let next = parent[i];
        parent[i] = root;
        i = next;
    }
    root
}
