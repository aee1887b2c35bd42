//! Planar dissolve
//!
//! Grows regions of faces whose normals stay within an angle of the region
//! seed's normal, then replaces each region by the polygon bounded by its
//! outline. Vertices left in the middle of a straight run of edges are
//! removed afterwards.

use crate::topology::{angle_between, has_directed_edge, EdgeTopology};
use remesh_core::{Error, PolygonMesh, Result};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Merge nearly coplanar neighbouring faces.
///
/// `angle_limit` is in radians. Vertices on the open mesh boundary are only
/// dissolved when `dissolve_boundaries` is set.
pub fn planar_dissolve(
    mesh: &PolygonMesh,
    angle_limit: f32,
    dissolve_boundaries: bool,
) -> Result<PolygonMesh> {
    if !(0.0..=std::f32::consts::PI).contains(&angle_limit) {
        return Err(Error::InvalidData(format!(
            "dissolve angle {} is outside [0, pi]",
            angle_limit
        )));
    }
    mesh.validate()?;

    let topology = EdgeTopology::build(mesh);
    let normals = mesh.calculate_face_normals();
    let regions = grow_regions(mesh, &topology, &normals, angle_limit);

    let mut faces = Vec::with_capacity(mesh.faces.len());
    let mut merged_regions = 0usize;
    for region in &regions {
        if region.len() > 1 {
            if let Some(outline) = region_outline(mesh, region) {
                faces.push(outline);
                merged_regions += 1;
                continue;
            }
        }
        faces.extend(region.iter().map(|&f| mesh.faces[f].clone()));
    }

    let mut result = PolygonMesh::from_vertices_and_faces(mesh.vertices.clone(), faces);
    result.name = mesh.name.clone();
    result.shading = mesh.shading;
    let removed = dissolve_collinear_vertices(&mut result, angle_limit, dissolve_boundaries);
    result.remove_unused_vertices();

    debug!(
        regions = regions.len(),
        merged_regions,
        removed_vertices = removed,
        faces_before = mesh.face_count(),
        faces_after = result.face_count(),
        "Planar dissolve"
    );
    Ok(result)
}

/// Flood fill faces into nearly planar regions.
fn grow_regions(
    mesh: &PolygonMesh,
    topology: &EdgeTopology,
    normals: &[remesh_core::Vector3f],
    angle_limit: f32,
) -> Vec<Vec<usize>> {
    let mut assigned = vec![false; mesh.faces.len()];
    let mut regions = Vec::new();

    for seed in 0..mesh.faces.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut region = vec![seed];
        let seed_normal = normals[seed];
        if seed_normal.norm() > 0.0 {
            let mut stack = vec![seed];
            while let Some(f) = stack.pop() {
                for (g, (a, b)) in topology.neighbors(mesh, f) {
                    if assigned[g]
                        || topology.faces(a, b).len() != 2
                        || !has_directed_edge(&mesh.faces[g], b, a)
                        || normals[g].norm() == 0.0
                        || angle_between(&seed_normal, &normals[g]) > angle_limit
                    {
                        continue;
                    }
                    assigned[g] = true;
                    region.push(g);
                    stack.push(g);
                }
            }
        }
        regions.push(region);
    }
    regions
}

/// Outline of a region as a single polygon, if it is one simple loop.
fn region_outline(mesh: &PolygonMesh, region: &[usize]) -> Option<Vec<usize>> {
    let mut directed = HashSet::new();
    for &f in region {
        let face = &mesh.faces[f];
        for (i, &a) in face.iter().enumerate() {
            directed.insert((a, face[(i + 1) % face.len()]));
        }
    }

    let mut next: HashMap<usize, usize> = HashMap::new();
    for &(a, b) in &directed {
        if directed.contains(&(b, a)) {
            continue;
        }
        // A vertex with two outgoing outline edges makes the outline pinch
        if next.insert(a, b).is_some() {
            return None;
        }
    }
    if next.len() < 3 {
        return None;
    }

    let start = *next.keys().min()?;
    let mut outline = vec![start];
    let mut current = next[&start];
    while current != start {
        if outline.len() > next.len() {
            return None;
        }
        outline.push(current);
        current = *next.get(&current)?;
    }

    // Holes show up as a second loop that the walk never reaches
    (outline.len() == next.len()).then_some(outline)
}

/// Remove vertices that sit on a straight run between exactly two neighbours.
fn dissolve_collinear_vertices(
    mesh: &mut PolygonMesh,
    angle_limit: f32,
    dissolve_boundaries: bool,
) -> usize {
    let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); mesh.vertices.len()];
    for (fi, face) in mesh.faces.iter().enumerate() {
        for &v in face {
            vertex_faces[v].push(fi);
        }
    }

    let mut removed = 0usize;
    for v in 0..mesh.vertices.len() {
        let incident = &vertex_faces[v];
        if incident.is_empty() || (incident.len() == 1 && !dissolve_boundaries) {
            continue;
        }

        let mut neighbors = HashSet::new();
        for &fi in incident {
            let face = &mesh.faces[fi];
            if let Some(i) = face.iter().position(|&x| x == v) {
                neighbors.insert(face[(i + 1) % face.len()]);
                neighbors.insert(face[(i + face.len() - 1) % face.len()]);
            }
        }
        if neighbors.len() != 2 || incident.iter().any(|&fi| mesh.faces[fi].len() <= 3) {
            continue;
        }

        let mut it = neighbors.iter();
        let (p, q) = match (it.next(), it.next()) {
            (Some(&p), Some(&q)) => (p, q),
            _ => continue,
        };
        let incoming = mesh.vertices[v] - mesh.vertices[p];
        let outgoing = mesh.vertices[q] - mesh.vertices[v];
        if angle_between(&incoming, &outgoing) > angle_limit {
            continue;
        }

        for &fi in incident {
            mesh.faces[fi].retain(|&x| x != v);
        }
        removed += 1;
    }
    removed
}
