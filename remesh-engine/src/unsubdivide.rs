//! Un-subdivide: recover the coarse cage of a once-subdivided quad mesh
//!
//! After one level of quad subdivision every face has the shape
//! `corner, edge point, face point, edge point`. Labeling the vertices with
//! these three roles is enough to rebuild the coarse polygons: each face
//! point is surrounded by the fine quads of one coarse face, and the corners
//! of those quads, walked in order, are the coarse face's vertices.

use crate::topology::{euler_of_faces, face_components, EdgeTopology};
use remesh_core::{Error, PolygonMesh, Result};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Corner,
    EdgePoint,
    FacePoint,
}

/// Seed assumptions: one of the first two corners of a quad is a corner or
/// a face point.
const HYPOTHESES: [(usize, Role); 4] = [
    (0, Role::Corner),
    (0, Role::FacePoint),
    (1, Role::Corner),
    (1, Role::FacePoint),
];

impl Role {
    fn diagonal(self) -> Role {
        match self {
            Role::Corner => Role::FacePoint,
            Role::FacePoint => Role::Corner,
            Role::EdgePoint => Role::EdgePoint,
        }
    }
}

/// Undo up to `iterations` levels of subdivision.
///
/// Fails only when not even one level can be removed; later passes that do
/// not fit simply stop the iteration.
pub fn unsubdivide(mesh: &PolygonMesh, iterations: u32) -> Result<PolygonMesh> {
    if iterations == 0 {
        return Err(Error::InvalidData(
            "un-subdivide needs at least one iteration".to_string(),
        ));
    }

    let mut current = unsubdivide_once(mesh)?;
    for pass in 1..iterations {
        match unsubdivide_once(&current) {
            Ok(coarser) => current = coarser,
            Err(e) => {
                debug!(pass, error = %e, "Un-subdivide stopped early");
                break;
            }
        }
    }
    Ok(current)
}

/// Remove a single level of subdivision.
pub fn unsubdivide_once(mesh: &PolygonMesh) -> Result<PolygonMesh> {
    mesh.validate()?;
    if mesh.faces.iter().any(|f| f.len() != 4) {
        return Err(Error::Unsupported(
            "un-subdivide requires an all-quad mesh".to_string(),
        ));
    }

    let topology = EdgeTopology::build(mesh);
    let mut roles: Vec<Option<Role>> = vec![None; mesh.vertices.len()];
    let mut coarse_faces = Vec::with_capacity(mesh.faces.len() / 3);

    for component in face_components(mesh, &topology) {
        let seed = component[0];
        let original: Vec<Vec<usize>> =
            component.iter().map(|&f| mesh.faces[f].clone()).collect();
        let expected_euler = euler_of_faces(&original);

        // Corner and face point labels are interchangeable on closed meshes;
        // prefer the labeling whose coarse cage has the most quads.
        let best = HYPOTHESES
            .iter()
            .filter_map(|&(index, role)| {
                let mut attempt = roles.clone();
                label_component(mesh, &topology, seed, index, role, &mut attempt)?;
                let faces = rebuild_faces(mesh, &component, &attempt)?;
                (euler_of_faces(&faces) == expected_euler).then_some((attempt, faces))
            })
            .max_by_key(|(_, faces)| faces.iter().filter(|f| f.len() == 4).count());

        match best {
            Some((component_roles, faces)) => {
                roles = component_roles;
                coarse_faces.extend(faces);
            }
            None => {
                return Err(Error::Unsupported(
                    "mesh does not have a subdivided topology".to_string(),
                ))
            }
        }
    }

    let mut result = PolygonMesh::from_vertices_and_faces(mesh.vertices.clone(), coarse_faces);
    result.name = mesh.name.clone();
    result.shading = mesh.shading;
    result.remove_unused_vertices();
    Ok(result)
}

/// Propagate roles across one connected component, starting from the
/// assumption that `mesh.faces[seed][index]` has role `role`.
fn label_component(
    mesh: &PolygonMesh,
    topology: &EdgeTopology,
    seed: usize,
    index: usize,
    role: Role,
    roles: &mut [Option<Role>],
) -> Option<()> {
    let mut visited = vec![false; mesh.faces.len()];
    let mut stack = vec![(seed, index, role)];
    visited[seed] = true;

    while let Some((face, index, role)) = stack.pop() {
        let f = &mesh.faces[face];
        let expected = [role, Role::EdgePoint, role.diagonal(), Role::EdgePoint];
        for (k, &want) in expected.iter().enumerate() {
            let v = f[(index + k) % 4];
            match roles[v] {
                Some(have) if have != want => return None,
                _ => roles[v] = Some(want),
            }
        }

        for (neighbor, _) in topology.neighbors(mesh, face) {
            if visited[neighbor] {
                continue;
            }
            let g = &mesh.faces[neighbor];
            let anchor = (0..4)
                .find(|&k| matches!(roles[g[k]], Some(Role::Corner | Role::FacePoint)))?;
            let anchor_role = roles[g[anchor]]?;
            visited[neighbor] = true;
            stack.push((neighbor, anchor, anchor_role));
        }
    }
    Some(())
}

/// Rebuild the coarse faces of one labeled component.
fn rebuild_faces(
    mesh: &PolygonMesh,
    component: &[usize],
    roles: &[Option<Role>],
) -> Option<Vec<Vec<usize>>> {
    // For each face point: the edge point after it -> (corner, edge point before it)
    let mut fans: HashMap<usize, HashMap<usize, (usize, usize)>> = HashMap::new();
    for &face in component {
        let f = &mesh.faces[face];
        let k = (0..4).find(|&k| roles[f[k]] == Some(Role::FacePoint))?;
        let center = f[k];
        let after = f[(k + 1) % 4];
        let corner = f[(k + 2) % 4];
        let before = f[(k + 3) % 4];
        if roles[corner] != Some(Role::Corner) {
            return None;
        }
        if fans.entry(center).or_default().insert(after, (corner, before)).is_some() {
            return None;
        }
    }

    let mut centers: Vec<usize> = fans.keys().copied().collect();
    centers.sort_unstable();

    let mut faces = Vec::with_capacity(centers.len());
    for center in centers {
        let fan = &fans[&center];
        if fan.len() < 3 {
            return None;
        }
        let start = *fan.keys().min()?;
        let mut key = start;
        let mut polygon = Vec::with_capacity(fan.len());
        loop {
            let &(corner, before) = fan.get(&key)?;
            polygon.push(corner);
            key = before;
            if key == start {
                break;
            }
            if polygon.len() > fan.len() {
                return None;
            }
        }
        if polygon.len() != fan.len() {
            return None;
        }
        let mut unique = polygon.clone();
        unique.sort_unstable();
        unique.dedup();
        if unique.len() != polygon.len() {
            return None;
        }
        faces.push(polygon);
    }
    Some(faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subdivision::subdivide;
    use crate::topology::test_meshes::*;

    #[test]
    fn test_grid_roundtrip() {
        let coarse = quad_grid(3);
        let fine = subdivide(&coarse, 1).unwrap();
        assert_eq!(fine.face_count(), 36);

        let recovered = unsubdivide(&fine, 1).unwrap();
        assert_eq!(recovered.face_count(), 9);
        assert_eq!(recovered.vertex_count(), 16);
        assert!(recovered.faces.iter().all(|f| f.len() == 4));
    }

    #[test]
    fn test_cube_two_levels() {
        let fine = subdivide(&cube(), 2).unwrap();
        assert_eq!(fine.face_count(), 96);

        let recovered = unsubdivide(&fine, 2).unwrap();
        assert_eq!(recovered.face_count(), 6);
        assert_eq!(recovered.vertex_count(), 8);
    }

    #[test]
    fn test_extra_iterations_stop_gracefully() {
        // 6x6 -> 3x3, and a 3x3 grid cannot be reduced further
        let fine = subdivide(&quad_grid(3), 1).unwrap();
        let recovered = unsubdivide(&fine, 5).unwrap();
        assert_eq!(recovered.face_count(), 9);
    }

    #[test]
    fn test_rejects_non_quad_mesh() {
        let mesh = curved_triangle_grid(4);
        assert!(matches!(unsubdivide(&mesh, 1), Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_rejects_plain_odd_grid() {
        // A 3x3 grid was never subdivided: no labeling closes every fan
        assert!(unsubdivide(&quad_grid(3), 1).is_err());
    }

    #[test]
    fn test_orientation_is_kept() {
        let coarse = quad_grid(2);
        let fine = subdivide(&coarse, 1).unwrap();
        let recovered = unsubdivide(&fine, 1).unwrap();
        for n in recovered.calculate_face_normals() {
            assert!(n.z > 0.99);
        }
    }
}
