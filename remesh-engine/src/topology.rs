//! Edge adjacency helpers shared by the engine operations

use remesh_core::{PolygonMesh, Vector3f};
use std::collections::{HashMap, HashSet};

/// Canonical key for an undirected edge
#[inline]
pub fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Angle in radians between two vectors, zero if either is degenerate
pub fn angle_between(a: &Vector3f, b: &Vector3f) -> f32 {
    let la = a.norm();
    let lb = b.norm();
    if la <= f32::EPSILON || lb <= f32::EPSILON {
        return 0.0;
    }
    (a.dot(b) / (la * lb)).clamp(-1.0, 1.0).acos()
}

/// Undirected edge to incident face map for a polygon mesh
pub struct EdgeTopology {
    edge_faces: HashMap<(usize, usize), Vec<usize>>,
}

impl EdgeTopology {
    pub fn build(mesh: &PolygonMesh) -> Self {
        let mut edge_faces: HashMap<(usize, usize), Vec<usize>> =
            HashMap::with_capacity(mesh.faces.len() * 2);
        for (fi, face) in mesh.faces.iter().enumerate() {
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                if a != b {
                    edge_faces.entry(edge_key(a, b)).or_default().push(fi);
                }
            }
        }
        Self { edge_faces }
    }

    /// Faces incident to the edge `(a, b)`
    pub fn faces(&self, a: usize, b: usize) -> &[usize] {
        self.edge_faces
            .get(&edge_key(a, b))
            .map(|f| f.as_slice())
            .unwrap_or(&[])
    }

    pub fn edges(&self) -> impl Iterator<Item = (&(usize, usize), &Vec<usize>)> {
        self.edge_faces.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_faces.len()
    }

    pub fn is_boundary(&self, a: usize, b: usize) -> bool {
        self.faces(a, b).len() == 1
    }

    /// Vertices touching at least one boundary edge
    pub fn boundary_vertices(&self) -> HashSet<usize> {
        self.edge_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .flat_map(|(&(a, b), _)| [a, b])
            .collect()
    }

    /// Dihedral angle between the two faces of a manifold edge.
    ///
    /// Returns `None` for boundary and non-manifold edges.
    pub fn dihedral_angle(&self, face_normals: &[Vector3f], a: usize, b: usize) -> Option<f32> {
        match self.faces(a, b) {
            [f, g] => Some(angle_between(&face_normals[*f], &face_normals[*g])),
            _ => None,
        }
    }

    /// Faces sharing an edge with `face`, paired with that edge
    pub fn neighbors<'a>(
        &'a self,
        mesh: &'a PolygonMesh,
        face: usize,
    ) -> impl Iterator<Item = (usize, (usize, usize))> + 'a {
        let f = &mesh.faces[face];
        (0..f.len()).flat_map(move |i| {
            let a = f[i];
            let b = f[(i + 1) % f.len()];
            self.faces(a, b)
                .iter()
                .copied()
                .filter(move |&g| g != face)
                .map(move |g| (g, (a, b)))
        })
    }
}

/// Whether `face` contains the directed edge `a -> b`
pub fn has_directed_edge(face: &[usize], a: usize, b: usize) -> bool {
    (0..face.len()).any(|i| face[i] == a && face[(i + 1) % face.len()] == b)
}

/// Connected components of faces joined through shared edges
pub fn face_components(mesh: &PolygonMesh, topology: &EdgeTopology) -> Vec<Vec<usize>> {
    let mut visited = vec![false; mesh.faces.len()];
    let mut components = Vec::new();
    for seed in 0..mesh.faces.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut stack = vec![seed];
        let mut component = Vec::new();
        while let Some(f) = stack.pop() {
            component.push(f);
            for (g, _) in topology.neighbors(mesh, f) {
                if !visited[g] {
                    visited[g] = true;
                    stack.push(g);
                }
            }
        }
        components.push(component);
    }
    components
}

/// Euler characteristic `V - E + F` of a face list, over referenced vertices
pub fn euler_of_faces(faces: &[Vec<usize>]) -> i64 {
    let mut vertices = HashSet::new();
    let mut edges = HashSet::new();
    for face in faces {
        for (i, &a) in face.iter().enumerate() {
            vertices.insert(a);
            let b = face[(i + 1) % face.len()];
            if a != b {
                edges.insert(edge_key(a, b));
            }
        }
    }
    vertices.len() as i64 - edges.len() as i64 + faces.len() as i64
}


#[cfg(test)]
mod tests {
    use super::test_meshes::*;
    use super::*;

    #[test]
    fn test_grid_topology() {
        let mesh = quad_grid(2);
        let topo = EdgeTopology::build(&mesh);
        assert_eq!(topo.edge_count(), 12);
        assert!(topo.is_boundary(0, 1));
        assert!(!topo.is_boundary(1, 4));
        assert_eq!(topo.boundary_vertices().len(), 8);
    }

    #[test]
    fn test_cube_is_closed() {
        let mesh = cube();
        let topo = EdgeTopology::build(&mesh);
        assert!(topo.boundary_vertices().is_empty());
        assert_eq!(euler_of_faces(&mesh.faces), 2);

        let normals = mesh.calculate_face_normals();
        let angle = topo.dihedral_angle(&normals, 0, 1).unwrap();
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_components() {
        let mut mesh = quad_grid(1);
        mesh.merge(&quad_grid(1));
        let topo = EdgeTopology::build(&mesh);
        assert_eq!(face_components(&mesh, &topo).len(), 2);
    }
}
