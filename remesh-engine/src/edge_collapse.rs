//! Quadric edge collapse
//!
//! Polygon input is fan triangulated first, so the output is always a
//! triangle mesh. Edges are collapsed cheapest first by quadric error
//! (Garland-Heckbert) on an indexed triangle set with per-vertex incidence
//! lists. A collapse is rejected if it breaks the link condition or folds a
//! surviving triangle over.
//!
//! With a feature angle set, edges whose dihedral angle exceeds it are never
//! collapsed, and edges touching a feature vertex collapse onto that vertex.

use crate::topology::{edge_key, EdgeTopology};
use nalgebra::{Matrix3, Matrix4, Vector4};
use priority_queue::PriorityQueue;
use remesh_core::{Point3f, PolygonMesh, Result, Vector3f};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Fundamental error quadric of the plane through a triangle, `None` for
/// degenerate triangles
fn plane_quadric(a: &Point3f, b: &Point3f, c: &Point3f) -> Option<Matrix4<f64>> {
    let a = a.coords.cast::<f64>();
    let n = (b.coords.cast::<f64>() - a).cross(&(c.coords.cast::<f64>() - a));
    let len = n.norm();
    if !len.is_finite() || len < 1e-12 {
        return None;
    }
    let n = n / len;
    let plane = Vector4::new(n.x, n.y, n.z, -n.dot(&a));
    Some(plane * plane.transpose())
}

fn quadric_error(q: &Matrix4<f64>, p: &Point3f) -> f64 {
    let v = Vector4::new(p.x as f64, p.y as f64, p.z as f64, 1.0);
    (v.transpose() * q * v)[0].max(0.0)
}

/// Position minimising `q`, if the system is well conditioned
fn solve_optimum(q: &Matrix4<f64>) -> Option<Point3f> {
    let a: Matrix3<f64> = q.fixed_view::<3, 3>(0, 0).into_owned();
    if a.determinant().abs() < 1e-10 {
        return None;
    }
    let rhs = -q.fixed_view::<3, 1>(0, 3).into_owned();
    let x = a.try_inverse()? * rhs;
    if !x.iter().all(|c| c.is_finite()) {
        return None;
    }
    Some(Point3f::new(x[0] as f32, x[1] as f32, x[2] as f32))
}

fn cross_of(p: &[Point3f; 3]) -> Vector3f {
    (p[1] - p[0]).cross(&(p[2] - p[0]))
}

/// Indexed triangle set edited in place by collapses
struct CollapseMesh {
    positions: Vec<Point3f>,
    normals: Option<Vec<Vector3f>>,
    quadrics: Vec<Matrix4<f64>>,
    /// `None` once collapsed away
    triangles: Vec<Option<[usize; 3]>>,
    /// Triangles touching each vertex; may hold stale ids of dead triangles
    incident: Vec<Vec<usize>>,
    /// Live triangles per undirected edge
    edge_faces: HashMap<(usize, usize), usize>,
    /// Edges with exactly one triangle around each vertex
    open_edges: Vec<usize>,
    alive: Vec<bool>,
    live_triangles: usize,
}

fn triangle_edges(tri: &[usize; 3]) -> [(usize, usize); 3] {
    [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])]
}

impl CollapseMesh {
    /// Build from a mesh whose faces are all triangles. Triangles that
    /// repeat a vertex are dropped.
    fn from_triangles(mesh: &PolygonMesh) -> Self {
        let nv = mesh.vertices.len();
        let mut work = Self {
            positions: mesh.vertices.clone(),
            normals: mesh.normals.as_ref().filter(|n| n.len() == nv).cloned(),
            quadrics: vec![Matrix4::zeros(); nv],
            triangles: Vec::with_capacity(mesh.faces.len()),
            incident: vec![Vec::new(); nv],
            edge_faces: HashMap::with_capacity(mesh.faces.len() * 2),
            open_edges: vec![0; nv],
            alive: vec![false; nv],
            live_triangles: 0,
        };

        for (t, face) in mesh.faces.iter().enumerate() {
            let tri = [face[0], face[1], face[2]];
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                work.triangles.push(None);
                continue;
            }
            let p = tri.map(|v| mesh.vertices[v]);
            if let Some(q) = plane_quadric(&p[0], &p[1], &p[2]) {
                for &v in &tri {
                    work.quadrics[v] += q;
                }
            }
            for &v in &tri {
                work.incident[v].push(t);
                work.alive[v] = true;
            }
            for (a, b) in triangle_edges(&tri) {
                work.add_edge_use(a, b);
            }
            work.triangles.push(Some(tri));
            work.live_triangles += 1;
        }
        work
    }

    fn add_edge_use(&mut self, a: usize, b: usize) {
        let count = {
            let count = self.edge_faces.entry(edge_key(a, b)).or_insert(0);
            *count += 1;
            *count
        };
        match count {
            1 => self.mark_open(a, b, true),
            2 => self.mark_open(a, b, false),
            _ => {}
        }
    }

    fn remove_edge_use(&mut self, a: usize, b: usize) {
        let key = edge_key(a, b);
        let Some(count) = self.edge_faces.get_mut(&key) else {
            return;
        };
        *count -= 1;
        let left = *count;
        if left == 0 {
            self.edge_faces.remove(&key);
        }
        match left {
            0 => self.mark_open(a, b, false),
            1 => self.mark_open(a, b, true),
            _ => {}
        }
    }

    fn mark_open(&mut self, a: usize, b: usize, open: bool) {
        for v in [a, b] {
            if open {
                self.open_edges[v] += 1;
            } else {
                self.open_edges[v] = self.open_edges[v].saturating_sub(1);
            }
        }
    }

    fn triangles_of(&self, v: usize) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.incident[v]
            .iter()
            .filter_map(move |&t| self.triangles[t])
            .filter(move |tri| tri.contains(&v))
    }

    fn edge_triangles(&self, a: usize, b: usize) -> usize {
        self.edge_faces.get(&edge_key(a, b)).copied().unwrap_or(0)
    }

    fn neighbors(&self, v: usize) -> HashSet<usize> {
        self.triangles_of(v)
            .flat_map(|tri| tri.into_iter())
            .filter(|&u| u != v)
            .collect()
    }

    fn is_boundary_vertex(&self, v: usize) -> bool {
        self.open_edges[v] > 0
    }

    /// The edge must be manifold, and the endpoints may share no neighbours
    /// other than the apices of the triangles on the edge.
    fn link_condition(&self, a: usize, b: usize) -> bool {
        let shared = self.edge_triangles(a, b);
        if !(1..=2).contains(&shared) {
            return false;
        }
        let (small, large) = if self.incident[a].len() <= self.incident[b].len() {
            (a, b)
        } else {
            (b, a)
        };
        let common = self
            .neighbors(small)
            .into_iter()
            .filter(|&w| self.edge_triangles(large, w) > 0)
            .count();
        common == shared
    }

    /// Would moving both endpoints to `target` flip or flatten a triangle
    /// that survives the collapse?
    fn folds(&self, keep: usize, drop: usize, target: &Point3f) -> bool {
        for v in [keep, drop] {
            for tri in self.triangles_of(v) {
                if tri.contains(&keep) && tri.contains(&drop) {
                    continue;
                }
                let before = cross_of(&tri.map(|i| self.positions[i]));
                if before.norm_squared() == 0.0 {
                    continue;
                }
                let after = cross_of(&tri.map(|i| {
                    if i == keep || i == drop {
                        *target
                    } else {
                        self.positions[i]
                    }
                }));
                if before.dot(&after) <= 0.0 {
                    return true;
                }
            }
        }
        false
    }

    /// Cheapest of the quadric optimum, the midpoint and the two endpoints.
    /// The optimum is ignored when it lands far from the edge.
    fn placement(&self, a: usize, b: usize) -> (Point3f, f64) {
        let q = self.quadrics[a] + self.quadrics[b];
        let (pa, pb) = (self.positions[a], self.positions[b]);
        let mid = nalgebra::center(&pa, &pb);

        let mut best = (mid, quadric_error(&q, &mid));
        let mut consider = |p: Point3f| {
            let e = quadric_error(&q, &p);
            if e < best.1 {
                best = (p, e);
            }
        };
        if let Some(p) = solve_optimum(&q) {
            if (p - mid).norm() <= 2.0 * (pb - pa).norm() {
                consider(p);
            }
        }
        consider(pa);
        consider(pb);
        best
    }

    /// Merge `drop` into `keep` and move `keep` to `position`
    fn collapse(&mut self, keep: usize, drop: usize, position: Point3f) {
        for t in std::mem::take(&mut self.incident[drop]) {
            let Some(mut tri) = self.triangles[t] else {
                continue;
            };
            if !tri.contains(&drop) {
                continue;
            }
            for (a, b) in triangle_edges(&tri) {
                self.remove_edge_use(a, b);
            }
            if tri.contains(&keep) {
                self.triangles[t] = None;
                self.live_triangles -= 1;
                continue;
            }
            for v in tri.iter_mut() {
                if *v == drop {
                    *v = keep;
                }
            }
            for (a, b) in triangle_edges(&tri) {
                self.add_edge_use(a, b);
            }
            self.triangles[t] = Some(tri);
            self.incident[keep].push(t);
        }
        let triangles = &self.triangles;
        self.incident[keep].retain(|&t| triangles[t].is_some());

        self.alive[drop] = false;
        self.positions[keep] = position;
        let q = self.quadrics[drop];
        self.quadrics[keep] += q;

        if let Some(normals) = self.normals.as_mut() {
            let avg = (normals[keep] + normals[drop]).normalize();
            if avg.iter().all(|x| x.is_finite()) {
                normals[keep] = avg;
            }
        }
    }

    /// Compact into a polygon mesh, keeping vertex order
    fn into_polygon_mesh(self, template: &PolygonMesh) -> PolygonMesh {
        let mut used = vec![false; self.positions.len()];
        for tri in self.triangles.iter().flatten() {
            for &v in tri {
                used[v] = true;
            }
        }

        let mut remap = vec![usize::MAX; self.positions.len()];
        let mut positions = Vec::new();
        let mut normals = self.normals.as_ref().map(|_| Vec::new());
        for v in (0..used.len()).filter(|&v| used[v]) {
            remap[v] = positions.len();
            positions.push(self.positions[v]);
            if let (Some(out), Some(src)) = (normals.as_mut(), self.normals.as_ref()) {
                out.push(src[v]);
            }
        }

        let faces = self
            .triangles
            .iter()
            .flatten()
            .map(|tri| tri.iter().map(|&v| remap[v]).collect())
            .collect();

        let mut mesh = PolygonMesh::from_vertices_and_faces(positions, faces);
        mesh.name = template.name.clone();
        mesh.shading = template.shading;
        if let Some(normals) = normals {
            mesh.set_normals(normals);
        }
        mesh
    }
}

/// A queued collapse of `drop` into `keep`
#[derive(Debug, Clone)]
struct EdgeCost {
    keep: usize,
    drop: usize,
    position: Point3f,
    cost: f64,
}

impl PartialEq for EdgeCost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for EdgeCost {}

impl PartialOrd for EdgeCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCost {
    // Reversed: the queue pops the cheapest collapse, ties by vertex index
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| (other.keep, other.drop).cmp(&(self.keep, self.drop)))
    }
}

/// Sharp edges and the vertices they touch, fixed at the start of a run.
#[derive(Default)]
struct FeatureSet {
    edges: HashSet<(usize, usize)>,
    vertices: Vec<bool>,
}

impl FeatureSet {
    fn detect(mesh: &PolygonMesh, angle: f32) -> Self {
        let topology = EdgeTopology::build(mesh);
        let normals = mesh.calculate_face_normals();
        let mut vertices = vec![false; mesh.vertices.len()];
        let mut edges = HashSet::new();
        for (&(a, b), _) in topology.edges() {
            if let Some(dihedral) = topology.dihedral_angle(&normals, a, b) {
                if dihedral > angle {
                    edges.insert((a, b));
                    vertices[a] = true;
                    vertices[b] = true;
                }
            }
        }
        Self { edges, vertices }
    }

    fn is_vertex(&self, v: usize) -> bool {
        self.vertices.get(v).copied().unwrap_or(false)
    }
}

/// Quadric error edge collapse simplifier
pub struct EdgeCollapseSimplifier {
    /// Added to the cost of collapses touching the boundary
    pub boundary_weight: f64,
    /// Dihedral angle (radians) above which an edge counts as a feature
    pub feature_angle: Option<f32>,
    /// Added to the cost of collapses touching a feature vertex
    pub feature_weight: f64,
}

impl Default for EdgeCollapseSimplifier {
    fn default() -> Self {
        Self {
            boundary_weight: 100.0,
            feature_angle: None,
            feature_weight: 10.0,
        }
    }
}

impl EdgeCollapseSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boundary_weight(mut self, weight: f64) -> Self {
        self.boundary_weight = weight;
        self
    }

    /// Protect edges sharper than `angle` radians.
    pub fn with_feature_angle(mut self, angle: Option<f32>) -> Self {
        self.feature_angle = angle;
        self
    }

    /// Price the collapse of edge (a, b), or `None` if it must not collapse.
    ///
    /// A feature vertex, or failing that the single boundary vertex of an
    /// edge running inwards, stays where it is and absorbs the other end.
    fn candidate(
        &self,
        mesh: &CollapseMesh,
        features: &FeatureSet,
        a: usize,
        b: usize,
    ) -> Option<EdgeCost> {
        let (a, b) = edge_key(a, b);
        if features.edges.contains(&(a, b)) {
            return None;
        }
        let (fa, fb) = (features.is_vertex(a), features.is_vertex(b));
        if fa && fb {
            return None;
        }
        let (ba, bb) = (mesh.is_boundary_vertex(a), mesh.is_boundary_vertex(b));

        let anchor = if fa || fb {
            Some(if fa { a } else { b })
        } else if ba != bb {
            Some(if ba { a } else { b })
        } else {
            None
        };

        let (keep, drop, position, mut cost) = match anchor {
            Some(keep) => {
                let drop = if keep == a { b } else { a };
                let q = mesh.quadrics[keep] + mesh.quadrics[drop];
                let p = mesh.positions[keep];
                (keep, drop, p, quadric_error(&q, &p))
            }
            None => {
                let (p, e) = mesh.placement(a, b);
                (a, b, p, e)
            }
        };

        if fa || fb {
            cost += self.feature_weight;
        }
        if ba || bb {
            cost += self.boundary_weight;
        }

        Some(EdgeCost {
            keep,
            drop,
            position,
            cost,
        })
    }

    fn build_queue(
        &self,
        mesh: &CollapseMesh,
        features: &FeatureSet,
    ) -> PriorityQueue<(usize, usize), EdgeCost> {
        let mut queue = PriorityQueue::new();
        for &(a, b) in mesh.edge_faces.keys() {
            if let Some(cost) = self.candidate(mesh, features, a, b) {
                queue.push((a, b), cost);
            }
        }
        queue
    }

    /// Reprice every edge around `v`
    fn requeue(
        &self,
        mesh: &CollapseMesh,
        features: &FeatureSet,
        v: usize,
        queue: &mut PriorityQueue<(usize, usize), EdgeCost>,
    ) {
        for u in mesh.neighbors(v) {
            let key = edge_key(v, u);
            match self.candidate(mesh, features, v, u) {
                Some(cost) => {
                    queue.push(key, cost);
                }
                None => {
                    queue.remove(&key);
                }
            }
        }
    }

    /// Collapse edges until at most `target_faces` triangles remain or no
    /// valid candidate is left.
    ///
    /// An edge rejected by the link or fold test is parked on both endpoints
    /// and only retried after a collapse changes the triangles around one of
    /// them.
    pub fn simplify_to_face_count(
        &self,
        mesh: &PolygonMesh,
        target_faces: usize,
    ) -> Result<PolygonMesh> {
        mesh.validate()?;
        let triangles = mesh.triangulate();
        if triangles.faces.len() <= target_faces {
            return Ok(triangles);
        }

        let features = match self.feature_angle {
            Some(angle) => FeatureSet::detect(&triangles, angle),
            None => FeatureSet::default(),
        };

        let mut work = CollapseMesh::from_triangles(&triangles);
        let mut queue = self.build_queue(&work, &features);
        let mut parked: Vec<Vec<usize>> = vec![Vec::new(); work.positions.len()];
        let mut collapses = 0usize;
        let mut rejected = 0usize;

        while work.live_triangles > target_faces {
            let Some(((a, b), queued)) = queue.pop() else {
                break;
            };
            if !work.alive[a] || !work.alive[b] || work.edge_triangles(a, b) == 0 {
                continue;
            }
            if !work.link_condition(a, b) {
                parked[a].push(b);
                parked[b].push(a);
                rejected += 1;
                continue;
            }
            let Some(current) = self.candidate(&work, &features, a, b) else {
                continue;
            };
            if current.cost > queued.cost {
                queue.push((a, b), current);
                continue;
            }
            let (keep, drop) = (current.keep, current.drop);
            if work.folds(keep, drop, &current.position) {
                parked[a].push(b);
                parked[b].push(a);
                rejected += 1;
                continue;
            }

            let orphaned = work.neighbors(drop);
            let mut ring: Vec<(usize, bool)> = orphaned
                .union(&work.neighbors(keep))
                .map(|&v| (v, work.is_boundary_vertex(v)))
                .collect();
            ring.sort_unstable();

            work.collapse(keep, drop, current.position);
            for &n in &orphaned {
                queue.remove(&edge_key(drop, n));
            }
            self.requeue(&work, &features, keep, &mut queue);
            parked[keep].clear();
            for &(v, was_boundary) in &ring {
                if v == drop || v == keep || !work.alive[v] {
                    continue;
                }
                if work.is_boundary_vertex(v) != was_boundary {
                    self.requeue(&work, &features, v, &mut queue);
                }
                for u in std::mem::take(&mut parked[v]) {
                    if !work.alive[u] || work.edge_triangles(v, u) == 0 {
                        continue;
                    }
                    if let Some(cost) = self.candidate(&work, &features, v, u) {
                        queue.push(edge_key(v, u), cost);
                    }
                }
            }
            parked[drop].clear();
            collapses += 1;
        }

        debug!(
            collapses,
            rejected,
            triangles = work.live_triangles,
            target = target_faces,
            "Edge collapse finished"
        );
        Ok(work.into_polygon_mesh(mesh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::test_meshes::*;
    use approx::assert_relative_eq;

    fn single_triangle() -> PolygonMesh {
        PolygonMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.5, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2]],
        )
    }

    fn tetrahedron() -> PolygonMesh {
        PolygonMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.5, 1.0, 0.0),
                Point3f::new(0.5, 0.5, 1.0),
            ],
            vec![vec![0, 2, 1], vec![0, 1, 3], vec![0, 3, 2], vec![1, 2, 3]],
        )
    }

    fn total_area(mesh: &PolygonMesh) -> f32 {
        (0..mesh.face_count()).map(|f| mesh.face_area(f)).sum()
    }

    #[test]
    fn test_defaults() {
        let s = EdgeCollapseSimplifier::new();
        assert_eq!(s.boundary_weight, 100.0);
        assert!(s.feature_angle.is_none());
        assert_eq!(s.with_boundary_weight(1.0).boundary_weight, 1.0);
    }

    #[test]
    fn test_plane_quadric_measures_squared_distance() {
        let q = plane_quadric(
            &Point3f::new(0.0, 0.0, 0.0),
            &Point3f::new(1.0, 0.0, 0.0),
            &Point3f::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(quadric_error(&q, &Point3f::new(3.0, -2.0, 0.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(quadric_error(&q, &Point3f::new(0.5, 0.5, 2.0)), 4.0, epsilon = 1e-9);

        let flat = Point3f::new(1.0, 1.0, 1.0);
        assert!(plane_quadric(&flat, &flat, &flat).is_none());
    }

    #[test]
    fn test_closed_incidence() {
        let work = CollapseMesh::from_triangles(&tetrahedron());
        assert_eq!(work.live_triangles, 4);
        for v in 0..4 {
            assert_eq!(work.neighbors(v).len(), 3);
            assert!(!work.is_boundary_vertex(v));
        }
        assert_eq!(work.edge_triangles(0, 1), 2);
    }

    #[test]
    fn test_open_incidence() {
        let work = CollapseMesh::from_triangles(&single_triangle());
        assert_eq!(work.edge_triangles(0, 1), 1);
        assert!(work.is_boundary_vertex(0));
        assert!(work.link_condition(0, 1));
    }

    #[test]
    fn test_edge_counts_follow_collapses() {
        let mut work = CollapseMesh::from_triangles(&quad_grid(2).triangulate());
        assert!(!work.is_boundary_vertex(4));
        assert!(work.is_boundary_vertex(1));

        let target = work.positions[1];
        work.collapse(1, 4, target);
        assert_eq!(work.live_triangles, 6);

        let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
        for tri in work.triangles.iter().flatten() {
            for (a, b) in triangle_edges(tri) {
                *counts.entry(edge_key(a, b)).or_insert(0) += 1;
            }
        }
        assert_eq!(counts, work.edge_faces);
        for v in 0..9 {
            let open = counts
                .iter()
                .filter(|&(&(a, b), &n)| n == 1 && (a == v || b == v))
                .count();
            assert_eq!(open, work.open_edges[v], "vertex {}", v);
        }
    }

    #[test]
    fn test_invalid_input() {
        let s = EdgeCollapseSimplifier::new();
        assert!(s.simplify_to_face_count(&PolygonMesh::new(), 1).is_err());
        let kept = s.simplify_to_face_count(&single_triangle(), 1).unwrap();
        assert_eq!(kept.face_count(), 1);
    }

    #[test]
    fn test_curved_surface_simplification() {
        let s = EdgeCollapseSimplifier::new().with_boundary_weight(1.0);
        let mesh = curved_triangle_grid(12);
        let original = mesh.face_count();

        let result = s.simplify_to_face_count(&mesh, original / 2).unwrap();
        assert!(result.face_count() < original);
        assert!(result.face_count() > 0);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_quads_are_triangulated() {
        let s = EdgeCollapseSimplifier::new().with_boundary_weight(1.0);
        let mesh = quad_grid(10);
        let result = s.simplify_to_face_count(&mesh, 50).unwrap();
        assert!(result.faces.iter().all(|f| f.len() == 3));
        assert!(result.face_count() < 2 * mesh.face_count());
    }

    #[test]
    fn test_flat_grid_keeps_outline_without_folds() {
        // Interior collapses are free, so the outline is untouched this far
        let s = EdgeCollapseSimplifier::new();
        let mesh = quad_grid(10);
        let result = s.simplify_to_face_count(&mesh, 120).unwrap();

        assert!(result.face_count() < 200);
        assert_relative_eq!(total_area(&result), 100.0, epsilon = 1e-2);
        for f in 0..result.face_count() {
            assert!(result.face_normal(f).z > 0.0, "face {} folded over", f);
        }
    }

    #[test]
    fn test_feature_edges_survive() {
        // A folded grid: the crease along x = 5 is a 90 degree feature
        let mut mesh = quad_grid(10);
        for p in mesh.vertices.iter_mut() {
            if p.x > 5.0 {
                p.z = p.x - 5.0;
                p.x = 5.0;
            }
        }
        let crease: Vec<Point3f> = mesh
            .vertices
            .iter()
            .filter(|p| p.x == 5.0 && p.z == 0.0)
            .copied()
            .collect();

        let s = EdgeCollapseSimplifier::new().with_boundary_weight(1.0)
            .with_feature_angle(Some(15f32.to_radians()));
        let result = s.simplify_to_face_count(&mesh, 60).unwrap();
        assert!(result.face_count() < 200);
        for p in crease {
            assert!(
                result.vertices.iter().any(|q| (q - p).norm() < 1e-4),
                "crease vertex {:?} was moved",
                p
            );
        }
    }

    #[test]
    fn test_normals_follow_vertices() {
        let mut mesh = curved_triangle_grid(8);
        let normals = vec![Vector3f::new(0.0, 0.0, 1.0); mesh.vertex_count()];
        mesh.set_normals(normals);

        let s = EdgeCollapseSimplifier::new();
        let result = s.simplify_to_face_count(&mesh, 70).unwrap();
        assert!(result.face_count() < mesh.face_count());
        let result_normals = result.normals.as_ref().unwrap();
        assert_eq!(result_normals.len(), result.vertex_count());
    }

    #[test]
    fn test_repeatable() {
        let s = EdgeCollapseSimplifier::new();
        let mesh = curved_triangle_grid(10);
        let first = s.simplify_to_face_count(&mesh, 80).unwrap();
        let second = s.simplify_to_face_count(&mesh, 80).unwrap();
        assert_eq!(first.faces, second.faces);
        assert_eq!(first.vertices, second.vertices);
    }
}
