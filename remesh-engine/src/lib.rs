//! Native mesh operations for remesh
//!
//! This crate provides the operations the decimation layer drives:
//! - Quadric edge collapse with feature edge protection
//! - Un-subdivide for meshes produced by regular quad subdivision
//! - Planar dissolve of nearly coplanar faces
//! - Catmull-Clark subdivision
//! - Normal orientation, smooth shading and edge split
//!
//! Every operation takes the input mesh by reference and returns a new
//! mesh, so a failed call never leaves a half-modified mesh behind.

pub mod topology;
pub mod edge_collapse;
pub mod unsubdivide;
pub mod dissolve;
pub mod subdivision;
pub mod shading;

pub use edge_collapse::*;
pub use unsubdivide::{unsubdivide, unsubdivide_once};
pub use dissolve::planar_dissolve;
pub use subdivision::subdivide;
pub use shading::{edge_split, recalculate_normals, shade_smooth};

use remesh_core::{Error, PolygonMesh, Result};
use tracing::debug;

/// The mesh operations available to the decimation layer.
///
/// Angles are in radians. Implementations must not mutate the input.
pub trait MeshEngine {
    /// Collapse edges until about `keep_ratio` of the faces remain.
    ///
    /// With `angle_limit`, edges sharper than the limit are kept intact.
    fn collapse(
        &self,
        mesh: &PolygonMesh,
        keep_ratio: f32,
        angle_limit: Option<f32>,
    ) -> Result<PolygonMesh>;

    /// Undo up to `iterations` levels of quad subdivision.
    fn unsubdivide(&self, mesh: &PolygonMesh, iterations: u32) -> Result<PolygonMesh>;

    /// Merge neighbouring faces that are coplanar within `angle_limit`.
    fn dissolve(
        &self,
        mesh: &PolygonMesh,
        angle_limit: f32,
        dissolve_boundaries: bool,
    ) -> Result<PolygonMesh>;

    /// Apply `levels` rounds of subdivision surface.
    fn subdivide(&self, mesh: &PolygonMesh, levels: u32) -> Result<PolygonMesh>;

    /// Orient faces consistently, outward unless `inside` is set.
    fn recalculate_normals(&self, mesh: &PolygonMesh, inside: bool) -> Result<PolygonMesh>;

    fn shade_smooth(&self, mesh: &PolygonMesh) -> Result<PolygonMesh>;

    /// Split edges sharper than `split_angle`.
    fn edge_split(&self, mesh: &PolygonMesh, split_angle: f32) -> Result<PolygonMesh>;
}

/// The built-in engine backed by the algorithms of this crate
#[derive(Debug, Clone)]
pub struct NativeEngine {
    /// Penalty added to collapses that touch the open boundary
    pub boundary_weight: f64,
}

impl Default for NativeEngine {
    fn default() -> Self {
        Self {
            boundary_weight: 100.0,
        }
    }
}

impl NativeEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Pass an operation's result on only if it is still a usable mesh
fn checked(
    operation: &'static str,
    before: &PolygonMesh,
    result: Result<PolygonMesh>,
) -> Result<PolygonMesh> {
    let mesh = result?;
    mesh.validate().map_err(|e| {
        Error::Engine(format!("{} produced an unusable mesh: {}", operation, e))
    })?;
    debug!(
        operation,
        faces_before = before.face_count(),
        faces_after = mesh.face_count(),
        "Engine operation"
    );
    Ok(mesh)
}

impl MeshEngine for NativeEngine {
    fn collapse(
        &self,
        mesh: &PolygonMesh,
        keep_ratio: f32,
        angle_limit: Option<f32>,
    ) -> Result<PolygonMesh> {
        if !(keep_ratio > 0.0 && keep_ratio <= 1.0) {
            return Err(Error::InvalidData(format!(
                "keep ratio {} is outside (0, 1]",
                keep_ratio
            )));
        }
        let target_faces = (mesh.face_count() as f32 * keep_ratio).round() as usize;
        debug!(keep_ratio, target_faces, angle_limit, "Edge collapse");
        let simplifier = EdgeCollapseSimplifier::new()
            .with_boundary_weight(self.boundary_weight)
            .with_feature_angle(angle_limit);
        checked(
            "collapse",
            mesh,
            simplifier.simplify_to_face_count(mesh, target_faces),
        )
    }

    fn unsubdivide(&self, mesh: &PolygonMesh, iterations: u32) -> Result<PolygonMesh> {
        checked("unsubdivide", mesh, unsubdivide::unsubdivide(mesh, iterations))
    }

    fn dissolve(
        &self,
        mesh: &PolygonMesh,
        angle_limit: f32,
        dissolve_boundaries: bool,
    ) -> Result<PolygonMesh> {
        checked(
            "dissolve",
            mesh,
            planar_dissolve(mesh, angle_limit, dissolve_boundaries),
        )
    }

    fn subdivide(&self, mesh: &PolygonMesh, levels: u32) -> Result<PolygonMesh> {
        checked("subdivide", mesh, subdivision::subdivide(mesh, levels))
    }

    fn recalculate_normals(&self, mesh: &PolygonMesh, inside: bool) -> Result<PolygonMesh> {
        checked(
            "recalculate_normals",
            mesh,
            shading::recalculate_normals(mesh, inside),
        )
    }

    fn shade_smooth(&self, mesh: &PolygonMesh) -> Result<PolygonMesh> {
        checked("shade_smooth", mesh, shading::shade_smooth(mesh))
    }

    fn edge_split(&self, mesh: &PolygonMesh, split_angle: f32) -> Result<PolygonMesh> {
        checked("edge_split", mesh, shading::edge_split(mesh, split_angle))
    }
}
