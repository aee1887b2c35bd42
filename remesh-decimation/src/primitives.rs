//! Decimation primitives over a mesh engine
//!
//! Each primitive runs one engine operation on a copy of the mesh and
//! commits the result only if the face count went down. Engine errors are
//! logged and reported as `false`; the mesh is then left exactly as it was.

use crate::config::{
    ADJUSTED_REDUCTION_MAX, ADJUSTED_REDUCTION_MIN, MIN_FACES_TO_COLLAPSE, MIN_KEEP_RATIO,
    SHARP_ANGLE_LIMIT_DEG,
};
use remesh_core::{PolygonMesh, Result};
use remesh_engine::MeshEngine;
use tracing::{debug, warn};

/// Reduction ratio for the collapse that follows one level of subdivision,
/// chosen so the net result approaches `target_reduction` of `faces_before`.
pub fn adjusted_reduction(
    faces_before: usize,
    faces_subdivided: usize,
    target_reduction: f32,
) -> f32 {
    if faces_subdivided == 0 {
        return ADJUSTED_REDUCTION_MAX;
    }
    let wanted = faces_before as f32 * (1.0 - target_reduction);
    let adjusted = 1.0 - wanted / faces_subdivided as f32;
    adjusted.clamp(ADJUSTED_REDUCTION_MIN, ADJUSTED_REDUCTION_MAX)
}

/// Keep ratio handed to the engine for a collapse of `ratio`
pub fn keep_ratio(ratio: f32) -> f32 {
    (1.0 - ratio).max(MIN_KEEP_RATIO)
}

/// The four decimation operations the strategies are built from
pub struct DecimationPrimitives<'e, E: MeshEngine + ?Sized> {
    engine: &'e E,
}

impl<'e, E: MeshEngine + ?Sized> DecimationPrimitives<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &'e E {
        self.engine
    }

    /// Quadric collapse removing about `ratio` of the faces.
    ///
    /// With `preserve_sharp`, edges sharper than 15 degrees are protected.
    pub fn collapse(&self, mesh: &mut PolygonMesh, ratio: f32, preserve_sharp: bool) -> bool {
        self.collapse_with_angle(mesh, ratio, preserve_sharp, SHARP_ANGLE_LIMIT_DEG)
    }

    pub fn collapse_with_angle(
        &self,
        mesh: &mut PolygonMesh,
        ratio: f32,
        preserve_sharp: bool,
        angle_limit_deg: f32,
    ) -> bool {
        let keep = keep_ratio(ratio);
        let angle = preserve_sharp.then(|| angle_limit_deg.to_radians());
        debug!(ratio, keep, preserve_sharp, "Quadric collapse");
        self.commit("collapse", mesh, |m| self.engine.collapse(m, keep, angle))
    }

    /// Reverse up to `iterations` levels of regular subdivision
    pub fn unsubdivide(&self, mesh: &mut PolygonMesh, iterations: u32) -> bool {
        debug!(iterations, "Un-subdivide");
        self.commit("unsubdivide", mesh, |m| self.engine.unsubdivide(m, iterations))
    }

    /// Merge coplanar neighbours within `angle_degrees`.
    ///
    /// Vertices on the open boundary are kept unless `dissolve_boundaries`.
    pub fn planar_dissolve(
        &self,
        mesh: &mut PolygonMesh,
        angle_degrees: f32,
        dissolve_boundaries: bool,
    ) -> bool {
        debug!(angle_degrees, dissolve_boundaries, "Planar dissolve");
        self.commit("planar_dissolve", mesh, |m| {
            self.engine
                .dissolve(m, angle_degrees.to_radians(), dissolve_boundaries)
        })
    }

    /// One level of subdivision surface, then a sharp-preserving collapse
    /// sized so the net reduction approaches `target_reduction`.
    pub fn subdivide_then_collapse(&self, mesh: &mut PolygonMesh, target_reduction: f32) -> bool {
        let faces_before = mesh.face_count();
        self.commit("subdivide_then_collapse", mesh, |m| {
            let subdivided = self.engine.subdivide(m, 1)?;
            let adjusted =
                adjusted_reduction(faces_before, subdivided.face_count(), target_reduction);
            debug!(
                faces_before,
                faces_subdivided = subdivided.face_count(),
                adjusted,
                "Subdivide then collapse"
            );
            self.engine.collapse(
                &subdivided,
                keep_ratio(adjusted),
                Some(SHARP_ANGLE_LIMIT_DEG.to_radians()),
            )
        })
    }

    fn commit<F>(&self, operation: &str, mesh: &mut PolygonMesh, op: F) -> bool
    where
        F: FnOnce(&PolygonMesh) -> Result<PolygonMesh>,
    {
        let faces_before = mesh.face_count();
        if faces_before < MIN_FACES_TO_COLLAPSE {
            debug!(operation, faces = faces_before, "Too few faces, skipping");
            return false;
        }

        match op(mesh) {
            Ok(result) if !result.faces.is_empty() && result.face_count() < faces_before => {
                *mesh = result;
                true
            }
            Ok(result) => {
                debug!(
                    operation,
                    faces_before,
                    faces_after = result.face_count(),
                    "Operation did not reduce the face count"
                );
                false
            }
            Err(e) => {
                warn!(operation, error = %e, "Engine operation failed");
                false
            }
        }
    }
}
