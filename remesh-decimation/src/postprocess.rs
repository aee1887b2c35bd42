//! Shading cleanup after a successful reduction

use crate::config::EDGE_SPLIT_ANGLE_DEG;
use remesh_core::{PolygonMesh, Result};
use remesh_engine::MeshEngine;
use serde::Serialize;
use tracing::{debug, warn};

/// Which post-processing steps completed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PostProcessReport {
    pub normals: bool,
    pub smooth_shading: bool,
    pub edge_split: bool,
}

impl PostProcessReport {
    pub fn is_complete(&self) -> bool {
        self.normals && self.smooth_shading && self.edge_split
    }
}

/// Outward normals, smooth shading, then an edge split at 30 degrees
pub struct PostProcessor;

impl PostProcessor {
    /// Run the steps in order.
    ///
    /// A failing step is logged and the remaining steps are skipped; the mesh
    /// keeps the result of the last step that worked.
    pub fn run<E: MeshEngine + ?Sized>(engine: &E, mesh: &mut PolygonMesh) -> PostProcessReport {
        let mut report = PostProcessReport::default();

        report.normals = Self::step("recalculate_normals", mesh, |m| {
            engine.recalculate_normals(m, false)
        });
        if !report.normals {
            return report;
        }

        report.smooth_shading = Self::step("shade_smooth", mesh, |m| engine.shade_smooth(m));
        if !report.smooth_shading {
            return report;
        }

        report.edge_split = Self::step("edge_split", mesh, |m| {
            engine.edge_split(m, EDGE_SPLIT_ANGLE_DEG.to_radians())
        });
        debug!(?report, "Post-processing finished");
        report
    }

    fn step<F>(name: &str, mesh: &mut PolygonMesh, op: F) -> bool
    where
        F: FnOnce(&PolygonMesh) -> Result<PolygonMesh>,
    {
        match op(mesh) {
            Ok(result) => {
                *mesh = result;
                true
            }
            Err(e) => {
                warn!(step = name, error = %e, "Post-processing step failed");
                false
            }
        }
    }
}
