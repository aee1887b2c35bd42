//! Mesh topology analysis and classification

use crate::config::{DENSE_VERTEX_FACE_RATIO, STRUCTURED_QUAD_RATIO};
use remesh_core::PolygonMesh;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Topology bucket that drives strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TopologyCategory {
    /// Quad dominant, typically modelled or subdivided
    Structured,
    /// Many vertices per face, typically scans or fine tessellations
    Dense,
    /// Everything else
    Organic,
    /// Not a usable polygon mesh; nothing should be attempted
    Unknown,
}

impl TopologyCategory {
    /// Classify from the two ratios. First match wins.
    pub fn classify(quad_ratio: f32, vertex_face_ratio: f32) -> Self {
        if quad_ratio > STRUCTURED_QUAD_RATIO {
            TopologyCategory::Structured
        } else if vertex_face_ratio > DENSE_VERTEX_FACE_RATIO {
            TopologyCategory::Dense
        } else {
            TopologyCategory::Organic
        }
    }
}

impl fmt::Display for TopologyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TopologyCategory::Structured => "structured",
            TopologyCategory::Dense => "dense",
            TopologyCategory::Organic => "organic",
            TopologyCategory::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Snapshot of the measurements used for classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeshMetrics {
    pub face_count: usize,
    pub vertex_count: usize,
    /// Quad faces over all faces, in `[0, 1]`
    pub quad_ratio: f32,
    /// Vertices over faces, clamped to `[0, 1]`
    pub vertex_face_ratio: f32,
    pub average_edge_length: f32,
}

impl MeshMetrics {
    /// Measure a mesh. Ratios and lengths are zero when there is nothing to
    /// divide by.
    pub fn compute(mesh: &PolygonMesh) -> Self {
        let face_count = mesh.face_count();
        let vertex_count = mesh.vertex_count();

        let quad_faces = (0..face_count).filter(|&f| mesh.is_quad_face(f)).count();
        let (quad_ratio, vertex_face_ratio) = if face_count > 0 {
            (
                quad_faces as f32 / face_count as f32,
                (vertex_count as f32 / face_count as f32).clamp(0.0, 1.0),
            )
        } else {
            (0.0, 0.0)
        };

        let edges = mesh.edges();
        let average_edge_length = if edges.is_empty() {
            0.0
        } else {
            let total: f32 = edges.iter().map(|&(a, b)| mesh.edge_length(a, b)).sum();
            total / edges.len() as f32
        };

        Self {
            face_count,
            vertex_count,
            quad_ratio,
            vertex_face_ratio,
            average_edge_length,
        }
    }

    pub fn category(&self) -> TopologyCategory {
        TopologyCategory::classify(self.quad_ratio, self.vertex_face_ratio)
    }
}

/// Inspects meshes and sorts them into topology categories
pub struct MeshAnalyzer;

impl MeshAnalyzer {
    /// Metrics of a valid mesh, or `None` if it is not a usable polygon mesh.
    pub fn metrics(mesh: &PolygonMesh) -> Option<MeshMetrics> {
        if let Err(e) = mesh.validate() {
            debug!(mesh = %mesh.name, error = %e, "Mesh is not analysable");
            return None;
        }
        Some(MeshMetrics::compute(mesh))
    }

    /// Category of a mesh; `Unknown` for invalid meshes.
    pub fn analyze(mesh: &PolygonMesh) -> TopologyCategory {
        match Self::metrics(mesh) {
            Some(metrics) => {
                let category = metrics.category();
                debug!(
                    mesh = %mesh.name,
                    faces = metrics.face_count,
                    vertices = metrics.vertex_count,
                    quad_ratio = metrics.quad_ratio,
                    vertex_face_ratio = metrics.vertex_face_ratio,
                    average_edge_length = metrics.average_edge_length,
                    %category,
                    "Analyzed mesh"
                );
                category
            }
            None => TopologyCategory::Unknown,
        }
    }
}
