//! Reduction settings and the heuristic constants of the decision layer

use remesh_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Quad ratio above which a mesh is classified as structured
pub const STRUCTURED_QUAD_RATIO: f32 = 0.7;
/// Vertex/face ratio above which a non-structured mesh is classified as dense
pub const DENSE_VERTEX_FACE_RATIO: f32 = 0.8;
/// An attempt is effective when it leaves fewer than this share of the faces
pub const EFFECTIVE_REDUCTION_FACTOR: f32 = 0.95;
/// Meshes with fewer faces are already optimal
pub const MIN_FACES_TO_REDUCE: usize = 100;
/// Lower edge of the "close enough" window, relative to the target face count
pub const TARGET_WINDOW_LOW: f32 = 0.7;
/// Upper edge of the "close enough" window, relative to the target face count
pub const TARGET_WINDOW_HIGH: f32 = 1.3;
/// Collapse never keeps less than this share of the faces
pub const MIN_KEEP_RATIO: f32 = 0.1;
pub const ADJUSTED_REDUCTION_MIN: f32 = 0.1;
pub const ADJUSTED_REDUCTION_MAX: f32 = 0.9;
/// Dihedral angle protected by sharp-edge collapse, in degrees
pub const SHARP_ANGLE_LIMIT_DEG: f32 = 15.0;
/// Split angle of the post-processing edge split, in degrees
pub const EDGE_SPLIT_ANGLE_DEG: f32 = 30.0;
/// Primitives refuse meshes with fewer faces
pub const MIN_FACES_TO_COLLAPSE: usize = 4;
pub const DEFAULT_TARGET_REDUCTION: f32 = 0.5;

/// Settings for one reduction run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReductionConfig {
    /// Share of faces to remove, in `[0, 1]`
    pub target_reduction: f32,
    /// Run normal cleanup and smoothing after a successful reduction
    pub post_process: bool,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            target_reduction: DEFAULT_TARGET_REDUCTION,
            post_process: true,
        }
    }
}

impl ReductionConfig {
    pub fn new(target_reduction: f32) -> Self {
        Self {
            target_reduction,
            ..Self::default()
        }
    }

    pub fn with_post_process(mut self, post_process: bool) -> Self {
        self.post_process = post_process;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.target_reduction) {
            return Err(Error::InvalidData(format!(
                "target reduction {} is outside [0, 1]",
                self.target_reduction
            )));
        }
        Ok(())
    }
}

/// Parse a user supplied target reduction.
///
/// Missing values give the default; unparsable or out-of-range values also
/// give the default, with a warning.
pub fn parse_target_reduction(value: Option<&str>) -> f32 {
    let Some(raw) = value else {
        return DEFAULT_TARGET_REDUCTION;
    };
    match raw.trim().parse::<f32>() {
        Ok(v) if (0.0..=1.0).contains(&v) => v,
        Ok(v) => {
            warn!(
                value = v,
                default = DEFAULT_TARGET_REDUCTION,
                "Target reduction must be between 0 and 1, using default"
            );
            DEFAULT_TARGET_REDUCTION
        }
        Err(e) => {
            warn!(
                value = raw,
                error = %e,
                default = DEFAULT_TARGET_REDUCTION,
                "Invalid target reduction, using default"
            );
            DEFAULT_TARGET_REDUCTION
        }
    }
}
