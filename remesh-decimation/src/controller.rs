//! Reduction controller
//!
//! Runs the strategies selected for a mesh's category one after another,
//! keeps score of which attempts were effective, and stops as soon as the
//! face count lands close enough to the target.

use crate::analyzer::{MeshAnalyzer, TopologyCategory};
use crate::config::{
    DEFAULT_TARGET_REDUCTION, EFFECTIVE_REDUCTION_FACTOR, MIN_FACES_TO_REDUCE, TARGET_WINDOW_HIGH,
    TARGET_WINDOW_LOW,
};
use crate::postprocess::{PostProcessReport, PostProcessor};
use crate::primitives::DecimationPrimitives;
use crate::strategy::StrategyCatalog;
use remesh_core::PolygonMesh;
use remesh_engine::MeshEngine;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// States of one `reduce` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Analyzing,
    Selecting,
    Attempting(usize),
    Converged,
    Exhausted,
    PostProcessing,
    Done,
}

/// One strategy run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReductionAttempt {
    pub strategy: &'static str,
    pub faces_before: usize,
    pub faces_after: usize,
    /// Every step ran without an engine failure and reduced the mesh
    pub succeeded: bool,
    /// The face count fell below 95% of `faces_before`
    pub effective: bool,
}

impl ReductionAttempt {
    pub fn is_effective(faces_before: usize, faces_after: usize) -> bool {
        (faces_after as f32) < faces_before as f32 * EFFECTIVE_REDUCTION_FACTOR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionStatus {
    /// The final mesh has fewer faces than the input
    Reduced,
    /// Too small to be worth reducing; left as is
    AlreadyOptimal,
    /// Every strategy ran and none reduced the mesh
    NoReduction,
    /// Not a usable polygon mesh
    InvalidMesh,
}

/// Informational grading of a finished reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    MetExpectation,
    Partial,
    Limited,
}

impl fmt::Display for QualityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityBand::MetExpectation => "met expectation",
            QualityBand::Partial => "partial",
            QualityBand::Limited => "limited",
        })
    }
}

/// Result of one `reduce` call
#[derive(Debug, Clone, Serialize)]
pub struct ReductionOutcome {
    pub original_faces: usize,
    pub final_faces: usize,
    pub actual_reduction_pct: f32,
    pub overall_success: bool,
    pub category: TopologyCategory,
    pub status: ReductionStatus,
    pub attempts: Vec<ReductionAttempt>,
    pub post_process: Option<PostProcessReport>,
    pub message: Option<String>,
}

impl ReductionOutcome {
    fn unchanged(
        faces: usize,
        category: TopologyCategory,
        status: ReductionStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            original_faces: faces,
            final_faces: faces,
            actual_reduction_pct: 0.0,
            overall_success: status == ReductionStatus::AlreadyOptimal,
            category,
            status,
            attempts: Vec::new(),
            post_process: None,
            message: Some(message.into()),
        }
    }

    pub fn quality(&self, target_reduction: f32) -> QualityBand {
        if self.actual_reduction_pct >= TARGET_WINDOW_LOW * target_reduction * 100.0 {
            QualityBand::MetExpectation
        } else if self.actual_reduction_pct > 10.0 {
            QualityBand::Partial
        } else {
            QualityBand::Limited
        }
    }
}

/// Drives strategy selection and execution for one mesh at a time
pub struct ReductionController<'e, E: MeshEngine + ?Sized> {
    engine: &'e E,
    post_process: bool,
}

impl<'e, E: MeshEngine + ?Sized> ReductionController<'e, E> {
    pub fn new(engine: &'e E) -> Self {
        Self {
            engine,
            post_process: true,
        }
    }

    /// Enable or disable the post-processing pass
    pub fn with_post_process(mut self, post_process: bool) -> Self {
        self.post_process = post_process;
        self
    }

    /// Reduce `mesh` in place towards removing `target_reduction` of its faces.
    #[instrument(skip_all, fields(mesh = %mesh.name, target = target_reduction))]
    pub fn reduce(&self, mesh: &mut PolygonMesh, target_reduction: f32) -> ReductionOutcome {
        let mut state = ControllerState::Idle;
        let target = if (0.0..=1.0).contains(&target_reduction) {
            target_reduction
        } else {
            warn!(
                target_reduction,
                default = DEFAULT_TARGET_REDUCTION,
                "Target reduction out of range, using default"
            );
            DEFAULT_TARGET_REDUCTION
        };

        transition(&mut state, ControllerState::Analyzing);
        let original_faces = mesh.face_count();
        let Some(metrics) = MeshAnalyzer::metrics(mesh) else {
            transition(&mut state, ControllerState::Done);
            return ReductionOutcome::unchanged(
                original_faces,
                TopologyCategory::Unknown,
                ReductionStatus::InvalidMesh,
                "invalid mesh: not a polygon mesh with faces",
            );
        };

        if original_faces < MIN_FACES_TO_REDUCE {
            info!(faces = original_faces, "Too few faces, skipping reduction");
            transition(&mut state, ControllerState::Done);
            return ReductionOutcome::unchanged(
                original_faces,
                metrics.category(),
                ReductionStatus::AlreadyOptimal,
                format!("{} faces is already optimal", original_faces),
            );
        }

        transition(&mut state, ControllerState::Selecting);
        let category = metrics.category();
        let target_faces = (original_faces as f32 * (1.0 - target)).floor();
        let strategies = StrategyCatalog::strategies(category, target);
        info!(
            %category,
            original_faces,
            target_faces,
            strategies = strategies.len(),
            "Selected strategies"
        );

        let primitives = DecimationPrimitives::new(self.engine);
        let window_low = target_faces * TARGET_WINDOW_LOW;
        let window_high = target_faces * TARGET_WINDOW_HIGH;
        let mut success = false;
        let mut attempts = Vec::with_capacity(strategies.len());

        for (i, strategy) in strategies.iter().enumerate() {
            transition(&mut state, ControllerState::Attempting(i));
            let faces_before = mesh.face_count();
            let succeeded = strategy.apply(&primitives, mesh);
            let faces_after = mesh.face_count();
            let effective = ReductionAttempt::is_effective(faces_before, faces_after);

            info!(
                strategy = strategy.name,
                faces_before,
                faces_after,
                succeeded,
                effective,
                "Strategy attempt"
            );
            attempts.push(ReductionAttempt {
                strategy: strategy.name,
                faces_before,
                faces_after,
                succeeded,
                effective,
            });

            if succeeded && effective {
                success = true;
            }
            let faces = faces_after as f32;
            if succeeded && faces >= window_low && faces <= window_high {
                info!(faces_after, target_faces, "Close to target, stopping");
                transition(&mut state, ControllerState::Converged);
                break;
            }
        }
        if state != ControllerState::Converged {
            transition(&mut state, ControllerState::Exhausted);
        }

        let post_process = if success && self.post_process {
            transition(&mut state, ControllerState::PostProcessing);
            Some(PostProcessor::run(self.engine, mesh))
        } else {
            None
        };

        let final_faces = mesh.face_count();
        let overall_success = final_faces < original_faces;
        let actual_reduction_pct =
            (original_faces as f32 - final_faces as f32) / original_faces as f32 * 100.0;
        transition(&mut state, ControllerState::Done);

        let (status, message) = if overall_success {
            info!(
                original_faces,
                final_faces,
                reduction_pct = actual_reduction_pct,
                "Reduction succeeded"
            );
            (ReductionStatus::Reduced, None)
        } else {
            warn!(original_faces, "Reduction failed: face count unchanged");
            (
                ReductionStatus::NoReduction,
                Some("no strategy reduced the face count".to_string()),
            )
        };

        ReductionOutcome {
            original_faces,
            final_faces,
            actual_reduction_pct,
            overall_success,
            category,
            status,
            attempts,
            post_process,
            message,
        }
    }
}

fn transition(state: &mut ControllerState, next: ControllerState) {
    debug!(from = ?*state, to = ?next, "Controller transition");
    *state = next;
}
