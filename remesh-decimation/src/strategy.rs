//! Strategy catalog: which primitives to try, in which order, per category

use crate::analyzer::TopologyCategory;
use crate::primitives::DecimationPrimitives;
use remesh_core::PolygonMesh;
use remesh_engine::MeshEngine;
use serde::Serialize;

/// One parameterized call into the decimation primitives
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StrategyStep {
    Collapse { ratio: f32, preserve_sharp: bool },
    Unsubdivide { iterations: u32 },
    PlanarDissolve { angle_degrees: f32 },
    SubdivideThenCollapse { target: f32 },
}

impl StrategyStep {
    pub fn apply<E: MeshEngine + ?Sized>(
        &self,
        primitives: &DecimationPrimitives<'_, E>,
        mesh: &mut PolygonMesh,
    ) -> bool {
        match *self {
            StrategyStep::Collapse {
                ratio,
                preserve_sharp,
            } => primitives.collapse(mesh, ratio, preserve_sharp),
            StrategyStep::Unsubdivide { iterations } => primitives.unsubdivide(mesh, iterations),
            StrategyStep::PlanarDissolve { angle_degrees } => {
                primitives.planar_dissolve(mesh, angle_degrees, false)
            }
            StrategyStep::SubdivideThenCollapse { target } => {
                primitives.subdivide_then_collapse(mesh, target)
            }
        }
    }
}

/// A named sequence of steps.
///
/// A composite strategy succeeds only if every step does; it stops at the
/// first step that fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strategy {
    pub name: &'static str,
    pub steps: Vec<StrategyStep>,
}

impl Strategy {
    pub fn single(name: &'static str, step: StrategyStep) -> Self {
        Self {
            name,
            steps: vec![step],
        }
    }

    pub fn composite(name: &'static str, steps: Vec<StrategyStep>) -> Self {
        Self { name, steps }
    }

    pub fn apply<E: MeshEngine + ?Sized>(
        &self,
        primitives: &DecimationPrimitives<'_, E>,
        mesh: &mut PolygonMesh,
    ) -> bool {
        self.steps.iter().all(|step| step.apply(primitives, mesh))
    }
}

fn collapse(ratio: f32, preserve_sharp: bool) -> StrategyStep {
    StrategyStep::Collapse {
        ratio,
        preserve_sharp,
    }
}

/// Maps a topology category to its ordered strategy list
pub struct StrategyCatalog;

impl StrategyCatalog {
    /// Strategies for `category`, most conservative first.
    ///
    /// `Unknown` has no strategies.
    pub fn strategies(category: TopologyCategory, target: f32) -> Vec<Strategy> {
        match category {
            TopologyCategory::Structured => vec![
                Strategy::single("Conservative Quadric", collapse(target * 0.7, true)),
                Strategy::single("Un-Subdivide", StrategyStep::Unsubdivide { iterations: 2 }),
                Strategy::single("Standard Quadric", collapse(target, true)),
                Strategy::single(
                    "Planar Dissolve",
                    StrategyStep::PlanarDissolve { angle_degrees: 5.0 },
                ),
            ],
            TopologyCategory::Dense => vec![
                Strategy::single(
                    "SubSurf + Collapse",
                    StrategyStep::SubdivideThenCollapse { target },
                ),
                Strategy::single("Progressive Quadric", collapse(target * 0.8, true)),
                Strategy::single("Un-Subdivide", StrategyStep::Unsubdivide { iterations: 3 }),
                Strategy::single("Aggressive Quadric", collapse(target, false)),
            ],
            TopologyCategory::Organic => vec![
                Strategy::single("Quality Quadric", collapse(target * 0.6, true)),
                Strategy::single(
                    "SubSurf + Collapse",
                    StrategyStep::SubdivideThenCollapse { target },
                ),
                Strategy::composite(
                    "Planar + Quadric",
                    vec![
                        StrategyStep::PlanarDissolve { angle_degrees: 3.0 },
                        collapse(target * 0.5, true),
                    ],
                ),
                Strategy::single("Standard Quadric", collapse(target, true)),
            ],
            TopologyCategory::Unknown => Vec::new(),
        }
    }
}
