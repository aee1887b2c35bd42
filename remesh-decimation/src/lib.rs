//! Topology-aware polygon reduction
//!
//! The decision layer on top of a [`MeshEngine`](remesh_engine::MeshEngine):
//! - [`MeshAnalyzer`] measures a mesh and classifies its topology
//! - [`StrategyCatalog`] picks an ordered list of strategies per category
//! - [`ReductionController`] runs them against a target reduction, stopping
//!   once the face count is close enough
//! - [`PostProcessor`] fixes normals and shading after a successful run

pub mod config;
pub mod analyzer;
pub mod primitives;
pub mod strategy;
pub mod controller;
pub mod postprocess;

#[cfg(test)]
mod test_meshes;

pub use config::*;
pub use analyzer::*;
pub use primitives::*;
pub use strategy::*;
pub use controller::*;
pub use postprocess::*;
