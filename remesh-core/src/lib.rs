//! Core data structures and traits for remesh
//!
//! This crate provides the polygon mesh type shared by the mesh engine,
//! the decimation decision layer and the I/O crates, together with the
//! common error type.

pub mod point;
pub mod mesh;
pub mod traits;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
