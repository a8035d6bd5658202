//! Shared data structures for the column drift detection pipeline.
//!
//! This module defines the core types flowing through the engine:
//! - `CellValue` / `DType`: scalar column cells and their inferred types
//! - `Fingerprint`: compact structural/statistical summary of a column
//! - `Anchor`: a named baseline fingerprint with identity and timestamps
//! - `DriftFinding` / `DriftReport`: detector outputs and their rollup

mod anchor;
mod drift;
mod fingerprint;
mod value;

pub use anchor::*;
pub use drift::*;
pub use fingerprint::*;
pub use value::*;
