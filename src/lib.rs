//! driftlens: semantic drift detection for tabular data columns.
//!
//! Compares a newly observed column against a recorded baseline
//! ("anchor") and answers: has the distribution, format, unit/scale,
//! joinability, or mapping confidence changed meaningfully — and with
//! what severity?
//!
//! ## Architecture
//!
//! - **Fingerprint**: compact, serializable column descriptor
//! - **StatKernels**: KS, PSI, chi-square, Anderson–Darling, Wasserstein
//! - **PatternAnalyzer**: semantic/structural pattern extraction and
//!   similarity
//! - **DriftDetectors**: distribution, format, unit, joinability,
//!   confidence — stateless, fixed order
//! - **Aggregator**: severity and confidence rollup
//! - **FastPath**: fingerprint quick-checks, bounded deterministic
//!   sampling, concurrent advisory pre-checks
//! - **Engine**: evaluate / evaluate_fast / evaluate_stream /
//!   evaluate_batch with cancellation and soft deadlines

pub mod aggregate;
pub mod config;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod fastpath;
pub mod fingerprint;
pub mod patterns;
pub mod stats;
pub mod types;

// Re-export the engine surface
pub use engine::{
    BatchItem, BatchMetrics, BatchOutcome, DriftEngine, EvalOptions, SliceSource, ValueEvent,
    ValueSource,
};

// Re-export commonly used types
pub use config::{DriftConfig, RuntimeConfig, SamplingConfig, ThresholdConfig};
pub use error::DriftError;
pub use types::{
    Anchor, AnchorRecord, CellValue, DriftDetail, DriftFinding, DriftKind, DriftReport, DType,
    Fingerprint, FormatStability, PerformanceMetrics, Severity,
};

// Re-export fingerprinting entry points
pub use fingerprint::{fingerprint, fingerprint_with_limit, infer_dtype};
