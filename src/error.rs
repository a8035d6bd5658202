//! Error types for the drift detection engine.
//!
//! Errors are grouped by recovery class:
//! - `InvalidInput` / `IncompatibleSchema` are recovered per-detector
//!   (the evaluation continues with the remaining detectors).
//! - `Timeout` / `Cancelled` abort the whole evaluation and surface to the
//!   caller as a distinct outcome (never reported as "no drift").
//! - `Internal` is an invariant violation and always fatal to the evaluation.

use thiserror::Error;

/// Errors produced by the drift detection core.
#[derive(Debug, Error)]
pub enum DriftError {
    /// Malformed caller input: bad fingerprint wire string, empty kernel
    /// input, mismatched vector lengths.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A detector was asked to compare dtypes it cannot reconcile
    /// (e.g. distribution analysis across text/float). Recovered by
    /// skipping that detector.
    #[error("incompatible schema: baseline {baseline} vs current {current}")]
    IncompatibleSchema { baseline: String, current: String },

    /// The evaluation exceeded its soft deadline.
    #[error("evaluation exceeded deadline of {0} ms")]
    Timeout(u64),

    /// The caller cancelled the evaluation at a suspension point.
    #[error("evaluation cancelled")]
    Cancelled,

    /// Engine configuration could not be loaded or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Invariant violation inside the engine. Always a bug.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DriftError>;

impl DriftError {
    /// True for errors that abort the whole evaluation rather than a
    /// single detector.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DriftError::Timeout(_)
                | DriftError::Cancelled
                | DriftError::Internal(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(DriftError::Timeout(500).is_fatal());
        assert!(DriftError::Cancelled.is_fatal());
        assert!(DriftError::Internal("bug".into()).is_fatal());
        assert!(!DriftError::InvalidInput("empty".into()).is_fatal());
        assert!(!DriftError::IncompatibleSchema {
            baseline: "text".into(),
            current: "float".into()
        }
        .is_fatal());
    }
}
