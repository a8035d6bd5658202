//! Column fingerprints: immutable structural/statistical snapshots.

use serde::{Deserialize, Serialize};

use super::DType;

/// Compact summary of a column, captured once and compared against later
/// observations. Immutable after construction; detectors read it without
/// synchronization.
///
/// `min`/`max` are stored in wire form (stringified) because text columns
/// carry lexicographic bounds. Use [`numeric_range`](Self::numeric_range)
/// for numeric dtypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub dtype: DType,
    /// Number of distinct non-absent values.
    pub cardinality: u64,
    /// Fraction of absent cells, in [0, 1].
    pub null_ratio: f64,
    /// Distinct / non-absent, in [0, 1].
    pub unique_ratio: f64,
    pub min: Option<String>,
    pub max: Option<String>,
    /// Bounded, insertion-ordered, distinct stringified values.
    #[serde(default)]
    pub sample_values: Vec<String>,
    /// Patterns deemed characteristic of the column.
    #[serde(default)]
    pub regex_patterns: Vec<String>,
}

impl Fingerprint {
    /// Empty-column fingerprint for the given dtype.
    pub fn empty(dtype: DType) -> Self {
        Self {
            dtype,
            cardinality: 0,
            null_ratio: 0.0,
            unique_ratio: 0.0,
            min: None,
            max: None,
            sample_values: Vec::new(),
            regex_patterns: Vec::new(),
        }
    }

    /// Parsed numeric bounds, available only when both are present and
    /// parse as floats.
    pub fn numeric_range(&self) -> Option<(f64, f64)> {
        let lo = self.min.as_deref()?.trim().parse::<f64>().ok()?;
        let hi = self.max.as_deref()?.trim().parse::<f64>().ok()?;
        Some((lo, hi))
    }

    /// Check structural invariants. Violations indicate a caller bug and
    /// are reported as `Internal` by the engine.
    pub fn check_invariants(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.null_ratio) {
            return Err(format!("null_ratio out of range: {}", self.null_ratio));
        }
        if !(0.0..=1.0).contains(&self.unique_ratio) {
            return Err(format!("unique_ratio out of range: {}", self.unique_ratio));
        }
        if let Some((lo, hi)) = self.numeric_range() {
            if lo > hi {
                return Err(format!("min {lo} > max {hi}"));
            }
        }
        Ok(())
    }
}
