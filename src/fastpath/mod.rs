//! Fast-path optimizations: fingerprint quick-checks, bounded sampling,
//! and concurrent advisory pre-checks.
//!
//! The quick-check is O(1) over two fingerprints and may terminate an
//! evaluation immediately with a critical finding. Sampling bounds the
//! working set for million-row inputs. Pre-checks are advisory only —
//! they never override the authoritative detectors.

mod prechecks;
pub mod sampling;

pub use prechecks::{run_prechecks, PreCheckReport};
pub use sampling::{ReservoirSampler, SampleOutcome};

use crate::config::defaults::{QUICK_CHECK_CARDINALITY_RATIO, QUICK_CHECK_NULL_DELTA};
use crate::types::{DriftDetail, DriftFinding, Fingerprint, FormatStability, Severity};

/// O(1) comparison of two fingerprints. Returns a critical finding when
/// the column has obviously changed identity: dtype flip, cardinality
/// explosion/collapse, or a null-ratio jump.
pub fn quick_check(baseline: &Fingerprint, current: &Fingerprint) -> Option<DriftFinding> {
    if baseline.dtype != current.dtype {
        // Numeric-bound changes read as population changes; everything
        // else reads as a format change.
        let detail = if current.dtype.is_numeric() {
            DriftDetail::Distribution {
                ks_statistic: None,
                ks_p_value: None,
                psi: None,
                mean_shift: None,
            }
        } else {
            DriftDetail::Format {
                similarity: 0.0,
                stability: FormatStability::FormatShift,
                new_patterns: Vec::new(),
                lost_patterns: Vec::new(),
                changed_patterns: Vec::new(),
            }
        };
        return Some(DriftFinding {
            severity: Severity::Critical,
            metric_value: 1.0,
            threshold: 1.0,
            description: format!(
                "column dtype changed {} → {}",
                baseline.dtype, current.dtype
            ),
            detail,
        });
    }

    if baseline.cardinality > 0 {
        let ratio = current.cardinality as f64 / baseline.cardinality as f64;
        if ratio > QUICK_CHECK_CARDINALITY_RATIO || ratio < 1.0 / QUICK_CHECK_CARDINALITY_RATIO {
            return Some(DriftFinding {
                severity: Severity::Critical,
                metric_value: ratio.max(1.0 / ratio.max(f64::MIN_POSITIVE)),
                threshold: QUICK_CHECK_CARDINALITY_RATIO,
                description: format!(
                    "cardinality moved ×{:.2} ({} → {})",
                    ratio, baseline.cardinality, current.cardinality
                ),
                detail: DriftDetail::Distribution {
                    ks_statistic: None,
                    ks_p_value: None,
                    psi: None,
                    mean_shift: None,
                },
            });
        }
    }

    let null_delta = (baseline.null_ratio - current.null_ratio).abs();
    if null_delta > QUICK_CHECK_NULL_DELTA {
        return Some(DriftFinding {
            severity: Severity::Critical,
            metric_value: null_delta,
            threshold: QUICK_CHECK_NULL_DELTA,
            description: format!(
                "null ratio moved {:.3} → {:.3}",
                baseline.null_ratio, current.null_ratio
            ),
            detail: DriftDetail::Distribution {
                ks_statistic: None,
                ks_p_value: None,
                psi: None,
                mean_shift: None,
            },
        });
    }

    None
}
