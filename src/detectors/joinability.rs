//! Joinability drift detector: unique-ratio stability.

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::types::{DriftDetail, DriftFinding, DriftKind, Severity};

pub struct JoinabilityDetector;

impl Detector for JoinabilityDetector {
    fn kind(&self) -> DriftKind {
        DriftKind::Joinability
    }

    /// Unique ratios exist on every fingerprint; this detector always
    /// applies.
    fn applies(&self, _ctx: &DetectionContext<'_>) -> bool {
        true
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<DriftFinding>> {
        let ur_h = ctx.baseline.unique_ratio;
        let ur_c = ctx.current.unique_ratio;
        let delta = (ur_h - ur_c).abs();

        if delta <= ctx.config.thresholds.uniqueness_threshold {
            return Ok(None);
        }

        let severity = if delta > 0.5 {
            Severity::Critical
        } else if delta > 0.25 {
            Severity::High
        } else if delta > 0.10 {
            Severity::Medium
        } else {
            Severity::Low
        };

        Ok(Some(DriftFinding {
            severity,
            metric_value: delta,
            threshold: ctx.config.thresholds.uniqueness_threshold,
            description: format!(
                "unique ratio moved {:.3} → {:.3}; column may no longer join cleanly",
                ur_h, ur_c
            ),
            detail: DriftDetail::Joinability {
                delta,
                duplicate_increase: (1.0 - ur_c) - (1.0 - ur_h),
                key_integrity: 1.0 - delta,
            },
        }))
    }
}
