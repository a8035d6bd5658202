//! Confidence drift detector.
//!
//! Derived detector: it weighs the findings of the other four against the
//! anchor's prior mapping confidence and flags when the implied
//! degradation crosses the configured threshold. Must run last.

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::types::{DriftDetail, DriftFinding, DriftKind, Severity};

/// Per-kind weights for confidence degradation.
fn kind_weight(kind: DriftKind) -> f64 {
    match kind {
        DriftKind::Distribution => 0.20,
        DriftKind::Format => 0.30,
        DriftKind::Unit => 0.30,
        DriftKind::Joinability => 0.20,
        DriftKind::Confidence => 0.0,
    }
}

pub struct ConfidenceDetector;

impl Detector for ConfidenceDetector {
    fn kind(&self) -> DriftKind {
        DriftKind::Confidence
    }

    fn applies(&self, ctx: &DetectionContext<'_>) -> bool {
        ctx.anchor.confidence.is_some()
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<DriftFinding>> {
        let Some(previous) = ctx.anchor.confidence else {
            return Ok(None);
        };

        let degradation: f64 = ctx
            .prior
            .iter()
            .map(|f| kind_weight(f.kind()) * f.severity.penalty())
            .sum();
        let updated = (previous * (1.0 - degradation)).clamp(0.0, 1.0);
        let drop = (previous - updated).max(0.0);

        if drop <= ctx.config.thresholds.confidence_degradation_threshold {
            return Ok(None);
        }

        let severity = if drop > 0.40 {
            Severity::Critical
        } else if drop > 0.25 {
            Severity::High
        } else if drop > 0.15 {
            Severity::Medium
        } else {
            Severity::Low
        };

        Ok(Some(DriftFinding {
            severity,
            metric_value: drop,
            threshold: ctx.config.thresholds.confidence_degradation_threshold,
            description: format!(
                "mapping confidence degraded {:.3} → {:.3} under detected drift",
                previous, updated
            ),
            detail: DriftDetail::Confidence {
                previous,
                updated,
                degradation,
            },
        }))
    }
}
