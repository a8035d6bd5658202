//! Unit/scale drift detector (numeric columns).

use super::{DetectionContext, Detector};
use crate::error::Result;
use crate::types::{DriftDetail, DriftFinding, DriftKind, Severity};

pub struct UnitDetector;

impl Detector for UnitDetector {
    fn kind(&self) -> DriftKind {
        DriftKind::Unit
    }

    fn applies(&self, ctx: &DetectionContext<'_>) -> bool {
        ctx.baseline.dtype.is_numeric() && ctx.current.dtype.is_numeric()
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<DriftFinding>> {
        let Some((min_h, max_h)) = ctx.baseline.numeric_range() else {
            return Ok(None);
        };
        let Some((min_c, max_c)) = ctx.current.numeric_range() else {
            return Ok(None);
        };

        let range_h = max_h - min_h;
        let range_c = max_c - min_c;
        // A zero range carries no scale information.
        if range_h == 0.0 || range_c == 0.0 {
            return Ok(None);
        }

        let scale = range_c / range_h;
        let threshold = ctx.config.thresholds.scale_change_threshold;
        if scale <= threshold && scale >= 1.0 / threshold {
            return Ok(None);
        }

        // The magnitude of the change, regardless of direction.
        let factor = scale.max(1.0 / scale);
        let severity = if factor > 100.0 {
            Severity::Critical
        } else if factor > 50.0 {
            Severity::High
        } else if factor > 10.0 {
            Severity::Medium
        } else {
            Severity::Low
        };

        Ok(Some(DriftFinding {
            severity,
            metric_value: factor,
            threshold,
            description: format!(
                "value range rescaled ×{:.3} ([{min_h}, {max_h}] → [{min_c}, {max_c}])",
                scale
            ),
            detail: DriftDetail::Unit {
                scale,
                baseline_range: (min_h, max_h),
                current_range: (min_c, max_c),
            },
        }))
    }
}
