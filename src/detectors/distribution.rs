//! Distribution drift detector (numeric columns).

use tracing::debug;

use super::{DetectionContext, Detector};
use crate::config::defaults::{MEAN_SHIFT_THRESHOLD, MIN_BASELINE_FOR_KS, LARGE_SAMPLE_COMBINED};
use crate::error::Result;
use crate::stats;
use crate::types::{DriftDetail, DriftFinding, DriftKind, Severity};

pub struct DistributionDetector;

impl Detector for DistributionDetector {
    fn kind(&self) -> DriftKind {
        DriftKind::Distribution
    }

    fn applies(&self, ctx: &DetectionContext<'_>) -> bool {
        ctx.baseline.dtype.is_numeric() && ctx.current.dtype.is_numeric()
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<DriftFinding>> {
        let baseline: Vec<f64> = ctx
            .baseline
            .sample_values
            .iter()
            .filter_map(|s| s.trim().parse::<f64>().ok())
            .collect();
        let current: Vec<f64> = ctx.values.iter().filter_map(|v| v.as_f64()).collect();

        if baseline.is_empty() || current.is_empty() {
            debug!(anchor = %ctx.anchor.anchor_id, "no numeric series on one side, skipping");
            return Ok(None);
        }

        // Small baselines cannot support the statistical tests; fall back
        // to a robust relative mean-shift heuristic.
        if baseline.len() < MIN_BASELINE_FOR_KS {
            return Ok(mean_shift_heuristic(&baseline, &current));
        }

        let ks = stats::ks_two_sample(&baseline, &current, ctx.config.thresholds.ks_p_threshold)?;
        let psi = stats::population_stability_index(
            &baseline,
            &current,
            ctx.config.sampling.psi_bins,
        )?;

        let ks_significant = ks.p_value < ctx.config.thresholds.ks_p_threshold;
        let psi_significant = psi.score > ctx.config.thresholds.psi_threshold;

        // At large combined n the KS test flags trivially small CDF gaps;
        // require PSI confirmation there.
        let large = baseline.len() + current.len() >= LARGE_SAMPLE_COMBINED;
        let triggered = if large {
            psi_significant
        } else {
            ks_significant || psi_significant
        };
        if !triggered {
            return Ok(None);
        }

        let severity = severity_for(psi.score, ks.p_value);
        Ok(Some(DriftFinding {
            severity,
            metric_value: psi.score.max(1.0 - ks.p_value),
            threshold: ctx
                .config
                .thresholds
                .psi_threshold
                .min(ctx.config.thresholds.ks_p_threshold),
            description: format!(
                "numeric distribution shifted (PSI {:.3}, KS D {:.3}, p {:.2e})",
                psi.score, ks.statistic, ks.p_value
            ),
            detail: DriftDetail::Distribution {
                ks_statistic: Some(ks.statistic),
                ks_p_value: Some(ks.p_value),
                psi: Some(psi.score),
                mean_shift: None,
            },
        }))
    }
}

fn severity_for(psi: f64, p_value: f64) -> Severity {
    if psi > 0.25 || p_value < 0.001 {
        Severity::Critical
    } else if psi > 0.15 || p_value < 0.01 {
        Severity::High
    } else if psi > 0.10 || p_value < 0.05 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn mean_shift_heuristic(baseline: &[f64], current: &[f64]) -> Option<DriftFinding> {
    let mean_hist = stats::mean(baseline);
    let mean_curr = stats::mean(current);
    let rel = (mean_curr - mean_hist).abs() / mean_hist.abs().max(1.0);
    if rel <= MEAN_SHIFT_THRESHOLD {
        return None;
    }
    let severity = if rel > 1.0 {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(DriftFinding {
        severity,
        metric_value: rel,
        threshold: MEAN_SHIFT_THRESHOLD,
        description: format!(
            "mean shifted by {:.0}% against a small baseline ({} samples)",
            rel * 100.0,
            baseline.len()
        ),
        detail: DriftDetail::Distribution {
            ks_statistic: None,
            ks_p_value: None,
            psi: None,
            mean_shift: Some(rel),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriftConfig;
    use crate::detectors::test_support::*;
    use crate::types::{CellValue, DType};

    fn detect(
        baseline_samples: Vec<String>,
        values: Vec<CellValue>,
    ) -> Option<DriftFinding> {
        let mut baseline = numeric_fingerprint(0.0, 100.0, 100, 1.0);
        baseline.sample_values = baseline_samples;
        let anchor = anchor_with(baseline);
        let current = numeric_fingerprint(0.0, 100.0, 100, 1.0);
        let config = DriftConfig::default();
        let ctx = DetectionContext {
            anchor: &anchor,
            baseline: &anchor.fingerprint,
            current: &current,
            values: &values,
            config: &config,
            prior: &[],
        };
        assert!(DistributionDetector.applies(&ctx));
        DistributionDetector.detect(&ctx).unwrap()
    }

    #[test]
    fn does_not_apply_to_text() {
        let mut baseline = numeric_fingerprint(0.0, 1.0, 10, 1.0);
        baseline.dtype = DType::Text;
        let anchor = anchor_with(baseline);
        let current = numeric_fingerprint(0.0, 1.0, 10, 1.0);
        let config = DriftConfig::default();
        let values = int_values(0..10);
        let ctx = DetectionContext {
            anchor: &anchor,
            baseline: &anchor.fingerprint,
            current: &current,
            values: &values,
            config: &config,
            prior: &[],
        };
        assert!(!DistributionDetector.applies(&ctx));
    }

    #[test]
    fn identical_distributions_do_not_drift() {
        let samples: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let values = int_values(0..100);
        assert!(detect(samples, values).is_none());
    }

    #[test]
    fn small_baseline_uses_mean_shift_heuristic() {
        // 20 baseline samples around 10; current around 14 → rel 0.4.
        let samples: Vec<String> = (0..20).map(|_| "10".to_string()).collect();
        let values: Vec<CellValue> = (0..50).map(|_| CellValue::Int(14)).collect();
        let finding = detect(samples, values).unwrap();
        assert_eq!(finding.severity, Severity::Medium);
        assert!(matches!(
            finding.detail,
            DriftDetail::Distribution {
                mean_shift: Some(_),
                ks_statistic: None,
                ..
            }
        ));
    }

    #[test]
    fn small_baseline_large_shift_is_high() {
        let samples: Vec<String> = (0..20).map(|_| "10".to_string()).collect();
        let values: Vec<CellValue> = (0..50).map(|_| CellValue::Int(100)).collect();
        let finding = detect(samples, values).unwrap();
        assert_eq!(finding.severity, Severity::High);
    }

    #[test]
    fn small_baseline_small_shift_is_quiet() {
        let samples: Vec<String> = (0..20).map(|_| "10".to_string()).collect();
        let values: Vec<CellValue> = (0..50).map(|_| CellValue::Int(11)).collect();
        assert!(detect(samples, values).is_none());
    }

    #[test]
    fn clear_shift_is_critical() {
        let samples: Vec<String> = (1..=100).map(|i| i.to_string()).collect();
        let values = int_values(500..700);
        let finding = detect(samples, values).unwrap();
        assert_eq!(finding.severity, Severity::Critical);
        assert!(finding.metric_value > 0.25);
    }

    #[test]
    fn severity_is_monotone_in_psi() {
        // Fixed p-value, rising PSI must never lower the severity.
        let p = 0.03;
        let severities: Vec<Severity> = [0.05, 0.12, 0.2, 0.3]
            .iter()
            .map(|&psi| severity_for(psi, p))
            .collect();
        for pair in severities.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        // Fixed PSI, falling p-value must never lower the severity.
        let severities: Vec<Severity> = [0.04, 0.02, 0.005, 0.0005]
            .iter()
            .map(|&p| severity_for(0.05, p))
            .collect();
        for pair in severities.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}
