//! Concurrent advisory pre-checks.
//!
//! Four cheap probes dispatched concurrently over the sampled working
//! set. Their verdicts are telemetry for the fast path — the
//! authoritative detectors always have the final word.

use std::sync::Arc;

use tracing::debug;

use crate::config::DriftConfig;
use crate::stats;
use crate::types::{CellValue, Fingerprint};

/// Outcome of one advisory probe.
#[derive(Debug, Clone)]
pub struct PreCheckReport {
    pub name: &'static str,
    pub suspicious: bool,
    pub note: String,
}

/// Run the four pre-checks concurrently. Inputs are shared read-only;
/// each probe is pure computation on the sampled view.
pub async fn run_prechecks(
    baseline: Arc<Fingerprint>,
    values: Arc<Vec<CellValue>>,
    config: &DriftConfig,
) -> Vec<PreCheckReport> {
    let null_task = {
        let baseline = Arc::clone(&baseline);
        let values = Arc::clone(&values);
        tokio::spawn(async move { null_probe(&baseline, &values) })
    };
    let range_task = {
        let baseline = Arc::clone(&baseline);
        let values = Arc::clone(&values);
        tokio::spawn(async move { range_probe(&baseline, &values) })
    };
    let cardinality_task = {
        let baseline = Arc::clone(&baseline);
        let values = Arc::clone(&values);
        tokio::spawn(async move { cardinality_probe(&baseline, &values) })
    };
    let psi_task = {
        let baseline = Arc::clone(&baseline);
        let values = Arc::clone(&values);
        let bins = config.sampling.psi_bins;
        let limit = config.sampling.fast_psi_limit;
        let threshold = config.thresholds.psi_threshold;
        tokio::spawn(async move { psi_probe(&baseline, &values, bins, limit, threshold) })
    };

    let mut reports = Vec::with_capacity(4);
    for task in [null_task, range_task, cardinality_task, psi_task] {
        // A panicked probe loses only its own advisory verdict.
        if let Ok(report) = task.await {
            debug!(probe = report.name, suspicious = report.suspicious, note = %report.note, "pre-check");
            reports.push(report);
        }
    }
    reports
}

fn null_probe(baseline: &Fingerprint, values: &[CellValue]) -> PreCheckReport {
    let nulls = values.iter().filter(|v| v.is_absent()).count();
    let ratio = if values.is_empty() {
        0.0
    } else {
        nulls as f64 / values.len() as f64
    };
    let delta = (ratio - baseline.null_ratio).abs();
    PreCheckReport {
        name: "null_ratio",
        suspicious: delta > 0.1,
        note: format!("baseline {:.3}, sampled {:.3}", baseline.null_ratio, ratio),
    }
}

fn range_probe(baseline: &Fingerprint, values: &[CellValue]) -> PreCheckReport {
    let Some((min_h, max_h)) = baseline.numeric_range() else {
        return PreCheckReport {
            name: "range",
            suspicious: false,
            note: "no numeric baseline range".into(),
        };
    };
    let mut min_c = f64::INFINITY;
    let mut max_c = f64::NEG_INFINITY;
    for v in values.iter().filter_map(|v| v.as_f64()) {
        min_c = min_c.min(v);
        max_c = max_c.max(v);
    }
    if !min_c.is_finite() {
        return PreCheckReport {
            name: "range",
            suspicious: false,
            note: "no numeric values in sample".into(),
        };
    }
    let span_h = (max_h - min_h).abs().max(f64::EPSILON);
    let outside = (min_c < min_h - span_h) || (max_c > max_h + span_h);
    PreCheckReport {
        name: "range",
        suspicious: outside,
        note: format!("baseline [{min_h}, {max_h}], sampled [{min_c}, {max_c}]"),
    }
}

fn cardinality_probe(baseline: &Fingerprint, values: &[CellValue]) -> PreCheckReport {
    let mut seen = std::collections::HashSet::new();
    let mut non_absent = 0usize;
    for v in values {
        if let Some(s) = v.display_string() {
            non_absent += 1;
            seen.insert(s);
        }
    }
    let unique_ratio = if non_absent == 0 {
        0.0
    } else {
        seen.len() as f64 / non_absent as f64
    };
    let delta = (unique_ratio - baseline.unique_ratio).abs();
    PreCheckReport {
        name: "cardinality",
        suspicious: delta > 0.2,
        note: format!(
            "baseline unique {:.3}, sampled unique {:.3}",
            baseline.unique_ratio, unique_ratio
        ),
    }
}

fn psi_probe(
    baseline: &Fingerprint,
    values: &[CellValue],
    bins: usize,
    limit: usize,
    threshold: f64,
) -> PreCheckReport {
    if !baseline.dtype.is_numeric() {
        return PreCheckReport {
            name: "fast_psi",
            suspicious: false,
            note: "non-numeric baseline".into(),
        };
    }
    let expected: Vec<f64> = baseline
        .sample_values
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    let actual: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
    match stats::fast_psi(&expected, &actual, bins, limit) {
        Ok(psi) => PreCheckReport {
            name: "fast_psi",
            suspicious: psi.score > threshold,
            note: format!("score {:.3}", psi.score),
        },
        Err(e) => PreCheckReport {
            name: "fast_psi",
            suspicious: false,
            note: format!("skipped: {e}"),
        },
    }
}
