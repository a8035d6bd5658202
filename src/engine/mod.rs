//! The drift detection engine.
//!
//! One engine instance serves many concurrent evaluations; it owns
//! nothing but its configuration, and every input is read-only for the
//! duration of a call. Entry points:
//!
//! - [`DriftEngine::evaluate`] — authoritative path over the full column.
//! - [`DriftEngine::evaluate_fast`] — fingerprint quick-check, bounded
//!   sampling, and concurrent advisory pre-checks in front of the same
//!   detectors.
//! - [`DriftEngine::evaluate_stream`] — bounded-memory evaluation of a
//!   lazy value source (see [`stream`]).
//! - [`DriftEngine::evaluate_batch`] — semaphore-bounded concurrent
//!   evaluation of many columns (see [`batch`]).

pub mod batch;
pub mod stream;

pub use batch::{BatchItem, BatchMetrics, BatchOutcome};
pub use stream::{SliceSource, ValueEvent, ValueSource};

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::aggregate;
use crate::config::DriftConfig;
use crate::detectors;
use crate::error::{DriftError, Result};
use crate::fastpath::{self, sampling};
use crate::types::{
    Anchor, CellValue, DriftFinding, DriftReport, Fingerprint, PerformanceMetrics,
};

/// Per-call options. The default runs to completion with the config's
/// soft deadline, uncancellable.
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Cooperative cancellation; checked at every suspension point.
    pub cancel: Option<CancellationToken>,
    /// Overrides `runtime.soft_deadline_ms` when set.
    pub deadline_ms: Option<u64>,
}

/// Column drift detection engine. Cheap to clone; clones share nothing
/// but the configuration values.
#[derive(Debug, Clone, Default)]
pub struct DriftEngine {
    config: DriftConfig,
}

impl DriftEngine {
    pub fn new(config: DriftConfig) -> Self {
        for warning in config.validate() {
            tracing::warn!(field = %warning.field, "config warning: {warning}");
        }
        Self { config }
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Evaluate one column against its anchor over the full value set.
    pub async fn evaluate(
        &self,
        anchor: &Anchor,
        values: &[CellValue],
        current: &Fingerprint,
    ) -> Result<DriftReport> {
        self.evaluate_with(anchor, values, current, EvalOptions::default())
            .await
    }

    /// [`evaluate`](Self::evaluate) with cancellation and deadline control.
    pub async fn evaluate_with(
        &self,
        anchor: &Anchor,
        values: &[CellValue],
        current: &Fingerprint,
        opts: EvalOptions,
    ) -> Result<DriftReport> {
        let started = Instant::now();
        self.check_inputs(anchor, current)?;

        let findings = self.run_detectors_guarded(anchor, current, values, &opts, started)?;
        Ok(self.build_report(
            anchor,
            findings,
            PerformanceMetrics {
                detection_time_ms: elapsed_ms(started),
                samples_processed: values.len(),
                optimization_applied: false,
                compression_ratio: 1.0,
            },
        ))
    }

    /// Reduced-cost evaluation: O(1) fingerprint quick-check with early
    /// exit, then bounded sampling and concurrent advisory pre-checks in
    /// front of the authoritative detectors.
    pub async fn evaluate_fast(
        &self,
        anchor: &Anchor,
        values: &[CellValue],
        current: &Fingerprint,
    ) -> Result<DriftReport> {
        self.evaluate_fast_with(anchor, values, current, EvalOptions::default())
            .await
    }

    pub async fn evaluate_fast_with(
        &self,
        anchor: &Anchor,
        values: &[CellValue],
        current: &Fingerprint,
        opts: EvalOptions,
    ) -> Result<DriftReport> {
        let started = Instant::now();
        self.check_inputs(anchor, current)?;

        let would_sample = self.config.runtime.performance_mode
            && values.len() > self.config.sampling.sample_size_limit;

        if let Some(finding) = fastpath::quick_check(&anchor.fingerprint, current) {
            info!(
                anchor = %anchor.anchor_id,
                finding = %finding.description,
                "quick-check early exit"
            );
            return Ok(self.build_report(
                anchor,
                vec![finding],
                PerformanceMetrics {
                    detection_time_ms: elapsed_ms(started),
                    samples_processed: 0,
                    optimization_applied: would_sample,
                    compression_ratio: 1.0,
                },
            ));
        }

        let (working_set, optimization_applied, compression_ratio) = if would_sample {
            let outcome = sampling::sample_values(
                values,
                self.config.sampling.sample_size_limit,
                self.config.sampling.seed,
            );
            let ratio = outcome.compression_ratio();
            debug!(
                anchor = %anchor.anchor_id,
                original = outcome.original_len,
                sampled = outcome.values.len(),
                "sampled working set"
            );
            (outcome.values, true, ratio)
        } else {
            (values.to_vec(), false, 1.0)
        };

        if self.config.runtime.performance_mode {
            // Advisory only; verdicts land in the logs.
            let shared = Arc::new(working_set.clone());
            let baseline = Arc::new(anchor.fingerprint.clone());
            let reports = fastpath::run_prechecks(baseline, shared, &self.config).await;
            let suspicious = reports.iter().filter(|r| r.suspicious).count();
            debug!(anchor = %anchor.anchor_id, suspicious, "pre-checks complete");
        }

        let findings =
            self.run_detectors_guarded(anchor, current, &working_set, &opts, started)?;
        Ok(self.build_report(
            anchor,
            findings,
            PerformanceMetrics {
                detection_time_ms: elapsed_ms(started),
                samples_processed: working_set.len(),
                optimization_applied,
                compression_ratio,
            },
        ))
    }

    /// Structural invariant check on the inputs; violations are caller
    /// bugs, reported as `Internal`.
    fn check_inputs(&self, anchor: &Anchor, current: &Fingerprint) -> Result<()> {
        anchor
            .fingerprint
            .check_invariants()
            .map_err(|e| DriftError::Internal(format!("baseline fingerprint: {e}")))?;
        current
            .check_invariants()
            .map_err(|e| DriftError::Internal(format!("current fingerprint: {e}")))?;
        Ok(())
    }

    /// Run the detector sequence with cancellation and deadline
    /// checkpoints between detectors.
    fn run_detectors_guarded(
        &self,
        anchor: &Anchor,
        current: &Fingerprint,
        values: &[CellValue],
        opts: &EvalOptions,
        started: Instant,
    ) -> Result<Vec<DriftFinding>> {
        let deadline_ms = opts.deadline_ms.or(self.config.runtime.soft_deadline_ms);
        let cancel = opts.cancel.clone();
        detectors::run_detectors_with(anchor, current, values, &self.config, || {
            if let Some(token) = &cancel {
                if token.is_cancelled() {
                    return Err(DriftError::Cancelled);
                }
            }
            if let Some(limit) = deadline_ms {
                if elapsed_ms(started) > limit as f64 {
                    return Err(DriftError::Timeout(limit));
                }
            }
            Ok(())
        })
    }

    fn build_report(
        &self,
        anchor: &Anchor,
        findings: Vec<DriftFinding>,
        performance: PerformanceMetrics,
    ) -> DriftReport {
        let rollup = aggregate::aggregate(&findings);
        let report = DriftReport {
            anchor_id: anchor.anchor_id.clone(),
            column_name: anchor.column_name.clone(),
            drift_detected: !findings.is_empty(),
            findings,
            severity: rollup.severity,
            confidence_score: rollup.confidence_score,
            recommendations: rollup.recommendations,
            performance,
        };
        if report.drift_detected {
            info!(
                anchor = %report.anchor_id,
                column = %report.column_name,
                severity = %report.severity,
                findings = report.findings.len(),
                confidence = report.confidence_score,
                "drift detected"
            );
        } else {
            debug!(anchor = %report.anchor_id, "no drift");
        }
        report
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
