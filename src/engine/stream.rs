//! Streaming evaluation over a lazy value source.
//!
//! The stream is never materialized: a seeded reservoir holds a bounded
//! uniform sample, a Welford accumulator tracks the running numeric
//! summary, and a periodic fingerprint quick-check can terminate the
//! stream early on obviously-critical change.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{elapsed_ms, DriftEngine, EvalOptions};
use crate::detectors;
use crate::error::{DriftError, Result};
use crate::fastpath::{self, sampling::ReservoirSampler};
use crate::types::{Anchor, CellValue, DriftReport, Fingerprint, PerformanceMetrics};

/// Events produced by a value source.
pub enum ValueEvent {
    Value(CellValue),
    /// Source exhausted.
    End,
}

/// A lazy, possibly unbounded source of column values.
///
/// Implementations handle chunking and backpressure internally; the
/// evaluator awaits [`next_value`](Self::next_value) as its suspension
/// point, so cancellation and deadline checks happen between values.
#[async_trait]
pub trait ValueSource: Send + 'static {
    async fn next_value(&mut self) -> Result<ValueEvent>;

    /// Human-readable name for logging.
    fn source_name(&self) -> &str {
        "stream"
    }
}

/// In-memory source, mostly for tests and replays.
pub struct SliceSource {
    values: std::vec::IntoIter<CellValue>,
}

impl SliceSource {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }
}

#[async_trait]
impl ValueSource for SliceSource {
    async fn next_value(&mut self) -> Result<ValueEvent> {
        Ok(match self.values.next() {
            Some(v) => ValueEvent::Value(v),
            None => ValueEvent::End,
        })
    }

    fn source_name(&self) -> &str {
        "slice"
    }
}

/// Running stream summary: Welford mean/variance for numerics plus
/// absent/total counts for the true null ratio.
#[derive(Debug, Default)]
struct StreamAccumulator {
    total: usize,
    absent: usize,
    numeric_count: usize,
    mean: f64,
    m2: f64,
}

impl StreamAccumulator {
    fn push(&mut self, value: &CellValue) {
        self.total += 1;
        if value.is_absent() {
            self.absent += 1;
            return;
        }
        if let Some(v) = value.as_f64() {
            self.numeric_count += 1;
            let delta = v - self.mean;
            self.mean += delta / self.numeric_count as f64;
            self.m2 += delta * (v - self.mean);
        }
    }

    fn null_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.absent as f64 / self.total as f64
        }
    }

    fn std_dev(&self) -> f64 {
        if self.numeric_count < 2 {
            0.0
        } else {
            (self.m2 / (self.numeric_count - 1) as f64).sqrt()
        }
    }
}

impl DriftEngine {
    /// Evaluate a streaming column against its anchor.
    ///
    /// Consumes the source to exhaustion (or early exit), reservoir-
    /// sampling up to the configured working-set bound. Every
    /// `stream_check_interval` values the reservoir is fingerprinted and
    /// quick-checked; a critical quick-check verdict ends the stream
    /// immediately.
    pub async fn evaluate_stream<S: ValueSource>(
        &self,
        anchor: &Anchor,
        mut source: S,
        opts: EvalOptions,
    ) -> Result<DriftReport> {
        let started = std::time::Instant::now();
        let deadline_ms = opts.deadline_ms.or(self.config.runtime.soft_deadline_ms);

        let mut reservoir = ReservoirSampler::new(
            self.config.sampling.sample_size_limit,
            self.config.sampling.seed,
        );
        let mut accumulator = StreamAccumulator::default();
        let check_interval = self.config.runtime.stream_check_interval.max(1);
        let mut early_exit = None;

        loop {
            if let Some(token) = &opts.cancel {
                if token.is_cancelled() {
                    return Err(DriftError::Cancelled);
                }
            }
            if let Some(limit) = deadline_ms {
                if elapsed_ms(started) > limit as f64 {
                    return Err(DriftError::Timeout(limit));
                }
            }

            match source.next_value().await? {
                ValueEvent::Value(value) => {
                    accumulator.push(&value);
                    reservoir.push(value);

                    if reservoir.seen() % check_interval == 0 {
                        let interim = self.interim_fingerprint(anchor, &reservoir, &accumulator);
                        if let Some(finding) =
                            fastpath::quick_check(&anchor.fingerprint, &interim)
                        {
                            info!(
                                anchor = %anchor.anchor_id,
                                source = source.source_name(),
                                seen = reservoir.seen(),
                                finding = %finding.description,
                                "streaming early exit"
                            );
                            early_exit = Some(finding);
                            break;
                        }
                    }
                }
                ValueEvent::End => break,
            }
        }

        let seen = reservoir.seen();
        let sampled = reservoir.values().len();
        let performance = PerformanceMetrics {
            detection_time_ms: elapsed_ms(started),
            samples_processed: sampled,
            optimization_applied: seen > sampled,
            compression_ratio: if seen == 0 {
                1.0
            } else {
                sampled as f64 / seen as f64
            },
        };

        if let Some(finding) = early_exit {
            return Ok(self.build_report(anchor, vec![finding], performance));
        }

        debug!(
            anchor = %anchor.anchor_id,
            source = source.source_name(),
            seen,
            sampled,
            mean = accumulator.mean,
            std = accumulator.std_dev(),
            "stream drained"
        );

        let current = self.interim_fingerprint(anchor, &reservoir, &accumulator);
        let findings = detectors::run_detectors_with(
            anchor,
            &current,
            reservoir.values(),
            &self.config,
            || {
                if let Some(token) = &opts.cancel {
                    if token.is_cancelled() {
                        return Err(DriftError::Cancelled);
                    }
                }
                Ok(())
            },
        )?;
        Ok(self.build_report(anchor, findings, performance))
    }

    /// Fingerprint the reservoir contents, corrected with full-stream
    /// knowledge: the true null ratio comes from the accumulator, and
    /// once the reservoir has overflowed its cardinality is no longer
    /// comparable to the baseline's, so the baseline's value is carried
    /// to neutralize the quick-check cardinality probe.
    fn interim_fingerprint(
        &self,
        anchor: &Anchor,
        reservoir: &ReservoirSampler,
        accumulator: &StreamAccumulator,
    ) -> Fingerprint {
        let mut fp = crate::fingerprint::fingerprint_with_limit(
            reservoir.values(),
            None,
            self.config.sampling.fingerprint_sample_limit,
        );
        fp.null_ratio = accumulator.null_ratio();
        if reservoir.seen() > reservoir.values().len() {
            fp.cardinality = anchor.fingerprint.cardinality;
        }
        fp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DriftKind, Severity};
    use chrono::Utc;

    // Baseline with the same duplication profile as the test streams:
    // values 1..=100 repeated five times (unique ratio 0.2).
    fn int_anchor() -> Anchor {
        let values: Vec<CellValue> = (0..500).map(|i| CellValue::Int(i % 100 + 1)).collect();
        let fp = crate::fingerprint::fingerprint(&values, None);
        Anchor::new("a-stream", "ds", "amount", fp, Utc::now())
    }

    #[tokio::test]
    async fn clean_stream_reports_no_drift() {
        let engine = DriftEngine::default();
        let anchor = int_anchor();
        let values: Vec<CellValue> = (0..500).map(|i| CellValue::Int(i % 100 + 1)).collect();
        let report = engine
            .evaluate_stream(&anchor, SliceSource::new(values), EvalOptions::default())
            .await
            .unwrap();
        assert!(!report.drift_detected);
        assert_eq!(report.performance.samples_processed, 500);
        assert!(!report.performance.optimization_applied);
    }

    #[tokio::test]
    async fn shifted_stream_is_detected() {
        let engine = DriftEngine::default();
        let anchor = int_anchor();
        let values: Vec<CellValue> = (0..500).map(|i| CellValue::Int(5000 + i % 200)).collect();
        let report = engine
            .evaluate_stream(&anchor, SliceSource::new(values), EvalOptions::default())
            .await
            .unwrap();
        assert!(report.drift_detected);
        assert!(report.has(DriftKind::Distribution));
    }

    #[tokio::test]
    async fn long_stream_is_reservoir_bounded() {
        let mut config = crate::config::DriftConfig::default();
        config.sampling.sample_size_limit = 200;
        config.runtime.stream_check_interval = 1_000_000; // no interim checks
        let engine = DriftEngine::new(config);
        let anchor = int_anchor();
        let values: Vec<CellValue> = (0..5_000).map(|i| CellValue::Int(i % 100 + 1)).collect();
        let report = engine
            .evaluate_stream(&anchor, SliceSource::new(values), EvalOptions::default())
            .await
            .unwrap();
        assert_eq!(report.performance.samples_processed, 200);
        assert!(report.performance.optimization_applied);
        assert!((report.performance.compression_ratio - 0.04).abs() < 1e-9);
    }

    #[tokio::test]
    async fn null_flood_exits_early() {
        let mut config = crate::config::DriftConfig::default();
        config.runtime.stream_check_interval = 100;
        let engine = DriftEngine::new(config);
        let anchor = int_anchor();
        // 90% absent: the periodic quick-check should fire well before
        // the stream ends.
        let values: Vec<CellValue> = (0..10_000)
            .map(|i| {
                if i % 10 == 0 {
                    CellValue::Int(i % 100 + 1)
                } else {
                    CellValue::Absent
                }
            })
            .collect();
        let report = engine
            .evaluate_stream(&anchor, SliceSource::new(values), EvalOptions::default())
            .await
            .unwrap();
        assert!(report.drift_detected);
        assert_eq!(report.severity, Severity::Critical);
        assert!(report.performance.samples_processed < 10_000);
    }

    #[test]
    fn cancelled_stream_aborts() {
        let engine = DriftEngine::default();
        let anchor = int_anchor();
        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let values: Vec<CellValue> = (0..100).map(CellValue::Int).collect();
        let err = tokio_test::block_on(engine.evaluate_stream(
            &anchor,
            SliceSource::new(values),
            EvalOptions {
                cancel: Some(token),
                deadline_ms: None,
            },
        ))
        .unwrap_err();
        assert!(matches!(err, DriftError::Cancelled));
    }
}
