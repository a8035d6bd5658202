//! Concurrency-bounded batch evaluation.
//!
//! Independent evaluations are dispatched onto the runtime behind a
//! semaphore capped at `runtime.max_workers`. Outputs come back in input
//! order regardless of completion order. Callers must not mutate inputs
//! while a batch is in flight.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::{DriftEngine, EvalOptions};
use crate::error::{DriftError, Result};
use crate::types::{Anchor, CellValue, DriftReport, Fingerprint};

/// One aligned evaluation input.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub anchor: Anchor,
    pub values: Vec<CellValue>,
    pub fingerprint: Fingerprint,
}

/// Aggregate throughput telemetry for a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchMetrics {
    pub total_ms: f64,
    pub items: usize,
    pub failures: usize,
    pub throughput_per_sec: f64,
}

/// Per-input reports (input order) plus batch telemetry.
#[derive(Debug)]
pub struct BatchOutcome {
    pub reports: Vec<Result<DriftReport>>,
    pub metrics: BatchMetrics,
}

impl DriftEngine {
    /// Evaluate many columns concurrently, at most `max_workers` at a
    /// time. Each item takes the fast path when `performance_mode` is on.
    pub async fn evaluate_batch(&self, items: Vec<BatchItem>) -> BatchOutcome {
        self.evaluate_batch_with(items, EvalOptions::default()).await
    }

    pub async fn evaluate_batch_with(
        &self,
        items: Vec<BatchItem>,
        opts: EvalOptions,
    ) -> BatchOutcome {
        let started = Instant::now();
        let total = items.len();
        let semaphore = Arc::new(Semaphore::new(self.config().runtime.max_workers.max(1)));

        let mut handles = Vec::with_capacity(total);
        for (index, item) in items.into_iter().enumerate() {
            let engine = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let opts = opts.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|_| DriftError::Internal("batch semaphore closed".into()))?;
                debug!(index, anchor = %item.anchor.anchor_id, "batch slot acquired");
                if engine.config().runtime.performance_mode {
                    engine
                        .evaluate_fast_with(&item.anchor, &item.values, &item.fingerprint, opts)
                        .await
                } else {
                    engine
                        .evaluate_with(&item.anchor, &item.values, &item.fingerprint, opts)
                        .await
                }
            }));
        }

        // join_all preserves spawn order, keeping outputs aligned with inputs.
        let reports: Vec<Result<DriftReport>> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(DriftError::Internal(format!("batch task panicked: {e}"))),
            })
            .collect();

        let failures = reports.iter().filter(|r| r.is_err()).count();
        let total_ms = started.elapsed().as_secs_f64() * 1000.0;
        let metrics = BatchMetrics {
            total_ms,
            items: total,
            failures,
            throughput_per_sec: if total_ms > 0.0 {
                total as f64 / (total_ms / 1000.0)
            } else {
                0.0
            },
        };
        info!(
            items = metrics.items,
            failures = metrics.failures,
            total_ms = metrics.total_ms,
            "batch complete"
        );

        BatchOutcome { reports, metrics }
    }

    /// Batch evaluation in fixed-size chunks: each chunk completes before
    /// the next is dispatched, trading a little latency for working-set
    /// locality on very large batches.
    pub async fn evaluate_batch_chunked(
        &self,
        items: Vec<BatchItem>,
        chunk_size: usize,
    ) -> BatchOutcome {
        let started = Instant::now();
        let total = items.len();
        let chunk_size = chunk_size.max(1);

        let mut reports: Vec<Result<DriftReport>> = Vec::with_capacity(total);
        let mut remaining = items;
        while !remaining.is_empty() {
            let rest = remaining.split_off(remaining.len().min(chunk_size));
            let chunk = std::mem::replace(&mut remaining, rest);
            let outcome = self.evaluate_batch(chunk).await;
            reports.extend(outcome.reports);
        }

        let failures = reports.iter().filter(|r| r.is_err()).count();
        let total_ms = started.elapsed().as_secs_f64() * 1000.0;
        BatchOutcome {
            metrics: BatchMetrics {
                total_ms,
                items: total,
                failures,
                throughput_per_sec: if total_ms > 0.0 {
                    total as f64 / (total_ms / 1000.0)
                } else {
                    0.0
                },
            },
            reports,
        }
    }
}
