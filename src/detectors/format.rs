//! Format drift detector (non-numeric columns).

use super::{DetectionContext, Detector};
use crate::config::defaults::FINGERPRINT_SAMPLE_LIMIT;
use crate::error::Result;
use crate::patterns;
use crate::types::{DriftDetail, DriftFinding, DriftKind, FormatStability, Severity};

pub struct FormatDetector;

impl Detector for FormatDetector {
    fn kind(&self) -> DriftKind {
        DriftKind::Format
    }

    /// Numeric-to-numeric comparisons are distribution territory; any
    /// other combination has a format to compare.
    fn applies(&self, ctx: &DetectionContext<'_>) -> bool {
        !(ctx.baseline.dtype.is_numeric() && ctx.current.dtype.is_numeric())
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<DriftFinding>> {
        let current_samples = current_samples(ctx);
        let analysis = patterns::analyze(
            &ctx.baseline.regex_patterns,
            &ctx.baseline.sample_values,
            &current_samples,
        );

        if analysis.similarity >= ctx.config.thresholds.pattern_similarity_threshold {
            return Ok(None);
        }

        let mut severity = match analysis.stability {
            FormatStability::FormatShift => Severity::Critical,
            FormatStability::MajorChange => Severity::High,
            FormatStability::MinorChange => Severity::Medium,
            FormatStability::Stable => Severity::Low,
        };
        // Losing a recognised semantic format (emails, dates, ids) is a
        // stronger signal than generic churn.
        if analysis.lost_semantic_pattern() {
            severity = severity.elevated();
        }

        let threshold = (1.0 - ctx.config.thresholds.pattern_similarity_threshold).max(0.01);
        Ok(Some(DriftFinding {
            severity,
            metric_value: 1.0 - analysis.similarity,
            threshold,
            description: format!(
                "value format shifted (similarity {:.2}, {} new / {} lost patterns)",
                analysis.similarity,
                analysis.new_patterns.len(),
                analysis.lost_patterns.len()
            ),
            detail: DriftDetail::Format {
                similarity: analysis.similarity,
                stability: analysis.stability,
                new_patterns: analysis.new_patterns,
                lost_patterns: analysis.lost_patterns,
                changed_patterns: analysis.changed_patterns,
            },
        }))
    }
}

/// Current-side sample strings: the current fingerprint's samples when
/// present, otherwise a bounded distinct set from the raw values.
fn current_samples(ctx: &DetectionContext<'_>) -> Vec<String> {
    if !ctx.current.sample_values.is_empty() {
        return ctx.current.sample_values.clone();
    }
    let mut seen = std::collections::HashSet::new();
    let mut samples = Vec::new();
    for value in ctx.values {
        if let Some(s) = value.display_string() {
            if seen.insert(s.clone()) {
                samples.push(s);
                if samples.len() >= FINGERPRINT_SAMPLE_LIMIT {
                    break;
                }
            }
        }
    }
    samples
}
