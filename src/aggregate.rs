//! Severity and confidence rollup across detector findings.

use std::collections::BTreeSet;

use crate::types::{DriftFinding, Severity};

/// Rolled-up verdict for a set of findings.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub severity: Severity,
    /// Confidence in the verdict, clamped to [0.1, 1.0].
    pub confidence_score: f64,
    pub recommendations: Vec<String>,
}

/// Apply the aggregation rule:
/// - map severities to scores low=1 … critical=4;
/// - overall is critical when max ≥ 4 or mean ≥ 3.5, high when max ≥ 3 or
///   mean ≥ 2.5, medium when max ≥ 2 or mean ≥ 1.5, low otherwise;
/// - confidence = clamp(0.5 + min(n/3, 1) − Σ severity penalties, 0.1, 1.0).
pub fn aggregate(findings: &[DriftFinding]) -> Aggregation {
    let severity = overall_severity(findings);
    let confidence_score = confidence_score(findings);
    let recommendations = recommendations(findings, severity);
    Aggregation {
        severity,
        confidence_score,
        recommendations,
    }
}

fn overall_severity(findings: &[DriftFinding]) -> Severity {
    if findings.is_empty() {
        return Severity::Low;
    }
    let scores: Vec<f64> = findings.iter().map(|f| f.severity.score() as f64).collect();
    let max = scores.iter().copied().fold(f64::MIN, f64::max);
    let avg = scores.iter().sum::<f64>() / scores.len() as f64;

    if max >= 4.0 || avg >= 3.5 {
        Severity::Critical
    } else if max >= 3.0 || avg >= 2.5 {
        Severity::High
    } else if max >= 2.0 || avg >= 1.5 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn confidence_score(findings: &[DriftFinding]) -> f64 {
    let breadth = (findings.len() as f64 / 3.0).min(1.0);
    let penalties: f64 = findings.iter().map(|f| f.severity.penalty()).sum();
    (0.5 + breadth - penalties).clamp(0.1, 1.0)
}

fn recommendations(findings: &[DriftFinding], overall: Severity) -> Vec<String> {
    if findings.is_empty() {
        return Vec::new();
    }

    let kinds: BTreeSet<String> = findings.iter().map(|f| f.kind().to_string()).collect();
    let mut out: Vec<String> = Vec::new();
    let mut push = |s: &str| {
        if !out.iter().any(|existing| existing == s) {
            out.push(s.to_string());
        }
    };

    if kinds.contains("distribution") {
        push("Inspect upstream aggregations and filters for the source of the distribution shift");
        push("Re-anchor the baseline if the new distribution is expected");
    }
    if kinds.contains("format") {
        push("Verify the column's serialization and parsing layers for format changes");
        push("Check whether an upstream schema migration altered value formats");
    }
    if kinds.contains("unit") {
        push("Confirm the unit of measure; the value range suggests a unit or scale conversion");
    }
    if kinds.contains("joinability") {
        push("Audit joins using this column; its key integrity has changed");
    }
    if kinds.contains("confidence") {
        push("Review the column mapping; accumulated drift lowered its confidence");
    }
    if overall >= Severity::High {
        push("Hold dependent pipelines until the change is reviewed");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DriftDetail;

    fn finding(kind: DriftKind, severity: Severity) -> DriftFinding {
        let detail = match kind {
            DriftKind::Distribution => DriftDetail::Distribution {
                ks_statistic: None,
                ks_p_value: None,
                psi: Some(0.2),
                mean_shift: None,
            },
            DriftKind::Format => DriftDetail::Format {
                similarity: 0.4,
                stability: crate::types::FormatStability::MajorChange,
                new_patterns: Vec::new(),
                lost_patterns: Vec::new(),
                changed_patterns: Vec::new(),
            },
            DriftKind::Unit => DriftDetail::Unit {
                scale: 10.0,
                baseline_range: (0.0, 1.0),
                current_range: (0.0, 10.0),
            },
            DriftKind::Joinability => DriftDetail::Joinability {
                delta: 0.2,
                duplicate_increase: 0.2,
                key_integrity: 0.8,
            },
            DriftKind::Confidence => DriftDetail::Confidence {
                previous: 0.9,
                updated: 0.7,
                degradation: 0.2,
            },
        };
        DriftFinding {
            severity,
            metric_value: 1.0,
            threshold: 0.1,
            description: String::new(),
            detail,
        }
    }

    #[test]
    fn empty_findings_aggregate_low() {
        let agg = aggregate(&[]);
        assert_eq!(agg.severity, Severity::Low);
        assert_eq!(agg.confidence_score, 0.5);
        assert!(agg.recommendations.is_empty());
    }

    #[test]
    fn any_critical_finding_makes_the_report_critical() {
        let agg = aggregate(&[
            finding(DriftKind::Joinability, Severity::Low),
            finding(DriftKind::Unit, Severity::Critical),
        ]);
        assert_eq!(agg.severity, Severity::Critical);
    }

    #[test]
    fn high_average_escalates_without_a_max() {
        // Three highs: max 3, avg 3 ≥ 2.5 → high (not critical).
        let agg = aggregate(&[
            finding(DriftKind::Distribution, Severity::High),
            finding(DriftKind::Format, Severity::High),
            finding(DriftKind::Unit, Severity::High),
        ]);
        assert_eq!(agg.severity, Severity::High);
    }

    #[test]
    fn single_low_finding_stays_low() {
        let agg = aggregate(&[finding(DriftKind::Joinability, Severity::Low)]);
        assert_eq!(agg.severity, Severity::Low);
    }

    #[test]
    fn confidence_rises_with_breadth_falls_with_severity() {
        let one_low = aggregate(&[finding(DriftKind::Unit, Severity::Low)]);
        // 0.5 + 1/3 − 0.05
        assert!((one_low.confidence_score - (0.5 + 1.0 / 3.0 - 0.05)).abs() < 1e-12);

        let three_critical = aggregate(&[
            finding(DriftKind::Distribution, Severity::Critical),
            finding(DriftKind::Format, Severity::Critical),
            finding(DriftKind::Unit, Severity::Critical),
        ]);
        // 0.5 + 1.0 − 1.05 = 0.45
        assert!((three_critical.confidence_score - 0.45).abs() < 1e-12);
        assert!(three_critical.confidence_score < one_low.confidence_score);
    }

    #[test]
    fn confidence_is_clamped_to_floor() {
        let findings: Vec<DriftFinding> = (0..6)
            .map(|_| finding(DriftKind::Format, Severity::Critical))
            .collect();
        // 0.5 + 1.0 − 2.1 < 0.1 → clamped.
        assert_eq!(aggregate(&findings).confidence_score, 0.1);
    }

    #[test]
    fn recommendations_are_keyed_and_deduplicated() {
        let agg = aggregate(&[
            finding(DriftKind::Unit, Severity::Critical),
            finding(DriftKind::Unit, Severity::High),
        ]);
        let unit_advice: Vec<_> = agg
            .recommendations
            .iter()
            .filter(|r| r.contains("unit"))
            .collect();
        assert_eq!(unit_advice.len(), 1);
        assert!(agg
            .recommendations
            .iter()
            .any(|r| r.contains("Hold dependent pipelines")));
    }
}
