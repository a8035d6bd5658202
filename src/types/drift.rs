//! Drift findings, severities, and the evaluation report.

use serde::{Deserialize, Serialize};

/// Severity ladder shared by all detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Numeric score used by the aggregation rule (low=1 .. critical=4).
    pub fn score(self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    /// Confidence penalty applied per finding of this severity.
    pub fn penalty(self) -> f64 {
        match self {
            Severity::Low => 0.05,
            Severity::Medium => 0.10,
            Severity::High => 0.20,
            Severity::Critical => 0.35,
        }
    }

    /// One step up the ladder, saturating at critical.
    pub fn elevated(self) -> Self {
        match self {
            Severity::Low => Severity::Medium,
            Severity::Medium => Severity::High,
            _ => Severity::Critical,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// The five drift categories, in detector execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftKind {
    Distribution,
    Format,
    Unit,
    Joinability,
    Confidence,
}

impl std::fmt::Display for DriftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DriftKind::Distribution => "distribution",
            DriftKind::Format => "format",
            DriftKind::Unit => "unit",
            DriftKind::Joinability => "joinability",
            DriftKind::Confidence => "confidence",
        };
        f.write_str(s)
    }
}

/// Four-level label for pattern-profile stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatStability {
    Stable,
    MinorChange,
    MajorChange,
    FormatShift,
}

/// Per-kind evidence attached to a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DriftDetail {
    Distribution {
        ks_statistic: Option<f64>,
        ks_p_value: Option<f64>,
        psi: Option<f64>,
        /// Relative mean shift, set when the small-baseline heuristic ran.
        mean_shift: Option<f64>,
    },
    Format {
        similarity: f64,
        stability: FormatStability,
        new_patterns: Vec<String>,
        lost_patterns: Vec<String>,
        changed_patterns: Vec<String>,
    },
    Unit {
        scale: f64,
        baseline_range: (f64, f64),
        current_range: (f64, f64),
    },
    Joinability {
        delta: f64,
        duplicate_increase: f64,
        key_integrity: f64,
    },
    Confidence {
        previous: f64,
        updated: f64,
        degradation: f64,
    },
}

impl DriftDetail {
    pub fn kind(&self) -> DriftKind {
        match self {
            DriftDetail::Distribution { .. } => DriftKind::Distribution,
            DriftDetail::Format { .. } => DriftKind::Format,
            DriftDetail::Unit { .. } => DriftKind::Unit,
            DriftDetail::Joinability { .. } => DriftKind::Joinability,
            DriftDetail::Confidence { .. } => DriftKind::Confidence,
        }
    }
}

/// One detector's verdict that drift is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftFinding {
    pub severity: Severity,
    /// Primary metric behind the verdict (PSI, similarity deficit, scale
    /// factor, ...). Always ≥ 0.
    pub metric_value: f64,
    /// Threshold the metric was compared against. Always > 0.
    pub threshold: f64,
    pub description: String,
    pub detail: DriftDetail,
}

impl DriftFinding {
    pub fn kind(&self) -> DriftKind {
        self.detail.kind()
    }
}

/// Timing and sampling telemetry attached to every report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub detection_time_ms: f64,
    pub samples_processed: usize,
    /// True when the fast path reduced the working set before detection.
    pub optimization_applied: bool,
    /// sampled_size / original_size; 1.0 when no sampling occurred.
    pub compression_ratio: f64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            detection_time_ms: 0.0,
            samples_processed: 0,
            optimization_applied: false,
            compression_ratio: 1.0,
        }
    }
}

/// Outcome of evaluating one column against its anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub anchor_id: String,
    pub column_name: String,
    pub drift_detected: bool,
    pub findings: Vec<DriftFinding>,
    /// Aggregated severity; `Low` when no drift was found.
    pub severity: Severity,
    /// Confidence in the verdict, in [0.1, 1.0].
    pub confidence_score: f64,
    pub recommendations: Vec<String>,
    pub performance: PerformanceMetrics,
}

impl DriftReport {
    /// Shorthand for locating one kind of finding.
    pub fn finding(&self, kind: DriftKind) -> Option<&DriftFinding> {
        self.findings.iter().find(|f| f.kind() == kind)
    }

    pub fn has(&self, kind: DriftKind) -> bool {
        self.finding(kind).is_some()
    }
}
