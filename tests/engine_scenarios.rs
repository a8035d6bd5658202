//! End-to-end drift scenarios.
//!
//! Exercises the full engine — fingerprints, detectors, aggregation, and
//! both evaluation paths — on concrete columns with known expected
//! outcomes. Default configuration throughout unless a test says
//! otherwise.

use chrono::Utc;
use driftlens::{
    fingerprint, Anchor, CellValue, DriftEngine, DriftKind, DType, Fingerprint, Severity,
};

fn anchor(id: &str, fp: Fingerprint) -> Anchor {
    Anchor::new(id, "analytics", "col", fp, Utc::now())
}

fn int_cells(range: std::ops::Range<i64>) -> Vec<CellValue> {
    range.map(CellValue::Int).collect()
}

fn text_cells(values: &[&str]) -> Vec<CellValue> {
    values.iter().map(|s| CellValue::from(*s)).collect()
}

// ============================================================================
// S1: clear distribution shift, small baseline fingerprint
// ============================================================================

#[tokio::test]
async fn s1_clear_distribution_shift() {
    let baseline = Fingerprint {
        dtype: DType::Int,
        cardinality: 100,
        null_ratio: 0.0,
        unique_ratio: 0.90,
        min: Some("1".into()),
        max: Some("100".into()),
        sample_values: (1..=100).map(|i| i.to_string()).collect(),
        regex_patterns: Vec::new(),
    };
    let anchor = anchor("s1", baseline);

    let values = int_cells(500..700);
    let current = Fingerprint {
        dtype: DType::Int,
        cardinality: 200,
        null_ratio: 0.0,
        unique_ratio: 0.95,
        min: Some("500".into()),
        max: Some("699".into()),
        sample_values: Vec::new(),
        regex_patterns: Vec::new(),
    };

    let engine = DriftEngine::default();
    let report = engine.evaluate(&anchor, &values, &current).await.unwrap();

    assert!(report.drift_detected);
    let finding = report.finding(DriftKind::Distribution).expect("distribution drift");
    assert!(finding.severity >= Severity::Medium);
}

// ============================================================================
// S2: format shift (emails → ISO dates)
// ============================================================================

#[tokio::test]
async fn s2_format_shift_emails_to_dates() {
    let emails = ["a@x.io", "b@y.co", "c@z.net", "d@w.org", "e@v.edu"];
    let dates = [
        "2024-01-01",
        "2024-02-15",
        "2023-12-31",
        "2022-07-04",
        "2024-06-30",
    ];

    let baseline = fingerprint(&text_cells(&emails), Some(DType::Text));
    let anchor = anchor("s2", baseline);
    let values = text_cells(&dates);
    let current = fingerprint(&values, None);

    let engine = DriftEngine::default();
    let report = engine.evaluate(&anchor, &values, &current).await.unwrap();

    assert!(report.drift_detected);
    let finding = report.finding(DriftKind::Format).expect("format drift");
    assert!(finding.severity >= Severity::High);
    match &finding.detail {
        driftlens::DriftDetail::Format { similarity, .. } => assert!(*similarity < 0.80),
        other => panic!("unexpected detail: {other:?}"),
    }
}

// ============================================================================
// S3: unit change ×1000
// ============================================================================

#[tokio::test]
async fn s3_unit_change_thousandfold() {
    let baseline = Fingerprint {
        dtype: DType::Float,
        cardinality: 100,
        null_ratio: 0.0,
        unique_ratio: 0.9,
        min: Some("0".into()),
        max: Some("100".into()),
        sample_values: Vec::new(),
        regex_patterns: Vec::new(),
    };
    let anchor = anchor("s3", baseline);

    let values: Vec<CellValue> = (0..=100).map(|i| CellValue::Float(i as f64 * 1000.0)).collect();
    let current = Fingerprint {
        dtype: DType::Float,
        cardinality: 100,
        null_ratio: 0.0,
        unique_ratio: 0.9,
        min: Some("0".into()),
        max: Some("100000".into()),
        sample_values: Vec::new(),
        regex_patterns: Vec::new(),
    };

    let engine = DriftEngine::default();
    let report = engine.evaluate(&anchor, &values, &current).await.unwrap();

    let finding = report.finding(DriftKind::Unit).expect("unit drift");
    assert_eq!(finding.severity, Severity::Critical);
    match finding.detail {
        driftlens::DriftDetail::Unit { scale, .. } => {
            assert!((scale - 1000.0).abs() < 1e-9);
        }
        ref other => panic!("unexpected detail: {other:?}"),
    }
}

// ============================================================================
// S4: joinability degradation
// ============================================================================

#[tokio::test]
async fn s4_joinability_degradation() {
    let baseline = Fingerprint {
        dtype: DType::Text,
        cardinality: 990,
        null_ratio: 0.0,
        unique_ratio: 0.99,
        min: None,
        max: None,
        sample_values: Vec::new(),
        regex_patterns: Vec::new(),
    };
    let anchor = anchor("s4", baseline);

    let current = Fingerprint {
        dtype: DType::Text,
        cardinality: 400,
        null_ratio: 0.0,
        unique_ratio: 0.40,
        min: None,
        max: None,
        sample_values: Vec::new(),
        regex_patterns: Vec::new(),
    };

    let engine = DriftEngine::default();
    let report = engine.evaluate(&anchor, &[], &current).await.unwrap();

    let finding = report.finding(DriftKind::Joinability).expect("joinability drift");
    assert_eq!(finding.severity, Severity::Critical);
    assert!((finding.metric_value - 0.59).abs() < 1e-9);
}

// ============================================================================
// S5 companion: confidence drift appears under heavy multi-kind drift
// ============================================================================

#[tokio::test]
async fn s5_confidence_drifts_under_heavy_drift() {
    // Distribution + unit + joinability all critical: degradation
    // (0.20 + 0.30 + 0.20)·0.35 = 0.245 → Δconf = 0.9·0.245 ≈ 0.22 > 0.10.
    let baseline = Fingerprint {
        dtype: DType::Int,
        cardinality: 100,
        null_ratio: 0.0,
        unique_ratio: 1.0,
        min: Some("1".into()),
        max: Some("100".into()),
        sample_values: (1..=100).map(|i| i.to_string()).collect(),
        regex_patterns: Vec::new(),
    };
    let anchor = anchor("s5", baseline).with_confidence(0.90);

    let values: Vec<CellValue> = (0..500).map(|i| CellValue::Int((i % 50) * 40_000)).collect();
    let current = fingerprint(&values, None);

    let engine = DriftEngine::default();
    let report = engine.evaluate(&anchor, &values, &current).await.unwrap();

    assert!(report.has(DriftKind::Distribution));
    assert!(report.has(DriftKind::Unit));
    assert!(report.has(DriftKind::Joinability));
    let conf = report.finding(DriftKind::Confidence).expect("confidence drift");
    assert!(conf.metric_value > 0.10);
    // Confidence is always last in the findings list.
    assert_eq!(report.findings.last().unwrap().kind(), DriftKind::Confidence);
}

// ============================================================================
// S6: fast-path quick exit on dtype change
// ============================================================================

#[tokio::test]
async fn s6_fastpath_quick_exit_on_dtype_change() {
    let text_values = text_cells(&["alpha", "beta", "gamma", "delta"]);
    let baseline = fingerprint(&text_values, Some(DType::Text));
    let anchor = anchor("s6", baseline);

    let float_values: Vec<CellValue> =
        (0..50).map(|i| CellValue::Float(i as f64 + 0.5)).collect();
    let current = fingerprint(&float_values, None);
    assert_eq!(current.dtype, DType::Float);

    let engine = DriftEngine::default();
    let report = engine
        .evaluate_fast(&anchor, &float_values, &current)
        .await
        .unwrap();

    assert!(report.drift_detected);
    assert_eq!(report.severity, Severity::Critical);
    let finding = &report.findings[0];
    assert!(
        finding.kind() == DriftKind::Distribution || finding.kind() == DriftKind::Format,
        "quick-check finding should be distribution- or format-labeled"
    );
    assert_eq!(finding.severity, Severity::Critical);
    // No sampling was needed for 50 values.
    assert!(!report.performance.optimization_applied);
    assert!(report.performance.detection_time_ms < 1000.0);
}

// ============================================================================
// FastPath conservatism: quick-check critical ⇒ full path at least high
// ============================================================================

#[tokio::test]
async fn fastpath_critical_implies_full_path_high() {
    let text_values = text_cells(&["alpha", "beta", "gamma", "delta", "epsilon"]);
    let baseline = fingerprint(&text_values, Some(DType::Text));
    let anchor = anchor("conservatism", baseline);

    let float_values: Vec<CellValue> = (0..60).map(|i| CellValue::Float(i as f64 + 0.25)).collect();
    let current = fingerprint(&float_values, None);

    let engine = DriftEngine::default();
    let fast = engine
        .evaluate_fast(&anchor, &float_values, &current)
        .await
        .unwrap();
    assert_eq!(fast.severity, Severity::Critical);

    let full = engine
        .evaluate(&anchor, &float_values, &current)
        .await
        .unwrap();
    assert!(
        full.severity >= Severity::High,
        "full evaluation should be at least high, got {}",
        full.severity
    );
}

// ============================================================================
// Report invariants
// ============================================================================

#[tokio::test]
async fn report_invariants_hold() {
    let baseline = Fingerprint {
        dtype: DType::Int,
        cardinality: 100,
        null_ratio: 0.0,
        unique_ratio: 1.0,
        min: Some("1".into()),
        max: Some("100".into()),
        sample_values: (1..=100).map(|i| i.to_string()).collect(),
        regex_patterns: Vec::new(),
    };
    let anchor = anchor("invariants", baseline).with_confidence(0.8);
    let values: Vec<CellValue> = (0..300).map(|i| CellValue::Int((i % 30) * 5_000)).collect();
    let current = fingerprint(&values, None);

    let engine = DriftEngine::default();
    let report = engine.evaluate(&anchor, &values, &current).await.unwrap();

    // drift_detected ⇔ findings non-empty
    assert_eq!(report.drift_detected, !report.findings.is_empty());
    // finding invariants
    for finding in &report.findings {
        assert!(finding.metric_value >= 0.0);
        assert!(finding.threshold > 0.0);
    }
    // confidence score bounds
    assert!((0.1..=1.0).contains(&report.confidence_score));
    // findings are emitted in detector order
    let order = |k: DriftKind| match k {
        DriftKind::Distribution => 0,
        DriftKind::Format => 1,
        DriftKind::Unit => 2,
        DriftKind::Joinability => 3,
        DriftKind::Confidence => 4,
    };
    let kinds: Vec<_> = report.findings.iter().map(|f| order(f.kind())).collect();
    let mut sorted = kinds.clone();
    sorted.sort_unstable();
    assert_eq!(kinds, sorted);
}

#[tokio::test]
async fn clean_column_reports_no_drift() {
    let values = int_cells(1..101);
    let baseline = fingerprint(&values, None);
    let anchor = anchor("clean", baseline);
    let current = fingerprint(&values, None);

    let engine = DriftEngine::default();
    let report = engine.evaluate(&anchor, &values, &current).await.unwrap();

    assert!(!report.drift_detected);
    assert!(report.findings.is_empty());
    assert_eq!(report.severity, Severity::Low);
    assert!(report.recommendations.is_empty());
}
