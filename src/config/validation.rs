//! Config range checks.
//!
//! Warnings never break a running engine; they exist so that a mistyped
//! threshold (0.8 written as 8.0) is noticed instead of silently muting
//! or hair-triggering a detector.

use super::DriftConfig;

/// A non-fatal configuration warning.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn warn_if(
    warnings: &mut Vec<ValidationWarning>,
    condition: bool,
    field: &str,
    message: String,
) {
    if condition {
        warnings.push(ValidationWarning {
            field: field.to_string(),
            message,
        });
    }
}

pub fn validate(cfg: &DriftConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let t = &cfg.thresholds;

    warn_if(
        &mut warnings,
        !(0.0..=1.0).contains(&t.ks_p_threshold),
        "thresholds.ks_p_threshold",
        format!("{} is not a probability", t.ks_p_threshold),
    );
    warn_if(
        &mut warnings,
        t.psi_threshold <= 0.0,
        "thresholds.psi_threshold",
        format!("{} disables PSI triggering", t.psi_threshold),
    );
    warn_if(
        &mut warnings,
        !(0.0..=1.0).contains(&t.pattern_similarity_threshold),
        "thresholds.pattern_similarity_threshold",
        format!("{} is outside [0, 1]", t.pattern_similarity_threshold),
    );
    warn_if(
        &mut warnings,
        !(0.0..=1.0).contains(&t.uniqueness_threshold),
        "thresholds.uniqueness_threshold",
        format!("{} is outside [0, 1]", t.uniqueness_threshold),
    );
    warn_if(
        &mut warnings,
        t.scale_change_threshold <= 1.0,
        "thresholds.scale_change_threshold",
        format!(
            "{} flags every column; expected a factor > 1",
            t.scale_change_threshold
        ),
    );
    warn_if(
        &mut warnings,
        !(0.0..=1.0).contains(&t.confidence_degradation_threshold),
        "thresholds.confidence_degradation_threshold",
        format!("{} is outside [0, 1]", t.confidence_degradation_threshold),
    );

    let s = &cfg.sampling;
    warn_if(
        &mut warnings,
        s.sample_size_limit == 0,
        "sampling.sample_size_limit",
        "0 leaves no working set; sampling disabled sizes must be ≥ 1".into(),
    );
    warn_if(
        &mut warnings,
        s.psi_bins < 2,
        "sampling.psi_bins",
        format!("{} bins cannot express a shift; expected ≥ 2", s.psi_bins),
    );
    warn_if(
        &mut warnings,
        s.fingerprint_sample_limit == 0,
        "sampling.fingerprint_sample_limit",
        "0 samples make format analysis blind".into(),
    );

    let r = &cfg.runtime;
    warn_if(
        &mut warnings,
        r.max_workers == 0,
        "runtime.max_workers",
        "0 workers deadlock the batch runner; expected ≥ 1".into(),
    );
    warn_if(
        &mut warnings,
        r.soft_deadline_ms == Some(0),
        "runtime.soft_deadline_ms",
        "0 ms times out every evaluation".into(),
    );

    warnings
}
