//! Engine configuration.
//!
//! [`DriftConfig`] is an owned value passed into each evaluation — the
//! engine holds no global mutable state. All fields default to the values
//! in [`defaults`] and can be overridden programmatically or from a TOML
//! file:
//!
//! ```toml
//! [thresholds]
//! psi_threshold = 0.15
//!
//! [sampling]
//! sample_size_limit = 25000
//! seed = 7
//!
//! [runtime]
//! max_workers = 4
//! ```

pub mod defaults;
mod validation;

pub use validation::ValidationWarning;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DriftError;

/// Detector decision thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub ks_p_threshold: f64,
    pub psi_threshold: f64,
    pub pattern_similarity_threshold: f64,
    pub uniqueness_threshold: f64,
    pub scale_change_threshold: f64,
    pub confidence_degradation_threshold: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            ks_p_threshold: defaults::KS_P_THRESHOLD,
            psi_threshold: defaults::PSI_THRESHOLD,
            pattern_similarity_threshold: defaults::PATTERN_SIMILARITY_THRESHOLD,
            uniqueness_threshold: defaults::UNIQUENESS_THRESHOLD,
            scale_change_threshold: defaults::SCALE_CHANGE_THRESHOLD,
            confidence_degradation_threshold: defaults::CONFIDENCE_DEGRADATION_THRESHOLD,
        }
    }
}

/// Sampling and fast-path behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Working-set bound; inputs larger than this are sampled down.
    pub sample_size_limit: usize,
    /// RNG seed for stratified/reservoir sampling. Fixed seed + fixed
    /// inputs ⇒ bit-identical reports.
    pub seed: u64,
    /// PSI quantile bin count.
    pub psi_bins: usize,
    /// Bound applied to both sides before fast PSI.
    pub fast_psi_limit: usize,
    /// Distinct values retained in fingerprints.
    pub fingerprint_sample_limit: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_size_limit: defaults::SAMPLE_SIZE_LIMIT,
            seed: defaults::SAMPLING_SEED,
            psi_bins: defaults::PSI_BINS,
            fast_psi_limit: defaults::FAST_PSI_SAMPLE_LIMIT,
            fingerprint_sample_limit: defaults::FINGERPRINT_SAMPLE_LIMIT,
        }
    }
}

/// Execution-model knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Enable fast-path optimizations (sampling, concurrent pre-checks).
    pub performance_mode: bool,
    /// Concurrent evaluations in a batch. Defaults to cores − 1.
    pub max_workers: usize,
    /// Per-evaluation soft deadline in milliseconds. `None` disables it.
    pub soft_deadline_ms: Option<u64>,
    /// Values consumed between periodic quick-checks on a stream.
    pub stream_check_interval: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            performance_mode: true,
            max_workers: num_cpus::get().saturating_sub(1).max(1),
            soft_deadline_ms: None,
            stream_check_interval: defaults::STREAM_CHECK_INTERVAL,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub thresholds: ThresholdConfig,
    pub sampling: SamplingConfig,
    pub runtime: RuntimeConfig,
}

impl DriftConfig {
    /// Load from a TOML file, falling back to defaults for absent keys.
    pub fn from_toml_file(path: &Path) -> Result<Self, DriftError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, DriftError> {
        toml::from_str(raw).map_err(|e| DriftError::Config(e.to_string()))
    }

    /// Range-check the configuration. Warnings are non-fatal: the engine
    /// runs with whatever it is given, but suspicious values are surfaced
    /// so operators notice typos before they mute a detector.
    pub fn validate(&self) -> Vec<ValidationWarning> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = DriftConfig::default();
        assert_eq!(cfg.thresholds.ks_p_threshold, 0.05);
        assert_eq!(cfg.thresholds.psi_threshold, 0.10);
        assert_eq!(cfg.thresholds.pattern_similarity_threshold, 0.80);
        assert_eq!(cfg.thresholds.uniqueness_threshold, 0.05);
        assert_eq!(cfg.thresholds.scale_change_threshold, 5.0);
        assert_eq!(cfg.thresholds.confidence_degradation_threshold, 0.10);
        assert_eq!(cfg.sampling.sample_size_limit, 50_000);
        assert!(cfg.runtime.performance_mode);
        assert!(cfg.runtime.max_workers >= 1);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let cfg = DriftConfig::from_toml_str(
            r#"
            [thresholds]
            psi_threshold = 0.2

            [sampling]
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(cfg.thresholds.psi_threshold, 0.2);
        assert_eq!(cfg.thresholds.ks_p_threshold, 0.05);
        assert_eq!(cfg.sampling.seed, 7);
        assert_eq!(cfg.sampling.sample_size_limit, 50_000);
    }

    #[test]
    fn file_round_trip() {
        use std::io::Write as _;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[runtime]\nmax_workers = 2\nsoft_deadline_ms = 1500\n"
        )
        .unwrap();
        let cfg = DriftConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(cfg.runtime.max_workers, 2);
        assert_eq!(cfg.runtime.soft_deadline_ms, Some(1500));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = DriftConfig::from_toml_str("not = [valid").unwrap_err();
        assert!(matches!(err, DriftError::Config(_)));
    }
}
