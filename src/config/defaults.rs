//! Engine-wide default constants.
//!
//! Centralises the tuning knobs of the detection engine. Grouped by
//! subsystem for easy discovery. Every value here can be overridden via
//! [`DriftConfig`](super::DriftConfig).

// ============================================================================
// Detector thresholds
// ============================================================================

/// KS two-sample p-value below which a distribution shift is significant.
pub const KS_P_THRESHOLD: f64 = 0.05;

/// PSI above which a distribution shift is significant.
pub const PSI_THRESHOLD: f64 = 0.10;

/// Pattern similarity below which a format shift is flagged.
pub const PATTERN_SIMILARITY_THRESHOLD: f64 = 0.80;

/// Absolute unique-ratio delta above which joinability drift is flagged.
pub const UNIQUENESS_THRESHOLD: f64 = 0.05;

/// Range-scale factor beyond which (or beyond whose reciprocal) a
/// unit/scale change is flagged.
pub const SCALE_CHANGE_THRESHOLD: f64 = 5.0;

/// Confidence drop above which confidence drift is flagged.
pub const CONFIDENCE_DEGRADATION_THRESHOLD: f64 = 0.10;

// ============================================================================
// Statistical kernels
// ============================================================================

/// Number of equal-count baseline quantile bins for PSI.
pub const PSI_BINS: usize = 10;

/// Epsilon added to PSI bin fractions to avoid log(0).
pub const PSI_EPSILON: f64 = 1e-4;

/// Both sides are systematically subsampled to this size before fast PSI.
pub const FAST_PSI_SAMPLE_LIMIT: usize = 10_000;

/// Combined sample size at which KS needs PSI confirmation.
///
/// At large n the KS test flags trivially small CDF gaps; requiring PSI
/// agreement suppresses those false positives.
pub const LARGE_SAMPLE_COMBINED: usize = 12_000;

/// Parsed baseline samples below which the distribution detector falls
/// back to the relative mean-shift heuristic.
pub const MIN_BASELINE_FOR_KS: usize = 50;

/// Relative mean shift flagged by the small-baseline heuristic.
pub const MEAN_SHIFT_THRESHOLD: f64 = 0.20;

/// Two-sample Anderson–Darling 5% critical value (documented approximation).
pub const ANDERSON_DARLING_CRITICAL_5PCT: f64 = 2.5;

// ============================================================================
// Fingerprinting
// ============================================================================

/// Maximum distinct stringified values retained in a fingerprint.
pub const FINGERPRINT_SAMPLE_LIMIT: usize = 200;

/// Non-absent cells examined for dtype inference.
pub const DTYPE_INFERENCE_WINDOW: usize = 100;

/// Fraction of the inference window that must parse as a type to claim it.
pub const DTYPE_INFERENCE_RATIO: f64 = 0.80;

// ============================================================================
// Fast path
// ============================================================================

/// Value count above which the fast path samples down the working set.
pub const SAMPLE_SIZE_LIMIT: usize = 50_000;

/// Fraction of the working set reserved for uniform random picks that
/// preserve distribution tails.
pub const RANDOM_TAIL_FRACTION: f64 = 0.10;

/// Default RNG seed; identical seeds make sampled evaluations bit-identical.
pub const SAMPLING_SEED: u64 = 42;

/// Cardinality ratio beyond which (or beyond whose reciprocal) the
/// quick-check escalates straight to critical.
pub const QUICK_CHECK_CARDINALITY_RATIO: f64 = 10.0;

/// Null-ratio delta beyond which the quick-check escalates to critical.
pub const QUICK_CHECK_NULL_DELTA: f64 = 0.5;

// ============================================================================
// Streaming
// ============================================================================

/// Values consumed between periodic quick-checks on a stream.
pub const STREAM_CHECK_INTERVAL: usize = 10_000;

// ============================================================================
// Pattern analysis
// ============================================================================

/// Minimum match frequency for a library pattern to be retained.
pub const PATTERN_MIN_FREQUENCY: f64 = 0.10;

/// Lower retention bar for loosely-structured semantic patterns
/// (names, companies, addresses).
pub const PATTERN_MIN_FREQUENCY_LOOSE: f64 = 0.05;

/// Distinct lengths at or below which a fixed-length pattern is generated.
pub const FIXED_LENGTH_MAX_DISTINCT: usize = 3;

/// Minimum coverage for a generated fixed-length pattern.
pub const FIXED_LENGTH_MIN_COVERAGE: f64 = 0.20;

/// Values examined when building character-class templates.
pub const TEMPLATE_SAMPLE_LIMIT: usize = 20;

/// Minimum coverage for a generated character-class template.
pub const TEMPLATE_MIN_COVERAGE: f64 = 0.30;

/// Character-set additions/removals reported per side, at most.
pub const CHARSET_REPORT_LIMIT: usize = 10;

/// Minimum share of samples an affix must cover to count as common.
pub const AFFIX_MIN_COVERAGE: f64 = 0.20;
