//! Pattern analysis: semantic library, profile extraction, similarity,
//! and sample-level structural drift.

mod analyzer;
mod library;
mod structural;

pub use analyzer::{analyze, extract_patterns, similarity, FormatAnalysis, PatternMatch};
pub use library::{PatternLibrary, SemanticPattern};
pub use structural::{
    char_class_template, compare_samples, format_consistency, CasingProfile, CasingShift,
    DelimiterShift, SampleDrift,
};

/// Patterns retained on a fingerprint, at most.
const FINGERPRINT_PATTERN_CAP: usize = 8;

/// The patterns deemed characteristic of a column, for storage on its
/// fingerprint. Highest-frequency first, deterministically ordered.
pub fn characteristic_patterns(samples: &[String]) -> Vec<String> {
    extract_patterns(&[], samples)
        .into_iter()
        .take(FINGERPRINT_PATTERN_CAP)
        .map(|m| m.pattern)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characteristic_patterns_are_bounded_and_ordered() {
        let samples: Vec<String> = (0..40)
            .map(|i| format!("CUST_{:06}", i))
            .collect();
        let patterns = characteristic_patterns(&samples);
        assert!(!patterns.is_empty());
        assert!(patterns.len() <= FINGERPRINT_PATTERN_CAP);
        // Deterministic across calls.
        assert_eq!(patterns, characteristic_patterns(&samples));
    }

    #[test]
    fn empty_samples_have_no_characteristic_patterns() {
        assert!(characteristic_patterns(&[]).is_empty());
    }
}
