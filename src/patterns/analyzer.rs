//! Pattern extraction and profile comparison.

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::library::PatternLibrary;
use super::structural::{self, SampleDrift};
use crate::config::defaults::{
    FIXED_LENGTH_MAX_DISTINCT, FIXED_LENGTH_MIN_COVERAGE, PATTERN_MIN_FREQUENCY,
    PATTERN_MIN_FREQUENCY_LOOSE, TEMPLATE_MIN_COVERAGE, TEMPLATE_SAMPLE_LIMIT,
};
use crate::types::FormatStability;

/// Shared-pattern frequency delta above which the pattern counts as
/// "changed" rather than merely present on both sides.
const CHANGED_FREQUENCY_DELTA: f64 = 0.10;

/// Similarity below which the profile is a wholesale format shift.
const FORMAT_SHIFT_SIMILARITY: f64 = 0.30;

/// Similarity below which (or pattern churn above which) the change is major.
const MAJOR_CHANGE_SIMILARITY: f64 = 0.60;
const MAJOR_CHANGE_CHURN: usize = 4;

/// Similarity below which (or churn above which) the change is minor.
const MINOR_CHANGE_SIMILARITY: f64 = 0.85;

/// Consistency collapse that forces at least a major classification.
const CONSISTENCY_COLLAPSE: f64 = 0.5;

/// One pattern observed in a sample set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMatch {
    pub pattern: String,
    /// Semantic label when the pattern comes from the built-in library.
    pub label: Option<&'static str>,
    /// Matching samples / total samples, in [0, 1].
    pub frequency: f64,
}

/// Full comparison of a historical pattern profile against a current one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatAnalysis {
    pub similarity: f64,
    pub new_patterns: Vec<String>,
    pub lost_patterns: Vec<String>,
    pub changed_patterns: Vec<String>,
    pub sample_drift: SampleDrift,
    pub stability: FormatStability,
}

impl FormatAnalysis {
    /// True when any lost pattern carried a known semantic label.
    pub fn lost_semantic_pattern(&self) -> bool {
        let library = PatternLibrary::global();
        self.lost_patterns
            .iter()
            .any(|p| library.semantic_label(p).is_some())
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Build a pattern profile from explicit patterns plus the library and
/// generated structural patterns.
///
/// Explicit patterns are kept whenever they match at all; library
/// patterns need frequency above the retention bar (lower for the
/// loosely-structured semantic ones); generated patterns carry their own
/// coverage thresholds. Duplicates keep the highest frequency.
pub fn extract_patterns(explicit: &[String], samples: &[String]) -> Vec<PatternMatch> {
    if samples.is_empty() {
        return Vec::new();
    }
    let n = samples.len() as f64;
    let mut matches: Vec<PatternMatch> = Vec::new();

    for pattern in explicit {
        match Regex::new(pattern) {
            Ok(re) => {
                let hits = samples.iter().filter(|s| re.is_match(s)).count();
                if hits > 0 {
                    matches.push(PatternMatch {
                        pattern: pattern.clone(),
                        label: PatternLibrary::global().semantic_label(pattern),
                        frequency: hits as f64 / n,
                    });
                }
            }
            Err(e) => debug!(pattern = %pattern, error = %e, "skipping unparseable explicit pattern"),
        }
    }

    for entry in PatternLibrary::global().iter() {
        let hits = samples.iter().filter(|s| entry.regex.is_match(s)).count();
        let frequency = hits as f64 / n;
        let bar = if entry.loose {
            PATTERN_MIN_FREQUENCY_LOOSE
        } else {
            PATTERN_MIN_FREQUENCY
        };
        if frequency > bar {
            matches.push(PatternMatch {
                pattern: entry.pattern.to_string(),
                label: Some(entry.name),
                frequency,
            });
        }
    }

    matches.extend(fixed_length_patterns(samples));
    matches.extend(template_patterns(samples));

    // Dedup by pattern string, keeping the highest frequency.
    let mut best: BTreeMap<String, PatternMatch> = BTreeMap::new();
    for m in matches {
        best.entry(m.pattern.clone())
            .and_modify(|existing| {
                if m.frequency > existing.frequency {
                    *existing = m.clone();
                }
            })
            .or_insert(m);
    }
    let mut out: Vec<PatternMatch> = best.into_values().collect();
    out.sort_by(|a, b| {
        b.frequency
            .partial_cmp(&a.frequency)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.pattern.cmp(&b.pattern))
    });
    out
}

/// Fixed-length patterns, generated only for tightly length-bound columns.
fn fixed_length_patterns(samples: &[String]) -> Vec<PatternMatch> {
    let n = samples.len() as f64;
    let mut by_length: BTreeMap<usize, usize> = BTreeMap::new();
    for s in samples {
        *by_length.entry(s.chars().count()).or_insert(0) += 1;
    }
    if by_length.len() > FIXED_LENGTH_MAX_DISTINCT {
        return Vec::new();
    }
    by_length
        .into_iter()
        .filter_map(|(len, count)| {
            let coverage = count as f64 / n;
            (coverage >= FIXED_LENGTH_MIN_COVERAGE).then(|| PatternMatch {
                pattern: format!("^.{{{len}}}$"),
                label: None,
                frequency: coverage,
            })
        })
        .collect()
}

/// Character-class template patterns from a bounded prefix of distinct
/// values. Coverage is computed by template equality, not regex matching,
/// so extraction stays deterministic and cheap.
fn template_patterns(samples: &[String]) -> Vec<PatternMatch> {
    let n = samples.len() as f64;
    let mut template_counts: BTreeMap<String, usize> = BTreeMap::new();
    for s in samples {
        *template_counts
            .entry(structural::char_class_template(s))
            .or_insert(0) += 1;
    }

    let mut candidates: Vec<String> = Vec::new();
    for s in samples.iter().take(TEMPLATE_SAMPLE_LIMIT) {
        let t = structural::char_class_template(s);
        if !candidates.contains(&t) {
            candidates.push(t);
        }
    }

    candidates
        .into_iter()
        .filter_map(|template| {
            let coverage = template_counts.get(&template).copied().unwrap_or(0) as f64 / n;
            (coverage >= TEMPLATE_MIN_COVERAGE).then(|| PatternMatch {
                pattern: template_to_regex(&template),
                label: None,
                frequency: coverage,
            })
        })
        .collect()
}

/// Compile a char-class template ("AAAA_999") into an anchored regex
/// ("^[A-Z]{4}_[0-9]{3}$"), compressing runs.
fn template_to_regex(template: &str) -> String {
    let mut out = String::from("^");
    let chars: Vec<char> = template.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let class = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == class {
            run += 1;
        }
        let atom = match class {
            'A' => "[A-Z]".to_string(),
            'a' => "[a-z]".to_string(),
            '9' => "[0-9]".to_string(),
            other => regex::escape(&other.to_string()),
        };
        out.push_str(&atom);
        if run > 1 {
            out.push_str(&format!("{{{run}}}"));
        }
        i += run;
    }
    out.push('$');
    out
}

// ============================================================================
// Similarity
// ============================================================================

/// Weighted frequency-overlap similarity in [0, 1].
///
/// Each pattern present on either side weighs max(freq_hist, freq_curr);
/// shared patterns contribute (1 − |Δfreq|)·weight, one-sided patterns
/// contribute nothing. Two empty profiles are identical by definition.
pub fn similarity(historical: &[PatternMatch], current: &[PatternMatch]) -> f64 {
    if historical.is_empty() && current.is_empty() {
        return 1.0;
    }
    let hist: BTreeMap<&str, f64> = historical
        .iter()
        .map(|m| (m.pattern.as_str(), m.frequency))
        .collect();
    let curr: BTreeMap<&str, f64> = current
        .iter()
        .map(|m| (m.pattern.as_str(), m.frequency))
        .collect();

    let mut total_weight = 0.0;
    let mut overlap = 0.0;
    let union: std::collections::BTreeSet<&str> =
        hist.keys().chain(curr.keys()).copied().collect();

    for pattern in union {
        match (hist.get(pattern), curr.get(pattern)) {
            (Some(&fh), Some(&fc)) => {
                let weight = fh.max(fc);
                total_weight += weight;
                overlap += (1.0 - (fh - fc).abs()) * weight;
            }
            (Some(&f), None) | (None, Some(&f)) => total_weight += f,
            (None, None) => {}
        }
    }

    if total_weight == 0.0 {
        1.0
    } else {
        (overlap / total_weight).clamp(0.0, 1.0)
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Compare a historical pattern profile (explicit anchor patterns plus
/// historical samples) against current samples.
pub fn analyze(
    historical_patterns: &[String],
    historical_samples: &[String],
    current_samples: &[String],
) -> FormatAnalysis {
    let historical = extract_patterns(historical_patterns, historical_samples);
    // The anchor's explicit patterns are probed on the current side too,
    // so a still-matching anchor pattern counts as shared.
    let current = extract_patterns(historical_patterns, current_samples);

    let hist_map: BTreeMap<&str, f64> = historical
        .iter()
        .map(|m| (m.pattern.as_str(), m.frequency))
        .collect();
    let curr_map: BTreeMap<&str, f64> = current
        .iter()
        .map(|m| (m.pattern.as_str(), m.frequency))
        .collect();

    let new_patterns: Vec<String> = current
        .iter()
        .filter(|m| !hist_map.contains_key(m.pattern.as_str()))
        .map(|m| m.pattern.clone())
        .collect();
    let lost_patterns: Vec<String> = historical
        .iter()
        .filter(|m| !curr_map.contains_key(m.pattern.as_str()))
        .map(|m| m.pattern.clone())
        .collect();
    let changed_patterns: Vec<String> = historical
        .iter()
        .filter_map(|m| {
            let fc = curr_map.get(m.pattern.as_str())?;
            ((m.frequency - fc).abs() > CHANGED_FREQUENCY_DELTA).then(|| m.pattern.clone())
        })
        .collect();

    let score = similarity(&historical, &current);
    let sample_drift = structural::compare_samples(historical_samples, current_samples);
    let stability = classify_stability(
        score,
        new_patterns.len() + lost_patterns.len(),
        &sample_drift,
    );

    FormatAnalysis {
        similarity: score,
        new_patterns,
        lost_patterns,
        changed_patterns,
        sample_drift,
        stability,
    }
}

fn classify_stability(similarity: f64, churn: usize, drift: &SampleDrift) -> FormatStability {
    let consistency_collapsed =
        drift.baseline_consistency - drift.current_consistency > CONSISTENCY_COLLAPSE;
    if similarity < FORMAT_SHIFT_SIMILARITY {
        FormatStability::FormatShift
    } else if similarity < MAJOR_CHANGE_SIMILARITY
        || churn >= MAJOR_CHANGE_CHURN
        || consistency_collapsed
    {
        FormatStability::MajorChange
    } else if similarity < MINOR_CHANGE_SIMILARITY || churn >= 1 {
        FormatStability::MinorChange
    } else {
        FormatStability::Stable
    }
}
