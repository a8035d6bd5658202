//! Sample-level structural drift metrics.
//!
//! These metrics look at the raw sample strings rather than regex
//! profiles: character-class templates, length distributions, character
//! sets, delimiter usage, casing, and common affixes.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::defaults::{AFFIX_MIN_COVERAGE, CHARSET_REPORT_LIMIT};

/// Delimiters whose usage share is tracked across samples.
const TRACKED_DELIMITERS: &[char] = &['-', '_', '/', ':', '.', ',', ' ', '|', ';', '@'];

/// Usage-share change threshold for reporting a delimiter or casing shift.
const SHIFT_REPORT_DELTA: f64 = 0.2;

/// Structural comparison of baseline and current sample strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleDrift {
    /// 1 − distinct_templates/|samples| per side; 1.0 means one template.
    pub baseline_consistency: f64,
    pub current_consistency: f64,
    /// |mean_len_baseline − mean_len_current| / max of the two.
    pub length_change: f64,
    /// Characters newly seen / no longer seen (bounded, sorted).
    pub charset_added: Vec<char>,
    pub charset_removed: Vec<char>,
    pub delimiter_shifts: Vec<DelimiterShift>,
    pub casing_shift: Option<CasingShift>,
    pub prefixes_lost: Vec<String>,
    pub prefixes_gained: Vec<String>,
    pub suffixes_lost: Vec<String>,
    pub suffixes_gained: Vec<String>,
}

/// A delimiter whose usage share moved notably between sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelimiterShift {
    pub delimiter: char,
    pub baseline_share: f64,
    pub current_share: f64,
}

/// Distribution of value casing classes per side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CasingShift {
    pub baseline: CasingProfile,
    pub current: CasingProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CasingProfile {
    pub lower: f64,
    pub upper: f64,
    pub title: f64,
    pub mixed: f64,
}

/// Compare the structure of two sample sets.
pub fn compare_samples(baseline: &[String], current: &[String]) -> SampleDrift {
    let baseline_consistency = format_consistency(baseline);
    let current_consistency = format_consistency(current);

    let mean_b = mean_length(baseline);
    let mean_c = mean_length(current);
    let length_change = if mean_b.max(mean_c) == 0.0 {
        0.0
    } else {
        (mean_b - mean_c).abs() / mean_b.max(mean_c)
    };

    let set_b = charset(baseline);
    let set_c = charset(current);
    let charset_added = bounded_diff(&set_c, &set_b);
    let charset_removed = bounded_diff(&set_b, &set_c);

    let delimiter_shifts = delimiter_shifts(baseline, current);
    let casing_shift = casing_shift(baseline, current);

    let prefixes_b = common_affixes(baseline, Affix::Prefix);
    let prefixes_c = common_affixes(current, Affix::Prefix);
    let suffixes_b = common_affixes(baseline, Affix::Suffix);
    let suffixes_c = common_affixes(current, Affix::Suffix);

    SampleDrift {
        baseline_consistency,
        current_consistency,
        length_change,
        charset_added,
        charset_removed,
        delimiter_shifts,
        casing_shift,
        prefixes_lost: set_minus(&prefixes_b, &prefixes_c),
        prefixes_gained: set_minus(&prefixes_c, &prefixes_b),
        suffixes_lost: set_minus(&suffixes_b, &suffixes_c),
        suffixes_gained: set_minus(&suffixes_c, &suffixes_b),
    }
}

/// Character-class template of a value: `A` upper, `a` lower, `9` digit,
/// other characters literal. "CUST_123" → "AAAA_999".
pub fn char_class_template(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                'A'
            } else if c.is_ascii_lowercase() {
                'a'
            } else if c.is_ascii_digit() {
                '9'
            } else {
                c
            }
        })
        .collect()
}

/// 1 − distinct_templates/|samples|. Empty input counts as fully
/// consistent.
pub fn format_consistency(samples: &[String]) -> f64 {
    if samples.is_empty() {
        return 1.0;
    }
    let distinct: BTreeSet<String> = samples.iter().map(|s| char_class_template(s)).collect();
    1.0 - distinct.len() as f64 / samples.len() as f64
}

fn mean_length(samples: &[String]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.chars().count() as f64).sum::<f64>() / samples.len() as f64
}

fn charset(samples: &[String]) -> BTreeSet<char> {
    samples.iter().flat_map(|s| s.chars()).collect()
}

fn bounded_diff(a: &BTreeSet<char>, b: &BTreeSet<char>) -> Vec<char> {
    a.difference(b).take(CHARSET_REPORT_LIMIT).copied().collect()
}

fn delimiter_shifts(baseline: &[String], current: &[String]) -> Vec<DelimiterShift> {
    let share = |samples: &[String], d: char| {
        if samples.is_empty() {
            0.0
        } else {
            samples.iter().filter(|s| s.contains(d)).count() as f64 / samples.len() as f64
        }
    };
    TRACKED_DELIMITERS
        .iter()
        .filter_map(|&d| {
            let b = share(baseline, d);
            let c = share(current, d);
            ((b - c).abs() > SHIFT_REPORT_DELTA).then_some(DelimiterShift {
                delimiter: d,
                baseline_share: b,
                current_share: c,
            })
        })
        .collect()
}

fn casing_profile(samples: &[String]) -> CasingProfile {
    let mut lower = 0usize;
    let mut upper = 0usize;
    let mut title = 0usize;
    let mut mixed = 0usize;
    let mut counted = 0usize;

    for s in samples {
        let letters: Vec<char> = s.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            continue;
        }
        counted += 1;
        let all_lower = letters.iter().all(|c| c.is_lowercase());
        let all_upper = letters.iter().all(|c| c.is_uppercase());
        let first_upper = letters[0].is_uppercase();
        if all_lower {
            lower += 1;
        } else if all_upper {
            upper += 1;
        } else if first_upper && letters[1..].iter().all(|c| c.is_lowercase()) {
            title += 1;
        } else {
            mixed += 1;
        }
    }

    let n = counted.max(1) as f64;
    CasingProfile {
        lower: lower as f64 / n,
        upper: upper as f64 / n,
        title: title as f64 / n,
        mixed: mixed as f64 / n,
    }
}

fn casing_shift(baseline: &[String], current: &[String]) -> Option<CasingShift> {
    let b = casing_profile(baseline);
    let c = casing_profile(current);
    let moved = (b.lower - c.lower).abs() > SHIFT_REPORT_DELTA
        || (b.upper - c.upper).abs() > SHIFT_REPORT_DELTA
        || (b.title - c.title).abs() > SHIFT_REPORT_DELTA
        || (b.mixed - c.mixed).abs() > SHIFT_REPORT_DELTA;
    moved.then_some(CasingShift {
        baseline: b,
        current: c,
    })
}

enum Affix {
    Prefix,
    Suffix,
}

/// Affixes (length 2–4) covering at least [`AFFIX_MIN_COVERAGE`] of the
/// samples. Longer qualifying affixes shadow their own sub-affixes.
fn common_affixes(samples: &[String], kind: Affix) -> Vec<String> {
    if samples.is_empty() {
        return Vec::new();
    }
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for s in samples {
        let chars: Vec<char> = s.chars().collect();
        for len in 2..=4usize {
            if chars.len() < len {
                continue;
            }
            let affix: String = match kind {
                Affix::Prefix => chars[..len].iter().collect(),
                Affix::Suffix => chars[chars.len() - len..].iter().collect(),
            };
            *counts.entry(affix).or_insert(0) += 1;
        }
    }
    let threshold = (samples.len() as f64 * AFFIX_MIN_COVERAGE).ceil() as usize;
    let qualifying: Vec<String> = counts
        .into_iter()
        .filter(|(_, c)| *c >= threshold)
        .map(|(a, _)| a)
        .collect();
    // Keep only affixes not contained in a longer qualifying one.
    qualifying
        .iter()
        .filter(|a| {
            !qualifying.iter().any(|other| {
                other.len() > a.len()
                    && match kind {
                        Affix::Prefix => other.starts_with(a.as_str()),
                        Affix::Suffix => other.ends_with(a.as_str()),
                    }
            })
        })
        .cloned()
        .collect()
}

fn set_minus(a: &[String], b: &[String]) -> Vec<String> {
    a.iter().filter(|x| !b.contains(x)).cloned().collect()
}
