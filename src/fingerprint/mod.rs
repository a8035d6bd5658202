//! Fingerprint construction and dtype inference.
//!
//! `fingerprint()` is total: it never fails, and an empty column yields the
//! empty fingerprint (cardinality 0, ratios 0, no bounds, no samples).

pub mod codec;

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::defaults::{
    DTYPE_INFERENCE_RATIO, DTYPE_INFERENCE_WINDOW, FINGERPRINT_SAMPLE_LIMIT,
};
use crate::types::{CellValue, DType, Fingerprint};

/// Derive a fingerprint using the default sample bound.
pub fn fingerprint(values: &[CellValue], declared: Option<DType>) -> Fingerprint {
    fingerprint_with_limit(values, declared, FINGERPRINT_SAMPLE_LIMIT)
}

/// Derive a fingerprint, retaining at most `sample_limit` distinct values.
///
/// `declared` wins over inference when provided; otherwise the dtype is
/// inferred from the first [`DTYPE_INFERENCE_WINDOW`] non-absent cells.
pub fn fingerprint_with_limit(
    values: &[CellValue],
    declared: Option<DType>,
    sample_limit: usize,
) -> Fingerprint {
    let dtype = declared.unwrap_or_else(|| infer_dtype(values));

    let mut seen: HashSet<String> = HashSet::new();
    let mut samples: Vec<String> = Vec::new();
    let mut non_absent: u64 = 0;
    let mut numeric_min = f64::INFINITY;
    let mut numeric_max = f64::NEG_INFINITY;
    let mut text_min: Option<String> = None;
    let mut text_max: Option<String> = None;

    for value in values {
        let Some(display) = value.display_string() else {
            continue;
        };
        non_absent += 1;

        if dtype.is_numeric() {
            if let Some(n) = value.as_f64() {
                numeric_min = numeric_min.min(n);
                numeric_max = numeric_max.max(n);
            }
        } else {
            match &text_min {
                Some(current) if display >= *current => {}
                _ => text_min = Some(display.clone()),
            }
            match &text_max {
                Some(current) if display <= *current => {}
                _ => text_max = Some(display.clone()),
            }
        }

        // Insertion order is preserved for determinism.
        if seen.insert(display.clone()) && samples.len() < sample_limit {
            samples.push(display);
        }
    }

    let cardinality = seen.len() as u64;
    let total = values.len();
    let null_ratio = if total == 0 {
        0.0
    } else {
        (total as u64 - non_absent) as f64 / total as f64
    };
    let unique_ratio = if non_absent == 0 {
        0.0
    } else {
        cardinality as f64 / non_absent as f64
    };

    let (min, max) = if dtype.is_numeric() {
        if numeric_min.is_finite() && numeric_max.is_finite() {
            (
                Some(format_bound(numeric_min)),
                Some(format_bound(numeric_max)),
            )
        } else {
            (None, None)
        }
    } else {
        (text_min, text_max)
    };

    let regex_patterns = crate::patterns::characteristic_patterns(&samples);

    Fingerprint {
        dtype,
        cardinality,
        null_ratio,
        unique_ratio,
        min,
        max,
        sample_values: samples,
        regex_patterns,
    }
}

/// Stringify a numeric bound the way samples are stringified: integral
/// values print without a fractional part.
fn format_bound(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

// ============================================================================
// Dtype inference
// ============================================================================

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?)?$")
            .expect("static regex")
    })
}

fn us_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}$").expect("static regex"))
}

fn is_bool_literal(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "false" | "t" | "f" | "yes" | "no"
    )
}

/// Infer the column dtype from the first non-absent cells.
///
/// Integer is checked before float — every integer also parses as a
/// float, so the reverse order could never produce `Int`.
pub fn infer_dtype(values: &[CellValue]) -> DType {
    let mut examined = 0usize;
    let mut ints = 0usize;
    let mut floats = 0usize;
    let mut bools = 0usize;
    let mut dates = 0usize;

    for value in values {
        if value.is_absent() {
            continue;
        }
        if examined >= DTYPE_INFERENCE_WINDOW {
            break;
        }
        examined += 1;

        match value {
            CellValue::Int(_) => {
                ints += 1;
                floats += 1;
            }
            CellValue::Float(v) => {
                floats += 1;
                if v.fract() == 0.0 {
                    ints += 1;
                }
            }
            CellValue::Bool(_) => bools += 1,
            CellValue::Timestamp(_) => dates += 1,
            CellValue::Text(s) => {
                let s = s.trim();
                if s.parse::<i64>().is_ok() {
                    ints += 1;
                    floats += 1;
                } else if s.parse::<f64>().is_ok() {
                    floats += 1;
                } else if is_bool_literal(s) {
                    bools += 1;
                } else if iso_date_re().is_match(s) || us_date_re().is_match(s) {
                    dates += 1;
                }
            }
            CellValue::Absent => unreachable!("absent cells are skipped"),
        }
    }

    if examined == 0 {
        return DType::Unknown;
    }

    let n = examined as f64;
    if ints as f64 / n >= DTYPE_INFERENCE_RATIO {
        DType::Int
    } else if floats as f64 / n >= DTYPE_INFERENCE_RATIO {
        DType::Float
    } else if bools as f64 / n > DTYPE_INFERENCE_RATIO {
        DType::Bool
    } else if dates as f64 / n > DTYPE_INFERENCE_RATIO {
        DType::Datetime
    } else {
        DType::Text
    }
}
