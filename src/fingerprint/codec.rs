//! Anchor fingerprint wire codec.
//!
//! The wire form is a delimited key=value list:
//!
//! ```text
//! min=1;max=100;dtype=int;card=98;null_ratio=0.010;unique_ratio=0.980;patterns=^CUST_[0-9]{6}$
//! ```
//!
//! The field delimiter is `;`. A legacy form used `|`; readers accept both
//! and prefer `;` when present, so patterns may contain `|`. Absent bounds
//! are written as the `null` literal, ratios with three fractional digits,
//! patterns as a comma-separated list. `sample_values` do not travel on the
//! wire — a parsed fingerprint carries empty samples and re-serializes
//! byte-identically.

use std::fmt::Write as _;

use crate::error::{DriftError, Result};
use crate::types::{DType, Fingerprint};

/// Serialize a fingerprint into its `;`-delimited wire form.
pub fn serialize_fingerprint(fp: &Fingerprint) -> String {
    let mut out = String::with_capacity(96);
    let bound = |b: &Option<String>| b.clone().unwrap_or_else(|| "null".to_string());
    // Infallible: writing to a String cannot fail.
    let _ = write!(
        out,
        "min={};max={};dtype={};card={};null_ratio={:.3};unique_ratio={:.3}",
        bound(&fp.min),
        bound(&fp.max),
        fp.dtype,
        fp.cardinality,
        fp.null_ratio,
        fp.unique_ratio,
    );
    if !fp.regex_patterns.is_empty() {
        let _ = write!(out, ";patterns={}", fp.regex_patterns.join(","));
    }
    out
}

/// Parse a fingerprint from either the `;` or the legacy `|` wire form.
pub fn parse_fingerprint(raw: &str) -> Result<Fingerprint> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DriftError::InvalidInput("empty fingerprint string".into()));
    }

    // Prefer `;` whenever it appears so legacy `|` inside patterns survives.
    let delimiter = if raw.contains(';') { ';' } else { '|' };

    let mut min = None;
    let mut max = None;
    let mut dtype: Option<DType> = None;
    let mut cardinality: Option<u64> = None;
    let mut null_ratio: Option<f64> = None;
    let mut unique_ratio: Option<f64> = None;
    let mut patterns: Vec<String> = Vec::new();

    for field in raw.split(delimiter) {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let (key, value) = field.split_once('=').ok_or_else(|| {
            DriftError::InvalidInput(format!("fingerprint field without '=': {field:?}"))
        })?;
        match key.trim() {
            "min" => min = parse_bound(value),
            "max" => max = parse_bound(value),
            "dtype" => {
                dtype = Some(
                    value
                        .parse::<DType>()
                        .map_err(DriftError::InvalidInput)?,
                );
            }
            "card" => {
                cardinality = Some(value.trim().parse::<u64>().map_err(|_| {
                    DriftError::InvalidInput(format!("bad cardinality: {value:?}"))
                })?);
            }
            "null_ratio" => null_ratio = Some(parse_ratio("null_ratio", value)?),
            "unique_ratio" => unique_ratio = Some(parse_ratio("unique_ratio", value)?),
            "patterns" => {
                patterns = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect();
            }
            // Unknown keys are skipped so newer writers stay readable.
            _ => {}
        }
    }

    let fp = Fingerprint {
        dtype: dtype
            .ok_or_else(|| DriftError::InvalidInput("fingerprint missing dtype".into()))?,
        cardinality: cardinality
            .ok_or_else(|| DriftError::InvalidInput("fingerprint missing card".into()))?,
        null_ratio: null_ratio
            .ok_or_else(|| DriftError::InvalidInput("fingerprint missing null_ratio".into()))?,
        unique_ratio: unique_ratio
            .ok_or_else(|| DriftError::InvalidInput("fingerprint missing unique_ratio".into()))?,
        min,
        max,
        sample_values: Vec::new(),
        regex_patterns: patterns,
    };
    fp.check_invariants().map_err(DriftError::InvalidInput)?;
    Ok(fp)
}

fn parse_bound(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_ratio(key: &str, value: &str) -> Result<f64> {
    let ratio = value
        .trim()
        .parse::<f64>()
        .map_err(|_| DriftError::InvalidInput(format!("bad {key}: {value:?}")))?;
    if !(0.0..=1.0).contains(&ratio) {
        return Err(DriftError::InvalidInput(format!(
            "{key} out of range: {ratio}"
        )));
    }
    Ok(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_fingerprint() -> Fingerprint {
        Fingerprint {
            dtype: DType::Int,
            cardinality: 98,
            null_ratio: 0.01,
            unique_ratio: 0.98,
            min: Some("1".into()),
            max: Some("100".into()),
            sample_values: Vec::new(),
            regex_patterns: vec!["^CUST_[0-9]{6}$".into()],
        }
    }

    #[test]
    fn serializes_canonical_example() {
        assert_eq!(
            serialize_fingerprint(&wire_fingerprint()),
            "min=1;max=100;dtype=int;card=98;null_ratio=0.010;unique_ratio=0.980;patterns=^CUST_[0-9]{6}$"
        );
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let fp = wire_fingerprint();
        let parsed = parse_fingerprint(&serialize_fingerprint(&fp)).unwrap();
        assert_eq!(parsed, fp);
        // And the re-serialization is byte-identical.
        assert_eq!(
            serialize_fingerprint(&parsed),
            serialize_fingerprint(&fp)
        );
    }

    #[test]
    fn legacy_pipe_delimiter_parses_identically() {
        let semicolon = "min=0;max=10;dtype=float;card=5;null_ratio=0.000;unique_ratio=0.500";
        let pipe = "min=0|max=10|dtype=float|card=5|null_ratio=0.000|unique_ratio=0.500";
        assert_eq!(
            parse_fingerprint(semicolon).unwrap(),
            parse_fingerprint(pipe).unwrap()
        );
    }

    #[test]
    fn semicolon_wins_so_patterns_may_contain_pipe() {
        let raw = "min=null;max=null;dtype=text;card=3;null_ratio=0.000;unique_ratio=1.000;patterns=^(a|b)$";
        let fp = parse_fingerprint(raw).unwrap();
        assert_eq!(fp.regex_patterns, vec!["^(a|b)$".to_string()]);
    }

    #[test]
    fn null_bounds_round_trip() {
        let fp = Fingerprint::empty(DType::Text);
        let parsed = parse_fingerprint(&serialize_fingerprint(&fp)).unwrap();
        assert!(parsed.min.is_none());
        assert!(parsed.max.is_none());
    }

    #[test]
    fn three_digit_ratio_formatting() {
        let mut fp = wire_fingerprint();
        fp.null_ratio = 1.0 / 3.0;
        fp.unique_ratio = 2.0 / 3.0;
        let wire = serialize_fingerprint(&fp);
        assert!(wire.contains("null_ratio=0.333"));
        assert!(wire.contains("unique_ratio=0.667"));
    }

    #[test]
    fn malformed_inputs_are_invalid() {
        for raw in [
            "",
            "not a fingerprint",
            "dtype=int;card=abc;null_ratio=0.0;unique_ratio=0.0",
            "dtype=int;null_ratio=0.0;unique_ratio=0.0", // missing card
            "dtype=int;card=1;null_ratio=2.0;unique_ratio=0.0", // ratio out of range
            "dtype=martian;card=1;null_ratio=0.0;unique_ratio=0.0",
        ] {
            assert!(
                matches!(parse_fingerprint(raw), Err(DriftError::InvalidInput(_))),
                "expected InvalidInput for {raw:?}"
            );
        }
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let raw = "dtype=int;card=1;null_ratio=0.000;unique_ratio=1.000;future_field=zap";
        assert!(parse_fingerprint(raw).is_ok());
    }
}
