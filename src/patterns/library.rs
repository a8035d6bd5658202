//! Built-in semantic pattern library.
//!
//! Curated full-value regexes for well-known column formats. Loaded once
//! and read-only afterwards; detectors never mutate it.

use std::sync::OnceLock;

use regex::Regex;

/// One named library pattern.
pub struct SemanticPattern {
    /// Stable label (e.g. "email") used when reporting lost semantics.
    pub name: &'static str,
    /// The pattern string as it appears in profiles and fingerprints.
    pub pattern: &'static str,
    pub regex: Regex,
    /// Loosely-structured patterns (names, companies, addresses) match
    /// broadly, so they are retained at a lower frequency bar.
    pub loose: bool,
}

/// The global, load-once pattern library.
pub struct PatternLibrary {
    patterns: Vec<SemanticPattern>,
}

impl PatternLibrary {
    pub fn global() -> &'static PatternLibrary {
        static LIBRARY: OnceLock<PatternLibrary> = OnceLock::new();
        LIBRARY.get_or_init(PatternLibrary::builtin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SemanticPattern> {
        self.patterns.iter()
    }

    /// Semantic label for a pattern string, when it is a library pattern.
    pub fn semantic_label(&self, pattern: &str) -> Option<&'static str> {
        self.patterns
            .iter()
            .find(|p| p.pattern == pattern)
            .map(|p| p.name)
    }

    fn builtin() -> Self {
        let entries: &[(&'static str, &'static str, bool)] = &[
            (
                "email",
                r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$",
                false,
            ),
            (
                "phone",
                r"^\+?1?[-. ]?(\(\d{3}\)|\d{3})[-. ]?\d{3}[-. ]?\d{4}$",
                false,
            ),
            (
                "uuid",
                r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
                false,
            ),
            (
                "iso_date",
                r"^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?)?$",
                false,
            ),
            ("us_date", r"^\d{1,2}/\d{1,2}/\d{2,4}$", false),
            ("ssn", r"^\d{3}-\d{2}-\d{4}$", false),
            ("credit_card", r"^\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}$", false),
            (
                "ipv4",
                r"^(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)$",
                false,
            ),
            ("url", r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$", false),
            ("numeric", r"^-?\d+(\.\d+)?$", false),
            ("alpha", r"^[A-Za-z]+$", false),
            ("alphanumeric", r"^[A-Za-z0-9]+$", false),
            (
                "currency",
                r"^[$€£¥]\s?-?\d{1,3}(,\d{3})*(\.\d{1,2})?$",
                false,
            ),
            ("percentage", r"^-?\d+(\.\d+)?%$", false),
            ("postal_code", r"^\d{5}(-\d{4})?$", false),
            ("person_name", r"^[A-Z][a-z]+([ '-][A-Z][a-z]+)+$", true),
            (
                "company_name",
                r"^[A-Z][A-Za-z0-9&.,' -]+\b(Inc|LLC|Ltd|Corp|Co|GmbH)\.?$",
                true,
            ),
            ("street_address", r"^\d+ [A-Za-z0-9.,' -]+$", true),
        ];

        let patterns = entries
            .iter()
            .map(|(name, pattern, loose)| SemanticPattern {
                name,
                pattern,
                regex: Regex::new(pattern).expect("builtin pattern compiles"),
                loose: *loose,
            })
            .collect();

        Self { patterns }
    }
}
