//! Anchors: named baseline fingerprints with identity and lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Fingerprint;

/// A named baseline for one column of one dataset.
///
/// Created on first successful observation. The detection core never
/// rewrites an anchor in place; the only mutations are bumping `last_seen`
/// and adjusting `confidence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Opaque identity, assigned by the caller's anchor registry.
    pub anchor_id: String,
    pub dataset: String,
    pub column_name: String,
    pub fingerprint: Fingerprint,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Prior mapping certainty in [0, 1], when known.
    pub confidence: Option<f64>,
}

impl Anchor {
    pub fn new(
        anchor_id: impl Into<String>,
        dataset: impl Into<String>,
        column_name: impl Into<String>,
        fingerprint: Fingerprint,
        seen_at: DateTime<Utc>,
    ) -> Self {
        Self {
            anchor_id: anchor_id.into(),
            dataset: dataset.into(),
            column_name: column_name.into(),
            fingerprint,
            first_seen: seen_at,
            last_seen: seen_at,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    /// Record a fresh observation of this column.
    pub fn touch(&mut self, seen_at: DateTime<Utc>) {
        if seen_at > self.last_seen {
            self.last_seen = seen_at;
        }
    }
}

/// Flattened anchor for storage/exchange: the fingerprint travels in its
/// delimited key=value wire form (see [`crate::fingerprint::codec`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRecord {
    pub dataset: String,
    pub column_name: String,
    pub anchor_id: String,
    pub fingerprint: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_cid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl AnchorRecord {
    /// Flatten an anchor into its exchange form.
    pub fn from_anchor(anchor: &Anchor) -> Self {
        Self {
            dataset: anchor.dataset.clone(),
            column_name: anchor.column_name.clone(),
            anchor_id: anchor.anchor_id.clone(),
            fingerprint: crate::fingerprint::codec::serialize_fingerprint(&anchor.fingerprint),
            first_seen: anchor.first_seen,
            last_seen: anchor.last_seen,
            mapped_cid: None,
            confidence: anchor.confidence,
        }
    }

    /// Rehydrate the anchor, parsing the fingerprint wire string.
    pub fn to_anchor(&self) -> crate::error::Result<Anchor> {
        let fingerprint = crate::fingerprint::codec::parse_fingerprint(&self.fingerprint)?;
        Ok(Anchor {
            anchor_id: self.anchor_id.clone(),
            dataset: self.dataset.clone(),
            column_name: self.column_name.clone(),
            fingerprint,
            first_seen: self.first_seen,
            last_seen: self.last_seen,
            confidence: self.confidence,
        })
    }
}
