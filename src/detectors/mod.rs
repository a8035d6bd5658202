//! Drift detectors.
//!
//! The five detectors are stateless and run in a fixed order —
//! distribution, format, unit, joinability, confidence — because the
//! confidence detector consumes the findings of the other four. Each
//! detector declares the shape it requires via [`Detector::applies`];
//! inapplicable detectors are skipped, not failed.

mod confidence;
mod distribution;
mod format;
mod joinability;
mod unit;

pub use confidence::ConfidenceDetector;
pub use distribution::DistributionDetector;
pub use format::FormatDetector;
pub use joinability::JoinabilityDetector;
pub use unit::UnitDetector;

use tracing::{debug, warn};

use crate::config::DriftConfig;
use crate::error::Result;
use crate::types::{Anchor, CellValue, DriftFinding, DriftKind, Fingerprint};

/// Everything a detector may read. Inputs are immutable for the duration
/// of the evaluation; detectors never write anywhere but their return
/// value.
pub struct DetectionContext<'a> {
    pub anchor: &'a Anchor,
    pub baseline: &'a Fingerprint,
    pub current: &'a Fingerprint,
    pub values: &'a [CellValue],
    pub config: &'a DriftConfig,
    /// Findings emitted by earlier detectors in this evaluation.
    pub prior: &'a [DriftFinding],
}

/// A single drift detector.
pub trait Detector: Send + Sync {
    fn kind(&self) -> DriftKind;

    /// Capability check: can this detector evaluate the given shapes?
    /// Returning false skips the detector without error.
    fn applies(&self, ctx: &DetectionContext<'_>) -> bool;

    /// Run the detector. `Ok(None)` means "no drift".
    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<DriftFinding>>;
}

/// The authoritative detector set, in execution order.
pub fn default_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(DistributionDetector),
        Box::new(FormatDetector),
        Box::new(UnitDetector),
        Box::new(JoinabilityDetector),
        Box::new(ConfidenceDetector),
    ]
}

/// Run detectors sequentially with the recovery semantics of the engine:
/// inapplicable detectors are skipped, a detector failing on bad kernel
/// input loses only its own verdict, fatal errors abort the evaluation.
pub fn run_detectors(
    anchor: &Anchor,
    current: &Fingerprint,
    values: &[CellValue],
    config: &DriftConfig,
) -> Result<Vec<DriftFinding>> {
    run_detectors_with(anchor, current, values, config, || Ok(()))
}

/// [`run_detectors`] with a cooperative checkpoint invoked before each
/// detector. The engine uses the checkpoint for cancellation and
/// soft-deadline enforcement; a checkpoint error aborts the evaluation.
pub fn run_detectors_with(
    anchor: &Anchor,
    current: &Fingerprint,
    values: &[CellValue],
    config: &DriftConfig,
    mut checkpoint: impl FnMut() -> Result<()>,
) -> Result<Vec<DriftFinding>> {
    let mut findings: Vec<DriftFinding> = Vec::new();

    for detector in default_detectors() {
        checkpoint()?;
        let ctx = DetectionContext {
            anchor,
            baseline: &anchor.fingerprint,
            current,
            values,
            config,
            prior: &findings,
        };
        if !detector.applies(&ctx) {
            debug!(
                anchor = %anchor.anchor_id,
                detector = %detector.kind(),
                "detector not applicable, skipping"
            );
            continue;
        }
        match detector.detect(&ctx) {
            Ok(Some(finding)) => findings.push(finding),
            Ok(None) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(
                    anchor = %anchor.anchor_id,
                    detector = %detector.kind(),
                    error = %e,
                    "detector failed, continuing with remaining detectors"
                );
            }
        }
    }

    Ok(findings)
}
