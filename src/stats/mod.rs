//! Statistical kernels for distribution comparison.
//!
//! All kernels operate on finite numeric sequences — absent cells are
//! filtered upstream — and are deterministic for identical inputs. Empty
//! inputs are rejected with `InvalidInput`.

mod anderson_darling;
mod chi_square;
mod ks;
mod psi;
mod wasserstein;

pub use anderson_darling::{anderson_darling_two_sample, AndersonDarlingResult};
pub use chi_square::{chi_square_gof, ChiSquareResult};
pub use ks::{ks_two_sample, KsResult};
pub use psi::{fast_psi, population_stability_index, PsiResult, PsiStability};
pub use wasserstein::wasserstein_distance;

use crate::error::{DriftError, Result};

/// Reject empty kernel inputs up front.
pub(crate) fn require_non_empty(name: &str, sample: &[f64]) -> Result<()> {
    if sample.is_empty() {
        return Err(DriftError::InvalidInput(format!("{name} sample is empty")));
    }
    Ok(())
}

/// Sorted copy of a sample. Non-finite values are dropped rather than
/// poisoning the ordering; the upstream filter should already have
/// removed them.
pub(crate) fn sorted(sample: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Kahan compensated summation; keeps large-vector accumulation stable.
pub(crate) fn stable_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut compensation = 0.0;
    for v in values {
        let y = v - compensation;
        let t = sum + y;
        compensation = (t - sum) - y;
        sum = t;
    }
    sum
}

pub(crate) fn mean(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    stable_sum(sample.iter().copied()) / sample.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_sum_handles_catastrophic_cancellation() {
        // Naive summation of [1e16, 1.0, -1e16] loses the 1.0.
        let values = [1e16, 1.0, -1e16];
        assert_eq!(stable_sum(values), 1.0);
    }

    #[test]
    fn sorted_drops_non_finite() {
        let s = sorted(&[3.0, f64::NAN, 1.0, f64::INFINITY, 2.0]);
        assert_eq!(s, vec![1.0, 2.0, 3.0]);
    }
}
