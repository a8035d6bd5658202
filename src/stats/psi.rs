//! Population Stability Index.

use serde::Serialize;

use super::{require_non_empty, sorted, stable_sum};
use crate::config::defaults::PSI_EPSILON;
use crate::error::Result;

/// Stability category derived from the PSI score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PsiStability {
    /// PSI < 0.10
    Stable,
    /// 0.10 ≤ PSI < 0.15
    Minor,
    /// 0.15 ≤ PSI < 0.25
    Major,
    /// PSI ≥ 0.25
    Significant,
}

impl PsiStability {
    fn from_score(score: f64) -> Self {
        if score < 0.10 {
            PsiStability::Stable
        } else if score < 0.15 {
            PsiStability::Minor
        } else if score < 0.25 {
            PsiStability::Major
        } else {
            PsiStability::Significant
        }
    }
}

/// PSI score plus its categorical reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PsiResult {
    pub score: f64,
    pub stability: PsiStability,
}

/// PSI between a baseline (`expected`) and a current (`actual`) sample.
///
/// Bin edges are equal-count quantiles of the baseline. Both bin-fraction
/// vectors get ε = 1e-4 added so log(0) cannot occur; as a consequence
/// PSI(x, x) is exactly 0 and every other score is strictly positive.
pub fn population_stability_index(
    expected: &[f64],
    actual: &[f64],
    bins: usize,
) -> Result<PsiResult> {
    require_non_empty("psi expected", expected)?;
    require_non_empty("psi actual", actual)?;
    let bins = bins.max(2);

    let sorted_expected = sorted(expected);
    let edges = quantile_edges(&sorted_expected, bins);

    let expected_fractions = bin_fractions(expected, &edges, bins);
    let actual_fractions = bin_fractions(actual, &edges, bins);

    let score = stable_sum(
        expected_fractions
            .iter()
            .zip(actual_fractions.iter())
            .map(|(e, a)| (a - e) * (a / e).ln()),
    );

    Ok(PsiResult {
        score,
        stability: PsiStability::from_score(score),
    })
}

/// PSI after systematic subsampling of both sides to at most `limit`
/// values. Deterministic: picks are index-based, no RNG involved.
pub fn fast_psi(
    expected: &[f64],
    actual: &[f64],
    bins: usize,
    limit: usize,
) -> Result<PsiResult> {
    let expected_view = systematic_subsample(expected, limit);
    let actual_view = systematic_subsample(actual, limit);
    population_stability_index(&expected_view, &actual_view, bins)
}

fn systematic_subsample(sample: &[f64], limit: usize) -> Vec<f64> {
    if sample.len() <= limit || limit == 0 {
        return sample.to_vec();
    }
    (0..limit)
        .map(|i| sample[i * sample.len() / limit])
        .collect()
}

/// Equal-count quantile edges over the sorted baseline; `bins − 1` values.
fn quantile_edges(sorted_expected: &[f64], bins: usize) -> Vec<f64> {
    let n = sorted_expected.len();
    (1..bins)
        .map(|i| sorted_expected[(i * n / bins).min(n - 1)])
        .collect()
}

/// Fraction of `sample` falling in each of the `bins` edge-delimited bins,
/// with ε added to every fraction.
fn bin_fractions(sample: &[f64], edges: &[f64], bins: usize) -> Vec<f64> {
    let mut counts = vec![0usize; bins];
    for &v in sample {
        let bin = edges.partition_point(|e| *e < v).min(bins - 1);
        counts[bin] += 1;
    }
    let n = sample.len() as f64;
    counts
        .iter()
        .map(|&c| c as f64 / n + PSI_EPSILON)
        .collect()
}
