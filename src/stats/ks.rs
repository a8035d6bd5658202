//! Kolmogorov–Smirnov two-sample test.

use serde::Serialize;

use super::{require_non_empty, sorted};
use crate::error::Result;

/// Kolmogorov p-value series terms drop below this before truncation.
const SERIES_EPSILON: f64 = 1e-12;

/// Hard cap on Kolmogorov series terms.
const SERIES_MAX_TERMS: usize = 100;

/// Outcome of the KS two-sample test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KsResult {
    /// D = max |F₁(x) − F₂(x)| over the union of sample points, in [0, 1].
    pub statistic: f64,
    /// Asymptotic Kolmogorov p-value.
    pub p_value: f64,
    /// c(α)·√((n₁+n₂)/(n₁·n₂)).
    pub critical_value: f64,
    /// D exceeds the critical value at the requested α.
    pub significant: bool,
}

/// Two-sample KS test at significance level `alpha`.
///
/// `alpha` maps onto the tabulated coefficients c(0.01)=1.63,
/// c(0.05)=1.36, c(0.10)=1.22 (documented approximation).
pub fn ks_two_sample(sample1: &[f64], sample2: &[f64], alpha: f64) -> Result<KsResult> {
    require_non_empty("ks sample1", sample1)?;
    require_non_empty("ks sample2", sample2)?;

    let s1 = sorted(sample1);
    let s2 = sorted(sample2);
    let n1 = s1.len();
    let n2 = s2.len();

    let statistic = max_cdf_gap(&s1, &s2);
    let effective_n = (n1 as f64 * n2 as f64) / (n1 as f64 + n2 as f64);
    let lambda = statistic * effective_n.sqrt();
    let p_value = kolmogorov_survival(lambda);
    let critical_value =
        critical_coefficient(alpha) * ((n1 + n2) as f64 / (n1 as f64 * n2 as f64)).sqrt();

    Ok(KsResult {
        statistic,
        p_value,
        critical_value,
        significant: statistic > critical_value,
    })
}

/// Max ECDF gap over the union of sample points (both inputs sorted).
fn max_cdf_gap(s1: &[f64], s2: &[f64]) -> f64 {
    let n1 = s1.len() as f64;
    let n2 = s2.len() as f64;
    let mut i = 0usize;
    let mut j = 0usize;
    let mut gap: f64 = 0.0;

    while i < s1.len() || j < s2.len() {
        let x = match (s1.get(i), s2.get(j)) {
            (Some(a), Some(b)) => a.min(*b),
            (Some(a), None) => *a,
            (None, Some(b)) => *b,
            (None, None) => break,
        };
        while i < s1.len() && s1[i] <= x {
            i += 1;
        }
        while j < s2.len() && s2[j] <= x {
            j += 1;
        }
        gap = gap.max((i as f64 / n1 - j as f64 / n2).abs());
    }
    gap
}

/// Asymptotic Kolmogorov survival function
/// Q(λ) = 2·Σ_{k≥1} (−1)^{k−1}·e^{−2k²λ²}, clamped to [0, 1].
fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return 1.0;
    }
    let mut sum = 0.0;
    for k in 1..=SERIES_MAX_TERMS {
        let k = k as f64;
        let term = (-2.0 * k * k * lambda * lambda).exp();
        if term < SERIES_EPSILON {
            break;
        }
        if (k as usize) % 2 == 1 {
            sum += term;
        } else {
            sum -= term;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

/// Tabulated c(α) for the critical-value approximation.
fn critical_coefficient(alpha: f64) -> f64 {
    if alpha <= 0.01 {
        1.63
    } else if alpha <= 0.05 {
        1.36
    } else {
        1.22
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriftError;

    #[test]
    fn identical_samples_have_zero_statistic() {
        let sample: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let r = ks_two_sample(&sample, &sample, 0.05).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert_eq!(r.p_value, 1.0);
        assert!(!r.significant);
    }

    #[test]
    fn disjoint_samples_have_unit_statistic() {
        let a: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..100).map(|i| 1000.0 + i as f64).collect();
        let r = ks_two_sample(&a, &b, 0.05).unwrap();
        assert!((r.statistic - 1.0).abs() < 1e-12);
        assert!(r.p_value < 0.001);
        assert!(r.significant);
    }

    #[test]
    fn statistic_stays_in_unit_interval() {
        let a: Vec<f64> = (0..50).map(|i| (i % 7) as f64).collect();
        let b: Vec<f64> = (0..80).map(|i| (i % 11) as f64 * 0.5).collect();
        let r = ks_two_sample(&a, &b, 0.05).unwrap();
        assert!((0.0..=1.0).contains(&r.statistic));
        assert!((0.0..=1.0).contains(&r.p_value));
    }

    #[test]
    fn p_value_decreases_with_larger_shift() {
        let base: Vec<f64> = (0..200).map(|i| i as f64 / 10.0).collect();
        let small: Vec<f64> = base.iter().map(|v| v + 2.0).collect();
        let large: Vec<f64> = base.iter().map(|v| v + 15.0).collect();
        let p_small = ks_two_sample(&base, &small, 0.05).unwrap().p_value;
        let p_large = ks_two_sample(&base, &large, 0.05).unwrap().p_value;
        assert!(p_large <= p_small);
    }

    #[test]
    fn critical_value_follows_alpha_table() {
        let a: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let strict = ks_two_sample(&a, &a, 0.01).unwrap().critical_value;
        let default = ks_two_sample(&a, &a, 0.05).unwrap().critical_value;
        let loose = ks_two_sample(&a, &a, 0.10).unwrap().critical_value;
        assert!(strict > default && default > loose);
        // c(0.05)·√(200/10000) = 1.36·0.1414…
        assert!((default - 1.36 * (200.0f64 / 10_000.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_input_is_invalid() {
        let sample = [1.0, 2.0];
        assert!(matches!(
            ks_two_sample(&[], &sample, 0.05),
            Err(DriftError::InvalidInput(_))
        ));
        assert!(matches!(
            ks_two_sample(&sample, &[], 0.05),
            Err(DriftError::InvalidInput(_))
        ));
    }
}
