//! Chi-square goodness-of-fit test.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use super::{require_non_empty, stable_sum};
use crate::error::{DriftError, Result};

/// Outcome of the chi-square goodness-of-fit test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquareResult {
    pub statistic: f64,
    /// Upper-tail p-value via the regularized incomplete gamma (statrs).
    pub p_value: f64,
    pub degrees_of_freedom: usize,
}

/// Chi-square test of `observed` counts against `expected` counts.
///
/// Inputs must be equal-length with every expected count > 0;
/// degrees of freedom = k − 1.
pub fn chi_square_gof(observed: &[f64], expected: &[f64]) -> Result<ChiSquareResult> {
    require_non_empty("chi-square observed", observed)?;
    require_non_empty("chi-square expected", expected)?;
    if observed.len() != expected.len() {
        return Err(DriftError::InvalidInput(format!(
            "chi-square length mismatch: observed {} vs expected {}",
            observed.len(),
            expected.len()
        )));
    }
    if observed.len() < 2 {
        return Err(DriftError::InvalidInput(
            "chi-square needs at least two categories".into(),
        ));
    }
    if let Some(bad) = expected.iter().find(|e| **e <= 0.0) {
        return Err(DriftError::InvalidInput(format!(
            "chi-square expected count must be > 0, got {bad}"
        )));
    }

    let statistic = stable_sum(
        observed
            .iter()
            .zip(expected.iter())
            .map(|(o, e)| (o - e) * (o - e) / e),
    );
    let degrees_of_freedom = observed.len() - 1;

    let dist = ChiSquared::new(degrees_of_freedom as f64)
        .map_err(|e| DriftError::Internal(format!("chi-squared distribution: {e}")))?;
    let p_value = (1.0 - dist.cdf(statistic)).clamp(0.0, 1.0);

    Ok(ChiSquareResult {
        statistic,
        p_value,
        degrees_of_freedom,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_counts_are_a_perfect_fit() {
        let counts = [25.0, 25.0, 25.0, 25.0];
        let r = chi_square_gof(&counts, &counts).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert!((r.p_value - 1.0).abs() < 1e-12);
        assert_eq!(r.degrees_of_freedom, 3);
    }

    #[test]
    fn skewed_counts_reject_the_fit() {
        let observed = [90.0, 5.0, 3.0, 2.0];
        let expected = [25.0, 25.0, 25.0, 25.0];
        let r = chi_square_gof(&observed, &expected).unwrap();
        assert!(r.statistic > 100.0);
        assert!(r.p_value < 0.001);
    }

    #[test]
    fn known_p_value_ballpark() {
        // χ² = 2·9.8²/50 ≈ 3.84 at df = 1 sits right at p ≈ 0.05.
        let observed = [59.8, 40.2];
        let expected = [50.0, 50.0];
        let r = chi_square_gof(&observed, &expected).unwrap();
        assert_eq!(r.degrees_of_freedom, 1);
        assert!((r.statistic - 3.84).abs() < 0.01);
        assert!((r.p_value - 0.05).abs() < 0.01);
    }

    #[test]
    fn mismatched_lengths_are_invalid() {
        assert!(matches!(
            chi_square_gof(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(DriftError::InvalidInput(_))
        ));
    }

    #[test]
    fn nonpositive_expected_is_invalid() {
        assert!(matches!(
            chi_square_gof(&[1.0, 2.0], &[1.0, 0.0]),
            Err(DriftError::InvalidInput(_))
        ));
        assert!(matches!(
            chi_square_gof(&[1.0, 2.0], &[1.0, -3.0]),
            Err(DriftError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_input_is_invalid() {
        assert!(matches!(
            chi_square_gof(&[], &[]),
            Err(DriftError::InvalidInput(_))
        ));
    }
}
