//! 1-D Wasserstein distance (earth mover's distance).

use super::{require_non_empty, sorted};
use crate::error::Result;

/// Wasserstein-1 distance: the integral of |F₁ − F₂| over the union of
/// sample supports.
pub fn wasserstein_distance(sample1: &[f64], sample2: &[f64]) -> Result<f64> {
    require_non_empty("wasserstein sample1", sample1)?;
    require_non_empty("wasserstein sample2", sample2)?;

    let s1 = sorted(sample1);
    let s2 = sorted(sample2);
    let n1 = s1.len() as f64;
    let n2 = s2.len() as f64;

    let mut i = 0usize;
    let mut j = 0usize;
    let mut distance = 0.0;
    let mut prev: Option<f64> = None;

    while i < s1.len() || j < s2.len() {
        let x = match (s1.get(i), s2.get(j)) {
            (Some(a), Some(b)) => a.min(*b),
            (Some(a), None) => *a,
            (None, Some(b)) => *b,
            (None, None) => break,
        };
        if let Some(p) = prev {
            // ECDF values are constant on [p, x); integrate the gap.
            let gap = (i as f64 / n1 - j as f64 / n2).abs();
            distance += gap * (x - p);
        }
        while i < s1.len() && s1[i] <= x {
            i += 1;
        }
        while j < s2.len() && s2[j] <= x {
            j += 1;
        }
        prev = Some(x);
    }

    Ok(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn distance_to_self_is_zero() {
        let sample = uniform(100);
        assert_eq!(wasserstein_distance(&sample, &sample).unwrap(), 0.0);
    }

    #[test]
    fn constant_shift_equals_the_shift() {
        let a = uniform(100);
        let b: Vec<f64> = a.iter().map(|v| v + 7.5).collect();
        let d = wasserstein_distance(&a, &b).unwrap();
        assert!((d - 7.5).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = uniform(50);
        let b: Vec<f64> = (0..80).map(|i| i as f64 * 1.7).collect();
        let ab = wasserstein_distance(&a, &b).unwrap();
        let ba = wasserstein_distance(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn triangle_inequality() {
        let a = uniform(60);
        let b: Vec<f64> = a.iter().map(|v| v * 2.0).collect();
        let c: Vec<f64> = a.iter().map(|v| v + 40.0).collect();
        let ab = wasserstein_distance(&a, &b).unwrap();
        let bc = wasserstein_distance(&b, &c).unwrap();
        let ac = wasserstein_distance(&a, &c).unwrap();
        assert!(ac <= ab + bc + 1e-9);
    }

    #[test]
    fn empty_input_is_invalid() {
        assert!(wasserstein_distance(&[], &[1.0]).is_err());
    }
}
