//! Two-sample Anderson–Darling test.

use serde::Serialize;

use super::{require_non_empty, sorted};
use crate::config::defaults::ANDERSON_DARLING_CRITICAL_5PCT;
use crate::error::Result;

/// Outcome of the two-sample Anderson–Darling test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AndersonDarlingResult {
    /// The A² statistic over the combined ordering.
    pub statistic: f64,
    /// 5% critical value (documented approximation).
    pub critical_value: f64,
    pub significant: bool,
}

/// Rank-based two-sample A² statistic:
///
/// A² = (1/(n·m)) · Σ_{i=1}^{N−1} (Mᵢ·N − n·i)² / (i·(N−i))
///
/// where N = n + m and Mᵢ counts first-sample observations among the i
/// smallest of the pooled sample. Compared against the approximate 5%
/// critical value 2.5; callers should treat the result as a sign and
/// ordering signal rather than an exact p-value.
pub fn anderson_darling_two_sample(
    sample1: &[f64],
    sample2: &[f64],
) -> Result<AndersonDarlingResult> {
    require_non_empty("anderson-darling sample1", sample1)?;
    require_non_empty("anderson-darling sample2", sample2)?;

    let s1 = sorted(sample1);
    let s2 = sorted(sample2);
    let n = s1.len();
    let m = s2.len();
    let total = n + m;

    // Merge the two sorted samples, tracking how many of the i smallest
    // pooled values came from the first sample.
    let mut statistic = 0.0;
    let mut i1 = 0usize;
    let mut i2 = 0usize;
    let mut from_first = 0usize;

    for i in 1..total {
        let take_first = match (s1.get(i1), s2.get(i2)) {
            (Some(a), Some(b)) => a <= b,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_first {
            i1 += 1;
            from_first += 1;
        } else {
            i2 += 1;
        }

        let num = from_first as f64 * total as f64 - n as f64 * i as f64;
        let den = (i * (total - i)) as f64;
        statistic += num * num / den;
    }
    statistic /= (n * m) as f64;

    Ok(AndersonDarlingResult {
        statistic,
        critical_value: ANDERSON_DARLING_CRITICAL_5PCT,
        significant: statistic > ANDERSON_DARLING_CRITICAL_5PCT,
    })
}
