//! Probability mass functions over non-negative integer outcomes
//!
//! `PMF` is the unit of currency for the whole engine: every phase of an
//! attack consumes and produces one. Index = outcome value, element =
//! probability of that outcome. Operations never mutate; they return a
//! new distribution.

mod collection;

pub use collection::PMFCollection;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Probabilities smaller than this are treated as zero. Chained
/// floating-point convolutions leave residue around 1e-16; the inverse
/// FFT also leaves a tiny imaginary component that gets discarded under
/// the same tolerance. Must stay at the scale of actual floating-point
/// residue: a coarser cutoff discards genuinely reachable branches.
pub const EPSILON: f64 = 1e-18;

/// A discrete probability distribution over outcomes `0..len`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PMF {
    pub values: Vec<f64>,
}

impl PMF {
    pub fn new(values: Vec<f64>) -> Self {
        PMF { values }
    }

    /// Distribution of a fair die with `sides` faces. Outcome 0 is
    /// unreachable: you cannot roll a 0 on a die.
    pub fn dn(sides: usize) -> Self {
        let mut values = vec![0.0; sides + 1];
        for value in values.iter_mut().skip(1) {
            *value = 1.0 / sides as f64;
        }
        PMF::new(values)
    }

    /// Distribution with all probability concentrated at `value`.
    pub fn constant(value: usize) -> Self {
        let mut values = vec![0.0; value + 1];
        values[value] = 1.0;
        PMF::new(values)
    }

    /// Whether a probability is negligible under [`EPSILON`].
    pub fn is_null_prob(prob: f64) -> bool {
        prob.abs() < EPSILON
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Probability of exactly `value`; 0 outside the support.
    pub fn get(&self, value: usize) -> f64 {
        self.values.get(value).copied().unwrap_or(0.0)
    }

    /// Scale every probability by `factor`. Used to weight a
    /// conditional branch before flattening it into the whole.
    pub fn scale(&self, factor: f64) -> PMF {
        PMF::new(self.values.iter().map(|p| p * factor).collect())
    }

    /// Expected value of the distribution.
    pub fn mean(&self) -> f64 {
        self.values
            .iter()
            .enumerate()
            .map(|(outcome, p)| outcome as f64 * p)
            .sum()
    }

    /// Standard deviation of the distribution.
    pub fn std(&self) -> f64 {
        let mean = self.mean();
        let exp_sq: f64 = self
            .values
            .iter()
            .enumerate()
            .map(|(outcome, p)| (outcome as f64).powi(2) * p)
            .sum();
        (exp_sq - mean.powi(2)).max(0.0).sqrt()
    }

    /// P(outcome >= k) for every k in the support.
    pub fn cumulative(&self) -> PMF {
        let mut values = Vec::with_capacity(self.len());
        let mut tail = self.values.iter().sum::<f64>();
        for &p in &self.values {
            values.push(tail);
            tail -= p;
        }
        PMF::new(values)
    }

    /// Fold the probability of every outcome above `cap` into `cap`.
    /// Models damage wasted past a target's remaining wounds.
    pub fn ceiling(&self, cap: usize) -> PMF {
        if self.len() <= cap + 1 {
            return self.clone();
        }
        let mut values = self.values[..=cap].to_vec();
        values[cap] += self.values[cap + 1..].iter().sum::<f64>();
        PMF::new(values)
    }

    /// Fold the probability of every outcome below `min_value` into
    /// `min_value`. Models "treat rolls of 1 and 2 as 3" style rules.
    pub fn min(&self, min_value: usize) -> PMF {
        let below: f64 = self.values.iter().take(min_value + 1).sum();
        let mut values = vec![0.0; min_value];
        values.push(below);
        if self.len() > min_value + 1 {
            values.extend_from_slice(&self.values[min_value + 1..]);
        }
        PMF::new(values)
    }

    /// Drop the high tail where probabilities stay below `thresh`.
    pub fn trim_tail(&self, thresh: f64) -> PMF {
        let mut end = 0;
        for (i, &p) in self.values.iter().enumerate() {
            if p >= thresh {
                end = i + 1;
            }
        }
        PMF::new(self.values[..end].to_vec())
    }

    /// Re-roll one exact face: its probability is redistributed across
    /// the whole distribution in proportion to the original odds.
    pub fn re_roll_value(&self, value: usize) -> PMF {
        let rerolled = self.get(value);
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let kept = if i == value { 0.0 } else { p };
                kept + rerolled * p
            })
            .collect();
        PMF::new(values)
    }

    /// Re-roll every outcome strictly below `value`, redistributing the
    /// cumulative mass below across the original distribution. Takes a
    /// float so "re-roll below the expected value" works unchanged.
    pub fn re_roll_less_than(&self, value: f64) -> PMF {
        let below: f64 = self
            .values
            .iter()
            .enumerate()
            .filter(|(i, _)| (*i as f64) < value)
            .map(|(_, &p)| p)
            .sum();
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let kept = if (i as f64) < value { 0.0 } else { p };
                kept + below * p
            })
            .collect();
        PMF::new(values)
    }

    /// Collapse into {fail = 0, success = 1} with success meaning
    /// outcome >= `thresh`.
    pub fn convert_binomial(&self, thresh: i64) -> PMF {
        let split = thresh.clamp(0, self.len() as i64) as usize;
        let fail: f64 = self.values[..split].iter().sum();
        let success: f64 = self.values[split..].iter().sum();
        PMF::new(vec![fail, success])
    }

    /// Collapse into {fail = 0, success = 1} with success meaning
    /// outcome < `thresh`. Used where low rolls are the good ones,
    /// e.g. counting failed armour saves.
    pub fn convert_binomial_less_than(&self, thresh: i64) -> PMF {
        let split = thresh.clamp(0, self.len() as i64) as usize;
        let success: f64 = self.values[..split].iter().sum();
        let fail: f64 = self.values[split..].iter().sum();
        PMF::new(vec![fail, success])
    }

    /// Zero-pad the support out to `length`.
    pub fn expand_to(&self, length: usize) -> PMF {
        let mut values = self.values.clone();
        if values.len() < length {
            values.resize(length, 0.0);
        }
        PMF::new(values)
    }

    /// Shift the distribution by a flat modifier. Positive shifts pad
    /// unreachable low outcomes; negative shifts fold the removed low
    /// outcomes into the new zero.
    pub fn roll(&self, shift: i64) -> PMF {
        if shift == 0 {
            return self.clone();
        }
        if shift > 0 {
            let mut values = vec![0.0; shift as usize];
            values.extend_from_slice(&self.values);
            return PMF::new(values);
        }
        let dropped = (-shift) as usize;
        let split = (dropped + 1).min(self.len());
        let mut values = vec![self.values[..split].iter().sum::<f64>()];
        values.extend_from_slice(&self.values[split..]);
        PMF::new(values)
    }

    /// Divide outcomes by `divisor`, rounding up, with a minimum of
    /// one. Supports half-damage abilities.
    pub fn div_min_one(&self, divisor: usize) -> PMF {
        let mut values = vec![0.0; self.len()];
        for (outcome, &p) in self.values.iter().enumerate() {
            let reduced = outcome.div_ceil(divisor);
            values[reduced] += p;
        }
        PMF::new(values)
    }

    /// Roll this distribution twice and keep the higher result.
    pub fn max_of_two(&self) -> PMF {
        PMF::max_of_two_pmf(self, self)
    }

    /// Distribution of max(A, B) for independent A and B.
    pub fn max_of_two_pmf(first: &PMF, second: &PMF) -> PMF {
        let sized = PMF::match_sizes(&[first.clone(), second.clone()]);
        let (a, b) = (&sized[0], &sized[1]);
        let mut below_a = 0.0;
        let mut below_b = 0.0;
        let mut values = Vec::with_capacity(a.len());
        for outcome in 0..a.len() {
            let pa = a.values[outcome];
            let pb = b.values[outcome];
            values.push(pa * pb + pa * below_b + pb * below_a);
            below_a += pa;
            below_b += pb;
        }
        PMF::new(values)
    }

    /// Zero-pad a set of distributions to a common length.
    pub fn match_sizes(dists: &[PMF]) -> Vec<PMF> {
        let largest = dists.iter().map(PMF::len).max().unwrap_or(0);
        dists.iter().map(|d| d.expand_to(largest)).collect()
    }

    /// Sum of independent variables, computed in the frequency domain.
    /// Each input is transformed once, the transforms are multiplied
    /// elementwise and inverted, which amortizes long chains of dice to
    /// O(n log n) instead of the O(n·m) of pairwise convolution. The
    /// imaginary residue of the inverse transform is discarded.
    pub fn convolve_many(dists: &[PMF]) -> PMF {
        if dists.is_empty() {
            return PMF::constant(0);
        }
        if dists.len() == 1 {
            return dists[0].clone();
        }
        let result_len = 1 + dists
            .iter()
            .map(|d| d.len().saturating_sub(1))
            .sum::<usize>();

        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(result_len);
        let inverse = planner.plan_fft_inverse(result_len);

        let mut product = vec![Complex::new(1.0, 0.0); result_len];
        for dist in dists {
            let mut row: Vec<Complex<f64>> = dist
                .values
                .iter()
                .map(|&p| Complex::new(p, 0.0))
                .collect();
            row.resize(result_len, Complex::new(0.0, 0.0));
            forward.process(&mut row);
            for (acc, value) in product.iter_mut().zip(&row) {
                *acc *= value;
            }
        }
        inverse.process(&mut product);

        // rustfft leaves the inverse unnormalized.
        let scale = 1.0 / result_len as f64;
        let values = product
            .iter()
            .map(|c| {
                let p = c.re * scale;
                if PMF::is_null_prob(p) {
                    0.0
                } else {
                    p
                }
            })
            .collect();
        PMF::new(values)
    }

    /// Elementwise sum of distributions of possibly different lengths.
    /// Models "one of these mutually exclusive branches happened"; the
    /// caller weights each branch with [`PMF::scale`] first.
    pub fn flatten(dists: &[PMF]) -> PMF {
        let largest = dists.iter().map(PMF::len).max().unwrap_or(0);
        let mut values = vec![0.0; largest.max(1)];
        for dist in dists {
            for (i, &p) in dist.values.iter().enumerate() {
                values[i] += p;
            }
        }
        PMF::new(values)
    }
}

impl Mul<f64> for &PMF {
    type Output = PMF;

    fn mul(self, factor: f64) -> PMF {
        self.scale(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < TOLERANCE, "expected {b}, got {a}");
    }

    fn total(pmf: &PMF) -> f64 {
        pmf.values.iter().sum()
    }

    fn example_pmfs() -> Vec<PMF> {
        vec![
            PMF::dn(6),
            PMF::dn(5),
            PMF::dn(1),
            PMF::constant(0),
            PMF::constant(5),
            PMF::dn(6).convert_binomial(5),
            PMF::dn(6).re_roll_value(1),
        ]
    }

    /// Strategy producing small normalized distributions.
    fn arb_pmf() -> impl Strategy<Value = PMF> {
        prop::collection::vec(0.01..1.0f64, 1..8).prop_map(|raw| {
            let sum: f64 = raw.iter().sum();
            PMF::new(raw.into_iter().map(|p| p / sum).collect())
        })
    }

    #[test]
    fn test_dn_uniform() {
        for sides in 1..100 {
            let pmf = PMF::dn(sides);
            assert_eq!(pmf.get(0), 0.0);
            for face in 1..=sides {
                assert_close(pmf.get(face), 1.0 / sides as f64);
            }
            assert_close(total(&pmf), 1.0);
        }
    }

    #[test]
    fn test_constant() {
        for value in 0..100 {
            let pmf = PMF::constant(value);
            assert_eq!(pmf.get(value), 1.0);
            assert_close(total(&pmf), 1.0);
        }
    }

    #[test]
    fn test_convolve_many_pairs() {
        for a in example_pmfs() {
            for b in example_pmfs() {
                let combined = PMF::convolve_many(&[a.clone(), b.clone()]);
                assert_eq!(combined.len(), a.len() + b.len() - 1);
                assert_close(combined.mean(), a.mean() + b.mean());
                assert_close(total(&combined), total(&a) * total(&b));
            }
        }
    }

    #[test]
    fn test_convolve_many_empty_is_zero() {
        let pmf = PMF::convolve_many(&[]);
        assert_eq!(pmf.values, vec![1.0]);
    }

    #[test]
    fn test_flatten_weighted_branches() {
        for a in example_pmfs() {
            for b in example_pmfs() {
                for percent in 0..=100 {
                    let w = percent as f64 / 100.0;
                    let flat = PMF::flatten(&[a.scale(w), b.scale(1.0 - w)]);
                    assert_close(total(&flat), 1.0);
                }
            }
        }
    }

    #[test]
    fn test_re_roll_value_mass() {
        let d6 = PMF::dn(6);
        let rerolled = d6.re_roll_value(1);
        assert_close(total(&rerolled), 1.0);
        // A re-rolled 1 can still land on 1.
        assert_close(rerolled.get(1), 1.0 / 36.0);
        assert_close(rerolled.get(6), 1.0 / 6.0 + 1.0 / 36.0);
    }

    #[test]
    fn test_re_roll_less_than_mass() {
        let d6 = PMF::dn(6);
        let rerolled = d6.re_roll_less_than(4.0);
        assert_close(total(&rerolled), 1.0);
        // P(success on 4+) goes from 1/2 to 1/2 + 1/2 * 1/2.
        let success: f64 = (4..=6).map(|v| rerolled.get(v)).sum();
        assert_close(success, 0.75);
    }

    #[test]
    fn test_ceiling_folds_tail() {
        let d6 = PMF::dn(6);
        let capped = d6.ceiling(3);
        assert_eq!(capped.len(), 4);
        let tail: f64 = (3..=6).map(|v| d6.get(v)).sum();
        assert_close(capped.get(3), tail);
        assert_close(total(&capped), 1.0);
    }

    #[test]
    fn test_ceiling_above_support_is_identity() {
        let d6 = PMF::dn(6);
        assert_eq!(d6.ceiling(10), d6);
    }

    #[test]
    fn test_min_folds_head() {
        let d6 = PMF::dn(6);
        let clamped = d6.min(3);
        assert_close(clamped.get(0), 0.0);
        assert_close(clamped.get(2), 0.0);
        assert_close(clamped.get(3), 3.0 / 6.0);
        assert_close(clamped.get(4), 1.0 / 6.0);
        assert_close(total(&clamped), 1.0);
    }

    #[test]
    fn test_convert_binomial() {
        let d6 = PMF::dn(6);
        let pass = d6.convert_binomial(4);
        assert_close(pass.get(0), 0.5);
        assert_close(pass.get(1), 0.5);

        let fail = d6.convert_binomial_less_than(4);
        assert_close(fail.get(0), 0.5);
        assert_close(fail.get(1), 0.5);

        // Threshold past the support never succeeds.
        let never = d6.convert_binomial(8);
        assert_close(never.get(1), 0.0);
    }

    #[test]
    fn test_roll_shifts() {
        let d3 = PMF::dn(3);
        let up = d3.roll(2);
        assert_close(up.get(3), 1.0 / 3.0);
        assert_close(up.mean(), d3.mean() + 2.0);

        let down = d3.roll(-1);
        assert_close(down.get(0), 1.0 / 3.0);
        assert_close(down.get(1), 1.0 / 3.0);
        assert_close(down.get(2), 1.0 / 3.0);
        assert_close(total(&down), 1.0);
    }

    #[test]
    fn test_div_min_one_halves() {
        let d6 = PMF::dn(6);
        let halved = d6.div_min_one(2);
        assert_close(halved.get(1), 2.0 / 6.0);
        assert_close(halved.get(2), 2.0 / 6.0);
        assert_close(halved.get(3), 2.0 / 6.0);
        assert_close(total(&halved), 1.0);
    }

    #[test]
    fn test_max_of_two() {
        let best = PMF::dn(6).max_of_two();
        // P(max <= k) = (k/6)^2.
        for k in 1..=6 {
            let expected = ((k as f64 / 6.0).powi(2)) - (((k - 1) as f64 / 6.0).powi(2));
            assert_close(best.get(k), expected);
        }
    }

    #[test]
    fn test_cumulative() {
        let d4 = PMF::dn(4);
        let cumu = d4.cumulative();
        assert_close(cumu.get(0), 1.0);
        assert_close(cumu.get(1), 1.0);
        assert_close(cumu.get(3), 0.5);
        assert_close(cumu.get(4), 0.25);
    }

    #[test]
    fn test_mean_std() {
        let d6 = PMF::dn(6);
        assert_close(d6.mean(), 3.5);
        assert_close(d6.std(), (35.0f64 / 12.0).sqrt());
    }

    #[test]
    fn test_trim_tail() {
        let pmf = PMF::new(vec![0.5, 0.4, 0.099, 0.001]);
        let trimmed = pmf.trim_tail(0.01);
        assert_eq!(trimmed.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_convolve_support_and_mean(a in arb_pmf(), b in arb_pmf()) {
            let combined = PMF::convolve_many(&[a.clone(), b.clone()]);
            prop_assert_eq!(combined.len(), a.len() + b.len() - 1);
            prop_assert!((combined.mean() - (a.mean() + b.mean())).abs() < 1e-8);
        }

        #[test]
        fn prop_rerolls_preserve_mass(pmf in arb_pmf(), face in 0usize..8, below in 0.0..8.0f64) {
            prop_assert!((total(&pmf.re_roll_value(face)) - 1.0).abs() < 1e-8);
            prop_assert!((total(&pmf.re_roll_less_than(below)) - 1.0).abs() < 1e-8);
        }

        #[test]
        fn prop_ceiling_matches_cumulative(pmf in arb_pmf(), cap in 0usize..8) {
            let capped = pmf.ceiling(cap);
            let at_and_above: f64 = (cap..pmf.len()).map(|v| pmf.get(v)).sum();
            prop_assert!((capped.get(cap) - at_and_above).abs() < 1e-8);
            for above in cap + 1..capped.len() {
                prop_assert_eq!(capped.get(above), 0.0);
            }
        }

        #[test]
        fn prop_flatten_two_way_split(a in arb_pmf(), b in arb_pmf(), w in 0.0..1.0f64) {
            let flat = PMF::flatten(&[a.scale(w), b.scale(1.0 - w)]);
            prop_assert!((total(&flat) - 1.0).abs() < 1e-8);
        }
    }
}
