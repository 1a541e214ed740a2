//! Ordered collections of independent single-die distributions
//!
//! A `PMFCollection` tracks one distribution per die rather than the
//! pre-summed total, so per-die effects (re-roll one die, threshold
//! windows) stay expressible. Order matters: effects that touch "one
//! die" touch index 0.

use serde::{Deserialize, Serialize};

use super::PMF;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PMFCollection {
    pub pmfs: Vec<PMF>,
}

impl PMFCollection {
    pub fn new(pmfs: Vec<PMF>) -> Self {
        PMFCollection { pmfs }
    }

    pub fn empty() -> Self {
        PMFCollection { pmfs: Vec::new() }
    }

    /// `dice` copies of a fair die with `sides` faces.
    pub fn mdn(dice: usize, sides: usize) -> Self {
        PMFCollection::new(vec![PMF::dn(sides); dice])
    }

    /// `dice` copies of a fixed value.
    pub fn constant(dice: usize, value: usize) -> Self {
        PMFCollection::new(vec![PMF::constant(value); dice])
    }

    pub fn len(&self) -> usize {
        self.pmfs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pmfs.is_empty()
    }

    /// Distribution at `index`, or a point mass at zero outside the
    /// collection.
    pub fn get(&self, index: usize) -> PMF {
        self.pmfs
            .get(index)
            .cloned()
            .unwrap_or_else(|| PMF::constant(0))
    }

    /// Shift a success window by a flat threshold modifier.
    ///
    /// A +1 modifier makes each die behave like the die one step below
    /// it, so the first distribution is duplicated at the front and the
    /// collection grows. A -1 modifier slides the window the other way:
    /// the last distribution is repeated at the back and the front
    /// falls off, keeping the length fixed.
    pub fn thresh_mod(&self, delta: i64) -> PMFCollection {
        if delta == 0 || self.pmfs.is_empty() {
            return self.clone();
        }
        if delta > 0 {
            let mut pmfs = vec![self.pmfs[0].clone(); delta as usize];
            pmfs.extend(self.pmfs.iter().cloned());
            return PMFCollection::new(pmfs);
        }
        let grow = (-delta) as usize;
        let last = self.pmfs[self.pmfs.len() - 1].clone();
        let mut pmfs = self.pmfs.clone();
        pmfs.extend(std::iter::repeat(last).take(grow));
        let keep = pmfs.len() - self.pmfs.len();
        PMFCollection::new(pmfs.split_off(keep))
    }

    /// Treat this collection as a per-face payout table and weight it
    /// by a face distribution: face `i` of `other` contributes
    /// `self.get(i)` scaled by `P(other = i)`.
    pub fn mul_pmf(&self, other: &PMF) -> PMF {
        let branches: Vec<PMF> = other
            .values
            .iter()
            .enumerate()
            .map(|(face, &p)| self.get(face).scale(p))
            .collect();
        PMF::flatten(&branches)
    }

    /// Payout lookup of [`mul_pmf`](Self::mul_pmf) applied to each die
    /// of `other` independently.
    pub fn mul_col(&self, other: &PMFCollection) -> PMFCollection {
        PMFCollection::new(other.pmfs.iter().map(|p| self.mul_pmf(p)).collect())
    }

    /// Sum all dice into one distribution.
    pub fn convolve(&self) -> PMF {
        PMF::convolve_many(&self.pmfs)
    }

    pub fn convert_binomial(&self, thresh: i64) -> PMFCollection {
        self.map(|p| p.convert_binomial(thresh))
    }

    pub fn convert_binomial_less_than(&self, thresh: i64) -> PMFCollection {
        self.map(|p| p.convert_binomial_less_than(thresh))
    }

    pub fn map(&self, f: impl Fn(&PMF) -> PMF) -> PMFCollection {
        PMFCollection::new(self.pmfs.iter().map(f).collect())
    }

    /// Index-wise convolution of several collections: die `i` of the
    /// result is the sum of every collection's die `i`. Collections
    /// with no dice contribute nothing.
    pub fn add_many(collections: &[PMFCollection]) -> PMFCollection {
        let active: Vec<&PMFCollection> =
            collections.iter().filter(|c| !c.is_empty()).collect();
        if active.is_empty() {
            return PMFCollection::empty();
        }
        let longest = active.iter().map(|c| c.len()).max().unwrap_or(0);
        let pmfs = (0..longest)
            .map(|i| {
                let dice: Vec<PMF> = active.iter().map(|c| c.get(i)).collect();
                PMF::convolve_many(&dice)
            })
            .collect();
        PMFCollection::new(pmfs)
    }
}
