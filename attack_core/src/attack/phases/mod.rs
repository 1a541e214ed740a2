//! The phases of the attack sequence
//!
//! Each phase exposes a `results` function computing its per-die
//! distributions from the shared [`RollContext`]. Phase outputs are
//! composed by the orchestration in [`crate::attack`].

pub(crate) mod attacks;
pub(crate) mod damage;
pub(crate) mod hit;
pub(crate) mod kill;
pub(crate) mod save;
pub(crate) mod wound;

use crate::modifiers::ModifierCollection;
use crate::pmf::{PMFCollection, PMF};

/// Resolve a roll across its scenarios: evaluate the sub-distribution
/// under each scenario's modifiers and mix by scenario probability.
pub(crate) fn flatten_scenarios(
    scenarios: &[(f64, ModifierCollection)],
    sub_dist: impl Fn(&ModifierCollection) -> PMF,
) -> PMF {
    let branches: Vec<PMF> = scenarios
        .iter()
        .map(|(prob, mods)| sub_dist(mods).scale(*prob))
        .collect();
    PMF::flatten(&branches)
}

/// Effects generated by a stage's roll. The modifiable payout is
/// shifted by the stage's flat roll modifier so triggers move with
/// the modified result; the unmodifiable payout keys on the natural
/// face. The summed payout is weighted by the actual face
/// probabilities of the stage dice.
pub(crate) fn generated_dist(
    modifiable: PMFCollection,
    unmodifiable: PMFCollection,
    delta: i64,
    dice: &PMFCollection,
) -> PMF {
    let payout = PMFCollection::add_many(&[modifiable.thresh_mod(delta), unmodifiable]);
    if payout.is_empty() {
        return PMF::constant(0);
    }
    payout.mul_col(dice).convolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_generated_dist_empty_payout() {
        let dist = generated_dist(
            PMFCollection::empty(),
            PMFCollection::empty(),
            0,
            &PMFCollection::mdn(1, 6),
        );
        assert_eq!(dist, PMF::constant(0));
    }

    #[test]
    fn test_generated_dist_pays_on_trigger_faces() {
        // One extra effect on a natural 6.
        let payout = PMFCollection::new(
            (0..8)
                .map(|face| PMF::constant(usize::from(face >= 6)))
                .collect(),
        );
        let dist = generated_dist(
            PMFCollection::empty(),
            payout,
            0,
            &PMFCollection::mdn(1, 6),
        );
        assert!((dist.mean() - 1.0 / 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_generated_dist_modifiable_shift() {
        // +1 to the roll makes a "6+" trigger fire on a natural 5.
        let payout = PMFCollection::new(
            (0..8)
                .map(|face| PMF::constant(usize::from(face >= 6)))
                .collect(),
        );
        let dist = generated_dist(
            payout,
            PMFCollection::empty(),
            -1,
            &PMFCollection::mdn(1, 6),
        );
        assert!((dist.mean() - 2.0 / 6.0).abs() < TOLERANCE);
    }
}
