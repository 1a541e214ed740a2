//! Re-roll rules
//!
//! Priorities encode the rule interactions: "re-roll all" supersedes
//! "re-roll failed", which supersedes value-based re-rolls, which
//! supersede "re-roll 1s". Higher priority runs first, and since a die
//! can only be re-rolled once, the strongest applicable rule wins by
//! transforming the distribution before weaker ones see it.

use serde_json::{json, Value};

use crate::pmf::PMFCollection;

use super::Modifier;

/// Re-roll natural 1s.
#[derive(Debug, Clone, Copy)]
pub struct ReRollOnes;

impl Modifier for ReRollOnes {
    fn descriptor(&self) -> Value {
        json!({"name": "re_roll_ones"})
    }

    fn priority(&self) -> i64 {
        1
    }

    fn modify_re_roll(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        col.map(|p| p.re_roll_value(1))
    }
}

/// Re-roll dice that failed. Only dice failing both the natural and
/// modified threshold may be re-rolled, so the lower of the two is
/// used.
#[derive(Debug, Clone, Copy)]
pub struct ReRollFailed;

impl Modifier for ReRollFailed {
    fn descriptor(&self) -> Value {
        json!({"name": "re_roll_failed"})
    }

    fn priority(&self) -> i64 {
        99
    }

    fn modify_re_roll(
        &self,
        col: PMFCollection,
        thresh: i64,
        mod_thresh: i64,
    ) -> PMFCollection {
        let rr_thresh = thresh.min(mod_thresh) as f64;
        col.map(|p| p.re_roll_less_than(rr_thresh))
    }
}

/// Re-roll any die below the modified threshold, failed or not.
#[derive(Debug, Clone, Copy)]
pub struct ReRollAll;

impl Modifier for ReRollAll {
    fn descriptor(&self) -> Value {
        json!({"name": "re_roll_all"})
    }

    fn priority(&self) -> i64 {
        100
    }

    fn modify_re_roll(
        &self,
        col: PMFCollection,
        _thresh: i64,
        mod_thresh: i64,
    ) -> PMFCollection {
        col.map(|p| p.re_roll_less_than(mod_thresh as f64))
    }
}

/// Re-roll a single die if it lands below the natural threshold.
#[derive(Debug, Clone, Copy)]
pub struct ReRollOneDice;

impl Modifier for ReRollOneDice {
    fn descriptor(&self) -> Value {
        json!({"name": "re_roll_one_dice"})
    }

    fn modify_re_roll(
        &self,
        col: PMFCollection,
        thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        if col.is_empty() {
            return col;
        }
        let mut pmfs = col.pmfs;
        pmfs[0] = pmfs[0].re_roll_less_than(thresh as f64);
        PMFCollection::new(pmfs)
    }
}

/// Re-roll a single volume die if it lands below its own average.
#[derive(Debug, Clone, Copy)]
pub struct ReRollOneDiceVolume;

impl Modifier for ReRollOneDiceVolume {
    fn descriptor(&self) -> Value {
        json!({"name": "re_roll_one_dice_volume"})
    }

    fn modify_re_roll(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        if col.is_empty() {
            return col;
        }
        let mut pmfs = col.pmfs;
        pmfs[0] = pmfs[0].re_roll_less_than(pmfs[0].mean());
        PMFCollection::new(pmfs)
    }
}

/// Re-roll every die below its expected value.
#[derive(Debug, Clone, Copy)]
pub struct ReRollLessThanExpectedValue;

impl Modifier for ReRollLessThanExpectedValue {
    fn descriptor(&self) -> Value {
        json!({"name": "re_roll_less_than_expected_value"})
    }

    fn priority(&self) -> i64 {
        98
    }

    fn modify_re_roll(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        col.map(|p| p.re_roll_less_than(p.mean()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn success_chance(col: &PMFCollection, thresh: i64) -> f64 {
        col.convert_binomial(thresh).get(0).get(1)
    }

    #[test]
    fn test_re_roll_ones_on_four_up() {
        let col = ReRollOnes.modify_re_roll(PMFCollection::mdn(1, 6), 4, 4);
        // 1/2 + 1/6 * 1/2.
        assert!((success_chance(&col, 4) - 7.0 / 12.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_re_roll_failed_uses_worse_threshold() {
        // Natural 4+, modified to 5+: only 5s and 6s count, but dice
        // below 4 were legal re-rolls either way.
        let col = ReRollFailed.modify_re_roll(PMFCollection::mdn(1, 6), 4, 5);
        let expected = 2.0 / 6.0 + (3.0 / 6.0) * (2.0 / 6.0);
        assert!((success_chance(&col, 5) - expected).abs() < TOLERANCE);
    }

    #[test]
    fn test_re_roll_all_uses_modified_threshold() {
        let col = ReRollAll.modify_re_roll(PMFCollection::mdn(1, 6), 4, 5);
        let expected = 2.0 / 6.0 + (4.0 / 6.0) * (2.0 / 6.0);
        assert!((success_chance(&col, 5) - expected).abs() < TOLERANCE);
    }

    #[test]
    fn test_re_roll_one_dice_only_touches_first() {
        let col = ReRollOneDice.modify_re_roll(PMFCollection::mdn(2, 6), 4, 4);
        assert!((col.get(0).mean() - 4.25).abs() < TOLERANCE);
        assert!((col.get(1).mean() - 3.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_re_roll_one_dice_empty_collection() {
        let col = ReRollOneDice.modify_re_roll(PMFCollection::empty(), 4, 4);
        assert!(col.is_empty());
    }
}
