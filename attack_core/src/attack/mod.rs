//! Attack sequence orchestration
//!
//! An [`Attack`] resolves one weapon against one target through the
//! full sequence: attack count, hit, wound, saviour protocols, save,
//! damage, feel-no-pain, and kill counting. Every step is exact; the
//! result is a set of final probability distributions.

mod context;
pub(crate) mod phases;
mod results;

pub use results::{
    AttackResults, AttacksPhaseResults, DamagePhaseResults, HitPhaseResults,
    ResultsError, SavePhaseResults, SaviourProtocolResults, WoundPhaseResults,
};

use tracing::debug;

use crate::pmf::{PMFCollection, PMF};
use crate::target::Target;
use crate::weapon::Weapon;

use context::RollContext;
use phases::kill::KillCalculator;

/// One weapon resolved against one target.
///
/// The computation is exact rather than sampled, and cost grows with
/// the supports of the distributions involved: large attack counts
/// against high-wound targets take noticeably longer.
#[derive(Debug, Clone)]
pub struct Attack {
    pub weapon: Weapon,
    pub target: Target,
}

impl Attack {
    pub fn new(weapon: Weapon, target: Target) -> Self {
        Attack { weapon, target }
    }

    /// Resolve the full sequence.
    pub fn run(&self) -> AttackResults {
        let modifiers = self.weapon.modifiers.combine(&self.target.modifiers);
        let ctx = RollContext::new(&self.weapon, &self.target, &modifiers);

        let attacks = phases::attacks::results(&ctx);
        let hit = phases::hit::results(&ctx).with_recursive();
        let wound = phases::wound::results(&ctx).with_recursive();
        let save = phases::save::results(&ctx);
        let damage = phases::damage::results(&ctx);
        debug!(
            attacks = attacks.attack_number_dist.mean(),
            hit_rate = hit.successful_hit_dist.mean(),
            wound_rate = wound.successful_wound_dist.mean(),
            fail_rate = save.failed_armour_save_dist.mean(),
            "phase distributions computed"
        );

        let total_hits_dist = PMF::convolve_many(&[
            hit.successful_hit_dist.clone(),
            hit.extra_automatic_hit_dist.clone(),
        ]);
        let actual_wound = wound.multiply_by(&total_hits_dist);
        let total_wounds_dist = PMF::convolve_many(&[
            actual_wound.successful_wound_dist.clone(),
            actual_wound.extra_automatic_wound_dist.clone(),
            hit.extra_automatic_wound_dist.clone(),
        ]);

        let saviour = phases::save::saviour_protocol(&ctx, &total_wounds_dist);
        let failed_saves = save.multiply_by(&saviour.failed_save_dist);

        // Damage is capped at the wound track per failed save, since
        // excess damage from one save never carries to another model.
        let capped_damage = DamagePhaseResults {
            damage_dist: damage.damage_dist.ceiling(self.target.wounds),
        };
        let total_damage = capped_damage
            .multiply_by(&failed_saves.failed_armour_save_dist)
            .multiply_by(&attacks.attack_number_dist);

        let total_mortals_dist = PMF::convolve_many(&[
            hit.multiply_by(&attacks.attack_number_dist).mortal_wound_dist,
            actual_wound
                .multiply_by(&attacks.attack_number_dist)
                .mortal_wound_dist,
        ]);
        let total_self_dist = PMF::convolve_many(&[
            hit.self_wound_dist.clone(),
            actual_wound.self_wound_dist.clone(),
        ]);

        let final_damage_dist = self.apply_feel_no_pain(&ctx, &total_damage.damage_dist);
        let final_mortal_dist = self.apply_feel_no_pain(&ctx, &total_mortals_dist);
        let final_self_dist = self.apply_feel_no_pain(&ctx, &total_self_dist);
        let final_total_dist = PMF::convolve_many(&[
            final_damage_dist.clone(),
            final_mortal_dist.clone(),
        ]);

        let kills_dist = self.kills_dist(
            &ctx,
            &failed_saves,
            &attacks,
            &damage,
            &final_mortal_dist,
        );
        debug!(
            damage = final_damage_dist.mean(),
            mortals = final_mortal_dist.mean(),
            kills = kills_dist.mean(),
            "attack resolved"
        );

        AttackResults {
            damage_dist: final_damage_dist,
            mortal_wound_dist: final_mortal_dist,
            self_wound_dist: final_self_dist,
            total_damage_dist: final_total_dist,
            kills_dist,
            drone_wound_dist: saviour.drone_wound_dist,
        }
    }

    fn kills_dist(
        &self,
        ctx: &RollContext,
        failed_saves: &SavePhaseResults,
        attacks: &AttacksPhaseResults,
        damage: &DamagePhaseResults,
        final_mortal_dist: &PMF,
    ) -> PMF {
        let failed_saves_dist = failed_saves
            .multiply_by(&attacks.attack_number_dist)
            .failed_armour_save_dist;
        // The kill walk needs the uncapped per-save damage; the cap
        // falls out of the per-model wound track it simulates.
        let per_save_damage = self.apply_feel_no_pain(ctx, &damage.damage_dist);
        let mut calculator = KillCalculator::new(
            self.target.wounds,
            per_save_damage,
            final_mortal_dist.clone(),
        );
        calculator.calc_dist(&failed_saves_dist)
    }

    /// Shrug each point of a damage total on the target's feel-no-pain.
    fn apply_feel_no_pain(&self, ctx: &RollContext, dist: &PMF) -> PMF {
        let mod_thresh = ctx.modifiers.modify_fnp_thresh(self.target.fnp);
        let branches: Vec<PMF> = dist
            .values
            .iter()
            .enumerate()
            .filter(|(_, &p)| !PMF::is_null_prob(p))
            .map(|(dice, &p)| {
                ctx.modifiers
                    .modify_fnp_dice(PMFCollection::mdn(dice, 6), self.target.fnp, mod_thresh)
                    .convert_binomial_less_than(mod_thresh)
                    .convolve()
                    .scale(p)
            })
            .collect();
        PMF::flatten(&branches)
    }
}

/// Several weapons resolved independently against one target, with
/// the results combined into a single total.
#[derive(Debug, Clone)]
pub struct MultiAttack {
    pub weapons: Vec<Weapon>,
    pub target: Target,
}

impl MultiAttack {
    pub fn new(weapons: Vec<Weapon>, target: Target) -> Self {
        MultiAttack { weapons, target }
    }

    pub fn run(&self) -> Result<AttackResults, ResultsError> {
        let results: Vec<AttackResults> = self
            .weapons
            .iter()
            .map(|weapon| Attack::new(weapon.clone(), self.target.clone()).run())
            .collect();
        AttackResults::combine(&results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{ModifierCollection, ModifierRef, ReRollOnes};
    use std::sync::Arc;

    const TOLERANCE: f64 = 1e-9;

    fn marine_target() -> Target {
        Target::new(4, 3, 7, 7, 1)
    }

    fn bolt_rifle() -> Weapon {
        Weapon::new(
            3,
            PMFCollection::constant(1, 2),
            4,
            1,
            PMFCollection::constant(1, 1),
        )
    }

    #[test]
    fn test_expected_damage_chain() {
        let results = Attack::new(bolt_rifle(), marine_target()).run();
        // 2 shots * 2/3 hit * 1/2 wound * 1/2 failed 4+ save.
        let expected = 2.0 * (2.0 / 3.0) * 0.5 * 0.5;
        assert!((results.total_damage_dist.mean() - expected).abs() < TOLERANCE);
    }

    #[test]
    fn test_re_roll_ones_scales_hits() {
        let base = Attack::new(bolt_rifle(), marine_target()).run();
        let rerolling = bolt_rifle().with_modifiers(
            ModifierCollection::new()
                .with_hit_mods(vec![Arc::new(ReRollOnes) as ModifierRef]),
        );
        let improved = Attack::new(rerolling, marine_target()).run();
        let ratio = improved.total_damage_dist.mean() / base.total_damage_dist.mean();
        assert!((ratio - 7.0 / 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_multi_attack_combines() {
        let single = Attack::new(bolt_rifle(), marine_target()).run();
        let multi = MultiAttack::new(vec![bolt_rifle(), bolt_rifle()], marine_target())
            .run()
            .unwrap();
        assert!(
            (multi.total_damage_dist.mean() - 2.0 * single.total_damage_dist.mean()).abs()
                < TOLERANCE
        );
    }

    #[test]
    fn test_multi_attack_empty_errors() {
        let multi = MultiAttack::new(vec![], marine_target());
        assert!(multi.run().is_err());
    }
}
