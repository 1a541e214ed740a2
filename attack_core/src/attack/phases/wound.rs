//! Wound phase

use crate::attack::context::RollContext;
use crate::attack::results::WoundPhaseResults;
use crate::modifiers::ModifierCollection;
use crate::pmf::PMF;

use super::{flatten_scenarios, generated_dist};

/// Per-successful-hit wound distributions. Scenarios fork on the hit
/// roll: a hit modifier that triggers on specific hit faces changes
/// the wound roll it feeds.
pub(crate) fn results(ctx: &RollContext) -> WoundPhaseResults {
    let hit_dist = ctx.hit_dice_dists(ctx.modifiers).convolve();
    let hit_modifier = ctx.hit_thresh_modifier(ctx.modifiers);
    let scenarios = ctx.modifiers.split_wound_roll(&hit_dist, hit_modifier);

    WoundPhaseResults {
        successful_wound_dist: flatten_scenarios(&scenarios, |mods| {
            ctx.wound_dice_dists(mods)
                .convert_binomial(ctx.wound_thresh_modifiable(mods))
                .convolve()
        }),
        extra_wound_roll_dist: flatten_scenarios(&scenarios, |mods| {
            generated_dist(
                mods.extra_wound_roll_dist_modifiable(),
                mods.extra_wound_roll_dist_unmodifiable(),
                ctx.wound_thresh_modifier(mods),
                &ctx.wound_dice_dists(mods),
            )
        }),
        extra_automatic_wound_dist: flatten_scenarios(&scenarios, |mods| {
            generated_dist(
                mods.wound_generated_extra_automatic_wound_dist_modifiable(),
                mods.wound_generated_extra_automatic_wound_dist_unmodifiable(),
                ctx.wound_thresh_modifier(mods),
                &ctx.wound_dice_dists(mods),
            )
        }),
        mortal_wound_dist: flatten_scenarios(&scenarios, |mods| {
            generated_dist(
                mods.wound_generated_mortal_wound_dist_modifiable(),
                mods.wound_generated_mortal_wound_dist_unmodifiable(),
                ctx.wound_thresh_modifier(mods),
                &ctx.wound_dice_dists(mods),
            )
        }),
        self_wound_dist: flatten_scenarios(&scenarios, |mods| self_wound_dist(ctx, mods)),
    }
}

fn self_wound_dist(ctx: &RollContext, mods: &ModifierCollection) -> PMF {
    let thresh = mods.wound_self_wound_thresh();
    if thresh == 0 {
        return PMF::constant(0);
    }
    let self_thresh = (thresh + ctx.wound_thresh_modifier(mods)).max(0);
    ctx.wound_dice_dists(mods)
        .convert_binomial_less_than(self_thresh)
        .convolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{GenerateMortalWoundsUnmodifiable, ModifierRef};
    use crate::pmf::PMFCollection;
    use crate::target::Target;
    use crate::weapon::Weapon;
    use std::sync::Arc;

    const TOLERANCE: f64 = 1e-9;

    fn fixture(wound_mods: Vec<ModifierRef>) -> (Weapon, Target, ModifierCollection) {
        let weapon = Weapon::new(
            4,
            PMFCollection::constant(1, 10),
            4,
            0,
            PMFCollection::constant(1, 1),
        )
        .with_modifiers(ModifierCollection::new().with_wound_mods(wound_mods));
        let target = Target::new(4, 4, 7, 7, 1);
        let mods = weapon.modifiers.combine(&target.modifiers);
        (weapon, target, mods)
    }

    #[test]
    fn test_equal_strength_wounds_on_four() {
        let (weapon, target, mods) = fixture(vec![]);
        let ctx = RollContext::new(&weapon, &target, &mods);
        let dist = results(&ctx).successful_wound_dist;
        assert!((dist.get(1) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_mortal_wounds_on_six() {
        let (weapon, target, mods) =
            fixture(vec![Arc::new(GenerateMortalWoundsUnmodifiable::new(6, 1))]);
        let ctx = RollContext::new(&weapon, &target, &mods);
        let dist = results(&ctx).mortal_wound_dist;
        assert!((dist.mean() - 1.0 / 6.0).abs() < TOLERANCE);
    }
}
