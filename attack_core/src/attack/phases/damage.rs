//! Damage phase

use crate::attack::context::RollContext;
use crate::attack::results::DamagePhaseResults;

use super::flatten_scenarios;

/// Per-failed-save damage distribution, before any wound cap or
/// feel-no-pain. Scenarios fork on the hit and wound rolls for rules
/// like "on a wound roll of 6, add 2 damage".
pub(crate) fn results(ctx: &RollContext) -> DamagePhaseResults {
    let hit_dist = ctx.hit_dice_dists(ctx.modifiers).convolve();
    let hit_modifier = ctx.hit_thresh_modifier(ctx.modifiers);
    let wound_dist = ctx.wound_dice_dists(ctx.modifiers).convolve();
    let wound_modifier = ctx.wound_thresh_modifier(ctx.modifiers);
    let scenarios =
        ctx.modifiers
            .split_damage_roll(&hit_dist, hit_modifier, &wound_dist, wound_modifier);

    DamagePhaseResults {
        damage_dist: flatten_scenarios(&scenarios, |mods| {
            mods.modify_damage_dice(ctx.weapon.damage.clone()).convolve()
        }),
    }
}
