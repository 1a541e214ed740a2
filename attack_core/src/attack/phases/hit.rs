//! Hit phase

use crate::attack::context::RollContext;
use crate::attack::results::HitPhaseResults;
use crate::modifiers::ModifierCollection;
use crate::pmf::PMF;

use super::{flatten_scenarios, generated_dist};

/// Per-attack-die hit distributions: successful hits, generated
/// effects, mortal wounds, and wounds inflicted on the attacker.
pub(crate) fn results(ctx: &RollContext) -> HitPhaseResults {
    let scenarios = ctx.modifiers.split_hit_roll();
    HitPhaseResults {
        successful_hit_dist: flatten_scenarios(&scenarios, |mods| {
            ctx.hit_dice_dists(mods)
                .convert_binomial(ctx.hit_thresh_modifiable(mods))
                .convolve()
        }),
        extra_hit_roll_dist: flatten_scenarios(&scenarios, |mods| {
            generated_dist(
                mods.extra_hit_roll_dist_modifiable(),
                mods.extra_hit_roll_dist_unmodifiable(),
                ctx.hit_thresh_modifier(mods),
                &ctx.hit_dice_dists(mods),
            )
        }),
        extra_automatic_hit_dist: flatten_scenarios(&scenarios, |mods| {
            generated_dist(
                mods.extra_automatic_hit_dist_modifiable(),
                mods.extra_automatic_hit_dist_unmodifiable(),
                ctx.hit_thresh_modifier(mods),
                &ctx.hit_dice_dists(mods),
            )
        }),
        extra_automatic_wound_dist: flatten_scenarios(&scenarios, |mods| {
            generated_dist(
                mods.hit_generated_extra_automatic_wound_dist_modifiable(),
                mods.hit_generated_extra_automatic_wound_dist_unmodifiable(),
                ctx.hit_thresh_modifier(mods),
                &ctx.hit_dice_dists(mods),
            )
        }),
        mortal_wound_dist: flatten_scenarios(&scenarios, |mods| {
            generated_dist(
                mods.hit_generated_mortal_wound_dist_modifiable(),
                mods.hit_generated_mortal_wound_dist_unmodifiable(),
                ctx.hit_thresh_modifier(mods),
                &ctx.hit_dice_dists(mods),
            )
        }),
        self_wound_dist: flatten_scenarios(&scenarios, |mods| self_wound_dist(ctx, mods)),
    }
}

fn self_wound_dist(ctx: &RollContext, mods: &ModifierCollection) -> PMF {
    let thresh = mods.hit_self_wound_thresh();
    if thresh == 0 {
        return PMF::constant(0);
    }
    let self_thresh = (thresh + ctx.hit_thresh_modifier(mods)).max(0);
    ctx.hit_dice_dists(mods)
        .convert_binomial_less_than(self_thresh)
        .convolve()
}
