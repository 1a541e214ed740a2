//! Save phase, including saviour-protocol diversion

use crate::attack::context::RollContext;
use crate::attack::results::{SavePhaseResults, SaviourProtocolResults};
use crate::pmf::{PMFCollection, PMF};

use super::flatten_scenarios;

/// Per-wound probability of failing the save. Scenarios fork on both
/// the hit and wound rolls, since AP can depend on either.
pub(crate) fn results(ctx: &RollContext) -> SavePhaseResults {
    let hit_dist = ctx.hit_dice_dists(ctx.modifiers).convolve();
    let hit_modifier = ctx.hit_thresh_modifier(ctx.modifiers);
    let wound_dist = ctx.wound_dice_dists(ctx.modifiers).convolve();
    let wound_modifier = ctx.wound_thresh_modifier(ctx.modifiers);
    let scenarios =
        ctx.modifiers
            .split_save_roll(&hit_dist, hit_modifier, &wound_dist, wound_modifier);

    SavePhaseResults {
        failed_armour_save_dist: flatten_scenarios(&scenarios, |mods| {
            ctx.save_dice_dists(mods)
                .convert_binomial_less_than(ctx.save_thresh_modifiable(mods))
                .convolve()
        }),
    }
}

/// Divert wounds to an escort before any save is rolled. Each
/// incoming wound rolls against the divert threshold: passes go to
/// the escort (which then takes its feel-no-pain per wound), fails
/// continue to the save phase.
pub(crate) fn saviour_protocol(
    ctx: &RollContext,
    wounds_dist: &PMF,
) -> SaviourProtocolResults {
    let params = ctx.modifiers.saviour_protocol_params();
    if !params.enabled {
        return SaviourProtocolResults {
            failed_save_dist: wounds_dist.clone(),
            drone_wound_dist: PMF::constant(0),
        };
    }

    let mut pens = Vec::new();
    let mut diverted = Vec::new();
    for (dice, &event_prob) in wounds_dist.values.iter().enumerate() {
        if PMF::is_null_prob(event_prob) {
            continue;
        }
        let dice_dists = PMFCollection::mdn(dice, 6);
        pens.push(
            dice_dists
                .convert_binomial_less_than(params.thresh)
                .convolve()
                .scale(event_prob),
        );
        diverted.push(
            dice_dists
                .convert_binomial(params.thresh)
                .convolve()
                .scale(event_prob),
        );
    }

    SaviourProtocolResults {
        failed_save_dist: PMF::flatten(&pens),
        drone_wound_dist: drone_fnp_dist(&PMF::flatten(&diverted), params.fnp),
    }
}

/// Wounds the escort actually suffers after its feel-no-pain.
fn drone_fnp_dist(dist: &PMF, fnp: i64) -> PMF {
    let branches: Vec<PMF> = dist
        .values
        .iter()
        .enumerate()
        .filter(|(_, &p)| !PMF::is_null_prob(p))
        .map(|(dice, &p)| {
            PMFCollection::mdn(dice, 6)
                .convert_binomial_less_than(fnp)
                .convolve()
                .scale(p)
        })
        .collect();
    PMF::flatten(&branches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{ModifierCollection, ModifierRef, SaviourProtocol};
    use crate::target::Target;
    use crate::weapon::Weapon;
    use std::sync::Arc;

    const TOLERANCE: f64 = 1e-9;

    fn fixture(
        ap: i64,
        save: i64,
        invuln: i64,
        save_mods: Vec<ModifierRef>,
    ) -> (Weapon, Target, ModifierCollection) {
        let weapon = Weapon::new(
            4,
            PMFCollection::constant(1, 10),
            4,
            ap,
            PMFCollection::constant(1, 1),
        );
        let target = Target::new(4, save, invuln, 7, 1)
            .with_modifiers(ModifierCollection::new().with_save_mods(save_mods));
        let mods = weapon.modifiers.combine(&target.modifiers);
        (weapon, target, mods)
    }

    #[test]
    fn test_failed_save_chance() {
        let (weapon, target, mods) = fixture(0, 4, 7, vec![]);
        let ctx = RollContext::new(&weapon, &target, &mods);
        let dist = results(&ctx).failed_armour_save_dist;
        assert!((dist.get(1) - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_ap_worsens_save() {
        let (weapon, target, mods) = fixture(2, 4, 7, vec![]);
        let ctx = RollContext::new(&weapon, &target, &mods);
        let dist = results(&ctx).failed_armour_save_dist;
        // Save of 6+ fails on 1 through 5.
        assert!((dist.get(1) - 5.0 / 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_invuln_caps_ap() {
        let (weapon, target, mods) = fixture(3, 4, 5, vec![]);
        let ctx = RollContext::new(&weapon, &target, &mods);
        let dist = results(&ctx).failed_armour_save_dist;
        // The 5+ invulnerable ignores the AP.
        assert!((dist.get(1) - 4.0 / 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_saviour_disabled_passes_through() {
        let (weapon, target, mods) = fixture(0, 4, 7, vec![]);
        let ctx = RollContext::new(&weapon, &target, &mods);
        let wounds = PMF::constant(3);
        let res = saviour_protocol(&ctx, &wounds);
        assert_eq!(res.failed_save_dist, wounds);
        assert_eq!(res.drone_wound_dist, PMF::constant(0));
    }

    #[test]
    fn test_saviour_splits_wounds() {
        let (weapon, target, mods) =
            fixture(0, 4, 7, vec![Arc::new(SaviourProtocol::new(2, 5))]);
        let ctx = RollContext::new(&weapon, &target, &mods);
        let wounds = PMF::constant(6);
        let res = saviour_protocol(&ctx, &wounds);
        // 2+ diverts five sixths of the wounds.
        assert!((res.failed_save_dist.mean() - 1.0).abs() < TOLERANCE);
        // The 5+++ feel-no-pain shrugs a third of the diverted wounds.
        assert!((res.drone_wound_dist.mean() - 5.0 * 2.0 / 3.0).abs() < TOLERANCE);
    }
}
