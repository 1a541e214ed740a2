//! Attack-count phase

use crate::attack::context::RollContext;
use crate::attack::results::AttacksPhaseResults;

/// Distribution of the number of attack dice rolled, after shot-count
/// modifiers.
pub(crate) fn results(ctx: &RollContext) -> AttacksPhaseResults {
    AttacksPhaseResults {
        attack_number_dist: ctx
            .modifiers
            .modify_shot_dice(ctx.weapon.shots.clone())
            .convolve(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{AddNToVolume, ModifierCollection, ModifierRef};
    use crate::pmf::PMFCollection;
    use crate::target::Target;
    use crate::weapon::Weapon;
    use std::sync::Arc;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_fixed_shots() {
        let weapon = Weapon::new(4, PMFCollection::constant(1, 10), 4, 0, PMFCollection::constant(1, 1));
        let target = Target::new(4, 4, 7, 7, 1);
        let mods = ModifierCollection::new();
        let ctx = RollContext::new(&weapon, &target, &mods);
        let dist = results(&ctx).attack_number_dist;
        assert!((dist.get(10) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_shot_modifier_applies() {
        let weapon = Weapon::new(4, PMFCollection::mdn(1, 6), 4, 0, PMFCollection::constant(1, 1))
            .with_modifiers(ModifierCollection::new().with_attacks_mods(vec![
                Arc::new(AddNToVolume::new(2)) as ModifierRef,
            ]));
        let target = Target::new(4, 4, 7, 7, 1);
        let mods = weapon.modifiers.clone();
        let ctx = RollContext::new(&weapon, &target, &mods);
        let dist = results(&ctx).attack_number_dist;
        assert!((dist.mean() - 5.5).abs() < TOLERANCE);
    }
}
