//! Shared threshold and dice computations for one attack

use crate::modifiers::ModifierCollection;
use crate::pmf::PMFCollection;
use crate::target::Target;
use crate::weapon::Weapon;

/// Unmodified roll needed to wound, from the strength/toughness
/// comparison.
pub(crate) fn calc_wound_thresh(strength: i64, toughness: i64) -> i64 {
    if 2 * strength <= toughness {
        6
    } else if strength >= 2 * toughness {
        2
    } else if toughness > strength {
        5
    } else if toughness == strength {
        4
    } else {
        3
    }
}

/// Everything the phase computations need: the weapon, the target,
/// and the combined weapon-plus-target modifiers. Threshold methods
/// take the scenario's modifier collection, which may carry extra
/// modifiers from an upstream split.
pub(crate) struct RollContext<'a> {
    pub weapon: &'a Weapon,
    pub target: &'a Target,
    pub modifiers: &'a ModifierCollection,
}

impl<'a> RollContext<'a> {
    pub fn new(
        weapon: &'a Weapon,
        target: &'a Target,
        modifiers: &'a ModifierCollection,
    ) -> Self {
        RollContext {
            weapon,
            target,
            modifiers,
        }
    }

    pub fn hit_thresh_modifiable(&self, mods: &ModifierCollection) -> i64 {
        mods.modify_hit_thresh(self.weapon.bs)
    }

    /// Net flat modifier to the hit roll, recovered as the shift a
    /// mid-range threshold experiences.
    pub fn hit_thresh_modifier(&self, mods: &ModifierCollection) -> i64 {
        mods.modify_hit_thresh(6) - 6
    }

    pub fn hit_dice_dists(&self, mods: &ModifierCollection) -> PMFCollection {
        mods.modify_hit_dice(
            PMFCollection::mdn(1, 6),
            self.weapon.bs,
            self.hit_thresh_modifiable(mods),
        )
    }

    pub fn wound_thresh(&self, mods: &ModifierCollection) -> i64 {
        calc_wound_thresh(
            mods.modify_weapon_strength(self.weapon.strength),
            mods.modify_target_toughness(self.target.toughness),
        )
    }

    pub fn wound_thresh_modifiable(&self, mods: &ModifierCollection) -> i64 {
        mods.modify_wound_thresh(self.wound_thresh(mods))
    }

    pub fn wound_thresh_modifier(&self, mods: &ModifierCollection) -> i64 {
        mods.modify_wound_thresh(6) - 6
    }

    pub fn wound_dice_dists(&self, mods: &ModifierCollection) -> PMFCollection {
        mods.modify_wound_dice(
            PMFCollection::mdn(1, 6),
            self.wound_thresh(mods),
            self.wound_thresh_modifiable(mods),
        )
    }

    pub fn save_thresh_modifiable(&self, mods: &ModifierCollection) -> i64 {
        mods.modify_pen_thresh(self.target.save, self.weapon.ap, self.target.invuln)
    }

    pub fn save_dice_dists(&self, mods: &ModifierCollection) -> PMFCollection {
        let thresh = self.save_thresh_modifiable(mods);
        mods.modify_save_dice(PMFCollection::mdn(1, 6), thresh, thresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wound_table() {
        assert_eq!(calc_wound_thresh(3, 6), 6);
        assert_eq!(calc_wound_thresh(3, 7), 6);
        assert_eq!(calc_wound_thresh(8, 4), 2);
        assert_eq!(calc_wound_thresh(4, 5), 5);
        assert_eq!(calc_wound_thresh(4, 4), 4);
        assert_eq!(calc_wound_thresh(5, 4), 3);
    }
}
