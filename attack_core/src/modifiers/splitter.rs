//! Rules that fork the downstream sequence on a roll result
//!
//! "On a wound roll of 6+, improve AP by 3" cannot be folded into a
//! single threshold: the save roll now depends on which face the
//! wound die showed. These modifiers declare the fork; the collection
//! turns it into weighted scenarios.

use std::sync::Arc;

use serde_json::{json, Value};

use super::{AddNToAP, AddNToVolume, Modifier, ModifierCollection, ModifierRef, Split};

/// Improve AP by `extra_ap` when the modified roll reaches `thresh`.
#[derive(Debug, Clone, Copy)]
pub struct OnAModifiableRollOfNAddAP {
    pub thresh: i64,
    pub extra_ap: i64,
}

impl OnAModifiableRollOfNAddAP {
    pub fn new(thresh: i64, extra_ap: i64) -> Self {
        OnAModifiableRollOfNAddAP { thresh, extra_ap }
    }

    fn extra_mods(&self) -> ModifierCollection {
        ModifierCollection::new()
            .with_save_mods(vec![Arc::new(AddNToAP::new(self.extra_ap)) as ModifierRef])
    }
}

impl Modifier for OnAModifiableRollOfNAddAP {
    fn descriptor(&self) -> Value {
        json!({
            "name": "on_a_modifiable_roll_of_n_add_ap",
            "thresh": self.thresh,
            "extra_ap": self.extra_ap,
        })
    }

    fn split_on_save_modifiable(&self) -> Vec<Split> {
        vec![Split {
            thresh: self.thresh,
            extra: self.extra_mods(),
        }]
    }
}

/// Improve AP by `extra_ap` when the natural roll reaches `thresh`.
#[derive(Debug, Clone, Copy)]
pub struct OnAnUnmodifiableRollOfNAddAP {
    pub thresh: i64,
    pub extra_ap: i64,
}

impl OnAnUnmodifiableRollOfNAddAP {
    pub fn new(thresh: i64, extra_ap: i64) -> Self {
        OnAnUnmodifiableRollOfNAddAP { thresh, extra_ap }
    }

    fn extra_mods(&self) -> ModifierCollection {
        ModifierCollection::new()
            .with_save_mods(vec![Arc::new(AddNToAP::new(self.extra_ap)) as ModifierRef])
    }
}

impl Modifier for OnAnUnmodifiableRollOfNAddAP {
    fn descriptor(&self) -> Value {
        json!({
            "name": "on_an_unmodifiable_roll_of_n_add_ap",
            "thresh": self.thresh,
            "extra_ap": self.extra_ap,
        })
    }

    fn split_on_save_unmodifiable(&self) -> Vec<Split> {
        vec![Split {
            thresh: self.thresh,
            extra: self.extra_mods(),
        }]
    }
}

/// Add `extra_damage` to the damage roll when the modified roll
/// reaches `thresh`.
#[derive(Debug, Clone, Copy)]
pub struct OnAModifiableRollOfNAddDamage {
    pub thresh: i64,
    pub extra_damage: i64,
}

impl OnAModifiableRollOfNAddDamage {
    pub fn new(thresh: i64, extra_damage: i64) -> Self {
        OnAModifiableRollOfNAddDamage {
            thresh,
            extra_damage,
        }
    }

    fn extra_mods(&self) -> ModifierCollection {
        ModifierCollection::new().with_damage_mods(vec![
            Arc::new(AddNToVolume::new(self.extra_damage)) as ModifierRef,
        ])
    }
}

impl Modifier for OnAModifiableRollOfNAddDamage {
    fn descriptor(&self) -> Value {
        json!({
            "name": "on_a_modifiable_roll_of_n_add_damage",
            "thresh": self.thresh,
            "extra_damage": self.extra_damage,
        })
    }

    fn split_on_damage_modifiable(&self) -> Vec<Split> {
        vec![Split {
            thresh: self.thresh,
            extra: self.extra_mods(),
        }]
    }
}

/// Add `extra_damage` to the damage roll when the natural roll
/// reaches `thresh`.
#[derive(Debug, Clone, Copy)]
pub struct OnAnUnmodifiableRollOfNAddDamage {
    pub thresh: i64,
    pub extra_damage: i64,
}

impl OnAnUnmodifiableRollOfNAddDamage {
    pub fn new(thresh: i64, extra_damage: i64) -> Self {
        OnAnUnmodifiableRollOfNAddDamage {
            thresh,
            extra_damage,
        }
    }

    fn extra_mods(&self) -> ModifierCollection {
        ModifierCollection::new().with_damage_mods(vec![
            Arc::new(AddNToVolume::new(self.extra_damage)) as ModifierRef,
        ])
    }
}

impl Modifier for OnAnUnmodifiableRollOfNAddDamage {
    fn descriptor(&self) -> Value {
        json!({
            "name": "on_an_unmodifiable_roll_of_n_add_damage",
            "thresh": self.thresh,
            "extra_damage": self.extra_damage,
        })
    }

    fn split_on_damage_unmodifiable(&self) -> Vec<Split> {
        vec![Split {
            thresh: self.thresh,
            extra: self.extra_mods(),
        }]
    }
}
