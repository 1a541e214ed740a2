//! Rules that fix a value outright instead of shifting it

use serde_json::{json, Value};

use crate::pmf::PMFCollection;

use super::Modifier;

/// Replace the stage threshold with a fixed value.
#[derive(Debug, Clone, Copy)]
pub struct SetThresholdToN {
    pub value: i64,
}

impl SetThresholdToN {
    pub fn new(value: i64) -> Self {
        SetThresholdToN { value }
    }
}

impl Modifier for SetThresholdToN {
    fn descriptor(&self) -> Value {
        json!({"name": "set_threshold_to_n", "value": self.value})
    }

    fn modify_threshold(&self, _thresh: i64) -> i64 {
        self.value
    }
}

/// Replace the weapon's armour penetration with a fixed value.
#[derive(Debug, Clone, Copy)]
pub struct SetAPToN {
    pub value: i64,
}

impl SetAPToN {
    pub fn new(value: i64) -> Self {
        SetAPToN { value }
    }
}

impl Modifier for SetAPToN {
    fn descriptor(&self) -> Value {
        json!({"name": "set_ap_to_n", "value": self.value})
    }

    fn modify_ap(&self, _ap: i64) -> i64 {
        self.value
    }
}

/// Replace the target's armour save with a fixed value.
#[derive(Debug, Clone, Copy)]
pub struct SetSaveToN {
    pub value: i64,
}

impl SetSaveToN {
    pub fn new(value: i64) -> Self {
        SetSaveToN { value }
    }
}

impl Modifier for SetSaveToN {
    fn descriptor(&self) -> Value {
        json!({"name": "set_save_to_n", "value": self.value})
    }

    fn modify_save(&self, _save: i64) -> i64 {
        self.value
    }
}

/// Replace the target's invulnerable save with a fixed value.
#[derive(Debug, Clone, Copy)]
pub struct SetInvulnToN {
    pub value: i64,
}

impl SetInvulnToN {
    pub fn new(value: i64) -> Self {
        SetInvulnToN { value }
    }
}

impl Modifier for SetInvulnToN {
    fn descriptor(&self) -> Value {
        json!({"name": "set_invuln_to_n", "value": self.value})
    }

    fn modify_invuln(&self, _invuln: i64) -> i64 {
        self.value
    }
}

/// Treat armour penetration up to a cutoff as zero.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreAP {
    pub value: i64,
}

impl IgnoreAP {
    pub fn new(value: i64) -> Self {
        IgnoreAP { value }
    }
}

impl Modifier for IgnoreAP {
    fn descriptor(&self) -> Value {
        json!({"name": "ignore_ap", "value": self.value})
    }

    fn modify_ap(&self, ap: i64) -> i64 {
        if ap <= self.value {
            0
        } else {
            ap
        }
    }
}

/// Deny the invulnerable save by pushing it off the die.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreInvuln;

impl Modifier for IgnoreInvuln {
    fn descriptor(&self) -> Value {
        json!({"name": "ignore_invuln"})
    }

    fn modify_invuln(&self, _invuln: i64) -> i64 {
        7
    }
}

/// Halve volume rolls, rounding up, minimum one.
#[derive(Debug, Clone, Copy)]
pub struct HalfDamage;

impl Modifier for HalfDamage {
    fn descriptor(&self) -> Value {
        json!({"name": "half_damage"})
    }

    fn modify_dice(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        col.map(|p| p.div_min_one(2))
    }
}

/// The weapon wounds its own wielder on a natural 1 at the hit stage.
#[derive(Debug, Clone, Copy)]
pub struct Overheat;

impl Modifier for Overheat {
    fn descriptor(&self) -> Value {
        json!({"name": "overheat"})
    }

    fn self_wound_thresh(&self) -> i64 {
        2
    }
}

/// Treat rolls below a floor as the floor ("1s and 2s count as 3").
#[derive(Debug, Clone, Copy)]
pub struct MinimumValue {
    pub min_val: usize,
}

impl MinimumValue {
    pub fn new(min_val: usize) -> Self {
        MinimumValue { min_val }
    }
}

impl Modifier for MinimumValue {
    fn descriptor(&self) -> Value {
        json!({"name": "minimum_value", "min_val": self.min_val})
    }

    fn modify_dice(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        let min_val = self.min_val;
        col.map(|p| p.min(min_val))
    }
}

/// Roll each die twice, keep the higher.
#[derive(Debug, Clone, Copy)]
pub struct HighestOfTwo;

impl Modifier for HighestOfTwo {
    fn descriptor(&self) -> Value {
        json!({"name": "highest_of_two"})
    }

    fn modify_dice(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        col.map(|p| p.max_of_two())
    }
}
