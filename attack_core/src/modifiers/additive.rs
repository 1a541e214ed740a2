//! Flat additive rules
//!
//! Priority equals the added value, so bigger bonuses apply first.
//! A "+1 to hit" is a -1 to the threshold, never a change to the dice.

use serde_json::{json, Value};

use crate::pmf::{PMFCollection, PMF};

use super::Modifier;

macro_rules! add_n_modifier {
    ($($name:ident),+ $(,)?) => {$(
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            pub value: i64,
        }

        impl $name {
            pub fn new(value: i64) -> Self {
                $name { value }
            }
        }
    )+};
}

add_n_modifier!(
    AddNToThreshold,
    AddNToAP,
    AddNToSave,
    AddNToInvuln,
    AddNToVolume,
    SubtractNVolumeMinOne,
    AddND6,
    AddND3,
);

impl Modifier for AddNToThreshold {
    fn descriptor(&self) -> Value {
        json!({"name": "add_n_to_threshold", "value": self.value})
    }

    fn priority(&self) -> i64 {
        self.value
    }

    fn modify_threshold(&self, thresh: i64) -> i64 {
        thresh - self.value
    }
}

impl Modifier for AddNToAP {
    fn descriptor(&self) -> Value {
        json!({"name": "add_n_to_ap", "value": self.value})
    }

    fn priority(&self) -> i64 {
        self.value
    }

    fn modify_ap(&self, ap: i64) -> i64 {
        (ap + self.value).max(0)
    }
}

impl Modifier for AddNToSave {
    fn descriptor(&self) -> Value {
        json!({"name": "add_n_to_save", "value": self.value})
    }

    fn priority(&self) -> i64 {
        self.value
    }

    fn modify_save(&self, save: i64) -> i64 {
        save - self.value
    }
}

impl Modifier for AddNToInvuln {
    fn descriptor(&self) -> Value {
        json!({"name": "add_n_to_invuln", "value": self.value})
    }

    fn priority(&self) -> i64 {
        self.value
    }

    fn modify_invuln(&self, invuln: i64) -> i64 {
        invuln - self.value
    }
}

impl Modifier for AddNToVolume {
    fn descriptor(&self) -> Value {
        json!({"name": "add_n_to_volume", "value": self.value})
    }

    fn priority(&self) -> i64 {
        self.value
    }

    fn modify_dice(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        let value = self.value;
        col.map(|p| p.roll(value))
    }
}

impl Modifier for SubtractNVolumeMinOne {
    fn descriptor(&self) -> Value {
        json!({"name": "subtract_n_volume_min_one", "value": self.value})
    }

    fn priority(&self) -> i64 {
        self.value
    }

    fn modify_dice(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        let value = self.value;
        col.map(|p| p.roll(-value).min(1))
    }
}

impl Modifier for AddND6 {
    fn descriptor(&self) -> Value {
        json!({"name": "add_n_d6", "value": self.value})
    }

    fn priority(&self) -> i64 {
        self.value
    }

    fn modify_dice(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        let mut pmfs = col.pmfs;
        pmfs.extend(std::iter::repeat(PMF::dn(6)).take(self.value.max(0) as usize));
        PMFCollection::new(pmfs)
    }
}

impl Modifier for AddND3 {
    fn descriptor(&self) -> Value {
        json!({"name": "add_n_d3", "value": self.value})
    }

    fn priority(&self) -> i64 {
        self.value
    }

    fn modify_dice(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        let mut pmfs = col.pmfs;
        pmfs.extend(std::iter::repeat(PMF::dn(3)).take(self.value.max(0) as usize));
        PMFCollection::new(pmfs)
    }
}
