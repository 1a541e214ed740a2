//! Rules that generate additional effects from roll results
//!
//! A generator publishes a payout collection indexed by rolled face:
//! entry `i` is the distribution of effects produced when the die
//! lands on face `i`. Faces below the trigger threshold pay nothing.

use serde_json::{json, Value};

use crate::pmf::{PMFCollection, PMF};

use super::{DivertParams, Modifier};

fn clamp_thresh(thresh: i64) -> i64 {
    thresh.clamp(0, 7)
}

/// Fixed payout of `value` effects on faces at or above `thresh`.
fn flat_payout(thresh: i64, value: usize) -> PMFCollection {
    PMFCollection::new(
        (0..8)
            .map(|face| {
                if face < thresh {
                    PMF::constant(0)
                } else {
                    PMF::constant(value)
                }
            })
            .collect(),
    )
}

/// Payout of `value` dice with `sides` faces on faces at or above
/// `thresh`.
fn dice_payout(thresh: i64, value: usize, sides: usize) -> PMFCollection {
    PMFCollection::new(
        (0..8)
            .map(|face| {
                if face < thresh {
                    PMF::constant(0)
                } else {
                    PMFCollection::mdn(value, sides).convolve()
                }
            })
            .collect(),
    )
}

macro_rules! flat_generator {
    ($($name:ident, $tag:literal, $hook:ident;)+) => {$(
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            pub thresh: i64,
            pub value: usize,
        }

        impl $name {
            pub fn new(thresh: i64, value: usize) -> Self {
                $name { thresh: clamp_thresh(thresh), value }
            }
        }

        impl Modifier for $name {
            fn descriptor(&self) -> Value {
                json!({"name": $tag, "thresh": self.thresh, "value": self.value})
            }

            fn $hook(&self) -> Option<PMFCollection> {
                Some(flat_payout(self.thresh, self.value))
            }
        }
    )+};
}

flat_generator! {
    GenerateExtraAutomaticHitsModifiable, "generate_extra_automatic_hits_modifiable",
        extra_automatic_hit_modifiable;
    GenerateExtraAutomaticHitsUnmodifiable, "generate_extra_automatic_hits_unmodifiable",
        extra_automatic_hit_unmodifiable;
    GenerateExtraHitRollsModifiable, "generate_extra_hit_rolls_modifiable",
        extra_hit_roll_modifiable;
    GenerateExtraHitRollsUnmodifiable, "generate_extra_hit_rolls_unmodifiable",
        extra_hit_roll_unmodifiable;
    GenerateExtraWoundRollsModifiable, "generate_extra_wound_rolls_modifiable",
        extra_wound_roll_modifiable;
    GenerateExtraWoundRollsUnmodifiable, "generate_extra_wound_rolls_unmodifiable",
        extra_wound_roll_unmodifiable;
    GenerateExtraAutomaticWoundsModifiable, "generate_extra_automatic_wounds_modifiable",
        extra_automatic_wound_modifiable;
    GenerateExtraAutomaticWoundsUnmodifiable, "generate_extra_automatic_wounds_unmodifiable",
        extra_automatic_wound_unmodifiable;
    GenerateMortalWoundsModifiable, "generate_mortal_wounds_modifiable",
        extra_mortal_wound_modifiable;
    GenerateMortalWoundsUnmodifiable, "generate_mortal_wounds_unmodifiable",
        extra_mortal_wound_unmodifiable;
}

macro_rules! dice_generator {
    ($($name:ident, $tag:literal, $hook:ident, $sides:literal;)+) => {$(
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            pub thresh: i64,
            pub value: usize,
        }

        impl $name {
            pub fn new(thresh: i64, value: usize) -> Self {
                $name { thresh: clamp_thresh(thresh), value }
            }
        }

        impl Modifier for $name {
            fn descriptor(&self) -> Value {
                json!({"name": $tag, "thresh": self.thresh, "value": self.value})
            }

            fn $hook(&self) -> Option<PMFCollection> {
                Some(dice_payout(self.thresh, self.value, $sides))
            }
        }
    )+};
}

dice_generator! {
    GenerateD3MortalWoundsModifiable, "generate_d3_mortal_wounds_modifiable",
        extra_mortal_wound_modifiable, 3;
    GenerateD3MortalWoundsUnmodifiable, "generate_d3_mortal_wounds_unmodifiable",
        extra_mortal_wound_unmodifiable, 3;
    GenerateD6MortalWoundsModifiable, "generate_d6_mortal_wounds_modifiable",
        extra_mortal_wound_modifiable, 6;
    GenerateD6MortalWoundsUnmodifiable, "generate_d6_mortal_wounds_unmodifiable",
        extra_mortal_wound_unmodifiable, 6;
}

/// Fold the dice faces at or above `thresh` into face 0, ending the
/// attack sequence for those dice while the paired generator hook
/// pays out its effect instead.
fn end_attack_faces(col: PMFCollection, thresh: i64) -> PMFCollection {
    let split = thresh.max(0) as usize;
    col.map(|p| {
        let mut values = p.values.clone();
        if split < values.len() {
            let ended: f64 = values[split..].iter().sum();
            values[0] += ended;
            for v in &mut values[split..] {
                *v = 0.0;
            }
        }
        PMF::new(values)
    })
}

macro_rules! end_attack_generator {
    ($($name:ident, $tag:literal, $hook:ident;)+) => {$(
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            pub thresh: i64,
            pub value: usize,
        }

        impl $name {
            pub fn new(thresh: i64, value: usize) -> Self {
                $name { thresh: clamp_thresh(thresh), value }
            }
        }

        impl Modifier for $name {
            fn descriptor(&self) -> Value {
                json!({"name": $tag, "thresh": self.thresh, "value": self.value})
            }

            fn modify_dice(
                &self,
                col: PMFCollection,
                _thresh: i64,
                _mod_thresh: i64,
            ) -> PMFCollection {
                end_attack_faces(col, self.thresh)
            }

            fn $hook(&self) -> Option<PMFCollection> {
                Some(flat_payout(self.thresh, self.value))
            }
        }
    )+};
}

end_attack_generator! {
    EndAttackAndGenerateMortalWoundsModifiable,
        "end_attack_and_generate_mortal_wounds_modifiable",
        extra_mortal_wound_modifiable;
    EndAttackAndGenerateMortalWoundsUnmodifiable,
        "end_attack_and_generate_mortal_wounds_unmodifiable",
        extra_mortal_wound_unmodifiable;
    EndAttackAndGenerateExtraWoundsModifiable,
        "end_attack_and_generate_extra_wounds_modifiable",
        extra_automatic_wound_modifiable;
    EndAttackAndGenerateExtraWoundsUnmodifiable,
        "end_attack_and_generate_extra_wounds_unmodifiable",
        extra_automatic_wound_unmodifiable;
}

/// One mortal wound on a modified 4 or 5, d3 mortal wounds on a 6.
#[derive(Debug, Clone, Copy)]
pub struct Haywire;

impl Modifier for Haywire {
    fn descriptor(&self) -> Value {
        json!({"name": "haywire"})
    }

    fn extra_mortal_wound_modifiable(&self) -> Option<PMFCollection> {
        Some(PMFCollection::new(vec![
            PMF::constant(0),
            PMF::constant(0),
            PMF::constant(0),
            PMF::constant(0),
            PMF::constant(1),
            PMF::constant(1),
            PMF::dn(3),
        ]))
    }
}

/// Divert wounds to an escorting drone on `thresh`+, with the drone
/// shrugging each wound on its own `fnp`+ feel-no-pain.
#[derive(Debug, Clone, Copy)]
pub struct SaviourProtocol {
    pub thresh: i64,
    pub fnp: i64,
}

impl SaviourProtocol {
    pub fn new(thresh: i64, fnp: i64) -> Self {
        SaviourProtocol { thresh, fnp }
    }
}

impl Modifier for SaviourProtocol {
    fn descriptor(&self) -> Value {
        json!({"name": "saviour_protocol", "thresh": self.thresh, "fnp": self.fnp})
    }

    fn divert_params(&self) -> DivertParams {
        DivertParams {
            enabled: true,
            thresh: self.thresh,
            fnp: self.fnp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_flat_payout_faces() {
        let gen = GenerateExtraAutomaticHitsModifiable::new(6, 2);
        let col = gen.extra_automatic_hit_modifiable().unwrap();
        assert_eq!(col.len(), 8);
        assert_eq!(col.get(5), PMF::constant(0));
        assert_eq!(col.get(6), PMF::constant(2));
        assert_eq!(col.get(7), PMF::constant(2));
    }

    #[test]
    fn test_thresh_clamped() {
        let gen = GenerateMortalWoundsUnmodifiable::new(11, 1);
        assert_eq!(gen.thresh, 7);
        let col = gen.extra_mortal_wound_unmodifiable().unwrap();
        assert_eq!(col.get(6), PMF::constant(0));
        assert_eq!(col.get(7), PMF::constant(1));
    }

    #[test]
    fn test_d3_payout_mean() {
        let gen = GenerateD3MortalWoundsModifiable::new(6, 2);
        let col = gen.extra_mortal_wound_modifiable().unwrap();
        assert!((col.get(6).mean() - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_end_attack_folds_triggering_faces() {
        let gen = EndAttackAndGenerateMortalWoundsUnmodifiable::new(6, 3);
        let col = gen.modify_dice(PMFCollection::mdn(1, 6), 0, 0);
        let pmf = col.get(0);
        assert!((pmf.get(0) - 1.0 / 6.0).abs() < TOLERANCE);
        assert!((pmf.get(6)).abs() < TOLERANCE);
        assert!((pmf.values.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_haywire_ladder() {
        let col = Haywire.extra_mortal_wound_modifiable().unwrap();
        assert_eq!(col.get(3), PMF::constant(0));
        assert_eq!(col.get(4), PMF::constant(1));
        assert_eq!(col.get(6), PMF::dn(3));
    }
}
