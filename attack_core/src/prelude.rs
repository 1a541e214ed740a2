//! Prelude module for convenient imports
//!
//! ```rust
//! use attack_core::prelude::*;
//! ```

// Distributions
pub use crate::pmf::{PMFCollection, PMF};

// Attack sequence
pub use crate::attack::{Attack, AttackResults, MultiAttack};

// Profiles
pub use crate::target::Target;
pub use crate::weapon::Weapon;

// Modifier system
pub use crate::modifiers::{
    AddND3, AddND6, AddNToAP, AddNToInvuln, AddNToSave, AddNToThreshold, AddNToVolume,
    EndAttackAndGenerateExtraWoundsModifiable, EndAttackAndGenerateExtraWoundsUnmodifiable,
    EndAttackAndGenerateMortalWoundsModifiable, EndAttackAndGenerateMortalWoundsUnmodifiable,
    GenerateD3MortalWoundsModifiable, GenerateD3MortalWoundsUnmodifiable,
    GenerateD6MortalWoundsModifiable, GenerateD6MortalWoundsUnmodifiable,
    GenerateExtraAutomaticHitsModifiable, GenerateExtraAutomaticHitsUnmodifiable,
    GenerateExtraAutomaticWoundsModifiable, GenerateExtraAutomaticWoundsUnmodifiable,
    GenerateExtraHitRollsModifiable, GenerateExtraHitRollsUnmodifiable,
    GenerateExtraWoundRollsModifiable, GenerateExtraWoundRollsUnmodifiable,
    GenerateMortalWoundsModifiable, GenerateMortalWoundsUnmodifiable, HalfDamage, Haywire,
    HighestOfTwo, IgnoreAP, IgnoreInvuln, MinimumValue, Modifier, ModifierCollection,
    ModifierRef, OnAModifiableRollOfNAddAP, OnAModifiableRollOfNAddDamage,
    OnAnUnmodifiableRollOfNAddAP, OnAnUnmodifiableRollOfNAddDamage, Overheat, ReRollAll,
    ReRollFailed, ReRollLessThanExpectedValue, ReRollOneDice, ReRollOneDiceVolume,
    ReRollOnes, SaviourProtocol, SetAPToN, SetInvulnToN, SetSaveToN, SetThresholdToN,
    SubtractNVolumeMinOne,
};

// Config
pub use crate::config::{load_profiles, parse_profiles, ConfigError};
