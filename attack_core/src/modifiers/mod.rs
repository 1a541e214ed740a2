//! Rule modifiers applied to the attack sequence
//!
//! Every special rule is a [`Modifier`]: a capability object with
//! default no-op hooks, attached to a stage of a
//! [`ModifierCollection`]. Modifiers are stateless and shared, so
//! they live behind `Arc`.

mod additive;
mod collection;
mod generator;
mod reroll;
mod splitter;
mod value_setter;

pub use additive::*;
pub use collection::ModifierCollection;
pub use generator::*;
pub use reroll::*;
pub use splitter::*;
pub use value_setter::*;

use std::fmt::Debug;
use std::sync::Arc;

use crate::pmf::PMFCollection;

pub type ModifierRef = Arc<dyn Modifier>;

/// Saviour-protocol parameters folded out of the save-stage modifiers:
/// whether diversion is active, the roll needed to divert a wound, and
/// the drone's feel-no-pain threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivertParams {
    pub enabled: bool,
    pub thresh: i64,
    pub fnp: i64,
}

impl Default for DivertParams {
    fn default() -> Self {
        DivertParams {
            enabled: false,
            thresh: 7,
            fnp: 7,
        }
    }
}

/// One branch of a scenario split: on rolls reaching `thresh`, the
/// `extra` modifiers apply downstream.
#[derive(Debug, Clone)]
pub struct Split {
    pub thresh: i64,
    pub extra: ModifierCollection,
}

/// A single special rule. Hooks default to pass-through; a concrete
/// modifier overrides only the hooks its rule touches.
///
/// `thresh` is the stage's base success threshold and `mod_thresh` the
/// threshold after additive modifiers; rerolls that care about
/// "failed" dice need both.
pub trait Modifier: Debug + Send + Sync {
    /// Stable name-plus-parameters value identifying this modifier.
    /// Feeds the collection content hash, so equal rules must produce
    /// equal descriptors.
    fn descriptor(&self) -> serde_json::Value;

    /// Application order within a stage; higher runs first.
    fn priority(&self) -> i64 {
        0
    }

    /// Re-roll transforms, applied before any dice-shape transform.
    fn modify_re_roll(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        col
    }

    /// Dice-shape transforms (flat shifts, minimums, halving).
    fn modify_dice(
        &self,
        col: PMFCollection,
        _thresh: i64,
        _mod_thresh: i64,
    ) -> PMFCollection {
        col
    }

    fn modify_threshold(&self, thresh: i64) -> i64 {
        thresh
    }

    fn modify_save(&self, save: i64) -> i64 {
        save
    }

    fn modify_ap(&self, ap: i64) -> i64 {
        ap
    }

    fn modify_invuln(&self, invuln: i64) -> i64 {
        invuln
    }

    fn modify_strength(&self, strength: i64) -> i64 {
        strength
    }

    fn modify_toughness(&self, toughness: i64) -> i64 {
        toughness
    }

    /// Roll value needed before this stage wounds the attacker; 0 for
    /// none.
    fn self_wound_thresh(&self) -> i64 {
        0
    }

    fn divert_params(&self) -> DivertParams {
        DivertParams::default()
    }

    // Generator hooks: per-face payout collections, indexed by the
    // rolled face. `None` means the modifier generates nothing here.

    fn extra_automatic_hit_modifiable(&self) -> Option<PMFCollection> {
        None
    }

    fn extra_automatic_hit_unmodifiable(&self) -> Option<PMFCollection> {
        None
    }

    fn extra_hit_roll_modifiable(&self) -> Option<PMFCollection> {
        None
    }

    fn extra_hit_roll_unmodifiable(&self) -> Option<PMFCollection> {
        None
    }

    fn extra_automatic_wound_modifiable(&self) -> Option<PMFCollection> {
        None
    }

    fn extra_automatic_wound_unmodifiable(&self) -> Option<PMFCollection> {
        None
    }

    fn extra_wound_roll_modifiable(&self) -> Option<PMFCollection> {
        None
    }

    fn extra_wound_roll_unmodifiable(&self) -> Option<PMFCollection> {
        None
    }

    fn extra_mortal_wound_modifiable(&self) -> Option<PMFCollection> {
        None
    }

    fn extra_mortal_wound_unmodifiable(&self) -> Option<PMFCollection> {
        None
    }

    // Scenario splits: branch the downstream sequence on faces of this
    // stage's roll. Modifiable splits key on the modified face,
    // unmodifiable on the natural one.

    fn split_on_wound_modifiable(&self) -> Vec<Split> {
        Vec::new()
    }

    fn split_on_wound_unmodifiable(&self) -> Vec<Split> {
        Vec::new()
    }

    fn split_on_save_modifiable(&self) -> Vec<Split> {
        Vec::new()
    }

    fn split_on_save_unmodifiable(&self) -> Vec<Split> {
        Vec::new()
    }

    fn split_on_damage_modifiable(&self) -> Vec<Split> {
        Vec::new()
    }

    fn split_on_damage_unmodifiable(&self) -> Vec<Split> {
        Vec::new()
    }
}
