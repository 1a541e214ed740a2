//! Aggregation of modifiers across the stages of an attack

use std::cmp::Reverse;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::ops::Add;

use serde_json::json;

use crate::pmf::{PMFCollection, PMF};

use super::{DivertParams, Modifier, ModifierRef, Split};

/// All modifiers in play for one attack, bucketed by the stage they
/// apply to. Each bucket is kept sorted by descending priority; the
/// sort is stable, so equal priorities keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct ModifierCollection {
    pub attacks_mods: Vec<ModifierRef>,
    pub hit_mods: Vec<ModifierRef>,
    pub wound_mods: Vec<ModifierRef>,
    pub save_mods: Vec<ModifierRef>,
    pub fnp_mods: Vec<ModifierRef>,
    pub damage_mods: Vec<ModifierRef>,
}

fn sort_priority(mut mods: Vec<ModifierRef>) -> Vec<ModifierRef> {
    mods.sort_by_key(|m| Reverse(m.priority()));
    mods
}

impl ModifierCollection {
    pub fn new() -> Self {
        ModifierCollection::default()
    }

    pub fn with_attacks_mods(mut self, mods: Vec<ModifierRef>) -> Self {
        self.attacks_mods = sort_priority(mods);
        self
    }

    pub fn with_hit_mods(mut self, mods: Vec<ModifierRef>) -> Self {
        self.hit_mods = sort_priority(mods);
        self
    }

    pub fn with_wound_mods(mut self, mods: Vec<ModifierRef>) -> Self {
        self.wound_mods = sort_priority(mods);
        self
    }

    pub fn with_save_mods(mut self, mods: Vec<ModifierRef>) -> Self {
        self.save_mods = sort_priority(mods);
        self
    }

    pub fn with_fnp_mods(mut self, mods: Vec<ModifierRef>) -> Self {
        self.fnp_mods = sort_priority(mods);
        self
    }

    pub fn with_damage_mods(mut self, mods: Vec<ModifierRef>) -> Self {
        self.damage_mods = sort_priority(mods);
        self
    }

    /// Concatenate two collections stage by stage and re-sort. The
    /// empty collection is the identity.
    pub fn combine(&self, other: &ModifierCollection) -> ModifierCollection {
        let join = |a: &[ModifierRef], b: &[ModifierRef]| {
            sort_priority(a.iter().chain(b).cloned().collect())
        };
        ModifierCollection {
            attacks_mods: join(&self.attacks_mods, &other.attacks_mods),
            hit_mods: join(&self.hit_mods, &other.hit_mods),
            wound_mods: join(&self.wound_mods, &other.wound_mods),
            save_mods: join(&self.save_mods, &other.save_mods),
            fnp_mods: join(&self.fnp_mods, &other.fnp_mods),
            damage_mods: join(&self.damage_mods, &other.damage_mods),
        }
    }

    /// Hash of the collection's content: stage by stage, the sorted
    /// serialized descriptors of every modifier. Two collections built
    /// from equal rules hash equal regardless of insertion order.
    pub fn content_hash(&self) -> u64 {
        let stage_key = |mods: &[ModifierRef]| {
            let mut keys: Vec<String> =
                mods.iter().map(|m| m.descriptor().to_string()).collect();
            keys.sort();
            keys
        };
        let canonical = json!({
            "attacks_mods": stage_key(&self.attacks_mods),
            "hit_mods": stage_key(&self.hit_mods),
            "wound_mods": stage_key(&self.wound_mods),
            "save_mods": stage_key(&self.save_mods),
            "fnp_mods": stage_key(&self.fnp_mods),
            "damage_mods": stage_key(&self.damage_mods),
        });
        let mut hasher = DefaultHasher::new();
        canonical.to_string().hash(&mut hasher);
        hasher.finish()
    }

    /// Apply a stage's dice transforms: every re-roll first, in
    /// priority order, then every shape transform. Re-rolls must see
    /// the original faces, so they always run before shifts.
    fn mod_dice(
        collection: PMFCollection,
        mods: &[ModifierRef],
        thresh: i64,
        mod_thresh: i64,
    ) -> PMFCollection {
        let mut collection = collection;
        for m in mods {
            collection = m.modify_re_roll(collection, thresh, mod_thresh);
        }
        for m in mods {
            collection = m.modify_dice(collection, thresh, mod_thresh);
        }
        collection
    }

    pub fn modify_shot_dice(&self, collection: PMFCollection) -> PMFCollection {
        Self::mod_dice(collection, &self.attacks_mods, 0, 0)
    }

    pub fn modify_hit_dice(
        &self,
        collection: PMFCollection,
        thresh: i64,
        mod_thresh: i64,
    ) -> PMFCollection {
        Self::mod_dice(collection, &self.hit_mods, thresh, mod_thresh)
    }

    pub fn modify_wound_dice(
        &self,
        collection: PMFCollection,
        thresh: i64,
        mod_thresh: i64,
    ) -> PMFCollection {
        Self::mod_dice(collection, &self.wound_mods, thresh, mod_thresh)
    }

    pub fn modify_save_dice(
        &self,
        collection: PMFCollection,
        thresh: i64,
        mod_thresh: i64,
    ) -> PMFCollection {
        Self::mod_dice(collection, &self.save_mods, thresh, mod_thresh)
    }

    pub fn modify_fnp_dice(
        &self,
        collection: PMFCollection,
        thresh: i64,
        mod_thresh: i64,
    ) -> PMFCollection {
        Self::mod_dice(collection, &self.fnp_mods, thresh, mod_thresh)
    }

    pub fn modify_damage_dice(&self, collection: PMFCollection) -> PMFCollection {
        Self::mod_dice(collection, &self.damage_mods, 0, 0)
    }

    /// Hit threshold after modifiers. A natural 1 always fails, so the
    /// result floors at 2; a threshold of 1 means the attack hits
    /// automatically and skips modification entirely.
    pub fn modify_hit_thresh(&self, thresh: i64) -> i64 {
        if thresh == 1 {
            return thresh;
        }
        let mut thresh = thresh;
        for m in &self.hit_mods {
            thresh = m.modify_threshold(thresh);
        }
        thresh.max(2)
    }

    pub fn modify_wound_thresh(&self, thresh: i64) -> i64 {
        let mut thresh = thresh;
        for m in &self.wound_mods {
            thresh = m.modify_threshold(thresh);
        }
        thresh.max(2)
    }

    /// Save threshold after modifiers: the better of the modified
    /// armour save (with AP applied) and the modified invulnerable
    /// save, each floored at 2.
    pub fn modify_pen_thresh(&self, save: i64, ap: i64, invuln: i64) -> i64 {
        let mut save = save;
        let mut ap = ap;
        let mut invuln = invuln;
        for m in &self.save_mods {
            save = m.modify_save(save);
        }
        for m in &self.save_mods {
            ap = m.modify_ap(ap);
        }
        for m in &self.save_mods {
            invuln = m.modify_invuln(invuln);
        }
        (save + ap).max(2).min(invuln.max(2))
    }

    pub fn modify_fnp_thresh(&self, thresh: i64) -> i64 {
        let mut thresh = thresh;
        for m in &self.fnp_mods {
            thresh = m.modify_save(thresh);
        }
        thresh.max(2)
    }

    pub fn modify_weapon_strength(&self, strength: i64) -> i64 {
        let mut strength = strength;
        for m in &self.wound_mods {
            strength = m.modify_strength(strength);
        }
        strength.max(1)
    }

    pub fn modify_target_toughness(&self, toughness: i64) -> i64 {
        let mut toughness = toughness;
        for m in &self.wound_mods {
            toughness = m.modify_toughness(toughness);
        }
        toughness.max(1)
    }

    /// Saviour-protocol parameters folded across the save-stage
    /// modifiers: any enabler turns diversion on, the lowest divert
    /// and feel-no-pain thresholds win.
    pub fn saviour_protocol_params(&self) -> DivertParams {
        let mut params = DivertParams::default();
        for m in &self.save_mods {
            let p = m.divert_params();
            params.enabled = params.enabled || p.enabled;
            params.thresh = params.thresh.min(p.thresh);
            params.fnp = params.fnp.min(p.fnp);
        }
        params
    }

    pub fn hit_self_wound_thresh(&self) -> i64 {
        self.hit_mods
            .iter()
            .map(|m| m.self_wound_thresh())
            .max()
            .unwrap_or(0)
    }

    pub fn wound_self_wound_thresh(&self) -> i64 {
        self.wound_mods
            .iter()
            .map(|m| m.self_wound_thresh())
            .max()
            .unwrap_or(0)
    }

    fn sum_generators(
        mods: &[ModifierRef],
        get: impl Fn(&dyn Modifier) -> Option<PMFCollection>,
    ) -> PMFCollection {
        let cols: Vec<PMFCollection> =
            mods.iter().filter_map(|m| get(m.as_ref())).collect();
        PMFCollection::add_many(&cols)
    }

    pub fn extra_automatic_hit_dist_modifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.hit_mods, |m| m.extra_automatic_hit_modifiable())
    }

    pub fn extra_automatic_hit_dist_unmodifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.hit_mods, |m| m.extra_automatic_hit_unmodifiable())
    }

    pub fn extra_hit_roll_dist_modifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.hit_mods, |m| m.extra_hit_roll_modifiable())
    }

    pub fn extra_hit_roll_dist_unmodifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.hit_mods, |m| m.extra_hit_roll_unmodifiable())
    }

    pub fn extra_wound_roll_dist_modifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.wound_mods, |m| m.extra_wound_roll_modifiable())
    }

    pub fn extra_wound_roll_dist_unmodifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.wound_mods, |m| m.extra_wound_roll_unmodifiable())
    }

    pub fn hit_generated_extra_automatic_wound_dist_modifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.hit_mods, |m| m.extra_automatic_wound_modifiable())
    }

    pub fn hit_generated_extra_automatic_wound_dist_unmodifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.hit_mods, |m| m.extra_automatic_wound_unmodifiable())
    }

    pub fn wound_generated_extra_automatic_wound_dist_modifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.wound_mods, |m| m.extra_automatic_wound_modifiable())
    }

    pub fn wound_generated_extra_automatic_wound_dist_unmodifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.wound_mods, |m| {
            m.extra_automatic_wound_unmodifiable()
        })
    }

    pub fn hit_generated_mortal_wound_dist_modifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.hit_mods, |m| m.extra_mortal_wound_modifiable())
    }

    pub fn hit_generated_mortal_wound_dist_unmodifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.hit_mods, |m| m.extra_mortal_wound_unmodifiable())
    }

    pub fn wound_generated_mortal_wound_dist_modifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.wound_mods, |m| m.extra_mortal_wound_modifiable())
    }

    pub fn wound_generated_mortal_wound_dist_unmodifiable(&self) -> PMFCollection {
        Self::sum_generators(&self.wound_mods, |m| m.extra_mortal_wound_unmodifiable())
    }

    // Scenario splitting. Downstream stages can depend on the face a
    // hit or wound die landed on; the sequence forks into weighted
    // scenarios, one per distinct downstream modifier set.

    pub fn split_hit_roll(&self) -> Vec<(f64, ModifierCollection)> {
        vec![(1.0, self.clone())]
    }

    pub fn split_wound_roll(
        &self,
        hit_dist: &PMF,
        hit_modifier: i64,
    ) -> Vec<(f64, ModifierCollection)> {
        let hit_slices = Self::split_on_stage(
            &self.hit_mods,
            hit_dist,
            hit_modifier,
            |m| m.split_on_wound_modifiable(),
            |m| m.split_on_wound_unmodifiable(),
        );
        hit_slices
            .into_iter()
            .map(|(p, extra)| (p, extra.combine(self)))
            .collect()
    }

    pub fn split_save_roll(
        &self,
        hit_dist: &PMF,
        hit_modifier: i64,
        wound_dist: &PMF,
        wound_modifier: i64,
    ) -> Vec<(f64, ModifierCollection)> {
        self.split_two_stages(
            hit_dist,
            hit_modifier,
            wound_dist,
            wound_modifier,
            |m| m.split_on_save_modifiable(),
            |m| m.split_on_save_unmodifiable(),
        )
    }

    pub fn split_damage_roll(
        &self,
        hit_dist: &PMF,
        hit_modifier: i64,
        wound_dist: &PMF,
        wound_modifier: i64,
    ) -> Vec<(f64, ModifierCollection)> {
        self.split_two_stages(
            hit_dist,
            hit_modifier,
            wound_dist,
            wound_modifier,
            |m| m.split_on_damage_modifiable(),
            |m| m.split_on_damage_unmodifiable(),
        )
    }

    /// Cross-product of the hit-roll and wound-roll partitions: each
    /// scenario is one hit branch and one wound branch happening
    /// together.
    fn split_two_stages(
        &self,
        hit_dist: &PMF,
        hit_modifier: i64,
        wound_dist: &PMF,
        wound_modifier: i64,
        mod_get: impl Fn(&dyn Modifier) -> Vec<Split> + Copy,
        unmod_get: impl Fn(&dyn Modifier) -> Vec<Split> + Copy,
    ) -> Vec<(f64, ModifierCollection)> {
        let hit_slices =
            Self::split_on_stage(&self.hit_mods, hit_dist, hit_modifier, mod_get, unmod_get);
        let wound_slices = Self::split_on_stage(
            &self.wound_mods,
            wound_dist,
            wound_modifier,
            mod_get,
            unmod_get,
        );
        let mut output = Vec::with_capacity(hit_slices.len() * wound_slices.len());
        for (hit_prob, hit_extra) in &hit_slices {
            for (wound_prob, wound_extra) in &wound_slices {
                output.push((
                    hit_prob * wound_prob,
                    hit_extra.combine(wound_extra).combine(self),
                ));
            }
        }
        output
    }

    /// Partition the faces 0..=6 of one stage's die by the downstream
    /// modifiers triggered at or above each split threshold, then
    /// weight each partition by the stage's single-die distribution.
    /// Modifiable splits shift their threshold by the stage's flat
    /// modifier before partitioning; unmodifiable splits do not.
    fn split_on_stage(
        mods: &[ModifierRef],
        dist: &PMF,
        modifier: i64,
        mod_get: impl Fn(&dyn Modifier) -> Vec<Split>,
        unmod_get: impl Fn(&dyn Modifier) -> Vec<Split>,
    ) -> Vec<(f64, ModifierCollection)> {
        let mut slices = vec![Split {
            thresh: 0,
            extra: ModifierCollection::new(),
        }];
        for m in mods {
            for split in mod_get(m.as_ref()) {
                slices.push(Split {
                    thresh: (split.thresh + modifier).max(0),
                    extra: split.extra,
                });
            }
            slices.extend(unmod_get(m.as_ref()));
        }

        // For each face, combine every split active at that face.
        let per_face: Vec<ModifierCollection> = (0..7)
            .map(|face| {
                slices
                    .iter()
                    .filter(|s| s.thresh.max(0) <= face)
                    .fold(ModifierCollection::new(), |acc, s| acc.combine(&s.extra))
            })
            .collect();

        // Merge faces whose combined modifiers are identical.
        let mut groups: BTreeMap<u64, (ModifierCollection, Vec<usize>)> = BTreeMap::new();
        for (face, combined) in per_face.into_iter().enumerate() {
            groups
                .entry(combined.content_hash())
                .or_insert_with(|| (combined, Vec::new()))
                .1
                .push(face);
        }
        groups
            .into_values()
            .map(|(combined, faces)| {
                let prob = faces.iter().map(|&f| dist.get(f)).sum();
                (prob, combined)
            })
            .collect()
    }
}

impl Add for ModifierCollection {
    type Output = ModifierCollection;

    fn add(self, other: ModifierCollection) -> ModifierCollection {
        self.combine(&other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{
        AddNToThreshold, OnAModifiableRollOfNAddAP, ReRollOnes, SaviourProtocol,
    };
    use std::sync::Arc;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_combine_identity_and_content_hash() {
        let mods = ModifierCollection::new()
            .with_hit_mods(vec![Arc::new(ReRollOnes) as ModifierRef]);
        let combined = mods.combine(&ModifierCollection::new());
        assert_eq!(combined.content_hash(), mods.content_hash());
        assert_ne!(
            mods.content_hash(),
            ModifierCollection::new().content_hash()
        );
    }

    #[test]
    fn test_content_hash_order_independent() {
        let a: ModifierRef = Arc::new(ReRollOnes);
        let b: ModifierRef = Arc::new(AddNToThreshold::new(1));
        let first = ModifierCollection::new().with_hit_mods(vec![a.clone(), b.clone()]);
        let second = ModifierCollection::new().with_hit_mods(vec![b, a]);
        assert_eq!(first.content_hash(), second.content_hash());
    }

    #[test]
    fn test_threshold_floor_and_auto_hit() {
        let plus_two = ModifierCollection::new()
            .with_hit_mods(vec![Arc::new(AddNToThreshold::new(3)) as ModifierRef]);
        // +3 to hit cannot push the threshold below 2.
        assert_eq!(plus_two.modify_hit_thresh(4), 2);
        // Automatic hits ignore hit modifiers.
        assert_eq!(plus_two.modify_hit_thresh(1), 1);
    }

    #[test]
    fn test_pen_thresh_best_of_save_and_invuln() {
        let mods = ModifierCollection::new();
        assert_eq!(mods.modify_pen_thresh(3, 2, 7), 5);
        assert_eq!(mods.modify_pen_thresh(3, 2, 4), 4);
        assert_eq!(mods.modify_pen_thresh(2, -1, 7), 2);
    }

    #[test]
    fn test_saviour_params_fold() {
        let mods = ModifierCollection::new()
            .with_save_mods(vec![Arc::new(SaviourProtocol::new(4, 5)) as ModifierRef]);
        let params = mods.saviour_protocol_params();
        assert!(params.enabled);
        assert_eq!(params.thresh, 4);
        assert_eq!(params.fnp, 5);
        assert!(!ModifierCollection::new().saviour_protocol_params().enabled);
    }

    #[test]
    fn test_split_partition_probabilities_sum_to_one() {
        let mods = ModifierCollection::new().with_wound_mods(vec![
            Arc::new(OnAModifiableRollOfNAddAP::new(6, 3)) as ModifierRef,
        ]);
        let wound_dist = PMF::dn(6);
        let slices = mods.split_save_roll(&PMF::dn(6), 0, &wound_dist, 0);
        let total: f64 = slices.iter().map(|(p, _)| p).sum();
        assert!((total - 1.0).abs() < TOLERANCE);
        assert_eq!(slices.len(), 2);
    }

    #[test]
    fn test_split_without_splitters_is_single_scenario() {
        let mods = ModifierCollection::new()
            .with_hit_mods(vec![Arc::new(ReRollOnes) as ModifierRef]);
        let slices = mods.split_save_roll(&PMF::dn(6), 0, &PMF::dn(6), 0);
        assert_eq!(slices.len(), 1);
        assert!((slices[0].0 - 1.0).abs() < TOLERANCE);
    }
}
