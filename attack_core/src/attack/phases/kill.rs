//! Kill counting
//!
//! Converts a distribution of failed saves into a distribution of
//! slain models by walking every ordering of damage rolls against the
//! target's wound track. The recursion is memoized per calculator;
//! the damage and mortal-wound distributions are fixed for its
//! lifetime, so cache keys only carry the varying integers.

use std::collections::{BTreeMap, HashMap};

use crate::pmf::PMF;

/// (kills or dice used, probability) pairs.
type Tree = Vec<(usize, f64)>;
/// (dice used, probability, wounds left on the wounded model) pairs
/// for sequences that ran out of dice mid-kill.
type ZeroTree = Vec<(usize, f64, i64)>;

pub(crate) struct KillCalculator {
    wounds: i64,
    damage_pmf: PMF,
    mortal_pmf: PMF,
    kill_cache: HashMap<usize, Tree>,
    one_kill_cache: HashMap<(i64, usize), (Tree, ZeroTree)>,
    mortal_cache: HashMap<i64, Tree>,
}

impl KillCalculator {
    pub fn new(wounds: usize, damage_pmf: PMF, mortal_pmf: PMF) -> Self {
        KillCalculator {
            wounds: wounds as i64,
            damage_pmf,
            mortal_pmf,
            kill_cache: HashMap::new(),
            one_kill_cache: HashMap::new(),
            mortal_cache: HashMap::new(),
        }
    }

    /// Kill distribution over a failed-save count distribution.
    pub fn calc_dist(&mut self, failed_saves_dist: &PMF) -> PMF {
        let branches: Vec<PMF> = failed_saves_dist
            .values
            .iter()
            .enumerate()
            .filter(|(_, &p)| !PMF::is_null_prob(p))
            .map(|(dice, &p)| {
                let tree = self.kill_tree(dice);
                tree_to_pmf(&tree).scale(p)
            })
            .collect();
        PMF::flatten(&branches)
    }

    /// Upper bound on dice that can contribute to a single kill: with
    /// a minimum non-zero damage roll of `d`, at most ceil(wounds/d)
    /// dice matter. An all-or-nothing zero-damage floor degenerates
    /// to the dice count itself.
    fn max_depth(&self, dice: usize) -> usize {
        for (damage, &p) in self.damage_pmf.values.iter().enumerate() {
            if !PMF::is_null_prob(p) {
                if damage == 0 {
                    return dice;
                }
                return ((self.wounds + damage as i64 - 1) / damage as i64) as usize;
            }
        }
        0
    }

    /// Distribution of total kills from `dice` failed saves, built by
    /// peeling one-kill trees off the front.
    fn kill_tree(&mut self, dice: usize) -> Tree {
        if let Some(cached) = self.kill_cache.get(&dice) {
            return cached.clone();
        }
        let tree = if dice == 0 {
            vec![(0, 1.0)]
        } else {
            let depth = dice.min(self.max_depth(dice));
            let (kill_dist, zeros_dist) = self.one_kill_tree(self.wounds, depth);
            let mut kills = Vec::new();
            for (dice_used, dice_prob) in kill_dist {
                for (k, p) in self.kill_tree(dice - dice_used) {
                    kills.push((k + 1, p * dice_prob));
                }
            }
            for (dice_used, dice_prob, wounds_left) in zeros_dist {
                // A partial kill only appears once every die is spent.
                debug_assert_eq!(dice - dice_used, 0);
                for (k, p) in self.mortal_kill_tree(wounds_left) {
                    kills.push((k, p * dice_prob));
                }
            }
            normalize_tree(kills)
        };
        self.kill_cache.insert(dice, tree.clone());
        tree
    }

    /// Distribution of dice needed for one kill, plus the partial
    /// sequences that exhausted the dice with wounds still remaining.
    fn one_kill_tree(&mut self, wounds: i64, depth: usize) -> (Tree, ZeroTree) {
        let key = (wounds, depth);
        if let Some(cached) = self.one_kill_cache.get(&key) {
            return cached.clone();
        }
        let mut damages = Vec::new();
        let mut zeros = Vec::new();
        if wounds <= 0 {
            damages.push((0, 1.0));
        } else if depth == 0 {
            zeros.push((0, 1.0, wounds));
        } else {
            let capped = self.damage_pmf.ceiling(wounds as usize);
            for (damage, &damage_prob) in capped.values.iter().enumerate() {
                if PMF::is_null_prob(damage_prob) {
                    continue;
                }
                let (tree_dam, tree_zeros) =
                    self.one_kill_tree(wounds - damage as i64, depth - 1);
                damages
                    .extend(tree_dam.iter().map(|&(d, p)| (d + 1, p * damage_prob)));
                zeros.extend(
                    tree_zeros
                        .iter()
                        .map(|&(d, p, w)| (d + 1, p * damage_prob, w)),
                );
            }
            damages = normalize_tree(damages);
            zeros = normalize_zero_tree(zeros);
        }
        let result = (damages, zeros);
        self.one_kill_cache.insert(key, result.clone());
        result
    }

    /// Resolve a wounded model against the mortal-wound residual. A
    /// mortal total past the remaining wounds spills into further
    /// kills by whole wound tracks.
    fn mortal_kill_tree(&mut self, wounds_left: i64) -> Tree {
        if let Some(cached) = self.mortal_cache.get(&wounds_left) {
            return cached.clone();
        }
        let mut kills = Vec::new();
        for (damage, &damage_prob) in self.mortal_pmf.values.iter().enumerate() {
            if PMF::is_null_prob(damage_prob) {
                continue;
            }
            let damage = damage as i64;
            if damage < wounds_left {
                kills.push((0, damage_prob));
            } else if damage == wounds_left {
                kills.push((1, damage_prob));
            } else {
                let spill = self.wounds / (damage - wounds_left);
                kills.push((1 + spill as usize, damage_prob));
            }
        }
        let tree = normalize_tree(kills);
        self.mortal_cache.insert(wounds_left, tree.clone());
        tree
    }
}

fn tree_to_pmf(tree: &Tree) -> PMF {
    let len = 1 + tree.iter().map(|&(k, _)| k).max().unwrap_or(0);
    let mut values = vec![0.0; len];
    for &(kills, prob) in tree {
        values[kills] += prob;
    }
    PMF::new(values)
}

fn normalize_tree(tree: Tree) -> Tree {
    let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
    for (kills, prob) in tree {
        *merged.entry(kills).or_insert(0.0) += prob;
    }
    merged.into_iter().collect()
}

fn normalize_zero_tree(tree: ZeroTree) -> ZeroTree {
    let mut merged: BTreeMap<(usize, i64), f64> = BTreeMap::new();
    for (dice, prob, wounds_left) in tree {
        *merged.entry((dice, wounds_left)).or_insert(0.0) += prob;
    }
    merged
        .into_iter()
        .map(|((dice, wounds_left), prob)| (dice, prob, wounds_left))
        .collect()
}
