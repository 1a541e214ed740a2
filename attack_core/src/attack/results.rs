//! Per-phase and final result distributions

use std::fmt;

use thiserror::Error;

use crate::pmf::PMF;

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("cannot combine an empty set of attack results")]
    EmptyCombine,
}

/// Convolve `count` independent copies of a distribution.
fn repeat_convolve(pmf: &PMF, count: usize) -> PMF {
    PMF::convolve_many(&vec![pmf.clone(); count])
}

/// Compose a per-event distribution with an event-count distribution:
/// the result of `count_dist` independent repetitions of `per_event`.
pub(crate) fn multiply_dist(per_event: &PMF, count_dist: &PMF) -> PMF {
    let branches: Vec<PMF> = count_dist
        .values
        .iter()
        .enumerate()
        .filter(|(_, &p)| !PMF::is_null_prob(p))
        .map(|(count, &p)| repeat_convolve(per_event, count).scale(p))
        .collect();
    PMF::flatten(&branches)
}

/// Distributions produced by the hit phase, each per attack die.
#[derive(Debug, Clone)]
pub struct HitPhaseResults {
    pub successful_hit_dist: PMF,
    pub extra_hit_roll_dist: PMF,
    pub extra_automatic_hit_dist: PMF,
    pub extra_automatic_wound_dist: PMF,
    pub mortal_wound_dist: PMF,
    pub self_wound_dist: PMF,
}

impl HitPhaseResults {
    /// Scale every field from per-die to per-`count_dist` dice.
    pub fn multiply_by(&self, count_dist: &PMF) -> HitPhaseResults {
        HitPhaseResults {
            successful_hit_dist: multiply_dist(&self.successful_hit_dist, count_dist),
            extra_hit_roll_dist: multiply_dist(&self.extra_hit_roll_dist, count_dist),
            extra_automatic_hit_dist: multiply_dist(
                &self.extra_automatic_hit_dist,
                count_dist,
            ),
            extra_automatic_wound_dist: multiply_dist(
                &self.extra_automatic_wound_dist,
                count_dist,
            ),
            mortal_wound_dist: multiply_dist(&self.mortal_wound_dist, count_dist),
            self_wound_dist: multiply_dist(&self.self_wound_dist, count_dist),
        }
    }

    pub fn merge(&self, other: &HitPhaseResults) -> HitPhaseResults {
        HitPhaseResults {
            successful_hit_dist: PMF::convolve_many(&[
                self.successful_hit_dist.clone(),
                other.successful_hit_dist.clone(),
            ]),
            extra_hit_roll_dist: PMF::convolve_many(&[
                self.extra_hit_roll_dist.clone(),
                other.extra_hit_roll_dist.clone(),
            ]),
            extra_automatic_hit_dist: PMF::convolve_many(&[
                self.extra_automatic_hit_dist.clone(),
                other.extra_automatic_hit_dist.clone(),
            ]),
            extra_automatic_wound_dist: PMF::convolve_many(&[
                self.extra_automatic_wound_dist.clone(),
                other.extra_automatic_wound_dist.clone(),
            ]),
            mortal_wound_dist: PMF::convolve_many(&[
                self.mortal_wound_dist.clone(),
                other.mortal_wound_dist.clone(),
            ]),
            self_wound_dist: PMF::convolve_many(&[
                self.self_wound_dist.clone(),
                other.self_wound_dist.clone(),
            ]),
        }
    }

    /// One level of results from the extra hit rolls this phase
    /// earned. The recursion's own generator fields are zeroed so the
    /// chain stops after a single level.
    fn recursive_results(&self) -> HitPhaseResults {
        let mut results = self.multiply_by(&self.extra_hit_roll_dist);
        results.extra_hit_roll_dist = PMF::constant(0);
        results.extra_automatic_hit_dist = PMF::constant(0);
        results.extra_automatic_wound_dist = PMF::constant(0);
        results
    }

    pub fn with_recursive(&self) -> HitPhaseResults {
        self.merge(&self.recursive_results())
    }
}

/// Distributions produced by the wound phase, each per successful
/// hit.
#[derive(Debug, Clone)]
pub struct WoundPhaseResults {
    pub successful_wound_dist: PMF,
    pub extra_wound_roll_dist: PMF,
    pub extra_automatic_wound_dist: PMF,
    pub mortal_wound_dist: PMF,
    pub self_wound_dist: PMF,
}

impl WoundPhaseResults {
    pub fn multiply_by(&self, count_dist: &PMF) -> WoundPhaseResults {
        WoundPhaseResults {
            successful_wound_dist: multiply_dist(&self.successful_wound_dist, count_dist),
            extra_wound_roll_dist: multiply_dist(&self.extra_wound_roll_dist, count_dist),
            extra_automatic_wound_dist: multiply_dist(
                &self.extra_automatic_wound_dist,
                count_dist,
            ),
            mortal_wound_dist: multiply_dist(&self.mortal_wound_dist, count_dist),
            self_wound_dist: multiply_dist(&self.self_wound_dist, count_dist),
        }
    }

    pub fn merge(&self, other: &WoundPhaseResults) -> WoundPhaseResults {
        WoundPhaseResults {
            successful_wound_dist: PMF::convolve_many(&[
                self.successful_wound_dist.clone(),
                other.successful_wound_dist.clone(),
            ]),
            extra_wound_roll_dist: PMF::convolve_many(&[
                self.extra_wound_roll_dist.clone(),
                other.extra_wound_roll_dist.clone(),
            ]),
            extra_automatic_wound_dist: PMF::convolve_many(&[
                self.extra_automatic_wound_dist.clone(),
                other.extra_automatic_wound_dist.clone(),
            ]),
            mortal_wound_dist: PMF::convolve_many(&[
                self.mortal_wound_dist.clone(),
                other.mortal_wound_dist.clone(),
            ]),
            self_wound_dist: PMF::convolve_many(&[
                self.self_wound_dist.clone(),
                other.self_wound_dist.clone(),
            ]),
        }
    }

    fn recursive_results(&self) -> WoundPhaseResults {
        let mut results = self.multiply_by(&self.extra_wound_roll_dist);
        results.extra_wound_roll_dist = PMF::constant(0);
        results.extra_automatic_wound_dist = PMF::constant(0);
        results
    }

    pub fn with_recursive(&self) -> WoundPhaseResults {
        self.merge(&self.recursive_results())
    }
}

#[derive(Debug, Clone)]
pub struct SavePhaseResults {
    pub failed_armour_save_dist: PMF,
}

impl SavePhaseResults {
    pub fn multiply_by(&self, count_dist: &PMF) -> SavePhaseResults {
        SavePhaseResults {
            failed_armour_save_dist: multiply_dist(
                &self.failed_armour_save_dist,
                count_dist,
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DamagePhaseResults {
    pub damage_dist: PMF,
}

impl DamagePhaseResults {
    pub fn multiply_by(&self, count_dist: &PMF) -> DamagePhaseResults {
        DamagePhaseResults {
            damage_dist: multiply_dist(&self.damage_dist, count_dist),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttacksPhaseResults {
    pub attack_number_dist: PMF,
}

/// Wounds split by saviour protocols: the portion that still reaches
/// the save roll, and the wounds soaked by the escort after its
/// feel-no-pain.
#[derive(Debug, Clone)]
pub struct SaviourProtocolResults {
    pub failed_save_dist: PMF,
    pub drone_wound_dist: PMF,
}

/// Final distributions of a resolved attack sequence.
#[derive(Debug, Clone)]
pub struct AttackResults {
    pub damage_dist: PMF,
    pub mortal_wound_dist: PMF,
    pub self_wound_dist: PMF,
    pub total_damage_dist: PMF,
    pub kills_dist: PMF,
    pub drone_wound_dist: PMF,
}

impl AttackResults {
    pub fn merge(&self, other: &AttackResults) -> AttackResults {
        AttackResults {
            damage_dist: PMF::convolve_many(&[
                self.damage_dist.clone(),
                other.damage_dist.clone(),
            ]),
            mortal_wound_dist: PMF::convolve_many(&[
                self.mortal_wound_dist.clone(),
                other.mortal_wound_dist.clone(),
            ]),
            self_wound_dist: PMF::convolve_many(&[
                self.self_wound_dist.clone(),
                other.self_wound_dist.clone(),
            ]),
            total_damage_dist: PMF::convolve_many(&[
                self.total_damage_dist.clone(),
                other.total_damage_dist.clone(),
            ]),
            kills_dist: PMF::convolve_many(&[
                self.kills_dist.clone(),
                other.kills_dist.clone(),
            ]),
            drone_wound_dist: PMF::convolve_many(&[
                self.drone_wound_dist.clone(),
                other.drone_wound_dist.clone(),
            ]),
        }
    }

    /// Combine independent attack results into one total.
    pub fn combine(results: &[AttackResults]) -> Result<AttackResults, ResultsError> {
        let (first, rest) = results.split_first().ok_or(ResultsError::EmptyCombine)?;
        Ok(rest.iter().fold(first.clone(), |acc, r| acc.merge(r)))
    }
}

impl fmt::Display for AttackResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AttackResults(")?;
        for (label, dist) in [
            ("Mortal Wounds", &self.mortal_wound_dist),
            ("Self Wounds", &self.self_wound_dist),
            ("Drone Wounds", &self.drone_wound_dist),
            ("Total Damage", &self.total_damage_dist),
            ("Kills", &self.kills_dist),
        ] {
            writeln!(
                f,
                "  {label:20} - avg: {:.4}, std: {:.4}",
                dist.mean(),
                dist.std()
            )?;
        }
        write!(f, ")")
    }
}
