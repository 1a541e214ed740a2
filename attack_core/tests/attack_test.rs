//! Integration test: full attack sequences from weapon and target
//! profiles through to damage and kill distributions.

use std::sync::Arc;

use attack_core::prelude::*;

const TOLERANCE: f64 = 1e-9;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < TOLERANCE, "expected {b}, got {a}");
}

fn total_mass(pmf: &PMF) -> f64 {
    pmf.values.iter().sum()
}

fn basic_weapon() -> Weapon {
    Weapon::new(
        4,
        PMFCollection::constant(1, 10),
        4,
        0,
        PMFCollection::constant(1, 1),
    )
}

fn tough_target() -> Target {
    Target::new(4, 4, 7, 7, 7)
}

#[test]
fn test_expected_damage_is_exact() {
    let results = Attack::new(basic_weapon(), tough_target()).run();
    // 10 shots * 0.5 hit * 0.5 wound * 0.5 failed save.
    assert_close(results.damage_dist.mean(), 1.25);
    assert_close(total_mass(&results.damage_dist), 1.0);
}

#[test]
fn test_re_roll_ones_scales_by_seven_sixths() {
    let baseline = Attack::new(basic_weapon(), tough_target()).run();
    let weapon = basic_weapon().with_modifiers(
        ModifierCollection::new().with_hit_mods(vec![Arc::new(ReRollOnes) as ModifierRef]),
    );
    let improved = Attack::new(weapon, tough_target()).run();
    assert_close(
        improved.damage_dist.mean(),
        baseline.damage_dist.mean() * 7.0 / 6.0,
    );
}

#[test]
fn test_ap_on_six_split() {
    // On a modifiable wound roll of 6 the hit gains AP 3, turning the
    // 4+ save into no save. Per wound the failed-save chance becomes
    // 5/6 * 1/2 + 1/6 * 1 = 7/12.
    let weapon = Weapon::new(
        4,
        PMFCollection::constant(1, 2),
        4,
        0,
        PMFCollection::constant(1, 1),
    )
    .with_modifiers(ModifierCollection::new().with_wound_mods(vec![
        Arc::new(OnAModifiableRollOfNAddAP::new(6, 3)) as ModifierRef,
    ]));
    let results = Attack::new(weapon, tough_target()).run();
    assert_close(results.damage_dist.mean(), 2.0 * 0.5 * 0.5 * 7.0 / 12.0);
}

#[test]
fn test_kills_match_damage_on_one_wound_target() {
    // Against a single-wound target with flat damage 1, every point
    // of damage is exactly one kill.
    let target = Target::new(4, 4, 7, 7, 1);
    let results = Attack::new(basic_weapon(), target).run();
    assert_close(results.kills_dist.mean(), results.damage_dist.mean());
    assert_close(total_mass(&results.kills_dist), 1.0);
}

#[test]
fn test_variable_shots_and_damage() {
    let battle_cannon = Weapon::new(
        4,
        PMFCollection::mdn(2, 6),
        8,
        2,
        PMFCollection::mdn(1, 3),
    )
    .with_name("Battle Cannon");
    let marine = Target::new(4, 3, 7, 7, 2).with_name("Space Marine");
    let results = Attack::new(battle_cannon, marine).run();
    // S8 vs T4 wounds on 2+, save 3 + AP 2 fails on 1-4, and the d3
    // damage is capped at the target's 2 wounds (mean 5/3).
    let expected = 7.0 * 0.5 * (5.0 / 6.0) * (4.0 / 6.0) * (5.0 / 3.0);
    assert_close(results.total_damage_dist.mean(), expected);
    assert_close(total_mass(&results.kills_dist), 1.0);
}

#[test]
fn test_multi_attack_is_sum_of_attacks() {
    let target = tough_target();
    let single = Attack::new(basic_weapon(), target.clone()).run();
    let combined = MultiAttack::new(vec![basic_weapon(), basic_weapon()], target)
        .run()
        .expect("two weapons to combine");
    assert_close(
        combined.total_damage_dist.mean(),
        2.0 * single.total_damage_dist.mean(),
    );
}

#[test]
fn test_feel_no_pain_scales_damage() {
    let with_fnp = Target::new(4, 4, 7, 5, 7);
    let baseline = Attack::new(basic_weapon(), tough_target()).run();
    let shrugged = Attack::new(basic_weapon(), with_fnp).run();
    // A 5+++ feel-no-pain keeps two thirds of incoming damage.
    assert_close(
        shrugged.damage_dist.mean(),
        baseline.damage_dist.mean() * 2.0 / 3.0,
    );
}

#[test]
fn test_results_display_summary() {
    let summary = Attack::new(basic_weapon(), tough_target()).run().to_string();
    assert!(summary.contains("Total Damage"));
    assert!(summary.contains("Kills"));
}
