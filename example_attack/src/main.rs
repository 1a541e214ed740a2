//! Example: two weapons firing at a space marine.
//!
//! Shows single-weapon attacks, a combined multi-weapon attack, and
//! the kill distribution.

use std::sync::Arc;

use attack_core::prelude::*;

fn shuriken_catapult() -> Weapon {
    Weapon::new(
        4,
        PMFCollection::constant(1, 2),
        4,
        0,
        PMFCollection::constant(1, 1),
    )
    .with_modifiers(ModifierCollection::new().with_wound_mods(vec![
        Arc::new(OnAModifiableRollOfNAddAP::new(6, 3)) as ModifierRef,
    ]))
    .with_name("Shuriken Catapult")
}

fn battle_cannon() -> Weapon {
    Weapon::new(
        4,
        PMFCollection::mdn(2, 6),
        8,
        2,
        PMFCollection::mdn(1, 3),
    )
    .with_name("Battle Cannon")
}

fn space_marine() -> Target {
    Target::new(4, 3, 7, 7, 2).with_name("Space Marine")
}

fn main() {
    tracing_subscriber::fmt::init();

    let marine = space_marine();

    for weapon in [shuriken_catapult(), battle_cannon()] {
        let name = weapon.name.clone().unwrap_or_default();
        let results = Attack::new(weapon, marine.clone()).run();
        println!("{name} vs Space Marine:");
        println!("{results}");
        println!();
    }

    match MultiAttack::new(vec![shuriken_catapult(), battle_cannon()], marine).run() {
        Ok(combined) => {
            println!("Combined:");
            println!("{combined}");
            println!();
            println!("Kill distribution: {:?}", combined.kills_dist.values);
            println!(
                "Cumulative: {:?}",
                combined.kills_dist.cumulative().values
            );
        }
        Err(err) => eprintln!("failed to combine attacks: {err}"),
    }
}
