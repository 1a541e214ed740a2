//! Weapon and target profile configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ConfigError;
use crate::pmf::PMFCollection;
use crate::target::Target;
use crate::weapon::Weapon;

/// A dice quantity in a profile: either a fixed number or a dice
/// roll, e.g. `{ fixed = 3 }` or `{ dice = 2, sides = 6 }`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiceSpec {
    Fixed { fixed: usize },
    Dice { dice: usize, sides: usize },
}

impl DiceSpec {
    pub fn to_collection(self) -> PMFCollection {
        match self {
            DiceSpec::Fixed { fixed } => PMFCollection::constant(1, fixed),
            DiceSpec::Dice { dice, sides } => PMFCollection::mdn(dice, sides),
        }
    }
}

/// Weapon stats as written on a datasheet. Modifiers are
/// code-constructed and attached after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub name: String,
    pub bs: i64,
    pub shots: DiceSpec,
    pub strength: i64,
    pub ap: i64,
    pub damage: DiceSpec,
    pub cost: Option<f64>,
}

impl WeaponProfile {
    pub fn into_weapon(self) -> Weapon {
        let mut weapon = Weapon::new(
            self.bs,
            self.shots.to_collection(),
            self.strength,
            self.ap,
            self.damage.to_collection(),
        )
        .with_name(self.name);
        weapon.cost = self.cost;
        weapon
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetProfile {
    pub name: String,
    pub toughness: i64,
    pub save: i64,
    #[serde(default = "no_save")]
    pub invuln: i64,
    #[serde(default = "no_save")]
    pub fnp: i64,
    pub wounds: usize,
}

fn no_save() -> i64 {
    7
}

impl TargetProfile {
    pub fn into_target(self) -> Target {
        Target::new(self.toughness, self.save, self.invuln, self.fnp, self.wounds)
            .with_name(self.name)
    }
}

/// Container for weapon and target profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default)]
    pub weapons: Vec<WeaponProfile>,
    #[serde(default)]
    pub targets: Vec<TargetProfile>,
}

/// Load profiles from a TOML file
pub fn load_profiles(path: &Path) -> Result<ProfilesConfig, ConfigError> {
    let config: ProfilesConfig = super::load_toml(path)?;
    validate(&config)?;
    Ok(config)
}

/// Load profiles from a TOML string
pub fn parse_profiles(content: &str) -> Result<ProfilesConfig, ConfigError> {
    let config: ProfilesConfig = super::parse_toml(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ProfilesConfig) -> Result<(), ConfigError> {
    for target in &config.targets {
        if target.wounds == 0 {
            return Err(ConfigError::ValidationError(format!(
                "target '{}' must have at least one wound",
                target.name
            )));
        }
    }
    Ok(())
}
