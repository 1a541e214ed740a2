//! attack_core - Exact probability engine for tabletop attack sequences
//!
//! This library provides:
//! - PMF / PMFCollection: discrete distribution algebra over dice
//! - Modifier / ModifierCollection: composable special-rule system
//! - Attack / MultiAttack: full attack-sequence resolution
//! - Kill counting: exact slain-model distributions
//!
//! Everything is computed analytically; no sampling is involved.

pub mod attack;
pub mod config;
pub mod modifiers;
pub mod pmf;
pub mod prelude;
pub mod target;
pub mod weapon;

// Re-export core types for convenience
pub use attack::{Attack, AttackResults, MultiAttack, ResultsError};
pub use config::{load_profiles, parse_profiles, ConfigError};
pub use modifiers::{Modifier, ModifierCollection, ModifierRef};
pub use pmf::{PMFCollection, PMF};
pub use target::Target;
pub use weapon::Weapon;
