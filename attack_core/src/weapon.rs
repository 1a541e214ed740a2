//! Attacking weapon parameters

use crate::modifiers::ModifierCollection;
use crate::pmf::PMFCollection;

/// Immutable description of an attacking weapon. The engine never
/// mutates it; modifiers owned here apply to every attack the weapon
/// makes.
#[derive(Debug, Clone)]
pub struct Weapon {
    /// Ballistic skill: the unmodified roll needed to hit.
    pub bs: i64,
    pub shots: PMFCollection,
    pub strength: i64,
    pub ap: i64,
    pub damage: PMFCollection,
    pub modifiers: ModifierCollection,
    pub name: Option<String>,
    pub cost: Option<f64>,
}

impl Weapon {
    pub fn new(
        bs: i64,
        shots: PMFCollection,
        strength: i64,
        ap: i64,
        damage: PMFCollection,
    ) -> Self {
        Weapon {
            bs,
            shots,
            strength,
            ap,
            damage,
            modifiers: ModifierCollection::new(),
            name: None,
            cost: None,
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifierCollection) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }
}
