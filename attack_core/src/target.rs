//! Defending target parameters

use crate::modifiers::ModifierCollection;

/// Immutable description of the unit being attacked.
#[derive(Debug, Clone)]
pub struct Target {
    pub toughness: i64,
    /// Armour save threshold; 7 means no save.
    pub save: i64,
    /// Invulnerable save threshold, unaffected by AP; 7 means none.
    pub invuln: i64,
    /// Feel-no-pain threshold rolled per point of damage; 7 means
    /// none.
    pub fnp: i64,
    /// Wounds per model, used for damage spill and kill counting.
    pub wounds: usize,
    pub modifiers: ModifierCollection,
    pub name: Option<String>,
}

impl Target {
    pub fn new(toughness: i64, save: i64, invuln: i64, fnp: i64, wounds: usize) -> Self {
        Target {
            toughness,
            save,
            invuln,
            fnp,
            wounds,
            modifiers: ModifierCollection::new(),
            name: None,
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
}
