//! Character profiles: class, level, ability scores, equipment and spells.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::attack::Weapon;
use crate::magic::SpellId;

/// Character class, also the "effective class" for saving throws
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ClassKind {
    #[default]
    Fighter,
    Cleric,
    Thief,
    Wizard,
}

impl ClassKind {
    /// Base to-hit bonus at a level
    pub const fn hit_bonus(&self, level: u32) -> i32 {
        let level = level as i32;
        match self {
            ClassKind::Fighter => level,
            ClassKind::Cleric | ClassKind::Thief => level * 2 / 3,
            ClassKind::Wizard => level / 3,
        }
    }

    /// Whether the class may sweep through low-level opponents
    pub const fn sweeps(&self) -> bool {
        matches!(self, ClassKind::Fighter)
    }

    /// Whether the class can memorize spells at all
    pub const fn casts_spells(&self) -> bool {
        matches!(self, ClassKind::Wizard | ClassKind::Cleric)
    }
}

/// The six ability scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub charisma: u8,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            intelligence: 10,
            wisdom: 10,
            dexterity: 10,
            constitution: 10,
            charisma: 10,
        }
    }
}

impl AbilityScores {
    /// Strength or constitution drained to nothing
    pub const fn critical_lost(&self) -> bool {
        self.strength == 0 || self.constitution == 0
    }

    pub const fn strength_bonus(&self) -> i32 {
        match self.strength {
            0..=5 => -1,
            6..=15 => 0,
            16..=17 => 1,
            _ => 2,
        }
    }
}

/// Class-and-level data carried by player-character combatants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub class: ClassKind,
    pub level: u32,
    #[serde(default)]
    pub abilities: AbilityScores,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub spells_memorized: Vec<SpellId>,
    #[serde(skip)]
    pub spells_remaining: Vec<SpellId>,
}

impl Character {
    pub fn new(class: ClassKind, level: u32) -> Self {
        Self {
            class,
            level,
            abilities: AbilityScores::default(),
            weapons: Vec::new(),
            spells_memorized: Vec::new(),
            spells_remaining: Vec::new(),
        }
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    pub fn with_spells(mut self, spells: impl IntoIterator<Item = SpellId>) -> Self {
        self.spells_memorized.extend(spells);
        self.spells_remaining = self.spells_memorized.clone();
        self
    }

    /// To-hit bonus before any weapon enchantment
    pub fn base_hit_bonus(&self) -> i32 {
        self.class.hit_bonus(self.level) + self.abilities.strength_bonus()
    }

    /// Restore the memorized spell list
    pub fn rest(&mut self) {
        self.spells_remaining = self.spells_memorized.clone();
    }

    /// Remove one memorized copy of a spell; false when none is left
    pub fn expend_spell(&mut self, spell: SpellId) -> bool {
        match self.spells_remaining.iter().position(|s| *s == spell) {
            Some(pos) => {
                self.spells_remaining.remove(pos);
                true
            }
            None => false,
        }
    }
}
