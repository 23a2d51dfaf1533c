//! Spell casting
//!
//! A closed table maps each known spell to a casting strategy: how its
//! victims are chosen and what it does to them.

mod cast;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::attack::EnergyType;
use crate::dice::Dice;
use crate::error::ArenaError;
use crate::special::SpecialType;

pub use cast::{cast, cast_in_melee, cast_pre_melee, choose_spell, is_threat_to};

/// Known spells
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(try_from = "String")]
#[strum(ascii_case_insensitive)]
pub enum SpellId {
    MagicMissile,
    Sleep,
    CharmPerson,
    HoldPerson,
    Fireball,
    LightningBolt,
    Slow,
    Confusion,
    IceStorm,
    ConeOfCold,
    MonsterSummoning,
}

impl TryFrom<String> for SpellId {
    type Error = ArenaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|_| ArenaError::UnknownSpell(value))
    }
}

/// How a spell picks its victims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Targeting {
    /// Up to this many victims
    Fixed(usize),
    /// Victims from the area formula over this length
    Area { length: u32 },
    /// Brings help instead of harming anyone
    Indirect,
}

impl Targeting {
    /// Preference when choosing what to cast: area, then fixed, then indirect
    const fn rank(&self) -> u8 {
        match self {
            Targeting::Area { .. } => 0,
            Targeting::Fixed(_) => 1,
            Targeting::Indirect => 2,
        }
    }
}

/// Damage of an energy spell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellDamage {
    /// One die of this many sides per caster level
    PerLevel(u32),
    Fixed(Dice),
}

/// What a spell does to each victim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellEffect {
    /// Darts of 1d4+1, one more for every two caster levels past the first
    Missiles,
    Afflict {
        condition: SpecialType,
        /// Saving throw penalty; `None` allows no save
        save_penalty: Option<i32>,
        /// Victims above this level are unaffected
        max_level: Option<u32>,
    },
    Energy {
        energy: EnergyType,
        damage: SpellDamage,
        save_half: bool,
    },
    Summon(Dice),
}

/// Casting strategy of one spell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpellSpec {
    pub level: u32,
    pub targeting: Targeting,
    /// Quick enough to cast once melee has started
    pub in_melee: bool,
    pub effect: SpellEffect,
}

impl SpellId {
    pub const fn spec(&self) -> SpellSpec {
        use SpellEffect::*;
        match self {
            SpellId::MagicMissile => SpellSpec {
                level: 1,
                targeting: Targeting::Fixed(1),
                in_melee: true,
                effect: Missiles,
            },
            SpellId::Sleep => SpellSpec {
                level: 1,
                targeting: Targeting::Area { length: 4 },
                in_melee: true,
                effect: Afflict {
                    condition: SpecialType::Sleep,
                    save_penalty: None,
                    max_level: Some(4),
                },
            },
            SpellId::CharmPerson => SpellSpec {
                level: 1,
                targeting: Targeting::Fixed(1),
                in_melee: true,
                effect: Afflict {
                    condition: SpecialType::Charm,
                    save_penalty: Some(0),
                    max_level: None,
                },
            },
            SpellId::HoldPerson => SpellSpec {
                level: 3,
                targeting: Targeting::Fixed(4),
                in_melee: true,
                effect: Afflict {
                    condition: SpecialType::Hold,
                    save_penalty: Some(2),
                    max_level: None,
                },
            },
            SpellId::Fireball => SpellSpec {
                level: 3,
                targeting: Targeting::Area { length: 6 },
                in_melee: false,
                effect: Energy {
                    energy: EnergyType::Fire,
                    damage: SpellDamage::PerLevel(6),
                    save_half: true,
                },
            },
            SpellId::LightningBolt => SpellSpec {
                level: 3,
                targeting: Targeting::Area { length: 6 },
                in_melee: false,
                effect: Energy {
                    energy: EnergyType::Volt,
                    damage: SpellDamage::PerLevel(6),
                    save_half: true,
                },
            },
            SpellId::Slow => SpellSpec {
                level: 3,
                targeting: Targeting::Area { length: 4 },
                in_melee: false,
                effect: Afflict {
                    condition: SpecialType::Slowing,
                    save_penalty: Some(0),
                    max_level: None,
                },
            },
            SpellId::Confusion => SpellSpec {
                level: 4,
                targeting: Targeting::Area { length: 4 },
                in_melee: false,
                effect: Afflict {
                    condition: SpecialType::Confusion,
                    save_penalty: Some(0),
                    max_level: None,
                },
            },
            SpellId::IceStorm => SpellSpec {
                level: 4,
                targeting: Targeting::Area { length: 3 },
                in_melee: false,
                effect: Energy {
                    energy: EnergyType::Cold,
                    damage: SpellDamage::Fixed(Dice::new(3, 10)),
                    save_half: false,
                },
            },
            SpellId::ConeOfCold => SpellSpec {
                level: 5,
                targeting: Targeting::Area { length: 6 },
                in_melee: false,
                effect: Energy {
                    energy: EnergyType::Cold,
                    damage: SpellDamage::PerLevel(6),
                    save_half: true,
                },
            },
            SpellId::MonsterSummoning => SpellSpec {
                level: 3,
                targeting: Targeting::Indirect,
                in_melee: false,
                effect: Summon(Dice::new(1, 3)),
            },
        }
    }

    pub const fn is_indirect(&self) -> bool {
        matches!(self.spec().targeting, Targeting::Indirect)
    }
}
