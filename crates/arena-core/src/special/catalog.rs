//! The closed catalog of special abilities and their fixed classification.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::attack::EnergyType;
use crate::saves::SaveCategory;

bitflags! {
    /// Category predicates the engine queries instead of naming abilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpecialCategory: u8 {
        /// As a condition, takes the afflicted combatant out of the fight
        const DISABLING = 0x01;
        const BREATH_WEAPON = 0x02;
        const GAZE_WEAPON = 0x04;
        const SUMMONS = 0x08;
        const MENTAL_ATTACK = 0x10;
        /// Undead automatically resist it
        const UNDEAD_IMMUNE = 0x20;
    }
}

/// Special ability type
///
/// Doubles as the condition vocabulary: a condition is a special ability
/// instance currently afflicting a combatant.
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
#[strum(ascii_case_insensitive)]
pub enum SpecialType {
    // Afflictions
    Poison,
    Paralysis,
    Petrification,
    PetrifyingGaze,
    Charm,
    Confusion,
    Fear,
    Sleep,
    Hold,
    Death,
    Swallowing,
    SappingStrands,
    Slowing,
    Stench,
    Rotting,

    // On-hit drains and riders
    EnergyDrain,
    StrengthDrain,
    Immolation,

    // Attachment
    Constriction,
    Grabbing,
    BloodDrain,

    // Breath weapons
    FireBreath,
    ColdBreath,
    AcidBreath,
    VoltBreath,
    PoisonBreath,

    EyeTyranny,
    Summoning,
    Regeneration,

    // To-hit vetoes
    SilverToHit,
    MagicToHit,
    WeaponImmunity,
    Phasing,
    SilverEquivalent,

    // Hit modifiers
    Displacement,
    Invisibility,
    DetectInvisible,
    Blink,
    Berserking,
    Giant,
    GiantDodger,

    // Damage rules
    DamageReduction,
    Corrosion,

    // Resistances
    Undead,
    MagicImmunity,
    MagicResistance,
    FireImmunity,
    ColdImmunity,
    AcidImmunity,
    VoltImmunity,
    PoisonImmunity,
}

impl SpecialType {
    /// Fixed category classification
    pub const fn categories(&self) -> SpecialCategory {
        use SpecialCategory as C;
        match self {
            SpecialType::Poison | SpecialType::Paralysis | SpecialType::Death => {
                C::DISABLING.union(C::UNDEAD_IMMUNE)
            }
            SpecialType::Petrification | SpecialType::Swallowing => C::DISABLING,
            SpecialType::PetrifyingGaze => C::GAZE_WEAPON,
            SpecialType::Charm | SpecialType::Confusion => C::DISABLING
                .union(C::MENTAL_ATTACK)
                .union(C::GAZE_WEAPON)
                .union(C::UNDEAD_IMMUNE),
            SpecialType::Fear | SpecialType::Sleep | SpecialType::Hold => C::DISABLING
                .union(C::MENTAL_ATTACK)
                .union(C::UNDEAD_IMMUNE),
            SpecialType::Stench
            | SpecialType::Rotting
            | SpecialType::EnergyDrain
            | SpecialType::StrengthDrain => C::UNDEAD_IMMUNE,
            SpecialType::FireBreath
            | SpecialType::ColdBreath
            | SpecialType::AcidBreath
            | SpecialType::VoltBreath
            | SpecialType::PoisonBreath => C::BREATH_WEAPON,
            SpecialType::Summoning => C::SUMMONS,
            _ => C::empty(),
        }
    }

    pub const fn is_disabling(&self) -> bool {
        self.categories().contains(SpecialCategory::DISABLING)
    }

    pub const fn is_breath_weapon(&self) -> bool {
        self.categories().contains(SpecialCategory::BREATH_WEAPON)
    }

    pub const fn is_gaze_weapon(&self) -> bool {
        self.categories().contains(SpecialCategory::GAZE_WEAPON)
    }

    pub const fn is_summons(&self) -> bool {
        self.categories().contains(SpecialCategory::SUMMONS)
    }

    pub const fn is_mental_attack(&self) -> bool {
        self.categories().contains(SpecialCategory::MENTAL_ATTACK)
    }

    pub const fn is_undead_immune(&self) -> bool {
        self.categories().contains(SpecialCategory::UNDEAD_IMMUNE)
    }

    /// Save category for types that can be inflicted as conditions.
    ///
    /// Types that are never resisted by a save have no category; asking a
    /// victim to save against one of those is a configuration defect.
    pub const fn save_category(&self) -> Option<SaveCategory> {
        match self {
            SpecialType::Poison
            | SpecialType::Death
            | SpecialType::Stench
            | SpecialType::Rotting => Some(SaveCategory::Death),
            SpecialType::Paralysis
            | SpecialType::Petrification
            | SpecialType::PetrifyingGaze
            | SpecialType::SappingStrands => Some(SaveCategory::Stone),
            SpecialType::Charm
            | SpecialType::Confusion
            | SpecialType::Fear
            | SpecialType::Sleep
            | SpecialType::Hold
            | SpecialType::Slowing => Some(SaveCategory::Spells),
            SpecialType::Swallowing
            | SpecialType::FireBreath
            | SpecialType::ColdBreath
            | SpecialType::AcidBreath
            | SpecialType::VoltBreath
            | SpecialType::PoisonBreath => Some(SaveCategory::Breath),
            _ => None,
        }
    }

    /// Energy carried by a breath weapon
    pub const fn breath_energy(&self) -> Option<EnergyType> {
        match self {
            SpecialType::FireBreath => Some(EnergyType::Fire),
            SpecialType::ColdBreath => Some(EnergyType::Cold),
            SpecialType::AcidBreath => Some(EnergyType::Acid),
            SpecialType::VoltBreath => Some(EnergyType::Volt),
            SpecialType::PoisonBreath => Some(EnergyType::Poison),
            _ => None,
        }
    }

    /// Default cone/line length of a breath weapon, in inches
    pub const fn breath_length(&self) -> u32 {
        match self {
            SpecialType::FireBreath => 9,
            SpecialType::ColdBreath => 8,
            SpecialType::AcidBreath => 6,
            SpecialType::VoltBreath => 10,
            SpecialType::PoisonBreath => 5,
            _ => 0,
        }
    }

    /// The condition this ability inflicts on a victim, if any
    pub const fn inflicts(&self) -> Option<SpecialType> {
        match self {
            SpecialType::PetrifyingGaze => Some(SpecialType::Petrification),
            SpecialType::Poison
            | SpecialType::Paralysis
            | SpecialType::Petrification
            | SpecialType::Charm
            | SpecialType::Confusion
            | SpecialType::Fear
            | SpecialType::Sleep
            | SpecialType::Hold
            | SpecialType::Death
            | SpecialType::Swallowing
            | SpecialType::SappingStrands
            | SpecialType::Slowing
            | SpecialType::Stench
            | SpecialType::Rotting => Some(*self),
            _ => None,
        }
    }

    /// Parameter used when a definition names the ability without one
    pub const fn default_param(&self) -> i32 {
        match self {
            SpecialType::Regeneration => 3,
            SpecialType::EyeTyranny => 4,
            SpecialType::MagicToHit => 1,
            SpecialType::EnergyDrain | SpecialType::StrengthDrain => 1,
            SpecialType::Immolation => 1,
            SpecialType::Summoning => 1,
            SpecialType::DamageReduction => 1,
            SpecialType::MagicResistance => 50,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_inflicted_condition_has_a_save() {
        for kind in SpecialType::iter() {
            if let Some(condition) = kind.inflicts() {
                assert!(
                    condition.save_category().is_some(),
                    "{condition} has no save category"
                );
            }
        }
    }

    #[test]
    fn test_breath_weapons_carry_energy() {
        for kind in SpecialType::iter().filter(|k| k.is_breath_weapon()) {
            assert!(kind.breath_energy().is_some());
            assert!(kind.breath_length() > 0);
        }
        assert!(SpecialType::Poison.breath_energy().is_none());
    }

    #[test]
    fn test_category_predicates() {
        assert!(SpecialType::Paralysis.is_disabling());
        assert!(SpecialType::Paralysis.is_undead_immune());
        assert!(!SpecialType::Slowing.is_disabling());
        assert!(SpecialType::Charm.is_mental_attack());
        assert!(SpecialType::PetrifyingGaze.is_gaze_weapon());
        assert!(!SpecialType::PetrifyingGaze.is_disabling());
        assert!(SpecialType::Summoning.is_summons());
        assert!(SpecialType::Undead.categories().is_empty());
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("firebreath".parse::<SpecialType>(), Ok(SpecialType::FireBreath));
        assert_eq!("POISON".parse::<SpecialType>(), Ok(SpecialType::Poison));
        assert!("Wibble".parse::<SpecialType>().is_err());
    }
}
