//! Attack routines, weapons and energy types.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::dice::Dice;
use crate::special::SpecialType;

/// Kind of energy carried by an attack, breath or spell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum EnergyType {
    Fire,
    Cold,
    Acid,
    Volt,
    Poison,
}

impl EnergyType {
    /// The special ability granting immunity to this energy
    pub const fn immunity(&self) -> SpecialType {
        match self {
            EnergyType::Fire => SpecialType::FireImmunity,
            EnergyType::Cold => SpecialType::ColdImmunity,
            EnergyType::Acid => SpecialType::AcidImmunity,
            EnergyType::Volt => SpecialType::VoltImmunity,
            EnergyType::Poison => SpecialType::PoisonImmunity,
        }
    }
}

/// An attack routine: `rate` attacks per round at `bonus` to hit
///
/// Ephemeral: rebuilt whenever equipment or specials change the routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    pub rate: u32,
    pub bonus: i32,
    pub damage: Dice,
    #[serde(default)]
    pub energy: Option<EnergyType>,
    /// Enchantment of the weapon, for magic-to-hit checks
    #[serde(default)]
    pub magic_bonus: i32,
    #[serde(default)]
    pub silver: bool,
}

impl Attack {
    pub fn new(name: impl Into<String>, rate: u32, bonus: i32, damage: Dice) -> Self {
        Self {
            name: name.into(),
            rate,
            bonus,
            damage,
            energy: None,
            magic_bonus: 0,
            silver: false,
        }
    }

    pub fn with_energy(mut self, energy: EnergyType) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn with_magic(mut self, magic_bonus: i32) -> Self {
        self.magic_bonus = magic_bonus;
        self
    }

    pub fn with_silver(mut self) -> Self {
        self.silver = true;
        self
    }

    /// A one-off attack conjured for a special (grab, drain, eye ray)
    pub fn conjured(name: impl Into<String>, bonus: i32, damage: Dice) -> Self {
        Self::new(name, 1, bonus, damage)
    }
}

impl fmt::Display for Attack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rate != 1 {
            write!(f, "{} ", self.rate)?;
        }
        write!(f, "{} {:+} ({})", self.name, self.bonus, self.damage)?;
        if let Some(energy) = self.energy {
            write!(f, " {energy}")?;
        }
        Ok(())
    }
}

/// A weapon a character may draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: Dice,
    #[serde(default)]
    pub magic_bonus: i32,
    #[serde(default)]
    pub silver: bool,
}

impl Weapon {
    pub fn new(name: impl Into<String>, damage: Dice) -> Self {
        Self {
            name: name.into(),
            damage,
            magic_bonus: 0,
            silver: false,
        }
    }

    pub fn with_magic(mut self, magic_bonus: i32) -> Self {
        self.magic_bonus = magic_bonus;
        self
    }

    pub fn with_silver(mut self) -> Self {
        self.silver = true;
        self
    }

    /// Build the attack routine for this weapon at the given base to-hit
    pub fn to_attack(&self, rate: u32, base_bonus: i32) -> Attack {
        let mut damage = self.damage;
        damage.addition += self.magic_bonus;
        Attack {
            name: self.name.clone(),
            rate,
            bonus: base_bonus + self.magic_bonus,
            damage,
            energy: None,
            magic_bonus: self.magic_bonus,
            silver: self.silver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_to_attack_folds_magic() {
        let sword = Weapon::new("Sword", Dice::new(1, 8)).with_magic(2);
        let attack = sword.to_attack(1, 3);
        assert_eq!(attack.bonus, 5);
        assert_eq!(attack.damage, Dice::new(1, 8).with_addition(2));
        assert_eq!(attack.magic_bonus, 2);
        assert!(!attack.silver);
    }

    #[test]
    fn test_attack_display() {
        let claw = Attack::new("Claw", 2, 3, Dice::new(1, 6));
        assert_eq!(claw.to_string(), "2 Claw +3 (1d6)");
        let bite = Attack::new("Bite", 1, 0, Dice::new(2, 4)).with_energy(EnergyType::Fire);
        assert_eq!(bite.to_string(), "Bite +0 (2d4) Fire");
    }

    #[test]
    fn test_energy_immunity_mapping() {
        assert_eq!(EnergyType::Volt.immunity(), SpecialType::VoltImmunity);
        assert_eq!("acid".parse::<EnergyType>(), Ok(EnergyType::Acid));
    }
}
