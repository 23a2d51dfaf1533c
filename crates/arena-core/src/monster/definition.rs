//! Serde-loadable combatant definitions
//!
//! Data tables hand the engine fully parsed definitions; building one
//! yields a prototype plus the special-ability names that were not
//! recognized.

use serde::{Deserialize, Serialize};

use super::{Alignment, Character, Monster};
use crate::attack::{Attack, EnergyType};
use crate::dice::Dice;
use crate::error::{ArenaError, Result};
use crate::special::{SpecialAbility, SpecialList};

/// Attack routine as written in a definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackDefinition {
    pub name: String,
    #[serde(default = "default_rate")]
    pub rate: u32,
    #[serde(default)]
    pub bonus: i32,
    pub damage: String,
    #[serde(default)]
    pub energy: Option<EnergyType>,
}

fn default_rate() -> u32 {
    1
}

fn default_move() -> i32 {
    9
}

/// A combatant stat block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterDefinition {
    pub race: String,
    pub ac: i32,
    #[serde(default = "default_move")]
    pub mv: i32,
    pub hit_dice: String,
    pub attack: AttackDefinition,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub specials: Vec<String>,
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub minion: Option<Box<MonsterDefinition>>,
    /// Fixed hit points instead of a roll
    #[serde(default)]
    pub hit_points: Option<i32>,
}

impl MonsterDefinition {
    /// Build the prototype. Unknown special names do not fail the build;
    /// they are returned for diagnostics, including those of the minion.
    pub fn build(&self) -> Result<(Monster, Vec<String>)> {
        let hit_dice: Dice = self.hit_dice.parse()?;
        if hit_dice.number > 0 && hit_dice.sides == 0 {
            return Err(ArenaError::Definition(format!(
                "{}: hit dice '{}' have no sides",
                self.race, self.hit_dice
            )));
        }
        let damage: Dice = self.attack.damage.parse()?;
        let mut attack = Attack::new(
            self.attack.name.clone(),
            self.attack.rate,
            self.attack.bonus,
            damage,
        );
        attack.energy = self.attack.energy;

        let (specials, mut unknown) =
            SpecialAbility::parse_all(self.specials.iter().map(String::as_str));

        let mut monster = Monster::new(self.race.clone(), self.ac, self.mv, hit_dice, attack)
            .with_alignment(self.alignment);
        monster.specials = specials.into_iter().collect::<SpecialList>();
        if let Some(character) = &self.character {
            if !character.spells_memorized.is_empty() && !character.class.casts_spells() {
                return Err(ArenaError::Definition(format!(
                    "{}: a {} cannot memorize spells",
                    self.race, character.class
                )));
            }
            let mut character = character.clone();
            character.rest();
            monster = monster.with_character(character);
        }
        if let Some(hp) = self.hit_points {
            monster = monster.with_hit_points(hp);
        }
        if let Some(minion) = &self.minion {
            let (minion, minion_unknown) = minion.build()?;
            unknown.extend(minion_unknown);
            monster = monster.with_minion(minion);
        }
        Ok((monster, unknown))
    }
}
