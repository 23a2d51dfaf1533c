//! Combatant instances

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{Character, ClassKind};
use crate::attack::{Attack, EnergyType};
use crate::combat::can_wound;
use crate::dice::Dice;
use crate::rng::GameRng;
use crate::special::{SpecialAbility, SpecialList, SpecialType};

/// Identifier of a combatant within its party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

impl MonsterId {
    pub const NONE: MonsterId = MonsterId(0);

    pub fn next(self) -> Self {
        MonsterId(self.0 + 1)
    }
}

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Alignment
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
pub enum Alignment {
    Lawful,
    #[default]
    Neutral,
    Chaotic,
}

/// A combatant: a monster, or a character when `character` is set
///
/// Hit points are kept inside `[0, max_hit_points]` by every mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub race: String,
    /// Descending armor class: lower is harder to hit
    pub ac: i32,
    pub mv: i32,
    pub hit_dice: Dice,
    hp: i32,
    max_hp: i32,
    pub attack: Attack,
    pub alignment: Alignment,
    /// Static abilities from the definition
    pub specials: SpecialList,
    /// Afflictions accumulated during a fight
    pub conditions: SpecialList,
    /// Creature this one is attached to (grabbing, constriction, blood drain)
    pub host: Option<MonsterId>,
    /// Opponents taken out of the fight; persists across fights
    pub kills: u32,
    pub times_meleed: u32,
    pub breath_charges: u32,
    pub character: Option<Character>,
    /// Template for creatures this one summons
    pub minion: Option<Box<Monster>>,
}

impl Monster {
    pub fn new(race: impl Into<String>, ac: i32, mv: i32, hit_dice: Dice, attack: Attack) -> Self {
        let max_hp = (hit_dice.average().round() as i32).max(1);
        Self {
            id: MonsterId::NONE,
            race: race.into(),
            ac,
            mv,
            hit_dice,
            hp: max_hp,
            max_hp,
            attack,
            alignment: Alignment::default(),
            specials: SpecialList::new(),
            conditions: SpecialList::new(),
            host: None,
            kills: 0,
            times_meleed: 0,
            breath_charges: 0,
            character: None,
            minion: None,
        }
    }

    /// A plain combatant with one 1d6 attack and `hd` hit dice
    pub fn basic(race: impl Into<String>, ac: i32, hd: u32) -> Self {
        Self::new(
            race,
            ac,
            9,
            Dice::hit_dice(hd, 0),
            Attack::new("Claw", 1, 0, Dice::new(1, 6)),
        )
    }

    /// Creature produced by a summons when no template is defined
    pub fn summoned_minion(hd: u32) -> Self {
        Self::new(
            "Summoned Minion",
            7,
            12,
            Dice::hit_dice(hd.max(1), 0),
            Attack::new("Bite", 1, 0, Dice::new(1, 6)),
        )
    }

    pub fn with_special(mut self, ability: SpecialAbility) -> Self {
        self.specials.add(ability);
        self
    }

    pub fn with_character(mut self, character: Character) -> Self {
        self.character = Some(character);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_minion(mut self, minion: Monster) -> Self {
        self.minion = Some(Box::new(minion));
        self
    }

    /// Fix maximum and current hit points
    pub fn with_hit_points(mut self, hp: i32) -> Self {
        self.max_hp = hp.max(0);
        self.hp = self.max_hp;
        self
    }

    /// A fresh copy for one fight: hit points re-rolled, no conditions,
    /// no host and an empty kill tally.
    pub fn spawn(&self, rng: &mut GameRng) -> Monster {
        let mut fresh = self.clone();
        fresh.id = MonsterId::NONE;
        fresh.max_hp = self.hit_dice.roll(rng).max(1);
        fresh.hp = fresh.max_hp;
        fresh.conditions.clear();
        fresh.host = None;
        fresh.kills = 0;
        fresh.times_meleed = 0;
        fresh.breath_charges = 0;
        if let Some(character) = fresh.character.as_mut() {
            character.rest();
        }
        fresh
    }

    // ------------------------------------------------------------------
    // Hit points
    // ------------------------------------------------------------------

    pub fn hit_points(&self) -> i32 {
        self.hp
    }

    pub fn max_hit_points(&self) -> i32 {
        self.max_hp
    }

    /// Apply damage, returning the amount actually removed
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).clamp(0, self.max_hp);
        before - self.hp
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = self.hp.saturating_add(amount.max(0)).clamp(0, self.max_hp);
    }

    pub fn set_hit_points(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Lower the maximum, dragging current hit points along
    pub fn reduce_max_hit_points(&mut self, amount: i32) {
        self.max_hp = (self.max_hp - amount.max(0)).max(0);
        self.hp = self.hp.min(self.max_hp);
    }

    /// Full healing: hit points restored, conditions and attachments cleared
    pub fn heal_fully(&mut self) {
        self.hp = self.max_hp;
        self.conditions.clear();
        self.host = None;
        if let Some(character) = self.character.as_mut() {
            character.rest();
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Character level, or level equivalent of the hit dice
    pub fn level(&self) -> u32 {
        match &self.character {
            Some(character) => character.level,
            None => self.hit_dice.level(),
        }
    }

    /// Class and level used for saving throws; monsters save as fighters
    pub fn save_profile(&self) -> (ClassKind, u32) {
        match &self.character {
            Some(character) => (character.class, character.level),
            None => (ClassKind::Fighter, self.hit_dice.level()),
        }
    }

    pub fn has_special(&self, kind: SpecialType) -> bool {
        self.specials.has(kind)
    }

    pub fn special_param(&self, kind: SpecialType) -> i32 {
        self.specials.param(kind)
    }

    pub fn has_condition(&self, kind: SpecialType) -> bool {
        self.conditions.has(kind)
    }

    pub fn is_undead(&self) -> bool {
        self.has_special(SpecialType::Undead)
    }

    pub fn is_immune_to(&self, energy: EnergyType) -> bool {
        self.has_special(energy.immunity())
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Any disabling condition
    pub fn is_disabled(&self) -> bool {
        self.conditions.any_disabling()
    }

    /// Out of the fight: no hit points, a critical ability score gone, or
    /// a disabling condition. Never a melee target, never acts.
    pub fn is_hors_de_combat(&self) -> bool {
        self.is_dead()
            || self
                .character
                .as_ref()
                .is_some_and(|c| c.abilities.critical_lost())
            || self.is_disabled()
    }

    pub fn in_fight(&self) -> bool {
        !self.is_hors_de_combat()
    }

    /// First breath weapon among the static abilities
    pub fn breath_weapon(&self) -> Option<SpecialAbility> {
        self.specials.iter().copied().find(|a| a.kind.is_breath_weapon())
    }

    pub fn has_gaze_weapon(&self) -> bool {
        self.specials.iter().any(|a| a.kind.is_gaze_weapon())
    }

    // ------------------------------------------------------------------
    // Equipment and drains
    // ------------------------------------------------------------------

    /// Characters draw the weapon best suited to this enemy and rebuild
    /// their attack routine from it.
    pub fn draw_best_weapon(&mut self, enemy: &Monster) {
        let Some(character) = self.character.as_ref() else {
            return;
        };
        let base = character.base_hit_bonus();
        let rate = self.attack.rate.max(1);
        let best = character
            .weapons
            .iter()
            .map(|weapon| weapon.to_attack(rate, base))
            .filter(|attack| can_wound(self, attack, enemy))
            .max_by(|a, b| {
                let score = |attack: &Attack| attack.damage.average() + attack.bonus as f64 / 2.0;
                score(a).total_cmp(&score(b))
            });
        if let Some(attack) = best {
            self.attack = attack;
        }
    }

    /// Lose levels to an energy drain; a combatant drained below its first
    /// level is slain.
    pub fn drain_levels(&mut self, levels: u32) {
        let current = self.level();
        let per_level = self.max_hp / current.max(1) as i32;
        self.hit_dice.number = self.hit_dice.number.saturating_sub(levels);
        if let Some(character) = self.character.as_mut() {
            character.level = character.level.saturating_sub(levels);
        }
        if current <= levels {
            self.hp = 0;
            return;
        }
        let lost = i32::try_from(levels).unwrap_or(i32::MAX);
        self.reduce_max_hit_points(per_level.saturating_mul(lost));
    }

    /// Lose strength; only characters track ability scores
    pub fn drain_strength(&mut self, points: u8) {
        if let Some(character) = self.character.as_mut() {
            character.abilities.strength = character.abilities.strength.saturating_sub(points);
        }
    }
}

impl fmt::Display for Monster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: AC {}, MV {}, HD {}, hp {}/{}, Atk {}",
            self.race,
            self.ac,
            self.mv,
            self.hit_dice.hit_dice_label(),
            self.hp,
            self.max_hp,
            self.attack
        )?;
        if !self.specials.is_empty() {
            let names: Vec<String> = self.specials.iter().map(|a| a.to_string()).collect();
            write!(f, "; SA {}", names.join(", "))?;
        }
        Ok(())
    }
}
