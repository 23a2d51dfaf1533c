//! Combat resolution
//!
//! Attack rolls, to-hit vetoes, on-hit riders, conditions, area effects,
//! pre-melee specials and the per-round turn of a combatant.

mod area;
mod conditions;
mod interrupts;
mod on_hit;
mod pre_melee;
mod resolve;
mod turn;
mod veto;

use crate::config::FightConfig;
use crate::monster::Monster;
use crate::rng::GameRng;
use crate::saves::SavingThrows;

pub use area::{area_victims, breathe, energy_damage, victim_cap, BREATH_CHARGES};
pub use conditions::{condition_immunity, resists_outright, try_afflict};
pub use pre_melee::special_attack;
pub use resolve::{conjured_attack, hit_modifier, single_attack};
pub use turn::{effective_rate, take_turn, SWEEP_THRESHOLD};
pub use veto::{can_attack, can_wound};

/// Everything a combatant needs from the fight while acting
pub struct FightContext<'a> {
    pub rng: &'a mut GameRng,
    pub config: &'a FightConfig,
    pub saves: &'a SavingThrows,
    pub round: u32,
    /// Melee has started: area effects are capped by formation spread
    pub in_melee: bool,
    summoned: Vec<Monster>,
}

impl<'a> FightContext<'a> {
    pub fn new(rng: &'a mut GameRng, config: &'a FightConfig, saves: &'a SavingThrows) -> Self {
        Self {
            rng,
            config,
            saves,
            round: 0,
            in_melee: false,
            summoned: Vec::new(),
        }
    }

    /// Queue a creature summoned by the acting combatant
    pub fn summon(&mut self, minion: Monster) {
        self.summoned.push(minion);
    }

    /// Creatures summoned since the last call
    pub fn take_summoned(&mut self) -> Vec<Monster> {
        std::mem::take(&mut self.summoned)
    }
}

/// Result of one attack roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackResult {
    /// The attack was allowed and connected
    pub hit: bool,
    /// The attack was not allowed to land at all
    pub vetoed: bool,
    /// The natural d20 roll, 0 when vetoed
    pub natural: u32,
    pub damage: i32,
    /// The target left the fight because of this attack
    pub felled: bool,
}

impl AttackResult {
    pub const MISS: Self = Self {
        hit: false,
        vetoed: false,
        natural: 0,
        damage: 0,
        felled: false,
    };

    pub const VETOED: Self = Self {
        vetoed: true,
        ..Self::MISS
    };
}
