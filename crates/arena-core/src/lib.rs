//! arena-core: combat resolution engine for tabletop fantasy battles
//!
//! Resolves fights between parties of combatants with dice-driven attack
//! rolls, saving throws, conditions and a catalog of special abilities.
//! The engine performs no I/O: callers hand it fully built parties, a
//! configuration value and a seeded random source, and get back an outcome.

/// Play-by-play narration on the `arena::pbp` target, emitted only when
/// the fight configuration asks for it
macro_rules! narrate {
    ($ctx:expr, $($arg:tt)+) => {
        if $ctx.config.play_by_play {
            tracing::info!(target: "arena::pbp", $($arg)+);
        }
    };
}

pub mod attack;
pub mod combat;
pub mod config;
pub mod dice;
pub mod error;
pub mod fight;
pub mod magic;
pub mod monster;
pub mod party;
pub mod saves;
pub mod special;

mod rng;

pub use attack::{Attack, EnergyType, Weapon};
pub use combat::{AttackResult, FightContext};
pub use config::FightConfig;
pub use dice::{Dice, HIT_DIE_SIDES};
pub use error::{ArenaError, Result};
pub use fight::{FightManager, FightOutcome, Phase, Side};
pub use magic::SpellId;
pub use monster::{
    AbilityScores, Alignment, AttackDefinition, Character, ClassKind, Monster, MonsterDefinition,
    MonsterId,
};
pub use party::Party;
pub use rng::GameRng;
pub use saves::{SaveCategory, SavePolicyKind, SaveTable, SavingThrows};
pub use special::{SpecialAbility, SpecialCategory, SpecialList, SpecialType};
