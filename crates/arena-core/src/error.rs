//! Error types for the combat engine.
//!
//! Rules situations (no target, immune victim, spent breath) are never
//! errors; they resolve to silent no-ops inside the fight loop.

use thiserror::Error;

/// Result type alias using [`ArenaError`].
pub type Result<T> = std::result::Result<T, ArenaError>;

/// Errors raised while building combatants or driving a fight.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    #[error("Invalid dice notation '{input}': {reason}")]
    DiceParse { input: String, reason: String },

    #[error("Unknown special ability: {0}")]
    UnknownSpecial(String),

    #[error("Unknown spell: {0}")]
    UnknownSpell(String),

    #[error("Party '{0}' has no live members")]
    EmptyParty(String),

    #[error("Fight has already been resolved")]
    FightResolved,

    #[error("Invalid combatant definition: {0}")]
    Definition(String),
}
