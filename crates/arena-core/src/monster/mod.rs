//! Combatants
//!
//! A combatant is a [`Monster`]; player characters are monsters carrying a
//! [`Character`] profile.

mod character;
mod definition;
mod monst;

pub use character::{AbilityScores, Character, ClassKind};
pub use definition::{AttackDefinition, MonsterDefinition};
pub use monst::{Alignment, Monster, MonsterId};
