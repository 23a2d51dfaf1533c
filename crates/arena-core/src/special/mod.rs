//! Special abilities
//!
//! A closed catalog of named effects, each tagged with category predicates,
//! plus the (type, parameter) instances attached to combatants.

mod ability;
mod catalog;

pub use ability::{SpecialAbility, SpecialList};
pub use catalog::{SpecialCategory, SpecialType};
