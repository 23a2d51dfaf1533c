//! Inflicting conditions

use super::FightContext;
use crate::monster::Monster;
use crate::special::{SpecialAbility, SpecialType};

/// The immunity that blocks a condition outright
pub const fn condition_immunity(kind: SpecialType) -> Option<SpecialType> {
    match kind {
        SpecialType::Poison => Some(SpecialType::PoisonImmunity),
        SpecialType::Charm
        | SpecialType::Confusion
        | SpecialType::Fear
        | SpecialType::Sleep
        | SpecialType::Hold => Some(SpecialType::MagicImmunity),
        _ => None,
    }
}

/// Whether the victim is beyond this condition without needing a save
pub fn resists_outright(victim: &Monster, kind: SpecialType) -> bool {
    (victim.is_undead() && kind.is_undead_immune())
        || condition_immunity(kind).is_some_and(|immunity| victim.has_special(immunity))
        || victim.has_condition(kind)
}

/// Try to inflict a condition. The victim saves at minus the ability's
/// parameter; on a failed save the (type, parameter) pair joins its
/// conditions. Returns whether the condition took hold.
pub fn try_afflict(victim: &mut Monster, ability: SpecialAbility, ctx: &mut FightContext) -> bool {
    if resists_outright(victim, ability.kind) {
        return false;
    }
    if ctx
        .saves
        .save_against(ability.kind, victim, -ability.param, ctx.rng)
    {
        narrate!(ctx, "{} resists {}", victim.race, ability.kind);
        return false;
    }
    narrate!(ctx, "{} is afflicted by {}", victim.race, ability);
    victim.conditions.add(ability);
    true
}
