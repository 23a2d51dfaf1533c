//! Ranged and area specials used once before melee begins

use super::area::breathe;
use super::conditions::try_afflict;
use super::interrupts::{eye_salvo, gaze};
use super::FightContext;
use crate::error::{ArenaError, Result};
use crate::magic;
use crate::monster::Monster;
use crate::party::Party;
use crate::special::SpecialType;

/// The pre-melee pass of one combatant: its stench aura if it has one,
/// then the first of breath, spell, eye salvo or gaze that applies.
/// Returns whether an attack was made.
pub fn special_attack(
    actor: usize,
    friends: &mut Party,
    enemies: &mut Party,
    ctx: &mut FightContext,
) -> Result<bool> {
    if !enemies.is_live() {
        return Err(ArenaError::EmptyParty(enemies.name().to_string()));
    }
    let Some(actor) = friends.get_mut(actor) else {
        return Ok(false);
    };
    if !actor.in_fight() {
        return Ok(false);
    }

    stench_aura(actor, enemies, ctx);
    let acted = breathe(actor, enemies, ctx)
        || magic::cast_pre_melee(actor, enemies, ctx)
        || eye_tyranny(actor, enemies, ctx)
        || opening_gaze(actor, enemies, ctx);

    for minion in ctx.take_summoned() {
        friends.reinforce(minion);
    }
    Ok(acted)
}

fn stench_aura(actor: &Monster, enemies: &mut Party, ctx: &mut FightContext) {
    let Some(stench) = actor.specials.get(SpecialType::Stench).copied() else {
        return;
    };
    narrate!(ctx, "a choking stench rolls off {}", actor.race);
    for enemy in enemies.live_mut() {
        if enemy.in_fight() {
            try_afflict(enemy, stench, ctx);
        }
    }
}

fn eye_tyranny(actor: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    if !actor.has_special(SpecialType::EyeTyranny) {
        return false;
    }
    eye_salvo(actor, enemies, ctx);
    true
}

/// Confusion is a melee-range gaze and waits for the interrupts
fn opening_gaze(actor: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    let Some(ability) = actor
        .specials
        .iter()
        .copied()
        .find(|a| a.kind.is_gaze_weapon() && a.kind != SpecialType::Confusion)
    else {
        return false;
    };
    gaze(actor, ability, enemies, ctx)
}
