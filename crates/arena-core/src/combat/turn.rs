//! A combatant's turn
//!
//! Fixed order: regeneration, damage against the current host, the
//! slowing aura, then the interrupts. Only when no interrupt fires does the
//! combatant make its ordinary melee attacks.

use tracing::trace;

use super::conditions::try_afflict;
use super::interrupts::try_interrupts;
use super::resolve::single_attack;
use super::FightContext;
use crate::config::FightConfig;
use crate::error::{ArenaError, Result};
use crate::monster::Monster;
use crate::party::Party;
use crate::special::SpecialType;

/// Highest level a sweeping fighter can cut through
pub const SWEEP_THRESHOLD: u32 = 1;

/// Attacks this round, and whether they are sweep attacks.
///
/// A fighter sweeps (one attack per level) when sweep attacks are enabled
/// and the most common level among the engaged enemies is at or below the
/// threshold.
pub fn effective_rate(actor: &Monster, enemies: &Party, config: &FightConfig) -> (u32, bool) {
    let normal = actor.attack.rate;
    let Some(character) = actor.character.as_ref() else {
        return (normal, false);
    };
    if !config.sweep_attacks || !character.class.sweeps() || character.level <= normal {
        return (normal, false);
    }
    match enemies.modal_level() {
        Some(level) if level <= SWEEP_THRESHOLD => (character.level, true),
        _ => (normal, false),
    }
}

/// Take one turn for the live member at `actor` of `friends`.
///
/// Calling this against an enemy party with no live members is the one
/// fatal precondition. Out-of-fight actors simply pass.
pub fn take_turn(
    actor: usize,
    friends: &mut Party,
    enemies: &mut Party,
    ctx: &mut FightContext,
) -> Result<()> {
    if !enemies.is_live() {
        return Err(ArenaError::EmptyParty(enemies.name().to_string()));
    }
    let Some(actor) = friends.get_mut(actor) else {
        return Ok(());
    };
    if actor.in_fight() {
        act(actor, enemies, ctx);
    }
    for minion in ctx.take_summoned() {
        friends.reinforce(minion);
    }
    Ok(())
}

fn act(actor: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) {
    regenerate(actor, ctx);
    if feed_on_host(actor, enemies, ctx) {
        return;
    }
    slowing_aura(actor, enemies, ctx);

    if actor.has_condition(SpecialType::Slowing) && ctx.round % 2 == 1 {
        trace!(actor = %actor.race, round = ctx.round, "slowed, skipping odd round");
        return;
    }
    if !enemies.has_eligible() {
        return;
    }
    if try_interrupts(actor, enemies, ctx) {
        return;
    }
    melee(actor, enemies, ctx);
}

fn regenerate(actor: &mut Monster, ctx: &mut FightContext) {
    let amount = actor.special_param(SpecialType::Regeneration);
    if amount <= 0 || actor.has_condition(SpecialType::Rotting) {
        return;
    }
    if actor.hit_points() < actor.max_hit_points() {
        actor.heal(amount);
        narrate!(ctx, "{} regenerates to {} hp", actor.race, actor.hit_points());
    }
}

/// Passive damage against the host. The host is dropped when it is no
/// longer among the enemies still fighting. Returns true when the turn is
/// spent feeding.
fn feed_on_host(actor: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    let Some(host_id) = actor.host else {
        return false;
    };
    let Some(host) = enemies
        .position(host_id)
        .and_then(|index| enemies.get_mut(index))
        .filter(|host| host.in_fight())
    else {
        actor.host = None;
        return false;
    };

    let drinking = actor.has_special(SpecialType::BloodDrain);
    let damage = if drinking {
        ctx.rng.rnd(4) as i32
    } else if actor.has_special(SpecialType::Constriction)
        || actor.has_special(SpecialType::Grabbing)
    {
        actor.attack.damage.roll(ctx.rng).max(0)
    } else {
        return false;
    };

    let dealt = host.take_damage(damage);
    narrate!(ctx, "{} squeezes {} for {}", actor.race, host.race, dealt);
    if drinking {
        actor.heal(dealt);
    }
    if host.is_hors_de_combat() {
        actor.kills += 1;
        actor.host = None;
    }
    drinking
}

fn slowing_aura(actor: &Monster, enemies: &mut Party, ctx: &mut FightContext) {
    let Some(slowing) = actor.specials.get(SpecialType::Slowing).copied() else {
        return;
    };
    let Some(index) = enemies.random_member(ctx.rng) else {
        return;
    };
    if let Some(victim) = enemies.get_mut(index) {
        try_afflict(victim, slowing, ctx);
    }
}

fn melee(actor: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) {
    let (rate, sweeping) = effective_rate(actor, enemies, ctx.config);
    let attack = actor.attack.clone();
    let cap = ctx.config.max_melee_per_target;
    for n in 0..rate {
        let Some(index) = enemies.random_melee_target(ctx.rng, cap) else {
            break;
        };
        let Some(target) = enemies.get_mut(index) else {
            break;
        };
        // A sweep blow only falls on the small fry; the slot is still used
        if sweeping && target.level() > SWEEP_THRESHOLD {
            continue;
        }
        single_attack(actor, &attack, target, n + 1 == rate, ctx);
    }
}
