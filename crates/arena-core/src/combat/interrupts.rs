//! In-melee interrupts
//!
//! Opportunistic specials that take a combatant's whole turn when they
//! fire. They are tried in a fixed order and the first one that fires ends
//! the turn.

use super::area::{area_victims, breathe, victim_cap};
use super::conditions::{resists_outright, try_afflict};
use super::resolve::conjured_attack;
use super::FightContext;
use crate::attack::Attack;
use crate::dice::Dice;
use crate::magic;
use crate::monster::Monster;
use crate::party::Party;
use crate::special::{SpecialAbility, SpecialType};

/// Reach of a gaze, as an area length
const GAZE_LENGTH: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EyeRay {
    Afflict(SpecialType),
    Wound,
}

const EYE_RAYS: [EyeRay; 7] = [
    EyeRay::Afflict(SpecialType::Charm),
    EyeRay::Afflict(SpecialType::Sleep),
    EyeRay::Afflict(SpecialType::Petrification),
    EyeRay::Afflict(SpecialType::Death),
    EyeRay::Afflict(SpecialType::Slowing),
    EyeRay::Afflict(SpecialType::Fear),
    EyeRay::Wound,
];

/// Try each interrupt in order; true when one fired and the turn is spent
pub(super) fn try_interrupts(
    actor: &mut Monster,
    enemies: &mut Party,
    ctx: &mut FightContext,
) -> bool {
    grab(actor, enemies, ctx)
        || blood_drain(actor, enemies, ctx)
        || breathe(actor, enemies, ctx)
        || confusion_gaze(actor, enemies, ctx)
        || magic::cast_in_melee(actor, enemies, ctx)
        || eye_tyranny(actor, enemies, ctx)
}

/// Conjured attack that attaches the actor to its target on a hit
fn attach(actor: &mut Monster, name: &str, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    let cap = ctx.config.max_melee_per_target;
    let Some(index) = enemies.random_melee_target(ctx.rng, cap) else {
        return false;
    };
    let Some(target) = enemies.get_mut(index) else {
        return false;
    };
    let attack = Attack::conjured(name, actor.attack.bonus, Dice::flat(0));
    if conjured_attack(actor, &attack, target, ctx).hit {
        actor.host = Some(target.id);
        narrate!(ctx, "{} latches onto {}", actor.race, target.race);
    }
    true
}

fn grab(actor: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    if !actor.has_special(SpecialType::Grabbing) || actor.host.is_some() {
        return false;
    }
    attach(actor, "Grab", enemies, ctx)
}

fn blood_drain(actor: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    if !actor.has_special(SpecialType::BloodDrain) || actor.host.is_some() {
        return false;
    }
    attach(actor, "Proboscis", enemies, ctx)
}

/// Turn a gaze on the enemy party. Returns false when nobody in reach could
/// be affected.
pub(super) fn gaze(
    actor: &mut Monster,
    ability: SpecialAbility,
    enemies: &mut Party,
    ctx: &mut FightContext,
) -> bool {
    let Some(condition) = ability.kind.inflicts() else {
        return false;
    };
    let pool: Vec<usize> = enemies
        .iter()
        .enumerate()
        .filter(|(_, m)| m.in_fight() && !resists_outright(m, condition))
        .map(|(i, _)| i)
        .collect();
    if pool.is_empty() {
        return false;
    }
    let count = victim_cap(area_victims(GAZE_LENGTH), enemies, ctx.in_melee);
    narrate!(ctx, "{} turns its {} gaze on the enemy", actor.race, ability.kind);
    for index in ctx.rng.sample(&pool, count) {
        let Some(victim) = enemies.get_mut(index) else {
            continue;
        };
        let afflicted = try_afflict(victim, SpecialAbility::new(condition, ability.param), ctx);
        if afflicted && victim.is_hors_de_combat() {
            actor.kills += 1;
        }
    }
    true
}

fn confusion_gaze(actor: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    let Some(ability) = actor.specials.get(SpecialType::Confusion).copied() else {
        return false;
    };
    if !ctx.rng.coin_flip() {
        return false;
    }
    gaze(actor, ability, enemies, ctx)
}

fn eye_tyranny(actor: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    if !actor.has_special(SpecialType::EyeTyranny) || !enemies.has_eligible() {
        return false;
    }
    if ctx.rng.rn2(3) == 0 {
        return false;
    }
    eye_salvo(actor, enemies, ctx);
    true
}

/// Fire up to the actor's eye count of rays, each at a random enemy
pub(super) fn eye_salvo(actor: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) {
    let eyes = actor.special_param(SpecialType::EyeTyranny).max(1) as u32;
    let rays = ctx.rng.rnd(eyes);
    narrate!(ctx, "{} fires {} eye ray(s)", actor.race, rays);
    for _ in 0..rays {
        let Some(index) = enemies.random_member(ctx.rng) else {
            break;
        };
        let Some(&ray) = ctx.rng.choose(&EYE_RAYS) else {
            break;
        };
        let Some(victim) = enemies.get_mut(index) else {
            continue;
        };
        match ray {
            EyeRay::Afflict(kind) => {
                try_afflict(victim, SpecialAbility::new(kind, 0), ctx);
            }
            EyeRay::Wound => {
                let dealt = victim.take_damage(Dice::new(2, 8).roll(ctx.rng));
                narrate!(ctx, "a wounding ray strikes {} for {}", victim.race, dealt);
            }
        }
        if victim.is_hors_de_combat() {
            actor.kills += 1;
        }
    }
}
