//! Single attack resolution
//!
//! d20 + attack bonus + target armor class + situational modifier; a total
//! of 20 or more hits, and a natural 20 always does.

use tracing::trace;

use super::{on_hit, veto, AttackResult, FightContext};
use crate::attack::Attack;
use crate::monster::Monster;
use crate::special::SpecialType;

/// Situational to-hit adjustment of an attacker against a target
pub fn hit_modifier(attacker: &Monster, target: &Monster) -> i32 {
    let mut modifier = 0;

    if attacker.has_special(SpecialType::Berserking) {
        modifier += 2;
    }
    if attacker.has_special(SpecialType::Giant) && target.has_special(SpecialType::GiantDodger) {
        modifier -= 4;
    }
    // Blinking and phasing attackers strike from behind
    if attacker.has_special(SpecialType::Blink) || attacker.has_special(SpecialType::Phasing) {
        modifier += 2;
    }
    if attacker.has_condition(SpecialType::Stench) {
        modifier -= 2;
    }
    if attacker.has_condition(SpecialType::SappingStrands) {
        modifier -= 4;
    }

    if target.has_special(SpecialType::Displacement) {
        modifier -= 2;
    }
    if target.has_special(SpecialType::Invisibility)
        && !attacker.has_special(SpecialType::DetectInvisible)
    {
        modifier -= 4;
    }
    // Fighting with averted eyes
    if target.has_gaze_weapon() && !attacker.has_gaze_weapon() {
        modifier -= 2;
    }

    modifier
}

/// Damage left after the target's damage rules
fn apply_damage_rules(
    attacker: &mut Monster,
    attack: &Attack,
    target: &Monster,
    damage: i32,
) -> i32 {
    let mut damage = damage;
    if let Some(energy) = attack.energy {
        if target.is_immune_to(energy) {
            return 0;
        }
    }
    let reduction = target.special_param(SpecialType::DamageReduction);
    if reduction > 0 && attack.magic_bonus <= 0 {
        damage = (damage - reduction).max(0);
    }
    // Weapons striking a corrosive body lose a point of edge per hit
    if target.has_special(SpecialType::Corrosion) && attacker.character.is_some() {
        attacker.attack.bonus -= 1;
        attacker.attack.damage.addition -= 1;
    }
    damage
}

/// Resolve one attack against one target.
///
/// On-hit riders are only considered on a hit; `is_last` says whether this
/// was the final attack of the attacker's sequence this turn.
pub fn single_attack(
    attacker: &mut Monster,
    attack: &Attack,
    target: &mut Monster,
    is_last: bool,
    ctx: &mut FightContext,
) -> AttackResult {
    strike(attacker, attack, target, Some(is_last), ctx)
}

/// Resolve a one-off attack conjured for a special (a grab, a proboscis,
/// a wounding ray). The attacker's on-hit riders do not come with it.
pub fn conjured_attack(
    attacker: &mut Monster,
    attack: &Attack,
    target: &mut Monster,
    ctx: &mut FightContext,
) -> AttackResult {
    strike(attacker, attack, target, None, ctx)
}

fn strike(
    attacker: &mut Monster,
    attack: &Attack,
    target: &mut Monster,
    riders: Option<bool>,
    ctx: &mut FightContext,
) -> AttackResult {
    target.times_meleed += 1;
    let was_in_fight = target.in_fight();

    if !veto::can_attack(attacker, attack, target, ctx.rng) {
        narrate!(ctx, "{}'s {} cannot harm {}", attacker.race, attack.name, target.race);
        return AttackResult::VETOED;
    }

    let natural = ctx.rng.d20();
    let total = natural as i32 + attack.bonus + target.ac + hit_modifier(attacker, target);
    let hit = natural == 20 || total >= 20;
    trace!(
        attacker = %attacker.race,
        target = %target.race,
        natural,
        total,
        hit,
        "attack roll"
    );

    if !hit {
        narrate!(ctx, "{} misses {}", attacker.race, target.race);
        return AttackResult {
            natural,
            ..AttackResult::MISS
        };
    }

    let mut damage = attack.damage.roll(ctx.rng);
    if !attack.damage.is_zero() {
        damage = damage.max(1);
    }
    let damage = apply_damage_rules(attacker, attack, target, damage);
    let dealt = target.take_damage(damage);
    narrate!(
        ctx,
        "{} hits {} with {} for {} ({} hp left)",
        attacker.race,
        target.race,
        attack.name,
        dealt,
        target.hit_points()
    );

    if let Some(is_last) = riders {
        if !target.is_dead() {
            on_hit::trigger(attacker, target, natural, is_last, ctx);
        }
    }

    let felled = was_in_fight && target.is_hors_de_combat();
    if felled {
        attacker.kills += 1;
        narrate!(ctx, "{} is out of the fight", target.race);
    }

    AttackResult {
        hit: true,
        vetoed: false,
        natural,
        damage: dealt,
        felled,
    }
}
