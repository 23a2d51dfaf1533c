//! Choosing and casting spells

use std::cmp::Reverse;

use tracing::{debug, warn};

use super::{SpellDamage, SpellEffect, SpellId, Targeting};
use crate::combat::{
    area_victims, energy_damage, resists_outright, try_afflict, victim_cap, FightContext,
};
use crate::dice::Dice;
use crate::monster::Monster;
use crate::party::Party;
use crate::saves::SaveCategory;
use crate::special::{SpecialAbility, SpecialType};

/// Whether the spell would do anything to this target. Immune targets are
/// skipped without complaint.
pub fn is_threat_to(spell: SpellId, target: &Monster) -> bool {
    if !target.in_fight() {
        return false;
    }
    if !spell.is_indirect() && target.has_special(SpecialType::MagicImmunity) {
        return false;
    }
    match spell.spec().effect {
        SpellEffect::Missiles | SpellEffect::Summon(_) => true,
        SpellEffect::Afflict {
            condition,
            max_level,
            ..
        } => {
            !resists_outright(target, condition)
                && max_level.is_none_or(|max| target.level() <= max)
        }
        SpellEffect::Energy { energy, .. } => !target.is_immune_to(energy),
    }
}

/// Pick the best remaining spell against these enemies: area spells first,
/// then fixed-target, then indirect, higher spell levels first within each
/// group. Spells that threaten nobody are passed over.
pub fn choose_spell(caster: &Monster, enemies: &Party, in_melee: bool) -> Option<SpellId> {
    let character = caster.character.as_ref()?;
    let mut candidates: Vec<SpellId> = character
        .spells_remaining
        .iter()
        .copied()
        .filter(|spell| !in_melee || spell.spec().in_melee)
        .filter(|spell| spell.is_indirect() || enemies.iter().any(|m| is_threat_to(*spell, m)))
        .collect();
    candidates.sort_unstable();
    candidates.dedup();
    candidates
        .into_iter()
        .min_by_key(|spell| {
            let spec = spell.spec();
            (spec.targeting.rank(), Reverse(spec.level))
        })
}

/// Cast before melee, if the caster has anything worth casting
pub fn cast_pre_melee(caster: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    match choose_spell(caster, enemies, false) {
        Some(spell) => cast(spell, caster, enemies, ctx),
        None => false,
    }
}

/// Cast one of the quick spells once melee has started
pub fn cast_in_melee(caster: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    match choose_spell(caster, enemies, true) {
        Some(spell) => cast(spell, caster, enemies, ctx),
        None => false,
    }
}

/// Cast a memorized spell. Returns false when the caster has no copy left.
pub fn cast(
    spell: SpellId,
    caster: &mut Monster,
    enemies: &mut Party,
    ctx: &mut FightContext,
) -> bool {
    let Some(character) = caster.character.as_mut() else {
        return false;
    };
    if !character.expend_spell(spell) {
        return false;
    }
    let spec = spell.spec();
    let caster_level = caster.level().max(1);
    narrate!(ctx, "{} casts {}", caster.race, spell);

    let count = match spec.targeting {
        Targeting::Indirect => {
            if let SpellEffect::Summon(dice) = spec.effect {
                summon(caster, dice, spec.level, ctx);
            }
            return true;
        }
        Targeting::Fixed(count) => count,
        Targeting::Area { length } => area_victims(length),
    };
    let count = victim_cap(count, enemies, ctx.in_melee);
    let pool: Vec<usize> = enemies
        .iter()
        .enumerate()
        .filter(|(_, m)| is_threat_to(spell, m))
        .map(|(i, _)| i)
        .collect();
    let victims = ctx.rng.sample(&pool, count);

    // Area damage is rolled once for everyone caught in it
    let damage = match spec.effect {
        SpellEffect::Energy { damage, .. } => match damage {
            SpellDamage::PerLevel(sides) => Dice::new(caster_level, sides).roll(ctx.rng),
            SpellDamage::Fixed(dice) => dice.roll(ctx.rng),
        },
        _ => 0,
    };
    debug!(caster = %caster.race, %spell, victims = victims.len(), damage, "spell cast");

    for index in victims {
        let Some(victim) = enemies.get_mut(index) else {
            continue;
        };
        let resistance = victim.special_param(SpecialType::MagicResistance);
        if resistance > 0 && ctx.rng.percent(resistance as u32) {
            narrate!(ctx, "{} shrugs off {}", victim.race, spell);
            continue;
        }
        let was_in_fight = victim.in_fight();
        match spec.effect {
            SpellEffect::Missiles => {
                let darts = 1 + (caster_level - 1) / 2;
                let dart = Dice::new(1, 4).with_addition(1);
                let total: i32 = (0..darts).map(|_| dart.roll(ctx.rng)).sum();
                let dealt = victim.take_damage(total);
                narrate!(ctx, "{} magic missile(s) strike {} for {}", darts, victim.race, dealt);
            }
            SpellEffect::Afflict {
                condition,
                save_penalty,
                ..
            } => match save_penalty {
                Some(penalty) => {
                    try_afflict(victim, SpecialAbility::new(condition, penalty), ctx);
                }
                None => {
                    victim.conditions.add(SpecialAbility::new(condition, 0));
                    narrate!(ctx, "{} is afflicted by {}", victim.race, condition);
                }
            },
            SpellEffect::Energy {
                energy, save_half, ..
            } => {
                let save = save_half.then_some(SaveCategory::Spells);
                energy_damage(victim, energy, damage, save, ctx);
            }
            SpellEffect::Summon(_) => {}
        }
        if was_in_fight && victim.is_hors_de_combat() {
            caster.kills += 1;
        }
    }
    true
}

fn summon(caster: &Monster, dice: Dice, spell_level: u32, ctx: &mut FightContext) {
    let count = dice.roll(ctx.rng).max(0);
    let template = match &caster.minion {
        Some(minion) => minion.as_ref().clone(),
        None => {
            warn!(caster = %caster.race, "no summon template, using a generic minion");
            Monster::summoned_minion(spell_level)
        }
    };
    for _ in 0..count {
        let minion = template.spawn(ctx.rng);
        ctx.summon(minion);
    }
    narrate!(ctx, "{} summons {} {}", caster.race, count, template.race);
}
