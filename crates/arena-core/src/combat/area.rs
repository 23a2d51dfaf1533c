//! Area effects and breath weapons

use tracing::debug;

use super::FightContext;
use crate::attack::EnergyType;
use crate::monster::Monster;
use crate::party::Party;
use crate::saves::SaveCategory;

/// Breath weapon uses per fight
pub const BREATH_CHARGES: u32 = 3;

/// Victims reached by a cone or burst of the given length
pub const fn area_victims(length: u32) -> usize {
    (length.saturating_mul(length) / 6 + 1) as usize
}

/// Once melee has started, formations are spread out and an area effect
/// reaches at most half of the enemies still standing, rounded up.
pub fn victim_cap(count: usize, enemies: &Party, in_melee: bool) -> usize {
    if in_melee {
        count.min(enemies.in_fight_count().div_ceil(2))
    } else {
        count
    }
}

/// Deal energy damage to one victim, halved on a successful save when a
/// save category is given. Immune victims take nothing. Returns the damage
/// actually dealt.
pub fn energy_damage(
    victim: &mut Monster,
    energy: EnergyType,
    damage: i32,
    save: Option<SaveCategory>,
    ctx: &mut FightContext,
) -> i32 {
    if victim.is_immune_to(energy) {
        narrate!(ctx, "{} is untouched by {}", victim.race, energy);
        return 0;
    }
    let mut damage = damage;
    if let Some(category) = save {
        if ctx.saves.save_as(category, victim, 0, ctx.rng) {
            damage /= 2;
        }
    }
    let dealt = victim.take_damage(damage);
    narrate!(ctx, "{} takes {} {} damage", victim.race, dealt, energy);
    dealt
}

/// Breathe on the enemy party if a charge is left and the breath is ready.
///
/// Before melee the breath is always ready; once melee has started it is
/// ready on a 1-in-2 roll. Damage equals the breather's current hit points.
pub fn breathe(breather: &mut Monster, enemies: &mut Party, ctx: &mut FightContext) -> bool {
    let Some(breath) = breather.breath_weapon() else {
        return false;
    };
    let Some(energy) = breath.kind.breath_energy() else {
        return false;
    };
    if breather.breath_charges == 0 || !enemies.has_eligible() {
        return false;
    }
    if ctx.in_melee && !ctx.rng.one_in(2) {
        return false;
    }

    breather.breath_charges -= 1;
    let length = if breath.param > 0 {
        breath.param as u32
    } else {
        breath.kind.breath_length()
    };
    let count = victim_cap(area_victims(length), enemies, ctx.in_melee);
    let victims = enemies.sample_targets(ctx.rng, count);
    let damage = breather.hit_points();
    debug!(
        breather = %breather.race,
        %energy,
        damage,
        victims = victims.len(),
        charges_left = breather.breath_charges,
        "breath weapon"
    );
    narrate!(ctx, "{} breathes {} at {} foes", breather.race, energy, victims.len());

    for index in victims {
        let Some(victim) = enemies.get_mut(index) else {
            continue;
        };
        let was_in_fight = victim.in_fight();
        energy_damage(victim, energy, damage, Some(SaveCategory::Breath), ctx);
        if was_in_fight && victim.is_hors_de_combat() {
            breather.kills += 1;
        }
    }
    true
}
