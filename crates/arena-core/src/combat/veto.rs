//! To-hit vetoes
//!
//! Some creatures simply cannot be harmed by an ordinary blow. Each veto is
//! keyed by the special ability that grants it; adding a new one means
//! adding a row to the table.

use crate::attack::Attack;
use crate::monster::Monster;
use crate::rng::GameRng;
use crate::special::SpecialType;

/// Returns true when the attack cannot harm the target
type Veto = fn(attacker: &Monster, attack: &Attack, target: &Monster) -> bool;

const VETOES: &[(SpecialType, Veto)] = &[
    (SpecialType::SilverToHit, needs_silver),
    (SpecialType::MagicToHit, needs_magic),
    (SpecialType::WeaponImmunity, immune_to_weapons),
];

/// Magic level of an attack: the weapon's enchantment, or the attacker's
/// own magical nature
fn magic_level(attacker: &Monster, attack: &Attack) -> i32 {
    attack
        .magic_bonus
        .max(attacker.special_param(SpecialType::MagicToHit))
}

fn needs_silver(attacker: &Monster, attack: &Attack, _target: &Monster) -> bool {
    !(attack.silver
        || attacker.has_special(SpecialType::SilverEquivalent)
        || magic_level(attacker, attack) >= 1)
}

fn needs_magic(attacker: &Monster, attack: &Attack, target: &Monster) -> bool {
    magic_level(attacker, attack) < target.special_param(SpecialType::MagicToHit).max(1)
}

fn immune_to_weapons(_attacker: &Monster, _attack: &Attack, _target: &Monster) -> bool {
    true
}

/// Whether the attack could ever harm the target, ignoring chance
pub fn can_wound(attacker: &Monster, attack: &Attack, target: &Monster) -> bool {
    !VETOES
        .iter()
        .any(|(kind, veto)| target.has_special(*kind) && veto(attacker, attack, target))
}

/// Whether this particular attack may land. An out-of-phase target slips
/// half of all attacks, except from another phasing creature.
pub fn can_attack(
    attacker: &Monster,
    attack: &Attack,
    target: &Monster,
    rng: &mut GameRng,
) -> bool {
    if !can_wound(attacker, attack, target) {
        return false;
    }
    if target.has_special(SpecialType::Phasing) && !attacker.has_special(SpecialType::Phasing) {
        return !rng.coin_flip();
    }
    true
}
