//! On-hit riders
//!
//! Most riders only ride the final attack of a turn's sequence. A few
//! (swallowing, sapping strands) are the reverse and only come with the
//! earlier attacks.

use super::{conditions::try_afflict, FightContext};
use crate::attack::EnergyType;
use crate::dice::Dice;
use crate::monster::Monster;
use crate::special::{SpecialAbility, SpecialType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timing {
    FinalOnly,
    EarlierOnly,
}

type Rider = fn(&mut Monster, &mut Monster, SpecialAbility, u32, &mut FightContext);

struct OnHit {
    kind: SpecialType,
    timing: Timing,
    apply: Rider,
}

const ON_HIT: &[OnHit] = &[
    OnHit {
        kind: SpecialType::Poison,
        timing: Timing::FinalOnly,
        apply: afflict,
    },
    OnHit {
        kind: SpecialType::Paralysis,
        timing: Timing::FinalOnly,
        apply: afflict,
    },
    OnHit {
        kind: SpecialType::Petrification,
        timing: Timing::FinalOnly,
        apply: afflict,
    },
    OnHit {
        kind: SpecialType::Rotting,
        timing: Timing::FinalOnly,
        apply: afflict,
    },
    OnHit {
        kind: SpecialType::EnergyDrain,
        timing: Timing::FinalOnly,
        apply: energy_drain,
    },
    OnHit {
        kind: SpecialType::StrengthDrain,
        timing: Timing::FinalOnly,
        apply: strength_drain,
    },
    OnHit {
        kind: SpecialType::Immolation,
        timing: Timing::FinalOnly,
        apply: immolate,
    },
    OnHit {
        kind: SpecialType::Constriction,
        timing: Timing::FinalOnly,
        apply: constrict,
    },
    OnHit {
        kind: SpecialType::Swallowing,
        timing: Timing::EarlierOnly,
        apply: swallow,
    },
    OnHit {
        kind: SpecialType::SappingStrands,
        timing: Timing::EarlierOnly,
        apply: afflict,
    },
];

/// Fire every rider the attacker carries that matches this attack's place
/// in the sequence
pub(super) fn trigger(
    attacker: &mut Monster,
    target: &mut Monster,
    natural: u32,
    is_last: bool,
    ctx: &mut FightContext,
) {
    let wanted = if is_last { Timing::FinalOnly } else { Timing::EarlierOnly };
    let abilities: Vec<SpecialAbility> = attacker.specials.iter().copied().collect();
    for ability in abilities {
        let Some(rider) = ON_HIT.iter().find(|r| r.kind == ability.kind) else {
            continue;
        };
        if rider.timing == wanted && !target.is_dead() {
            (rider.apply)(attacker, target, ability, natural, ctx);
        }
    }
}

fn afflict(
    _attacker: &mut Monster,
    target: &mut Monster,
    ability: SpecialAbility,
    _natural: u32,
    ctx: &mut FightContext,
) {
    try_afflict(target, ability, ctx);
}

fn swallow(
    _attacker: &mut Monster,
    target: &mut Monster,
    ability: SpecialAbility,
    natural: u32,
    ctx: &mut FightContext,
) {
    if natural == 20 {
        try_afflict(target, ability, ctx);
    }
}

fn energy_drain(
    _attacker: &mut Monster,
    target: &mut Monster,
    ability: SpecialAbility,
    _natural: u32,
    ctx: &mut FightContext,
) {
    if target.is_undead() {
        return;
    }
    let levels = ability.param.max(1) as u32;
    target.drain_levels(levels);
    narrate!(ctx, "{} loses {} level(s)", target.race, levels);
}

fn strength_drain(
    _attacker: &mut Monster,
    target: &mut Monster,
    ability: SpecialAbility,
    _natural: u32,
    ctx: &mut FightContext,
) {
    if target.is_undead() {
        return;
    }
    let points = ability.param.clamp(1, u8::MAX as i32) as u8;
    target.drain_strength(points);
    narrate!(ctx, "{} loses {} strength", target.race, points);
}

fn immolate(
    _attacker: &mut Monster,
    target: &mut Monster,
    ability: SpecialAbility,
    _natural: u32,
    ctx: &mut FightContext,
) {
    if target.is_immune_to(EnergyType::Fire) {
        return;
    }
    let burn = Dice::new(ability.param.max(1) as u32, 6).roll(ctx.rng);
    let dealt = target.take_damage(burn);
    narrate!(ctx, "{} burns for {}", target.race, dealt);
}

fn constrict(
    attacker: &mut Monster,
    target: &mut Monster,
    _ability: SpecialAbility,
    _natural: u32,
    ctx: &mut FightContext,
) {
    if attacker.host.is_none() {
        attacker.host = Some(target.id);
        narrate!(ctx, "{} coils around {}", attacker.race, target.race);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FightConfig;
    use crate::monster::{Character, ClassKind, MonsterId};
    use crate::rng::GameRng;
    use crate::saves::SavingThrows;

    fn hopeless_poisoner() -> Monster {
        Monster::basic("Spider", 6, 2).with_special(SpecialAbility::new(SpecialType::Poison, 40))
    }

    #[test]
    fn test_poison_rides_final_attack_only() {
        let mut rng = GameRng::new(3);
        let config = FightConfig::default();
        let saves = SavingThrows::formula();
        let mut ctx = FightContext::new(&mut rng, &config, &saves);
        let mut spider = hopeless_poisoner();
        let mut victim = Monster::basic("Orc", 6, 1).with_hit_points(50);

        trigger(&mut spider, &mut victim, 12, false, &mut ctx);
        assert!(!victim.has_condition(SpecialType::Poison));

        trigger(&mut spider, &mut victim, 12, true, &mut ctx);
        assert!(victim.has_condition(SpecialType::Poison));
    }

    #[test]
    fn test_swallowing_needs_earlier_natural_twenty() {
        let mut rng = GameRng::new(3);
        let config = FightConfig::default();
        let saves = SavingThrows::formula();
        let mut ctx = FightContext::new(&mut rng, &config, &saves);
        let mut worm = Monster::basic("Purple Worm", 6, 15)
            .with_special(SpecialAbility::new(SpecialType::Swallowing, 40));
        let mut victim = Monster::basic("Orc", 6, 1).with_hit_points(50);

        trigger(&mut worm, &mut victim, 20, true, &mut ctx);
        trigger(&mut worm, &mut victim, 19, false, &mut ctx);
        assert!(!victim.has_condition(SpecialType::Swallowing));

        trigger(&mut worm, &mut victim, 20, false, &mut ctx);
        assert!(victim.has_condition(SpecialType::Swallowing));
    }

    #[test]
    fn test_constriction_attaches_once() {
        let mut rng = GameRng::new(3);
        let config = FightConfig::default();
        let saves = SavingThrows::formula();
        let mut ctx = FightContext::new(&mut rng, &config, &saves);
        let mut snake = Monster::basic("Python", 6, 5)
            .with_special(SpecialAbility::of(SpecialType::Constriction));
        let mut first = Monster::basic("Orc", 6, 1);
        first.id = MonsterId(3);
        let mut second = Monster::basic("Orc", 6, 1);
        second.id = MonsterId(4);
        trigger(&mut snake, &mut first, 10, true, &mut ctx);
        trigger(&mut snake, &mut second, 10, true, &mut ctx);
        assert_eq!(snake.host, Some(MonsterId(3)));
    }

    #[test]
    fn test_drains_spare_undead() {
        let mut rng = GameRng::new(3);
        let config = FightConfig::default();
        let saves = SavingThrows::formula();
        let mut ctx = FightContext::new(&mut rng, &config, &saves);
        let mut wight = Monster::basic("Wight", 5, 3)
            .with_special(SpecialAbility::new(SpecialType::EnergyDrain, 1));
        let mut skeleton = Monster::basic("Skeleton", 7, 2)
            .with_special(SpecialAbility::of(SpecialType::Undead));
        let mut hero = Monster::basic("Hero", 4, 4).with_hit_points(20);
        trigger(&mut wight, &mut skeleton, 10, true, &mut ctx);
        trigger(&mut wight, &mut hero, 10, true, &mut ctx);
        assert_eq!(skeleton.level(), 2);
        assert_eq!(hero.level(), 3);
    }

    #[test]
    fn test_immolation_burns_unless_fire_immune() {
        let mut rng = GameRng::new(5);
        let config = FightConfig::default();
        let saves = SavingThrows::formula();
        let mut ctx = FightContext::new(&mut rng, &config, &saves);
        let mut elemental = Monster::basic("Fire Elemental", 2, 8)
            .with_special(SpecialAbility::new(SpecialType::Immolation, 2));
        let mut orc = Monster::basic("Orc", 6, 1).with_hit_points(50);
        let mut salamander = Monster::basic("Salamander", 5, 4)
            .with_special(SpecialAbility::of(SpecialType::FireImmunity))
            .with_hit_points(50);

        trigger(&mut elemental, &mut orc, 10, false, &mut ctx);
        assert_eq!(orc.hit_points(), 50);
        trigger(&mut elemental, &mut orc, 10, true, &mut ctx);
        let burned = 50 - orc.hit_points();
        assert!((2..=12).contains(&burned));

        trigger(&mut elemental, &mut salamander, 10, true, &mut ctx);
        assert_eq!(salamander.hit_points(), 50);
    }

    #[test]
    fn test_strength_drain_weakens_characters() {
        let mut rng = GameRng::new(5);
        let config = FightConfig::default();
        let saves = SavingThrows::formula();
        let mut ctx = FightContext::new(&mut rng, &config, &saves);
        let mut shadow = Monster::basic("Shadow", 7, 3)
            .with_special(SpecialAbility::new(SpecialType::StrengthDrain, 3));
        let mut hero =
            Monster::basic("Human", 4, 3).with_character(Character::new(ClassKind::Fighter, 3));
        let strength = |m: &Monster| m.character.as_ref().map(|c| c.abilities.strength);
        assert_eq!(strength(&hero), Some(10));

        trigger(&mut shadow, &mut hero, 10, true, &mut ctx);
        assert_eq!(strength(&hero), Some(7));

        let mut lich = Monster::basic("Lich", 0, 11)
            .with_special(SpecialAbility::of(SpecialType::Undead))
            .with_character(Character::new(ClassKind::Wizard, 11));
        trigger(&mut shadow, &mut lich, 10, true, &mut ctx);
        assert_eq!(strength(&lich), Some(10));
    }

    #[test]
    fn test_sapping_strands_ride_earlier_attacks() {
        let mut rng = GameRng::new(5);
        let config = FightConfig::default();
        let saves = SavingThrows::formula();
        let mut ctx = FightContext::new(&mut rng, &config, &saves);
        let mut roper = Monster::basic("Roper", 0, 10)
            .with_special(SpecialAbility::new(SpecialType::SappingStrands, 40));
        let mut victim = Monster::basic("Orc", 6, 1).with_hit_points(50);

        trigger(&mut roper, &mut victim, 12, true, &mut ctx);
        assert!(!victim.has_condition(SpecialType::SappingStrands));

        trigger(&mut roper, &mut victim, 12, false, &mut ctx);
        assert!(victim.has_condition(SpecialType::SappingStrands));
    }
}
