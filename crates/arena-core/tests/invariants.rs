//! Property tests for combatant and party invariants

use arena_core::{Character, ClassKind, GameRng, Monster, Party, SpecialAbility, SpecialType};
use proptest::prelude::*;

/// A hit-point change: positive damages, negative heals
fn arb_change() -> impl Strategy<Value = i32> {
    -300i32..300i32
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Healthy,
    Dead,
    Disabled(SpecialType),
    Harmless(SpecialType),
    Drained,
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        3 => Just(Shape::Healthy),
        1 => Just(Shape::Dead),
        1 => prop::sample::select(vec![
            SpecialType::Poison,
            SpecialType::Paralysis,
            SpecialType::Sleep,
            SpecialType::Hold,
            SpecialType::Charm,
            SpecialType::Swallowing,
        ])
        .prop_map(Shape::Disabled),
        1 => prop::sample::select(vec![
            SpecialType::Slowing,
            SpecialType::Stench,
            SpecialType::Rotting,
        ])
        .prop_map(Shape::Harmless),
        1 => Just(Shape::Drained),
    ]
}

fn member(shape: Shape) -> Monster {
    let mut m = Monster::basic("Soldier", 5, 2)
        .with_character(Character::new(ClassKind::Fighter, 2))
        .with_hit_points(10);
    match shape {
        Shape::Healthy => {}
        Shape::Dead => {
            m.take_damage(10);
        }
        Shape::Disabled(kind) | Shape::Harmless(kind) => {
            m.conditions.add(SpecialAbility::new(kind, 0));
        }
        Shape::Drained => m.drain_strength(50),
    }
    m
}

fn expected_eligible(shape: Shape) -> bool {
    matches!(shape, Shape::Healthy | Shape::Harmless(_))
}

proptest! {
    #[test]
    fn hit_points_stay_clamped(
        max_hp in 0i32..200,
        changes in prop::collection::vec(arb_change(), 0..40),
    ) {
        let mut m = Monster::basic("Orc", 6, 1).with_hit_points(max_hp);
        for change in changes {
            if change >= 0 {
                m.take_damage(change);
            } else {
                m.heal(-change);
            }
            prop_assert!(m.hit_points() >= 0);
            prop_assert!(m.hit_points() <= m.max_hit_points());
        }
        m.set_hit_points(max_hp + 50);
        prop_assert_eq!(m.hit_points(), m.max_hit_points());
        m.set_hit_points(-5);
        prop_assert_eq!(m.hit_points(), 0);
    }

    #[test]
    fn melee_targets_are_always_eligible(
        shapes in prop::collection::vec(arb_shape(), 1..12),
        seed in any::<u64>(),
        crowding in prop::collection::vec(0u32..12, 12),
    ) {
        let mut party = Party::from_members("Targets", shapes.iter().copied().map(member));
        for (m, times) in party.live_mut().iter_mut().zip(&crowding) {
            m.times_meleed = *times;
        }
        let any_eligible = shapes.iter().copied().any(expected_eligible);
        prop_assert_eq!(party.has_eligible(), any_eligible);

        let mut rng = GameRng::new(seed);
        for _ in 0..20 {
            match party.random_melee_target(&mut rng, 8) {
                Some(index) => {
                    prop_assert!(expected_eligible(shapes[index]));
                    prop_assert!(party.live()[index].in_fight());
                }
                None => prop_assert!(!any_eligible),
            }
        }
        for index in party.sample_targets(&mut rng, shapes.len()) {
            prop_assert!(expected_eligible(shapes[index]));
        }

        let moved = party.sweep_fallen();
        prop_assert_eq!(moved, shapes.iter().filter(|s| !expected_eligible(**s)).count());
        prop_assert!(party.iter().all(Monster::in_fight));
    }
}
