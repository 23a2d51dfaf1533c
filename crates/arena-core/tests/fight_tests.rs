use arena_core::combat::{single_attack, take_turn, BREATH_CHARGES};
use arena_core::{
    Attack, Dice, FightConfig, FightContext, FightManager, FightOutcome, GameRng, Monster,
    MonsterDefinition, Party, SavingThrows, Side, SpecialAbility, SpecialType,
};

fn swordsman(name: &str) -> Monster {
    Monster::new(name, 6, 9, Dice::hit_dice(1, 0), Attack::new("Sword", 1, 1, Dice::new(1, 6)))
}

fn run(a: &mut Party, b: &mut Party, config: FightConfig, seed: u64) -> FightOutcome {
    let mut rng = GameRng::new(seed);
    FightManager::new(a, b, config)
        .expect("both parties have members")
        .fight(&mut rng)
        .expect("fight runs once")
}

fn spawned(name: &str, prototype: &Monster, count: usize, rng: &mut GameRng) -> Party {
    Party::from_members(name, (0..count).map(|_| prototype.spawn(rng)))
}

// ============================================================================
// Determinism and termination
// ============================================================================

#[test]
fn test_identical_duel_is_reproducible() {
    let play = |seed| {
        let mut a = Party::from_members("A", [swordsman("Swordsman")]);
        let mut b = Party::from_members("B", [swordsman("Swordsman")]);
        run(&mut a, &mut b, FightConfig::default(), seed)
    };
    for seed in 0..20 {
        assert_eq!(play(seed), play(seed));
    }
}

#[test]
fn test_spawned_parties_are_reproducible() {
    let play = |seed| {
        let mut rng = GameRng::new(seed);
        let mut a = spawned("A", &swordsman("Guard"), 4, &mut rng);
        let mut b = spawned("B", &Monster::basic("Gnoll", 5, 2), 3, &mut rng);
        let outcome = run(&mut a, &mut b, FightConfig::default(), seed);
        (outcome, a.total_kills(), b.total_kills())
    };
    assert_eq!(play(77), play(77));
}

#[test]
fn test_fights_end_within_round_cap() {
    let config = FightConfig::default().with_max_rounds(30);
    for seed in 0..40 {
        let mut rng = GameRng::new(seed);
        let mut a = spawned("A", &swordsman("Guard"), 1 + seed as usize % 4, &mut rng);
        let mut b = spawned("B", &Monster::basic("Ogre", 5, 4), 1, &mut rng);
        let outcome = run(&mut a, &mut b, config.clone(), seed);
        assert!(outcome.rounds <= 30);
        if !outcome.timed_out {
            let winner = if outcome.winner == Side::A { &a } else { &b };
            assert!(winner.is_live());
        }
    }
}

#[test]
fn test_stalemate_times_out() {
    let golem = || {
        Monster::basic("Iron Golem", 3, 8)
            .with_special(SpecialAbility::of(SpecialType::WeaponImmunity))
    };
    for seed in 0..10 {
        let mut a = Party::from_members("A", [golem()]);
        let mut b = Party::from_members("B", [golem()]);
        let outcome = run(&mut a, &mut b, FightConfig::default().with_max_rounds(12), seed);
        assert!(outcome.timed_out);
        assert_eq!(outcome.rounds, 12);
        assert!(a.is_live() && b.is_live());
    }
}

// ============================================================================
// Winner determination
// ============================================================================

fn dead(name: &str) -> Monster {
    let mut corpse = swordsman(name);
    corpse.take_damage(1000);
    corpse
}

#[test]
fn test_wiped_out_side_never_wins() {
    for seed in 0..30 {
        let mut a = Party::from_members("Ghosts", [dead("Ghost"), dead("Ghost")]);
        let mut b = Party::from_members("Living", [swordsman("Guard")]);
        let outcome = run(&mut a, &mut b, FightConfig::default(), seed);
        assert_eq!(outcome.winner, Side::B);
        assert_eq!(outcome.rounds, 0);
        assert!(!a.is_live());
    }
}

#[test]
fn test_mutual_wipeout_is_a_coin_flip() {
    let mut wins = [0u32; 2];
    for seed in 0..60 {
        let mut a = Party::from_members("A", [dead("Corpse")]);
        let mut b = Party::from_members("B", [dead("Corpse")]);
        let outcome = run(&mut a, &mut b, FightConfig::default(), seed);
        assert!(!outcome.timed_out);
        match outcome.winner {
            Side::A => wins[0] += 1,
            Side::B => wins[1] += 1,
        }
    }
    assert!(wins[0] > 0 && wins[1] > 0);
}

#[test]
fn test_second_fight_call_is_refused() {
    let mut a = Party::from_members("A", [swordsman("Guard")]);
    let mut b = Party::from_members("B", [swordsman("Guard")]);
    let mut rng = GameRng::new(1);
    let mut manager = FightManager::new(&mut a, &mut b, FightConfig::default()).unwrap();
    manager.fight(&mut rng).unwrap();
    assert!(manager.fight(&mut rng).is_err());
}

// ============================================================================
// Poison
// ============================================================================

fn spider(strength: i32) -> Monster {
    let mut spider = Monster::basic("Giant Spider", 4, 2)
        .with_special(SpecialAbility::new(SpecialType::Poison, strength));
    spider.attack = Attack::new("Bite", 1, 30, Dice::flat(0));
    spider
}

#[test]
fn test_final_hit_poisons_with_penalty() {
    let config = FightConfig::default();
    let saves = SavingThrows::formula();
    let mut poisoned = 0;
    for seed in 0..200 {
        let mut rng = GameRng::new(seed);
        let mut ctx = FightContext::new(&mut rng, &config, &saves);
        let mut attacker = spider(2);
        let attack = attacker.attack.clone();
        let mut victim = swordsman("Guard").with_hit_points(50);
        let result = single_attack(&mut attacker, &attack, &mut victim, true, &mut ctx);
        assert!(result.hit);
        if let Some(condition) = victim.conditions.get(SpecialType::Poison) {
            poisoned += 1;
            assert_eq!(condition.param, 2);
            assert!(victim.conditions.any_disabling());
            assert!(victim.is_hors_de_combat());
            assert!(result.felled);
        }
    }
    // A first-level victim saves vs Death on 14+ at -2: most bites land
    assert!(poisoned > 80, "only {poisoned} of 200 bites poisoned");
}

#[test]
fn test_earlier_hits_never_poison() {
    let config = FightConfig::default();
    let saves = SavingThrows::formula();
    for seed in 0..100 {
        let mut rng = GameRng::new(seed);
        let mut ctx = FightContext::new(&mut rng, &config, &saves);
        let mut attacker = spider(2);
        let attack = attacker.attack.clone();
        let mut victim = swordsman("Guard").with_hit_points(50);
        single_attack(&mut attacker, &attack, &mut victim, false, &mut ctx);
        assert!(victim.conditions.is_empty());
    }
}

#[test]
fn test_poisoned_victim_leaves_the_fight() {
    let mut a = Party::from_members("Spider", [spider(20)]);
    let mut b = Party::from_members("Guards", [swordsman("Guard").with_hit_points(50)]);
    let outcome = run(&mut a, &mut b, FightConfig::default(), 9);
    assert_eq!(outcome.winner, Side::A);
    assert_eq!(b.fallen().len(), 1);
    assert!(b.fallen()[0].has_condition(SpecialType::Poison));
    assert_eq!(a.live()[0].kills, 1);
}

// ============================================================================
// Breath weapons
// ============================================================================

#[test]
fn test_breath_charges_only_run_down() {
    let config = FightConfig::default();
    let saves = SavingThrows::formula();
    let mut rng = GameRng::new(31);
    let mut ctx = FightContext::new(&mut rng, &config, &saves);
    ctx.in_melee = true;

    let mut dragon = Monster::basic("Blue Dragon", 2, 9)
        .with_special(SpecialAbility::of(SpecialType::VoltBreath))
        .with_hit_points(40);
    dragon.breath_charges = BREATH_CHARGES;
    let mut dragons = Party::from_members("Dragon", [dragon]);
    let mut walls = Party::from_members(
        "Walls",
        [Monster::basic("Wall", 0, 1)
            .with_special(SpecialAbility::of(SpecialType::VoltImmunity))
            .with_special(SpecialAbility::of(SpecialType::WeaponImmunity))],
    );

    let mut last = BREATH_CHARGES;
    for round in 1..=200 {
        ctx.round = round;
        take_turn(0, &mut dragons, &mut walls, &mut ctx).unwrap();
        let charges = dragons.live()[0].breath_charges;
        assert!(charges <= last);
        last = charges;
    }
    assert_eq!(last, 0);
}

#[test]
fn test_long_fight_never_exceeds_charges() {
    let mut dragon = Monster::basic("Red Dragon", -1, 10)
        .with_special(SpecialAbility::of(SpecialType::FireBreath))
        .with_special(SpecialAbility::of(SpecialType::WeaponImmunity))
        .with_hit_points(60);
    dragon.attack = Attack::new("Claw", 1, -100, Dice::flat(0));
    let mut a = Party::from_members("Dragon", [dragon]);
    let mut b = Party::from_members(
        "Salamanders",
        (0..3).map(|_| {
            Monster::basic("Salamander", 5, 4)
                .with_special(SpecialAbility::of(SpecialType::FireImmunity))
                .with_special(SpecialAbility::of(SpecialType::WeaponImmunity))
        }),
    );
    let outcome = run(&mut a, &mut b, FightConfig::default().with_max_rounds(60), 4);
    assert!(outcome.timed_out);
    assert_eq!(a.live()[0].breath_charges, 0);
}

// ============================================================================
// Definitions, spells and summons in whole fights
// ============================================================================

#[test]
fn test_fight_from_definitions() {
    let hobgoblin: MonsterDefinition = serde_json::from_str(
        r#"{
            "race": "Hobgoblin",
            "ac": 5,
            "hit_dice": "1+1",
            "attack": { "name": "Spear", "damage": "1d6" },
            "specials": ["Berserking", "Gnashing"]
        }"#,
    )
    .unwrap();
    let (prototype, unknown) = hobgoblin.build().unwrap();
    assert_eq!(unknown, vec!["Gnashing".to_string()]);

    let mut rng = GameRng::new(12);
    let mut a = spawned("Hobgoblins", &prototype, 3, &mut rng);
    let mut b = spawned("Guards", &swordsman("Guard"), 3, &mut rng);
    let outcome = run(&mut a, &mut b, FightConfig::default(), 12);
    assert!(outcome.rounds >= 1);
    assert!(a.is_live() != b.is_live() || outcome.timed_out);
}

#[test]
fn test_wizard_opens_with_sleep() {
    let wizard: MonsterDefinition = serde_json::from_str(
        r#"{
            "race": "Human",
            "ac": 9,
            "hit_dice": "1d4",
            "attack": { "name": "Dagger", "damage": "1d4" },
            "character": { "class": "Wizard", "level": 1, "spells_memorized": ["Sleep"] }
        }"#,
    )
    .unwrap();
    let (wizard, _) = wizard.build().unwrap();

    let config = FightConfig::default().with_max_rounds(0);
    let mut slept = 0;
    for seed in 0..20 {
        let mut a = Party::from_members("Wizard", [wizard.clone()]);
        let mut b = Party::from_members("Kobolds", (0..3).map(|_| Monster::basic("Kobold", 7, 1)));
        let outcome = run(&mut a, &mut b, config.clone(), seed);
        slept += b.fallen().len();
        if !b.is_live() {
            assert_eq!(outcome.winner, Side::A);
        }
    }
    // The area reaches three victims and allows no save
    assert_eq!(slept, 60);
}
