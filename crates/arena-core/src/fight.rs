//! The fight state machine
//!
//! A [`FightManager`] resolves exactly one fight between two parties:
//! Init, then PreMelee, then the round loop, then Resolved. It is not
//! reusable once resolved.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use crate::combat::{special_attack, take_turn, FightContext, BREATH_CHARGES};
use crate::config::FightConfig;
use crate::error::{ArenaError, Result};
use crate::monster::Monster;
use crate::party::Party;
use crate::rng::GameRng;
use crate::saves::SavingThrows;
use crate::special::SpecialType;

/// One of the two parties in a fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// What a fight produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightOutcome {
    pub winner: Side,
    pub rounds: u32,
    /// The side that won initiative also won the fight
    pub first_mover_won: bool,
    /// The round cap ended the fight with both sides standing
    pub timed_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    Init,
    PreMelee,
    RoundLoop,
    Resolved,
}

/// Orchestrates one fight between two borrowed parties
pub struct FightManager<'p> {
    a: &'p mut Party,
    b: &'p mut Party,
    config: FightConfig,
    saves: SavingThrows,
    phase: Phase,
    outcome: Option<FightOutcome>,
}

impl<'p> FightManager<'p> {
    /// Set up a fight. Both parties need live members.
    pub fn new(a: &'p mut Party, b: &'p mut Party, config: FightConfig) -> Result<Self> {
        for party in [&*a, &*b] {
            if !party.is_live() {
                return Err(ArenaError::EmptyParty(party.name().to_string()));
            }
        }
        let saves = SavingThrows::from_policy(config.save_policy);
        Ok(Self {
            a,
            b,
            config,
            saves,
            phase: Phase::Init,
            outcome: None,
        })
    }

    /// Use an externally loaded saving throw table
    pub fn with_saving_throws(mut self, saves: SavingThrows) -> Self {
        self.saves = saves;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<FightOutcome> {
        self.outcome
    }

    /// Run the fight to completion
    pub fn fight(&mut self, rng: &mut GameRng) -> Result<FightOutcome> {
        if self.phase != Phase::Init {
            return Err(ArenaError::FightResolved);
        }

        // Init: initiative and preparation
        let first = if rng.coin_flip() { Side::A } else { Side::B };
        let order = [first, first.other()];
        let fallen_before = [self.a.fallen().len(), self.b.fallen().len()];
        let a = &mut *self.a;
        let b = &mut *self.b;
        let mut ctx = FightContext::new(rng, &self.config, &self.saves);
        debug!(party_a = %a.name(), party_b = %b.name(), %first, "fight begins");
        narrate!(ctx, "{} vs {}: {} moves first", a.name(), b.name(), first);

        for side in order {
            let (friends, enemies) = sides(a, b, side);
            prepare(friends, enemies, &mut ctx);
        }

        // PreMelee: one pass of ranged and area specials
        self.phase = Phase::PreMelee;
        for side in order {
            let (friends, enemies) = sides(a, b, side);
            for index in 0..friends.len() {
                if !enemies.has_eligible() {
                    break;
                }
                special_attack(index, friends, enemies, &mut ctx)?;
            }
            friends.muster();
        }
        a.sweep_fallen();
        b.sweep_fallen();

        // RoundLoop
        self.phase = Phase::RoundLoop;
        ctx.in_melee = true;
        let mut rounds = 0;
        while a.is_live() && b.is_live() && rounds < self.config.max_rounds {
            rounds += 1;
            ctx.round = rounds;
            a.reset_round();
            b.reset_round();
            for side in order {
                let (friends, enemies) = sides(a, b, side);
                for index in 0..friends.len() {
                    if !enemies.has_eligible() {
                        break;
                    }
                    take_turn(index, friends, enemies, &mut ctx)?;
                }
                friends.muster();
            }
            a.sweep_fallen();
            b.sweep_fallen();
            narrate!(
                ctx,
                "end of round {}: {} {} standing, {} {} standing",
                rounds,
                a.len(),
                a.name(),
                b.len(),
                b.name()
            );
        }

        // Resolved: compare the share of each side still standing
        let timed_out = a.is_live() && b.is_live();
        if timed_out {
            warn!(rounds, "fight hit the round cap");
        }
        let ratio_a = a.live_ratio(fallen_before[0]);
        let ratio_b = b.live_ratio(fallen_before[1]);
        let winner = if ratio_a > ratio_b {
            Side::A
        } else if ratio_b > ratio_a {
            Side::B
        } else {
            debug!(ratio_a, ratio_b, "tie broken by coin flip");
            if ctx.rng.coin_flip() { Side::A } else { Side::B }
        };
        let winner_name = if winner == Side::A { a.name() } else { b.name() };
        narrate!(ctx, "{} wins after {} round(s)", winner_name, rounds);

        let outcome = FightOutcome {
            winner,
            rounds,
            first_mover_won: winner == first,
            timed_out,
        };
        debug!(%winner, rounds, timed_out, "fight resolved");
        self.phase = Phase::Resolved;
        self.outcome = Some(outcome);
        Ok(outcome)
    }
}

fn sides<'x>(a: &'x mut Party, b: &'x mut Party, side: Side) -> (&'x mut Party, &'x mut Party) {
    match side {
        Side::A => (a, b),
        Side::B => (b, a),
    }
}

/// Draw weapons against a random enemy, fill breath charges, and bring in
/// any summoned minions
fn prepare(friends: &mut Party, enemies: &Party, ctx: &mut FightContext) {
    let mut minions = Vec::new();
    for member in friends.live_mut() {
        if let Some(enemy) = enemies.random_member(ctx.rng).and_then(|i| enemies.get(i)) {
            member.draw_best_weapon(enemy);
        }
        enchant_weapon(member, ctx);
        if member.breath_weapon().is_some() {
            member.breath_charges = BREATH_CHARGES;
        }
        let count = member.special_param(SpecialType::Summoning);
        if count > 0 {
            let template = match &member.minion {
                Some(minion) => minion.as_ref().clone(),
                None => {
                    warn!(summoner = %member.race, "no summon template, using a generic minion");
                    Monster::summoned_minion(member.level() / 2)
                }
            };
            for _ in 0..count {
                minions.push(template.spawn(ctx.rng));
            }
        }
    }
    for minion in minions {
        friends.reinforce(minion);
    }
    friends.muster();
}

/// Characters wielding a mundane weapon may turn out to carry a +1 one
fn enchant_weapon(member: &mut Monster, ctx: &mut FightContext) {
    let Some(level) = member.character.as_ref().map(|c| c.level) else {
        return;
    };
    let chance = ctx.config.magic_per_level.saturating_mul(level).min(100);
    if chance == 0 || member.attack.magic_bonus > 0 || !ctx.rng.percent(chance) {
        return;
    }
    let attack = &mut member.attack;
    attack.magic_bonus = 1;
    attack.bonus += 1;
    attack.damage.addition += 1;
    debug!(member = %member.race, "carries a magic weapon");
}
