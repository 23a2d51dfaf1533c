//! Batch runner
//!
//! Runs independent fights in parallel with rayon. Fight `i` gets its own
//! random source seeded `seed + i`, so a batch is reproducible regardless
//! of how the work is scheduled.

use anyhow::{Context, Result};
use arena_core::{FightConfig, FightManager, FightOutcome, GameRng, Side};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scenario::Roster;

/// One fight's result, with the surviving head counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightRecord {
    pub seed: u64,
    pub outcome: FightOutcome,
    pub survivors_a: usize,
    pub survivors_b: usize,
}

/// Run a single fight from freshly spawned parties
pub fn run_fight(a: &Roster, b: &Roster, config: &FightConfig, seed: u64) -> Result<FightRecord> {
    let mut rng = GameRng::new(seed);
    let mut party_a = a.spawn(&mut rng);
    let mut party_b = b.spawn(&mut rng);
    let outcome = FightManager::new(&mut party_a, &mut party_b, config.clone())
        .and_then(|mut manager| manager.fight(&mut rng))
        .with_context(|| format!("fight with seed {seed}"))?;
    debug!(seed, winner = %outcome.winner, rounds = outcome.rounds, "fight done");
    Ok(FightRecord {
        seed,
        outcome,
        survivors_a: party_a.len(),
        survivors_b: party_b.len(),
    })
}

/// Run `count` fights seeded from `seed` upwards
pub fn run_batch(
    a: &Roster,
    b: &Roster,
    config: &FightConfig,
    count: u32,
    seed: u64,
) -> Result<Vec<FightRecord>> {
    (0..count)
        .into_par_iter()
        .map(|i| run_fight(a, b, config, seed.wrapping_add(u64::from(i))))
        .collect()
}

/// Aggregate over a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub fights: u32,
    pub wins_a: u32,
    pub wins_b: u32,
    pub timeouts: u32,
    pub first_mover_wins: u32,
    pub mean_rounds: f64,
    pub max_rounds: u32,
}

impl BatchSummary {
    pub fn from_records(records: &[FightRecord]) -> Self {
        let mut summary = Self::default();
        let mut total_rounds = 0u64;
        for record in records {
            let outcome = &record.outcome;
            summary.fights += 1;
            match outcome.winner {
                Side::A => summary.wins_a += 1,
                Side::B => summary.wins_b += 1,
            }
            summary.timeouts += u32::from(outcome.timed_out);
            summary.first_mover_wins += u32::from(outcome.first_mover_won);
            summary.max_rounds = summary.max_rounds.max(outcome.rounds);
            total_rounds += u64::from(outcome.rounds);
        }
        if summary.fights > 0 {
            summary.mean_rounds = total_rounds as f64 / f64::from(summary.fights);
        }
        summary
    }

    /// Share of fights won by side A
    pub fn win_rate_a(&self) -> f64 {
        f64::from(self.wins_a) / f64::from(self.fights.max(1))
    }

    pub fn win_rate_b(&self) -> f64 {
        f64::from(self.wins_b) / f64::from(self.fights.max(1))
    }
}
