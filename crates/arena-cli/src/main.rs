//! arena - batch fight runner
//!
//! Loads a JSON scenario with two parties and runs fights between freshly
//! spawned copies of them.
//!
//! # Usage
//!
//! ```bash
//! # One narrated fight
//! cargo run -p arena-cli -- run --scenario crates/arena-cli/scenarios/patrol.json --seed 7
//!
//! # A thousand fights in parallel, tally as JSON
//! cargo run -p arena-cli -- batch --count 1000 --json \
//!     --scenario crates/arena-cli/scenarios/patrol.json
//!
//! # Report unknown special-ability names
//! cargo run -p arena-cli -- check --scenario crates/arena-cli/scenarios/lair.json
//! ```
//!
//! Results go to stdout, logs to stderr.

mod batch;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::batch::{BatchSummary, run_batch, run_fight};
use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Resolve tabletop fantasy fights between two parties")]
#[command(version)]
struct Cli {
    /// Enable debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one fight with play-by-play narration
    Run {
        /// Scenario file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Print only the outcome
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run a batch of fights in parallel
    Batch {
        /// Scenario file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Number of fights
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Seed of the first fight; fight i uses seed + i
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Worker threads (0 = rayon default)
        #[arg(short, long, default_value = "0")]
        parallel: usize,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Override the scenario's round cap
        #[arg(long)]
        max_rounds: Option<u32>,
    },

    /// Build a scenario's parties and report data problems
    Check {
        /// Scenario file
        #[arg(short, long)]
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Run { scenario, seed, quiet } => cmd_run(scenario, seed, quiet),
        Commands::Batch {
            scenario,
            count,
            seed,
            parallel,
            json,
            max_rounds,
        } => cmd_batch(scenario, count, seed, parallel, json, max_rounds),
        Commands::Check { scenario } => cmd_check(scenario),
    }
}

fn cmd_run(path: PathBuf, seed: u64, quiet: bool) -> Result<()> {
    let scenario = Scenario::load(&path)?;
    let (a, b, _) = scenario.prepare()?;
    let config = scenario.config.clone().with_play_by_play(!quiet);
    info!(scenario = %scenario.name, seed, "starting fight");

    let record = run_fight(&a, &b, &config, seed)?;
    let winner = match record.outcome.winner {
        arena_core::Side::A => &a.name,
        arena_core::Side::B => &b.name,
    };
    println!(
        "{} wins after {} round(s) ({} of {} {} and {} of {} {} standing){}",
        winner,
        record.outcome.rounds,
        record.survivors_a,
        a.head_count(),
        a.name,
        record.survivors_b,
        b.head_count(),
        b.name,
        if record.outcome.timed_out { ", round cap reached" } else { "" },
    );
    Ok(())
}

fn cmd_batch(
    path: PathBuf,
    count: u32,
    seed: u64,
    parallel: usize,
    json: bool,
    max_rounds: Option<u32>,
) -> Result<()> {
    let scenario = Scenario::load(&path)?;
    let (a, b, _) = scenario.prepare()?;
    let mut config = scenario.config.clone().with_play_by_play(false);
    if let Some(rounds) = max_rounds {
        config = config.with_max_rounds(rounds);
    }

    if parallel > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(parallel)
            .build_global()
            .context("configuring worker threads")?;
    }

    info!(scenario = %scenario.name, count, seed, "starting batch");
    let started = std::time::Instant::now();
    let records = run_batch(&a, &b, &config, count, seed)?;
    let summary = BatchSummary::from_records(&records);
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "batch finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!(
        "{} ({} fights, seeds {}..{})",
        scenario.name,
        summary.fights,
        seed,
        seed.wrapping_add(u64::from(count))
    );
    for (name, wins, rate) in [
        (&a.name, summary.wins_a, summary.win_rate_a()),
        (&b.name, summary.wins_b, summary.win_rate_b()),
    ] {
        println!("  {:<20} {:>6} wins ({:>5.1}%)", name, wins, rate * 100.0);
    }
    println!("  rounds: mean {:.1}, max {}", summary.mean_rounds, summary.max_rounds);
    println!(
        "  first mover won {}, round cap hit {}",
        summary.first_mover_wins, summary.timeouts
    );
    Ok(())
}

fn cmd_check(path: PathBuf) -> Result<()> {
    let scenario = Scenario::load(&path)?;
    let (a, b, unknown) = scenario.prepare()?;
    println!(
        "{}: {} ({}) vs {} ({})",
        scenario.name,
        a.name,
        a.head_count(),
        b.name,
        b.head_count()
    );
    if unknown.is_empty() {
        println!("all special abilities recognized");
    } else {
        println!("unknown special abilities: {}", unknown.join(", "));
    }
    Ok(())
}
