//! Scenario files
//!
//! A scenario names two parties, each a list of squads (a combatant
//! definition and a head count), plus an optional fight configuration.
//! Prototypes are built once; every fight spawns fresh copies.

use std::path::Path;

use anyhow::{Context, Result, bail};
use arena_core::{FightConfig, GameRng, Monster, MonsterDefinition, Party};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

fn default_count() -> usize {
    1
}

/// A group of identical combatants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Squad {
    #[serde(default = "default_count")]
    pub count: usize,
    pub monster: MonsterDefinition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyDefinition {
    pub name: String,
    pub squads: Vec<Squad>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: FightConfig,
    pub party_a: PartyDefinition,
    pub party_b: PartyDefinition,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let mut scenario: Scenario = serde_json::from_str(&text)
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        if scenario.name.is_empty() {
            scenario.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(scenario)
    }

    /// Build both rosters. Unknown special names are logged and returned.
    pub fn prepare(&self) -> Result<(Roster, Roster, Vec<String>)> {
        let mut unknown = Vec::new();
        let a = Roster::build(&self.party_a, &mut unknown)?;
        let b = Roster::build(&self.party_b, &mut unknown)?;
        Ok((a, b, unknown))
    }
}

/// Built prototypes for one side
#[derive(Debug, Clone)]
pub struct Roster {
    pub name: String,
    squads: Vec<(Monster, usize)>,
}

impl Roster {
    fn build(definition: &PartyDefinition, unknown: &mut Vec<String>) -> Result<Self> {
        let mut squads = Vec::with_capacity(definition.squads.len());
        for squad in &definition.squads {
            let (prototype, missing) = squad.monster.build().with_context(|| {
                format!("building {} in {}", squad.monster.race, definition.name)
            })?;
            for name in missing {
                warn!(
                    party = %definition.name,
                    race = %prototype.race,
                    special = %name,
                    "unknown special ability"
                );
                unknown.push(name);
            }
            debug!(party = %definition.name, %prototype, count = squad.count, "squad ready");
            squads.push((prototype, squad.count));
        }
        if squads.iter().all(|(_, count)| *count == 0) {
            bail!("party {} has no members", definition.name);
        }
        Ok(Self {
            name: definition.name.clone(),
            squads,
        })
    }

    pub fn head_count(&self) -> usize {
        self.squads.iter().map(|(_, count)| count).sum()
    }

    /// Fresh party for one fight, hit points re-rolled
    pub fn spawn(&self, rng: &mut GameRng) -> Party {
        let mut party = Party::new(self.name.clone());
        for (prototype, count) in &self.squads {
            for _ in 0..*count {
                party.push(prototype.spawn(rng));
            }
        }
        party.shuffle(rng);
        party
    }
}
