//! Fight configuration
//!
//! Passed by value into [`crate::FightManager`]; there is no global rules
//! state, so fights with different settings can run side by side.

use serde::{Deserialize, Serialize};

use crate::saves::SavePolicyKind;

/// Rules toggles for one fight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FightConfig {
    /// Fighters may sweep through low-level opponents
    pub sweep_attacks: bool,
    /// Narrate the fight on the `arena::pbp` tracing target
    pub play_by_play: bool,
    pub save_policy: SavePolicyKind,
    /// Round cap against stalemates
    pub max_rounds: u32,
    /// Melee attacks a target absorbs in a round before others are preferred
    pub max_melee_per_target: u32,
    /// Percent per character level that a character fighting with a
    /// mundane weapon carries a +1 one instead
    pub magic_per_level: u32,
}

impl Default for FightConfig {
    fn default() -> Self {
        Self {
            sweep_attacks: true,
            play_by_play: false,
            save_policy: SavePolicyKind::Formula,
            max_rounds: 100,
            max_melee_per_target: 8,
            magic_per_level: 0,
        }
    }
}

impl FightConfig {
    pub fn with_play_by_play(mut self, on: bool) -> Self {
        self.play_by_play = on;
        self
    }

    pub fn with_sweep_attacks(mut self, on: bool) -> Self {
        self.sweep_attacks = on;
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_magic_per_level(mut self, percent: u32) -> Self {
        self.magic_per_level = percent;
        self
    }
}
