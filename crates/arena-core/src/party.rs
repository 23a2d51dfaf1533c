//! Parties of combatants
//!
//! A party keeps its live members and its fallen members in two ordered
//! lists. Members only move from live to fallen, and only at sweep points
//! between turns, so index-based target loops never see a half-updated
//! party. Summoned reinforcements wait in a queue until the next muster.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::monster::{Monster, MonsterId};
use crate::rng::GameRng;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    name: String,
    live: Vec<Monster>,
    fallen: Vec<Monster>,
    #[serde(default)]
    reinforcements: Vec<Monster>,
    next_id: MonsterId,
}

impl Party {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a party from members, assigning ids in order
    pub fn from_members(
        name: impl Into<String>,
        members: impl IntoIterator<Item = Monster>,
    ) -> Self {
        let mut party = Self::new(name);
        for member in members {
            party.push(member);
        }
        party
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a live member, giving it an id unique within this party
    pub fn push(&mut self, mut member: Monster) -> MonsterId {
        self.next_id = self.next_id.next();
        member.id = self.next_id;
        self.live.push(member);
        self.next_id
    }

    pub fn live(&self) -> &[Monster] {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut [Monster] {
        &mut self.live
    }

    pub fn fallen(&self) -> &[Monster] {
        &self.fallen
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Any member not yet swept onto the fallen list
    pub fn is_live(&self) -> bool {
        !self.live.is_empty()
    }

    /// Any live member still in the fight
    pub fn has_eligible(&self) -> bool {
        self.live.iter().any(Monster::in_fight)
    }

    pub fn in_fight_count(&self) -> usize {
        self.live.iter().filter(|m| m.in_fight()).count()
    }

    pub fn get(&self, index: usize) -> Option<&Monster> {
        self.live.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Monster> {
        self.live.get_mut(index)
    }

    pub fn find(&self, id: MonsterId) -> Option<&Monster> {
        self.live.iter().find(|m| m.id == id)
    }

    pub fn position(&self, id: MonsterId) -> Option<usize> {
        self.live.iter().position(|m| m.id == id)
    }

    fn eligible_indices(&self) -> Vec<usize> {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, m)| m.in_fight())
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of a random member still in the fight
    pub fn random_member(&self, rng: &mut GameRng) -> Option<usize> {
        rng.choose(&self.eligible_indices()).copied()
    }

    /// Index of a random melee target. Members already attacked `crowd_cap`
    /// times this round are only picked when nobody else is eligible.
    pub fn random_melee_target(&self, rng: &mut GameRng, crowd_cap: u32) -> Option<usize> {
        let eligible = self.eligible_indices();
        let uncrowded: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|&i| self.live[i].times_meleed < crowd_cap)
            .collect();
        if uncrowded.is_empty() {
            rng.choose(&eligible).copied()
        } else {
            rng.choose(&uncrowded).copied()
        }
    }

    /// Up to `count` distinct members still in the fight
    pub fn sample_targets(&self, rng: &mut GameRng, count: usize) -> Vec<usize> {
        rng.sample(&self.eligible_indices(), count)
    }

    /// Move every member out of the fight onto the fallen list, keeping
    /// both lists in order. Returns how many moved.
    pub fn sweep_fallen(&mut self) -> usize {
        let (live, out): (Vec<Monster>, Vec<Monster>) =
            self.live.drain(..).partition(Monster::in_fight);
        self.live = live;
        let moved = out.len();
        if moved > 0 {
            debug!(party = %self.name, moved, remaining = self.live.len(), "swept fallen members");
        }
        self.fallen.extend(out);
        moved
    }

    /// Queue a summoned creature; it joins at the next muster
    pub fn reinforce(&mut self, member: Monster) {
        self.reinforcements.push(member);
    }

    /// Bring queued reinforcements into the live list
    pub fn muster(&mut self) -> usize {
        let arrivals: Vec<Monster> = self.reinforcements.drain(..).collect();
        let count = arrivals.len();
        for member in arrivals {
            self.push(member);
        }
        count
    }

    /// Fully heal every live member
    pub fn heal_all(&mut self) {
        for member in &mut self.live {
            member.heal_fully();
        }
    }

    /// Forget the fallen; the driver does this between encounters
    pub fn clear_fallen(&mut self) {
        self.fallen.clear();
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.live);
    }

    /// Share of members still live, counting only those who fell after
    /// `fallen_since` entries were already on the fallen list
    pub fn live_ratio(&self, fallen_since: usize) -> f64 {
        let fallen = self.fallen.len().saturating_sub(fallen_since);
        let total = self.live.len() + fallen;
        if total == 0 {
            return 0.0;
        }
        self.live.len() as f64 / total as f64
    }

    /// Most common level among members still in the fight, ties going to
    /// the higher level
    pub fn modal_level(&self) -> Option<u32> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for member in self.live.iter().filter(|m| m.in_fight()) {
            *counts.entry(member.level()).or_default() += 1;
        }
        // max_by_key keeps the last maximum, and the map iterates upward
        counts
            .into_iter()
            .max_by_key(|&(_, count)| count)
            .map(|(level, _)| level)
    }

    /// Per-round counters back to zero
    pub fn reset_round(&mut self) {
        for member in &mut self.live {
            member.times_meleed = 0;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monster> {
        self.live.iter()
    }

    /// Kills credited to live and fallen members alike
    pub fn total_kills(&self) -> u32 {
        self.live.iter().chain(&self.fallen).map(|m| m.kills).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::special::{SpecialAbility, SpecialType};

    fn trio() -> Party {
        Party::from_members(
            "Trio",
            [
                Monster::basic("Kobold", 7, 1),
                Monster::basic("Gnoll", 5, 2),
                Monster::basic("Bugbear", 5, 3),
            ],
        )
    }

    #[test]
    fn test_push_assigns_unique_ids() {
        let party = trio();
        let ids: Vec<u32> = party.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_sweep_moves_out_of_fight_members() {
        let mut party = trio();
        party.live_mut()[1].take_damage(1000);
        party.live_mut()[2]
            .conditions
            .add(SpecialAbility::new(SpecialType::Sleep, 0));
        assert_eq!(party.sweep_fallen(), 2);
        assert_eq!(party.live().len(), 1);
        assert_eq!(party.fallen()[0].race, "Gnoll");
        assert_eq!(party.fallen()[1].race, "Bugbear");
        assert!((party.live_ratio(0) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(party.live_ratio(2), 1.0);
    }

    #[test]
    fn test_melee_target_skips_out_of_fight() {
        let mut party = trio();
        party.live_mut()[0].take_damage(1000);
        party.live_mut()[2]
            .conditions
            .add(SpecialAbility::new(SpecialType::Hold, 0));
        let mut rng = GameRng::new(4);
        for _ in 0..100 {
            assert_eq!(party.random_melee_target(&mut rng, 8), Some(1));
        }
    }

    #[test]
    fn test_crowded_targets_are_avoided() {
        let mut party = trio();
        party.live_mut()[0].times_meleed = 8;
        party.live_mut()[1].times_meleed = 8;
        let mut rng = GameRng::new(4);
        for _ in 0..50 {
            assert_eq!(party.random_melee_target(&mut rng, 8), Some(2));
        }
        party.live_mut()[2].times_meleed = 8;
        assert!(party.random_melee_target(&mut rng, 8).is_some());
        party.reset_round();
        assert!(party.iter().all(|m| m.times_meleed == 0));
    }

    #[test]
    fn test_empty_pools_yield_nothing() {
        let party = Party::new("Nobody");
        let mut rng = GameRng::new(1);
        assert!(!party.is_live());
        assert_eq!(party.random_member(&mut rng), None);
        assert_eq!(party.random_melee_target(&mut rng, 8), None);
        assert!(party.sample_targets(&mut rng, 3).is_empty());
        assert_eq!(party.live_ratio(0), 0.0);
        assert_eq!(party.modal_level(), None);
    }

    #[test]
    fn test_modal_level_ties_go_high() {
        let party = Party::from_members(
            "Mixed",
            [
                Monster::basic("A", 7, 1),
                Monster::basic("B", 7, 1),
                Monster::basic("C", 7, 3),
                Monster::basic("D", 7, 3),
                Monster::basic("E", 7, 5),
            ],
        );
        assert_eq!(party.modal_level(), Some(3));
    }

    #[test]
    fn test_reinforcements_wait_for_muster() {
        let mut party = trio();
        party.reinforce(Monster::basic("Imp", 2, 1));
        assert_eq!(party.len(), 3);
        assert_eq!(party.muster(), 1);
        assert_eq!(party.len(), 4);
        assert_eq!(party.live()[3].id, MonsterId(4));
    }

    #[test]
    fn test_heal_all_clears_conditions() {
        let mut party = trio();
        party.live_mut()[0].take_damage(3);
        party.live_mut()[0]
            .conditions
            .add(SpecialAbility::new(SpecialType::Slowing, 0));
        party.heal_all();
        let kobold = &party.live()[0];
        assert_eq!(kobold.hit_points(), kobold.max_hit_points());
        assert!(kobold.conditions.is_empty());
    }
}
