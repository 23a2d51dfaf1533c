//! Random number generation for fights
//!
//! Uses a seeded ChaCha RNG so a fight can be replayed from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fight random number generator
///
/// Wraps ChaCha8Rng for reproducible dice rolls. Every probabilistic
/// decision made by the engine draws from one of these.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns 0..n-1, or 0 if n is 0.
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Returns 1..=n, or 0 if n is 0.
    pub fn rnd(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(1..=n)
    }

    /// Roll n dice with m sides and sum them
    pub fn dice(&mut self, n: u32, m: u32) -> u32 {
        (0..n).fold(0, |total: u32, _| total.saturating_add(self.rnd(m)))
    }

    /// Roll one twenty-sided die
    pub fn d20(&mut self) -> u32 {
        self.rnd(20)
    }

    /// Returns true with probability 1/n
    pub fn one_in(&mut self, n: u32) -> bool {
        self.rn2(n) == 0
    }

    /// Returns true with probability percent/100
    pub fn percent(&mut self, percent: u32) -> bool {
        self.rn2(100) < percent
    }

    /// Fair coin
    pub fn coin_flip(&mut self) -> bool {
        self.rn2(2) == 0
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rn2(items.len() as u32) as usize])
        }
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rn2(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }

    /// Pick up to `count` distinct entries of `pool`, in random order
    pub fn sample<T: Copy>(&mut self, pool: &[T], count: usize) -> Vec<T> {
        let mut picked = pool.to_vec();
        self.shuffle(&mut picked);
        picked.truncate(count);
        picked
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
