//! Deterministic random number generation for wall shuffles, dice and delays.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces an identical match
//! - **Forkable**: Each round gets an independent branch
//! - **Serializable**: O(1) state capture and restore
//! - **Context streams**: Independent sequences for the wall, dice and delays
//!
//! ```
//! use mahjong_core::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut round_rng = rng.fork();
//!
//! let roll = round_rng.roll_dice();
//! assert!((3..=18).contains(&roll.sum()));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Three six-sided dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub dice: [u8; 3],
}

impl DiceRoll {
    /// Total of the three dice (3-18).
    #[must_use]
    pub fn sum(&self) -> usize {
        self.dice.iter().map(|&d| d as usize).sum()
    }
}

/// Deterministic RNG with forking.
///
/// Uses ChaCha8 for speed while maintaining cryptographic quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same RNG state.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self {
            inner: ChaCha8Rng::seed_from_u64(context_seed),
            seed: context_seed,
            fork_counter: 0,
        }
    }

    /// Generate a random u64 in the inclusive range.
    pub fn gen_range_inclusive(&mut self, low: u64, high: u64) -> u64 {
        if low >= high {
            return low;
        }
        self.inner.gen_range(low..=high)
    }

    /// Roll three six-sided dice.
    pub fn roll_dice(&mut self) -> DiceRoll {
        DiceRoll {
            dice: [
                self.inner.gen_range(1..=6),
                self.inner.gen_range(1..=6),
                self.inner.gen_range(1..=6),
            ],
        }
    }

    /// Shuffle a slice in place (uniform permutation).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_inclusive(0, 999), rng2.gen_range_inclusive(0, 999));
        }
    }

    #[test]
    fn test_fork_produces_different_sequence() {
        let mut rng = GameRng::new(42);
        let mut forked = rng.fork();

        let seq1: Vec<_> = (0..10).map(|_| rng.gen_range_inclusive(0, 999)).collect();
        let seq2: Vec<_> = (0..10).map(|_| forked.gen_range_inclusive(0, 999)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_context_is_deterministic() {
        let rng1 = GameRng::new(42);
        let rng2 = GameRng::new(42);

        let mut ctx1 = rng1.for_context("wall");
        let mut ctx2 = rng2.for_context("wall");

        for _ in 0..10 {
            assert_eq!(ctx1.gen_range_inclusive(0, 999), ctx2.gen_range_inclusive(0, 999));
        }
    }

    #[test]
    fn test_dice_bounds() {
        let mut rng = GameRng::new(7);
        for _ in 0..200 {
            let roll = rng.roll_dice();
            assert!(roll.dice.iter().all(|d| (1..=6).contains(d)));
            assert!((3..=18).contains(&roll.sum()));
        }
    }

    #[test]
    fn test_gen_range_inclusive_degenerate() {
        let mut rng = GameRng::new(1);
        assert_eq!(rng.gen_range_inclusive(500, 500), 500);
        assert_eq!(rng.gen_range_inclusive(900, 100), 900);
        let v = rng.gen_range_inclusive(400, 1200);
        assert!((400..=1200).contains(&v));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut data);

        assert_ne!(data, (0..20).collect::<Vec<_>>());
        data.sort();
        assert_eq!(data, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_state_restore() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.roll_dice();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_range_inclusive(0, 999)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_range_inclusive(0, 999)).collect();

        assert_eq!(expected, actual);
    }
}
