//! Deterministic random number generation for a single game.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical dice and shuffles
//! - **Owned**: One generator per engine, never a process-wide singleton
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use monopoly_arena::core::GameRng;
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.roll_dice(), b.roll_dice());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::seat::SeatId;

/// Odd constant mixed into per-seat agent seeds.
pub const AGENT_SEED_CONSTANT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Derive the private seed handed to the agent in `seat`.
///
/// Every agent gets an independent stream that is still reproducible from
/// the game seed alone.
#[must_use]
pub fn agent_seed(game_seed: u64, seat: SeatId) -> u64 {
    game_seed ^ (seat.index() as u64).wrapping_add(AGENT_SEED_CONSTANT)
}

/// Outcome of rolling two six-sided dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub first: u8,
    pub second: u8,
}

impl DiceRoll {
    /// Build a roll from two face values.
    #[must_use]
    pub const fn new(first: u8, second: u8) -> Self {
        Self { first, second }
    }

    /// Sum of both dice.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.first as u32 + self.second as u32
    }

    /// Both dice show the same face.
    #[must_use]
    pub const fn is_double(self) -> bool {
        self.first == self.second
    }
}

/// Deterministic game RNG.
///
/// Uses ChaCha8 for speed with a stable, platform-independent stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll a single die (1..=6).
    pub fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }

    /// Roll two independent dice, first die first.
    pub fn roll_dice(&mut self) -> DiceRoll {
        let first = self.roll_die();
        let second = self.roll_die();
        DiceRoll { first, second }
    }

    /// Shuffle a slice in place.
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
        }
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many dice have been rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.roll_dice(), rng2.roll_dice());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..20).map(|_| rng1.roll_die()).collect();
        let seq2: Vec<_> = (0..20).map(|_| rng2.roll_die()).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_die_range() {
        let mut rng = GameRng::new(9);
        for _ in 0..1000 {
            let face = rng.roll_die();
            assert!((1..=6).contains(&face));
        }
    }

    #[test]
    fn test_dice_roll_helpers() {
        let roll = DiceRoll::new(3, 3);
        assert!(roll.is_double());
        assert_eq!(roll.total(), 6);
        assert!(!DiceRoll::new(2, 5).is_double());
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u8> = (0..16).collect();
        rng.shuffle(&mut data);

        assert_ne!(data, (0..16).collect::<Vec<u8>>());
        data.sort_unstable();
        assert_eq!(data, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_state_restore() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.roll_dice();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.roll_dice()).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.roll_dice()).collect();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_state_serde() {
        let state = GameRngState { seed: 42, word_pos: 12345 };
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: GameRngState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }

    #[test]
    fn test_agent_seed_is_distinct_per_seat() {
        let a = agent_seed(1234, SeatId::new(0));
        let b = agent_seed(1234, SeatId::new(1));

        assert_ne!(a, b);
        assert_eq!(a, 1234 ^ AGENT_SEED_CONSTANT);
        assert_eq!(b, 1234 ^ (1 + AGENT_SEED_CONSTANT));
    }
}
