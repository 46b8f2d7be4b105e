//! Deterministic seating shuffle.
//!
//! Every peer seeded with the same value produces the same permutation, so a
//! shuffled seating can be agreed on by sharing only the seed.
//!
//! ```
//! use table_sync::core::SeatingRng;
//!
//! let mut a = vec!["p1", "p2", "p3", "p4"];
//! let mut b = a.clone();
//!
//! SeatingRng::new(42).shuffle(&mut a);
//! SeatingRng::new(42).shuffle(&mut b);
//!
//! assert_eq!(a, b);
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG used for seating.
///
/// Uses ChaCha8, whose output is identical across platforms.
#[derive(Clone, Debug)]
pub struct SeatingRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SeatingRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}
