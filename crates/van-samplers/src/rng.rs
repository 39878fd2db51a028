use rand::{Rng, RngCore, SeedableRng};
/// Simple RNG key system for deterministic random number generation.
///
/// This provides a functional-style RNG key system similar to JAX's key splitting.
/// Keys are represented as u64 seeds, and we use ChaCha8 for deterministic splitting
/// and for the draws themselves, so a sampling call is reproducible from its key.
use rand_chacha::ChaCha8Rng;

/// An RNG key for deterministic random number generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RngKey(pub u64);

impl RngKey {
    /// Create a new RNG key from a seed.
    pub fn new(seed: u64) -> Self {
        RngKey(seed)
    }

    /// Split this key into multiple independent keys.
    /// This is similar to JAX's `jax.random.split`.
    pub fn split(self, n: usize) -> Vec<RngKey> {
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![self];
        }

        let mut rng = self.rng();
        (0..n).map(|_| RngKey(rng.next_u64())).collect()
    }

    /// Split into exactly two keys (common case).
    pub fn split_two(self) -> (RngKey, RngKey) {
        let keys = self.split(2);
        (keys[0], keys[1])
    }

    /// Get the seed value.
    pub fn seed(&self) -> u64 {
        self.0
    }

    /// Generator seeded from this key.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }

    /// `n` uniform draws in `[0, 1)`.
    pub fn uniform(&self, n: usize) -> Vec<f64> {
        let mut rng = self.rng();
        (0..n).map(|_| rng.gen::<f64>()).collect()
    }

    /// `n` fair coin flips.
    pub fn coins(&self, n: usize) -> Vec<bool> {
        let mut rng = self.rng();
        (0..n).map(|_| rng.gen_bool(0.5)).collect()
    }
}
