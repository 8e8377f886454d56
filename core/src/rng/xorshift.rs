//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG suitable for simulation purposes. Same seed →
//! same sequence, which is what makes hold-room assignment reproducible
//! across runs with identical configuration.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use passenger_flow_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let pick = rng.range(0, 4); // [0, 4)
/// assert!(pick >= 0 && pick < 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with the given seed.
    ///
    /// A zero seed is remapped to 1 (xorshift requirement).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u64 value, advancing the internal state.
    pub fn next(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate a random value in range [min, max).
    ///
    /// # Panics
    /// Panics if min >= max.
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let value = self.next();
        let range_size = (max - min) as u64;
        min + (value % range_size) as i64
    }

    /// Current RNG state (for inspection in tests).
    pub fn state(&self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    #[should_panic(expected = "min must be less than max")]
    fn test_range_invalid_bounds() {
        let mut rng = RngManager::new(12345);
        rng.range(100, 50);
    }

    #[test]
    fn test_sequence_deterministic() {
        let mut rng1 = RngManager::new(99999);
        let mut rng2 = RngManager::new(99999);

        for _ in 0..100 {
            assert_eq!(rng1.next(), rng2.next(), "sequence not deterministic");
        }
    }

    #[test]
    fn test_range_bounds_respected() {
        let mut rng = RngManager::new(7);
        for _ in 0..1000 {
            let v = rng.range(3, 9);
            assert!((3..9).contains(&v), "range() produced {} outside [3, 9)", v);
        }
    }
}
