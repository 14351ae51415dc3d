//! Seeded Lehmer random source shared by the whole simulation.
//!
//! A single [`Prng`] drives genome creation, mutation and body placement, so
//! a seed fully determines a run.

use rand::Rng;

use super::error::{Result, SimError};

const MODULUS: u64 = 2_147_483_647;
const MULTIPLIER: u64 = 16_807;

/// Park-Miller minimal standard generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prng {
    state: u64,
}

impl Prng {
    /// Creates a generator from a base-36 seed string (case-insensitive).
    pub fn from_seed(seed: &str) -> Result<Self> {
        let trimmed = seed.trim();
        if trimmed.is_empty() {
            return Err(SimError::InvalidSeed(seed.to_string()));
        }

        let value = u128::from_str_radix(trimmed, 36)
            .map_err(|_| SimError::InvalidSeed(seed.to_string()))?;

        Ok(Self::from_state((value % MODULUS as u128) as u64))
    }

    /// Creates a generator from a raw numeric state.
    pub fn from_state(state: u64) -> Self {
        let mut state = state % MODULUS;
        if state == 0 {
            state = MODULUS - 1;
        }
        Self { state }
    }

    /// Draws a fresh base-36 seed from the operating system's generator.
    pub fn random_seed() -> String {
        let value = rand::rng().random_range(1..MODULUS);
        to_base36(value)
    }

    /// Next float in `[0, 1)`.
    pub fn rand(&mut self) -> f64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Integer in `[min, max)`. An empty or inverted range yields `min`.
    pub fn rand_int(&mut self, min: i64, max: i64) -> i64 {
        let roll = self.rand();
        if max <= min {
            return min;
        }
        min + (roll * (max - min) as f64).floor() as i64
    }

    /// Returns `true` with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rand() < probability
    }
}

/// Encodes a number as lowercase base-36 text.
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
