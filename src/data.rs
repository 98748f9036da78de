//! Generated test data
//!
//! Titles get a random numeric suffix so repeated runs against the same
//! environment do not collide.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Suffix range: 999 inclusive, 9999 exclusive
pub const SUFFIX_RANGE: Range<u32> = 999..9999;

/// Build `<prefix>_<n>` with `n` drawn uniformly from [`SUFFIX_RANGE`]
pub fn generate_title<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    format!("{}_{}", prefix, rng.random_range(SUFFIX_RANGE))
}

/// Owned random source for one scenario run
#[derive(Debug)]
pub struct TitleGenerator {
    rng: StdRng,
}

impl TitleGenerator {
    /// Seed from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn title(&mut self, prefix: &str) -> String {
        generate_title(prefix, &mut self.rng)
    }
}

impl Default for TitleGenerator {
    fn default() -> Self {
        Self::new()
    }
}
