//! Random First-Round Pairer
//!
//! Pairs the roster uniformly at random before any results exist.
//! Useful for:
//! - Opening rounds where nobody has a score yet
//! - Reproducible test tournaments (via [`RandomPairer::seeded`])

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use swiss_core::{CompetitorId, FirstRoundPairer, Pairing};
use tracing::debug;

#[cfg(test)]
mod lib_tests;

/// A pairer that shuffles the roster and pairs neighbours.
///
/// With an odd roster the competitor left over after shuffling receives the
/// bye, so every competitor is equally likely to sit out.
#[derive(Debug, Clone)]
pub struct RandomPairer {
    rng: StdRng,
}

impl RandomPairer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic pairer: the same seed and roster give the same pairing.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPairer {
    fn default() -> Self {
        Self::new()
    }
}

impl FirstRoundPairer for RandomPairer {
    fn pair(&mut self, competitors: &[CompetitorId]) -> Vec<Pairing> {
        let mut pool = competitors.to_vec();
        pool.shuffle(&mut self.rng);

        let pairings: Vec<Pairing> = pool
            .chunks(2)
            .map(|chunk| match chunk {
                [a, b] => Pairing::Pair(a.clone(), b.clone()),
                _ => Pairing::Bye(chunk[0].clone()),
            })
            .collect();

        debug!(
            competitors = competitors.len(),
            tables = pairings.len(),
            "random first-round pairing"
        );
        pairings
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }
}
