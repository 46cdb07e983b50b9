//! Level allocation for new skip list nodes.
//!
//! Every node gets a level count, sampled once when it is inserted and fixed for its lifetime.
//! Level 1 holds every node and each level above holds a random subset of the one below it, with
//! a node reaching level `k + 1` with probability `p^k`.

use crate::error::{Result, SkipListError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Geometric};

/// The maximum number of levels a node, or the list header, can have. Enough for 2^64 entries
/// at the default probability.
pub const MAX_LEVEL: usize = 32;

/// The default probability of a node being promoted to the next level.
pub const DEFAULT_PROBABILITY: f64 = 0.25;

/// Produces the level count for a new node.
pub trait LevelGenerator {
    /// Return a level in `[1, MAX_LEVEL]`.
    fn random_level(&mut self) -> usize;
}

/// Geometrically distributed levels backed by a seedable RNG.
#[derive(Debug, Clone)]
pub struct GeometricLevels {
    /// The probability of promoting a node one level further.
    probability: f64,
    /// Counts the failed promotions before the first success. Success here is "stop growing",
    /// so it is parameterized with `1 - probability`.
    distribution: Geometric,
    rng: StdRng,
}

impl GeometricLevels {
    /// Create a new level generator.
    ///
    /// `probability` defaults to 0.25. A `seed` makes the produced level sequence reproducible;
    /// without one the RNG is seeded from the operating system.
    pub fn new(probability: Option<f64>, seed: Option<u64>) -> Result<Self> {
        let probability = probability.unwrap_or(DEFAULT_PROBABILITY);
        if !(probability > 0.0 && probability < 1.0) {
            return Err(SkipListError::InvalidProbability(probability));
        }

        let distribution = Geometric::new(1.0 - probability)
            .map_err(|_| SkipListError::InvalidProbability(probability))?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(GeometricLevels {
            probability,
            distribution,
            rng,
        })
    }

    /// Create a level generator with the default probability and a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        GeometricLevels {
            probability: DEFAULT_PROBABILITY,
            distribution: default_distribution(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The probability of promoting a node one level further.
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for GeometricLevels {
    fn default() -> Self {
        GeometricLevels {
            probability: DEFAULT_PROBABILITY,
            distribution: default_distribution(),
            rng: StdRng::from_entropy(),
        }
    }
}

fn default_distribution() -> Geometric {
    Geometric::new(1.0 - DEFAULT_PROBABILITY).expect("0.75 is a valid geometric parameter")
}

impl LevelGenerator for GeometricLevels {
    fn random_level(&mut self) -> usize {
        let promotions = self.distribution.sample(&mut self.rng);
        if promotions >= (MAX_LEVEL - 1) as u64 {
            MAX_LEVEL
        } else {
            1 + promotions as usize
        }
    }
}

/// Replays a fixed sequence of levels, cycling when it runs out.
///
/// Useful for building lists with a known shape.
#[derive(Debug, Clone)]
pub struct ScriptedLevels {
    levels: Vec<usize>,
    position: usize,
}

impl ScriptedLevels {
    /// Create a generator that replays `levels`. Each level is clamped into `[1, MAX_LEVEL]` and
    /// an empty script always yields level 1.
    pub fn new(levels: impl IntoIterator<Item = usize>) -> Self {
        ScriptedLevels {
            levels: levels
                .into_iter()
                .map(|level| level.clamp(1, MAX_LEVEL))
                .collect(),
            position: 0,
        }
    }
}

impl LevelGenerator for ScriptedLevels {
    fn random_level(&mut self) -> usize {
        if self.levels.is_empty() {
            return 1;
        }

        let level = self.levels[self.position % self.levels.len()];
        self.position += 1;
        level
    }
}
