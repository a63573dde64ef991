use std::{
    fmt,
    sync::{Mutex, PoisonError},
};

use thiserror::Error;

use skirmish_shared::MessengerError;

/// What a random roll is used for, the second key of the roll statistics
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RandomCategory {
    Combat,
    Bombing,
    NonCombat,
    Technology,
    Engine,
}

impl fmt::Display for RandomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RandomCategory::Combat => "combat",
            RandomCategory::Bombing => "bombing",
            RandomCategory::NonCombat => "non-combat",
            RandomCategory::Technology => "technology",
            RandomCategory::Engine => "engine",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RandomSourceError {
    /// The source could not produce values
    #[error("{0}")]
    Failed(String),

    /// The source talks to other peers and that failed
    #[error("{0}")]
    Messenger(#[from] MessengerError),
}

/// Produces random integers in `[0, max)`. Sources may be remote exchanges
/// between players; the bridge treats every call as a network section.
pub trait RandomSource: Send + Sync {
    /// `count` values in `[0, max)`
    fn get_randoms(
        &self,
        max: u32,
        count: usize,
        annotation: &str,
    ) -> Result<Vec<u32>, RandomSourceError>;

    fn get_random(&self, max: u32, annotation: &str) -> Result<u32, RandomSourceError> {
        self.get_randoms(max, 1, annotation)?
            .pop()
            .ok_or_else(|| RandomSourceError::Failed("no value returned".to_string()))
    }
}

// PlainRandomSource
/// Local pseudo-random source for single-machine games and tests
pub struct PlainRandomSource {
    rng: Mutex<fastrand::Rng>,
}

impl PlainRandomSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Deterministic sequence, for replays and tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }
}

impl Default for PlainRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for PlainRandomSource {
    fn get_randoms(
        &self,
        max: u32,
        count: usize,
        _annotation: &str,
    ) -> Result<Vec<u32>, RandomSourceError> {
        if max == 0 {
            return Err(RandomSourceError::Failed(
                "max must be positive".to_string(),
            ));
        }
        let rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok((0..count).map(|_| rng.u32(0..max)).collect())
    }
}
