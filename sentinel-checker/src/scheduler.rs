//! Randomised scan order over the ledger index range.
//!
//! Entropy acquisition and shuffling are kept apart: an [`EntropySource`]
//! yields a 32-byte seed, and [`permutation`] expands that seed into a
//! Fisher–Yates shuffle of `[0, n)`. Only the seed has to be unpredictable
//! to keep an adversary from knowing which entries get re-checked when.

use rand::rngs::{OsRng, StdRng};
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use crate::CheckerError;

/// Seed fed into the shuffle generator.
pub type Seed = [u8; 32];

/// Source of unpredictable shuffle seeds.
pub trait EntropySource: Send + Sync {
    /// Draw a fresh seed.
    ///
    /// # Errors
    /// Returns [`CheckerError::Entropy`] if the source cannot produce bytes.
    fn seed(&self) -> Result<Seed, CheckerError>;
}

/// Seeds drawn from the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn seed(&self) -> Result<Seed, CheckerError> {
        let mut seed = [0u8; 32];
        OsRng.try_fill_bytes(&mut seed)?;
        Ok(seed)
    }
}

/// Return a uniformly random permutation of `[0, n)` derived from `seed`.
///
/// The same seed always yields the same order.
///
/// # Errors
/// Returns [`CheckerError::RangeTooLarge`] if `n` does not fit in `usize`.
///
/// # Complexity
/// O(n) time and memory.
pub fn permutation(n: u64, seed: Seed) -> Result<Vec<u64>, CheckerError> {
    let len = usize::try_from(n).map_err(|_| CheckerError::RangeTooLarge { count: n })?;
    let mut indices = Vec::with_capacity(len);
    indices.extend(0..n);
    let mut rng = StdRng::from_seed(seed);
    indices.shuffle(&mut rng);
    Ok(indices)
}

/// Produces a fresh random scan order for every pass.
pub struct IndexScheduler {
    entropy: Box<dyn EntropySource>,
}

impl IndexScheduler {
    /// Create a scheduler seeded from the given source.
    #[must_use]
    pub fn new(entropy: impl EntropySource + 'static) -> Self {
        Self { entropy: Box::new(entropy) }
    }

    /// Create a scheduler seeded from the OS CSPRNG.
    #[must_use]
    pub fn with_os_entropy() -> Self {
        Self::new(OsEntropy)
    }

    /// Return a random permutation of `[0, n)`.
    ///
    /// `n == 0` yields an empty order without drawing entropy.
    ///
    /// # Errors
    /// Returns [`CheckerError::Entropy`] if no seed can be drawn, or
    /// [`CheckerError::RangeTooLarge`] if `n` does not fit in memory.
    pub fn generate(&self, n: u64) -> Result<Vec<u64>, CheckerError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let seed = self.entropy.seed()?;
        permutation(n, seed)
    }
}

impl Default for IndexScheduler {
    fn default() -> Self {
        Self::with_os_entropy()
    }
}

impl std::fmt::Debug for IndexScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexScheduler").finish_non_exhaustive()
    }
}
