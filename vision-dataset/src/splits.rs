//! Deterministic train/test splitting.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default split seed, matching the historical training runs.
pub const DEFAULT_SPLIT_SEED: u64 = 1;

/// Validated held-out test fraction in the open interval `(0, 1)`.
///
/// # Example
///
/// ```
/// use vision_dataset::TestFraction;
///
/// let fraction = TestFraction::new(0.25);
/// assert!((fraction.test_fraction() - 0.25).abs() < 1e-6);
/// assert!((fraction.train_fraction() - 0.75).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestFraction {
    test: f32,
}

impl TestFraction {
    /// Creates a test fraction, returning `None` for an out-of-range value.
    #[must_use]
    pub fn try_new(test: f32) -> Option<Self> {
        (test > 0.0 && test < 1.0).then_some(Self { test })
    }

    /// Creates a test fraction, panicking on an out-of-range value.
    ///
    /// # Panics
    ///
    /// Panics if `test` is not strictly between 0 and 1.
    #[must_use]
    pub fn new(test: f32) -> Self {
        assert!(
            test > 0.0 && test < 1.0,
            "test fraction must be in (0, 1), got {test}"
        );
        Self { test }
    }

    /// Returns the held-out fraction.
    #[must_use]
    pub const fn test_fraction(&self) -> f32 {
        self.test
    }

    /// Returns the training fraction.
    #[must_use]
    pub fn train_fraction(&self) -> f32 {
        1.0 - self.test
    }

    /// Returns how many of `total` samples land in the test partition.
    ///
    /// The count is rounded to the nearest integer and then clamped so
    /// that both partitions are non-empty whenever `total >= 2`. With
    /// fewer than two samples there is nothing to hold out and the count
    /// is zero.
    #[must_use]
    pub fn test_count(&self, total: usize) -> usize {
        if total < 2 {
            return 0;
        }
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        #[allow(clippy::cast_sign_loss)]
        let rounded = (self.test * total as f32).round() as usize;
        rounded.clamp(1, total - 1)
    }
}

impl Default for TestFraction {
    /// Returns the conventional 80/20 split.
    fn default() -> Self {
        Self { test: 0.2 }
    }
}

/// Partitions `samples` into `(train, test)` using a seeded shuffle.
///
/// The partition depends only on the input order, the fraction, and the
/// seed. The same three inputs always produce the same membership, and
/// every sample lands in exactly one partition.
///
/// # Example
///
/// ```
/// use vision_dataset::{split_dataset, TestFraction, DEFAULT_SPLIT_SEED};
///
/// let samples: Vec<u32> = (0..100).collect();
/// let (train, test) = split_dataset(&samples, TestFraction::default(), DEFAULT_SPLIT_SEED);
///
/// assert_eq!(train.len(), 80);
/// assert_eq!(test.len(), 20);
/// ```
#[must_use]
pub fn split_dataset<T: Clone>(
    samples: &[T],
    fraction: TestFraction,
    seed: u64,
) -> (Vec<T>, Vec<T>) {
    let test_count = fraction.test_count(samples.len());

    let mut indices: Vec<usize> = (0..samples.len()).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test: Vec<T> = indices[..test_count]
        .iter()
        .map(|&i| samples[i].clone())
        .collect();
    let train: Vec<T> = indices[test_count..]
        .iter()
        .map(|&i| samples[i].clone())
        .collect();

    debug!(
        total = samples.len(),
        train = train.len(),
        test = test.len(),
        seed,
        "split dataset"
    );

    (train, test)
}
