//! Trainer configuration.

use serde::{Deserialize, Serialize};
use vision_dataset::{TestFraction, DEFAULT_SPLIT_SEED};
use vision_types::ImageGeometry;

/// Configuration for one training run.
///
/// Backend hyperparameters (epochs, batch size, learning rate) live with
/// the backend itself; this covers the pipeline around it.
///
/// # Example
///
/// ```
/// use vision_training::TrainerConfig;
///
/// let config = TrainerConfig::default().with_shuffle_seed(42);
/// assert_eq!(config.split_seed, 1);
/// assert_eq!(config.shuffle_seed, Some(42));
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Input geometry every image is normalized to.
    pub geometry: ImageGeometry,

    /// Held-out fraction for evaluation.
    pub test_fraction: TestFraction,

    /// Seed for the train/test partition.
    pub split_seed: u64,

    /// Seed for the pre-split shuffle. `None` draws from entropy, so
    /// repeated runs see different example orderings while the split
    /// itself stays a pure function of its inputs.
    pub shuffle_seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            geometry: ImageGeometry::default(),
            test_fraction: TestFraction::default(),
            split_seed: DEFAULT_SPLIT_SEED,
            shuffle_seed: None,
        }
    }
}

impl TrainerConfig {
    /// Sets the input geometry.
    #[must_use]
    pub const fn with_geometry(mut self, geometry: ImageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Sets the test fraction.
    #[must_use]
    pub const fn with_test_fraction(mut self, fraction: TestFraction) -> Self {
        self.test_fraction = fraction;
        self
    }

    /// Sets the split seed.
    #[must_use]
    pub const fn with_split_seed(mut self, seed: u64) -> Self {
        self.split_seed = seed;
        self
    }

    /// Pins the pre-split shuffle to a seed.
    #[must_use]
    pub const fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Validates the configuration.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.geometry.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default() {
        let config = TrainerConfig::default();
        assert_eq!(config.split_seed, 1);
        assert!(config.shuffle_seed.is_none());
        assert!((config.test_fraction.test_fraction() - 0.2).abs() < 1e-6);
        assert!(config.is_valid());
    }

    #[test]
    fn config_builder() {
        let config = TrainerConfig::default()
            .with_geometry(ImageGeometry::square(32))
            .with_test_fraction(TestFraction::new(0.3))
            .with_split_seed(9)
            .with_shuffle_seed(7);

        assert_eq!(config.geometry.width, 32);
        assert!((config.test_fraction.test_fraction() - 0.3).abs() < 1e-6);
        assert_eq!(config.split_seed, 9);
        assert_eq!(config.shuffle_seed, Some(7));
    }

    #[test]
    fn config_invalid_geometry() {
        let config = TrainerConfig::default().with_geometry(ImageGeometry::new(0, 4, 3));
        assert!(!config.is_valid());
    }

    #[test]
    fn config_serialization() {
        let config = TrainerConfig::default().with_shuffle_seed(3);
        let json = serde_json::to_string(&config);
        assert!(json.is_ok());

        let parsed: std::result::Result<TrainerConfig, _> =
            serde_json::from_str(&json.unwrap_or_default());
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap_or_default(), config);
    }
}
