//! Classifier backend abstraction.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vision_types::{PreprocessedImage, ScoreVector, TrainingSample};

use crate::error::Result;

/// Hyperparameters for fitting a classifier backend.
///
/// # Example
///
/// ```
/// use vision_models::FitOptions;
///
/// let options = FitOptions::default().with_epochs(10);
/// assert_eq!(options.epochs, 10);
/// assert_eq!(options.batch_size, 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Maximum number of passes over the training set.
    pub epochs: usize,

    /// Mini-batch size.
    pub batch_size: usize,

    /// Optimizer learning rate.
    pub learning_rate: f64,

    /// Epochs without validation improvement before stopping early.
    /// Zero disables early stopping.
    pub early_stopping_patience: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            epochs: 40,
            batch_size: 32,
            learning_rate: 1e-3,
            early_stopping_patience: 5,
        }
    }
}

impl FitOptions {
    /// Sets the epoch count.
    #[must_use]
    pub const fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the mini-batch size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the learning rate.
    #[must_use]
    pub const fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the early stopping patience.
    #[must_use]
    pub const fn with_early_stopping_patience(mut self, patience: usize) -> Self {
        self.early_stopping_patience = patience;
        self
    }

    /// Validates the options.
    ///
    /// Returns `true` if the epoch count, batch size, and learning rate
    /// are all positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.epochs > 0 && self.batch_size > 0 && self.learning_rate > 0.0
    }
}

/// A pluggable classifier implementation.
///
/// The trainer and predictor are written against this trait so the
/// learning machinery can be swapped without touching the pipeline. A
/// backend owns its hyperparameters and its on-disk weight format; the
/// bundle layer stores which backend wrote a bundle and refuses to load
/// it with any other.
///
/// Scores returned by [`infer`](Self::infer) are indexed by label key
/// and must be comparable against a confidence threshold, so backends
/// are expected to emit probabilities.
pub trait ClassifierBackend {
    /// The fitted model produced by this backend.
    type Fitted;

    /// Returns a stable identifier written into bundle manifests.
    fn id(&self) -> &'static str;

    /// Fits a model on the training set.
    ///
    /// The validation set steers early stopping and is never trained on.
    /// It may be empty, in which case backends train for the full epoch
    /// budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample set is unusable or optimization
    /// fails.
    fn fit(
        &self,
        train: &[TrainingSample],
        validation: &[TrainingSample],
        num_classes: usize,
    ) -> Result<Self::Fitted>;

    /// Scores one preprocessed image against every class.
    ///
    /// # Errors
    ///
    /// Returns an error if the image does not match the geometry the
    /// model was fitted for.
    fn infer(&self, fitted: &Self::Fitted, image: &PreprocessedImage) -> Result<ScoreVector>;

    /// Writes the fitted model's weights into a bundle directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be written.
    fn save(&self, fitted: &Self::Fitted, dir: &Path) -> Result<()>;

    /// Reads a fitted model back from a bundle directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the weight files are missing or corrupt.
    fn load(&self, dir: &Path, num_classes: usize) -> Result<Self::Fitted>;
}
