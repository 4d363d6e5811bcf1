//! Error types for vision-training.

use thiserror::Error;
use vision_dataset::DatasetError;
use vision_models::ModelError;

/// Errors that can occur during a training run.
#[derive(Debug, Error)]
pub enum TrainError {
    /// Invalid trainer configuration.
    #[error("invalid trainer configuration: {0}")]
    InvalidConfig(String),

    /// No usable examples were found.
    #[error("no usable examples: {0}")]
    EmptyDataset(String),

    /// Fewer than two classes were found.
    #[error("need at least 2 classes, found {0}")]
    InsufficientClasses(usize),

    /// Every example of a class failed to decode.
    #[error("classes lost all examples during preprocessing: {0}")]
    ClassEmptied(String),

    /// Dataset loading or splitting failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Model fitting, inference, or persistence failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl TrainError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates an empty dataset error.
    #[must_use]
    pub fn empty_dataset(reason: impl Into<String>) -> Self {
        Self::EmptyDataset(reason.into())
    }

    /// Creates a class emptied error from the affected labels.
    #[must_use]
    pub fn class_emptied(labels: &[&str]) -> Self {
        Self::ClassEmptied(labels.join(", "))
    }
}

/// Result type for vision-training operations.
pub type Result<T> = std::result::Result<T, TrainError>;
