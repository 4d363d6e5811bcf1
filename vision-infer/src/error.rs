//! Error types for vision-infer.

use thiserror::Error;
use vision_models::ModelError;

/// Errors that can occur during inference.
#[derive(Debug, Error)]
pub enum InferError {
    /// Confidence threshold outside `[0, 1]`.
    #[error("invalid confidence threshold: {0} (must be in [0, 1])")]
    InvalidThreshold(f32),

    /// Preprocessing, inference, or bundle loading failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for vision-infer operations.
pub type Result<T> = std::result::Result<T, InferError>;
