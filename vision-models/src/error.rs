//! Error types for vision-models.

use thiserror::Error;

/// Errors that can occur in model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An image file could not be decoded.
    #[error("failed to decode image {path}: {reason}")]
    DecodeImage {
        /// Path to the offending image.
        path: String,
        /// Decoder failure description.
        reason: String,
    },

    /// A model bundle could not be loaded.
    #[error("failed to load bundle at {path}: {reason}")]
    LoadBundle {
        /// Bundle directory.
        path: String,
        /// Failure description.
        reason: String,
    },

    /// A model bundle could not be saved.
    #[error("failed to save bundle at {path}: {reason}")]
    SaveBundle {
        /// Bundle directory.
        path: String,
        /// Failure description.
        reason: String,
    },

    /// No bundle exists at the given path.
    #[error("bundle not found: {0}")]
    BundleNotFound(String),

    /// The bundle was written by an incompatible schema or backend.
    #[error("incompatible bundle: expected {expected}, found {actual}")]
    IncompatibleBundle {
        /// What this build expects.
        expected: String,
        /// What the bundle declares.
        actual: String,
    },

    /// Invalid model or preprocessing configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Model fitting failed.
    #[error("fit failed: {0}")]
    Fit(String),

    /// Inference failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ModelError {
    /// Creates an image decode error.
    #[must_use]
    pub fn decode_image(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DecodeImage {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a bundle load error.
    #[must_use]
    pub fn load_bundle(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadBundle {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a bundle save error.
    #[must_use]
    pub fn save_bundle(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SaveBundle {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a bundle not found error.
    #[must_use]
    pub fn bundle_not_found(path: impl Into<String>) -> Self {
        Self::BundleNotFound(path.into())
    }

    /// Creates an incompatible bundle error.
    #[must_use]
    pub fn incompatible_bundle(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::IncompatibleBundle {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Creates a fit error.
    #[must_use]
    pub fn fit(reason: impl Into<String>) -> Self {
        Self::Fit(reason.into())
    }

    /// Creates an inference error.
    #[must_use]
    pub fn inference(reason: impl Into<String>) -> Self {
        Self::Inference(reason.into())
    }
}

impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for vision-models operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_decode_image() {
        let err = ModelError::decode_image("data/pizza/1.png", "truncated");
        assert!(err.to_string().contains("data/pizza/1.png"));
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn error_incompatible_bundle() {
        let err = ModelError::incompatible_bundle("schema 1.x", "schema 2.0");
        assert!(err.to_string().contains("schema 1.x"));
        assert!(err.to_string().contains("schema 2.0"));
    }

    #[test]
    fn error_bundle_not_found() {
        let err = ModelError::bundle_not_found("/models/food");
        assert!(err.to_string().contains("/models/food"));
    }

    #[test]
    fn error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ModelError = io_err.into();
        assert!(matches!(err, ModelError::Io(_)));
    }

    #[test]
    fn error_from_serde_json() {
        let json_err = serde_json::from_str::<usize>("not json").unwrap_err();
        let err: ModelError = json_err.into();
        assert!(matches!(err, ModelError::Serialization(_)));
    }
}
