//! Error types for vision-dataset.

use thiserror::Error;

/// Errors that can occur while loading or splitting a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Dataset root path does not exist.
    #[error("dataset root not found: {0}")]
    RootNotFound(String),

    /// Dataset root path is not a directory.
    #[error("dataset root is not a directory: {0}")]
    NotADirectory(String),

    /// No examples were found under the root.
    #[error("no examples found under {0}")]
    EmptyDataset(String),

    /// Invalid test fraction.
    #[error("invalid test fraction: {0} (must be in (0, 1))")]
    InvalidFraction(f32),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl DatasetError {
    /// Creates a root not found error.
    #[must_use]
    pub fn root_not_found(path: impl Into<String>) -> Self {
        Self::RootNotFound(path.into())
    }

    /// Creates a not-a-directory error.
    #[must_use]
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Creates an empty dataset error.
    #[must_use]
    pub fn empty_dataset(path: impl Into<String>) -> Self {
        Self::EmptyDataset(path.into())
    }

    /// Creates an invalid fraction error.
    #[must_use]
    pub const fn invalid_fraction(fraction: f32) -> Self {
        Self::InvalidFraction(fraction)
    }

    /// Creates an IO error.
    #[must_use]
    pub fn io(reason: impl Into<String>) -> Self {
        Self::Io(reason.into())
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for vision-dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
