//! Labeled example types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A labeled training example discovered on disk.
///
/// The label is the name of the dataset subdirectory the image was found
/// in; the path points at the image file itself. Examples exist only for
/// the duration of one training invocation.
///
/// # Example
///
/// ```
/// use vision_types::LabeledImage;
///
/// let example = LabeledImage::new("data/pizza/001.jpg", "pizza");
/// assert_eq!(example.label, "pizza");
/// assert!(example.has_label());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabeledImage {
    /// Path to the image file.
    pub path: PathBuf,

    /// Class label derived from the parent directory name.
    pub label: String,
}

impl LabeledImage {
    /// Creates a new labeled example.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }

    /// Returns `true` if the label is non-empty.
    #[must_use]
    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }
}

/// A labeled example with its dense integer key attached.
///
/// Produced by [`LabelEncoder::encode_examples`](crate::LabelEncoder::encode_examples).
/// The key is stable for the lifetime of one training run and unique per
/// distinct label string.
///
/// # Example
///
/// ```
/// use vision_types::{EncodedImage, LabeledImage};
///
/// let example = LabeledImage::new("data/sushi/001.jpg", "sushi");
/// let encoded = EncodedImage::new(example, 2);
/// assert_eq!(encoded.label, "sushi");
/// assert_eq!(encoded.label_key, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Path to the image file.
    pub path: PathBuf,

    /// Original class label.
    pub label: String,

    /// Dense integer key assigned to the label for this run.
    pub label_key: usize,
}

impl EncodedImage {
    /// Creates an encoded example from a labeled one.
    #[must_use]
    pub fn new(example: LabeledImage, label_key: usize) -> Self {
        Self {
            path: example.path,
            label: example.label,
            label_key,
        }
    }
}
