//! Training sample type.

use serde::{Deserialize, Serialize};

use crate::image::PreprocessedImage;

/// A single sample as consumed by a classifier backend.
///
/// Pairs a preprocessed pixel buffer with the dense label key assigned
/// during encoding. Samples live only for the duration of one training
/// run.
///
/// # Example
///
/// ```
/// use vision_types::{ImageGeometry, PreprocessedImage, TrainingSample};
///
/// let geometry = ImageGeometry::new(2, 2, 3);
/// let image = PreprocessedImage::new(vec![0.5; 12], geometry);
/// let sample = TrainingSample::new(image, 1);
///
/// assert_eq!(sample.label_key, 1);
/// assert!(sample.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Preprocessed image data.
    pub image: PreprocessedImage,

    /// Dense label key for this sample's class.
    pub label_key: usize,
}

impl TrainingSample {
    /// Creates a new training sample.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(image: PreprocessedImage, label_key: usize) -> Self {
        Self { image, label_key }
    }

    /// Validates the sample's image buffer against its geometry.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.image.is_valid()
    }
}
