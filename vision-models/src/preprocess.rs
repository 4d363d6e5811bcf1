//! Image decoding and normalization.

use std::path::Path;

use image::imageops::FilterType;
use tracing::trace;
use vision_types::{ImageGeometry, PreprocessedImage};

use crate::error::{ModelError, Result};

/// Decodes images and normalizes them to a fixed geometry.
///
/// Every image is resized to the target width and height (ignoring
/// aspect ratio, so training and inference see identical distortion),
/// converted to RGB, and flattened to CHW `f32` in `[0, 1]`.
///
/// # Example
///
/// ```
/// use vision_models::ImagePreprocessor;
/// use vision_types::ImageGeometry;
///
/// let preprocessor = ImagePreprocessor::new(ImageGeometry::square(64)).unwrap();
/// assert_eq!(preprocessor.geometry().width, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePreprocessor {
    geometry: ImageGeometry,
}

impl ImagePreprocessor {
    /// Creates a preprocessor for the given geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] if any dimension is zero or
    /// the channel count is not 3. Only RGB output is supported.
    pub fn new(geometry: ImageGeometry) -> Result<Self> {
        if !geometry.is_valid() {
            return Err(ModelError::invalid_config(format!(
                "geometry dimensions must be positive, got {geometry}"
            )));
        }
        if geometry.channels != 3 {
            return Err(ModelError::invalid_config(format!(
                "only 3-channel RGB output is supported, got {} channels",
                geometry.channels
            )));
        }
        Ok(Self { geometry })
    }

    /// Returns the target geometry.
    #[must_use]
    pub const fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    /// Decodes, resizes, and normalizes one image file.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DecodeImage`] if the file is missing or not
    /// a decodable image.
    pub fn process(&self, path: &Path) -> Result<PreprocessedImage> {
        let decoded = image::open(path)
            .map_err(|e| ModelError::decode_image(path.display().to_string(), e.to_string()))?;

        trace!(
            path = %path.display(),
            source_width = decoded.width(),
            source_height = decoded.height(),
            "decoded image"
        );

        let resized = decoded
            .resize_exact(self.geometry.width, self.geometry.height, FilterType::Triangle)
            .to_rgb8();

        // CHW layout: all red values, then green, then blue.
        let pixel_count = self.geometry.pixel_count();
        let mut data = vec![0.0_f32; self.geometry.buffer_len()];
        for (i, pixel) in resized.pixels().enumerate() {
            for (channel, &value) in pixel.0.iter().enumerate() {
                data[channel * pixel_count + i] = f32::from(value) / 255.0;
            }
        }

        Ok(PreprocessedImage::new(data, self.geometry))
    }
}
