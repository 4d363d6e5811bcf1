//! Preprocessed image types.

use serde::{Deserialize, Serialize};

/// Fixed input geometry expected by a classifier backend.
///
/// Every image fed to one backend instance is resized and re-encoded to
/// this exact shape before training or inference.
///
/// # Example
///
/// ```
/// use vision_types::ImageGeometry;
///
/// let geometry = ImageGeometry::default();
/// assert_eq!(geometry.width, 64);
/// assert_eq!(geometry.height, 64);
/// assert_eq!(geometry.buffer_len(), 3 * 64 * 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageGeometry {
    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// Number of color channels.
    pub channels: u32,
}

impl Default for ImageGeometry {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            channels: 3,
        }
    }
}

impl ImageGeometry {
    /// Creates a new geometry.
    #[must_use]
    pub const fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Creates a square RGB geometry.
    #[must_use]
    pub const fn square(side: u32) -> Self {
        Self::new(side, side, 3)
    }

    /// Returns the number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns the expected flat buffer length (C * H * W).
    #[must_use]
    pub const fn buffer_len(&self) -> usize {
        (self.channels as usize) * self.pixel_count()
    }

    /// Validates the geometry.
    ///
    /// Returns `true` if all dimensions are positive.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.channels > 0
    }
}

impl std::fmt::Display for ImageGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// A normalized image buffer ready for a classifier backend.
///
/// Pixels are stored as a flat `Vec<f32>` in CHW (Channel-Height-Width)
/// layout, normalized to `[0, 1]`. The buffer length is fixed by the
/// [`ImageGeometry`] it was produced for.
///
/// # Example
///
/// ```
/// use vision_types::{ImageGeometry, PreprocessedImage};
///
/// let geometry = ImageGeometry::new(2, 2, 3);
/// let image = PreprocessedImage::new(vec![0.5; 12], geometry);
/// assert!(image.is_valid());
/// assert_eq!(image.len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessedImage {
    /// Pixel data in CHW layout, normalized to `[0, 1]`.
    pub data: Vec<f32>,

    /// Geometry the buffer was produced for.
    pub geometry: ImageGeometry,
}

impl PreprocessedImage {
    /// Creates a new preprocessed image.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(data: Vec<f32>, geometry: ImageGeometry) -> Self {
        Self { data, geometry }
    }

    /// Returns the pixel buffer.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the buffer length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checks that the buffer length matches the geometry.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.geometry.is_valid() && self.data.len() == self.geometry.buffer_len()
    }
}
