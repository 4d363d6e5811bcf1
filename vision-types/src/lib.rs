//! Core types for the foodlens image classification pipeline.
//!
//! This crate provides the shared data model used by every stage of the
//! pipeline:
//!
//! # Dataset Types
//!
//! - [`LabeledImage`] - A training example discovered on disk
//! - [`EncodedImage`] - A labeled example with its dense integer key
//! - [`TrainingSample`] - Preprocessed pixels plus label key, ready for a backend
//!
//! # Image Types
//!
//! - [`ImageGeometry`] - Fixed input geometry expected by a backend
//! - [`PreprocessedImage`] - Normalized CHW pixel buffer
//!
//! # Label Types
//!
//! - [`LabelEncoder`] - Maps label strings to dense keys and back
//!
//! # Prediction Types
//!
//! - [`ScoreVector`] - Per-class scores from a classifier backend
//! - [`PredictionResult`] - Confidence-gated prediction outcome
//! - [`RejectionReason`] - Why a prediction was not accepted
//!
//! # Example
//!
//! ```
//! use vision_types::{LabeledImage, LabelEncoder};
//!
//! let examples = vec![
//!     LabeledImage::new("data/pizza/001.jpg", "pizza"),
//!     LabeledImage::new("data/sushi/001.jpg", "sushi"),
//! ];
//!
//! let encoder = LabelEncoder::fit(&examples);
//! assert_eq!(encoder.len(), 2);
//! assert_eq!(encoder.decode(encoder.encode("sushi").unwrap()), Some("sushi"));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod example;
mod image;
mod labels;
mod prediction;
mod sample;

pub use example::{EncodedImage, LabeledImage};
pub use image::{ImageGeometry, PreprocessedImage};
pub use labels::LabelEncoder;
pub use prediction::{PredictionResult, RejectionReason, ScoreVector};
pub use sample::TrainingSample;

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        EncodedImage, ImageGeometry, LabelEncoder, LabeledImage, PredictionResult,
        PreprocessedImage, RejectionReason, ScoreVector, TrainingSample,
    };
}
