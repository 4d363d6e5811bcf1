//! Confidence-gated inference for the foodlens image classifier.
//!
//! # Gating
//!
//! - [`apply_gate`] - Turn a score vector into an accept-or-reject
//!   prediction
//! - [`ConfidenceThreshold`] - Validated threshold in `[0, 1]`
//!
//! # Prediction
//!
//! - [`Predictor`] - Holds a loaded bundle, classifies image files
//! - [`predict`] - One-shot load-and-classify; a missing bundle is a
//!   rejection, not an error
//!
//! # Example
//!
//! ```
//! use vision_infer::{apply_gate, ConfidenceThreshold};
//! use vision_types::{LabelEncoder, LabeledImage, ScoreVector};
//!
//! let encoder = LabelEncoder::fit(&[
//!     LabeledImage::new("a.png", "hotdog"),
//!     LabeledImage::new("b.png", "pizza"),
//! ]);
//! let threshold = ConfidenceThreshold::default();
//!
//! let result = apply_gate(&ScoreVector::new(vec![0.05, 0.95]), &encoder, threshold);
//! assert_eq!(result.predicted_label.as_deref(), Some("pizza"));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod gate;
mod predictor;

pub use error::{InferError, Result};
pub use gate::{apply_gate, ConfidenceThreshold, DEFAULT_CONFIDENCE_THRESHOLD};
pub use predictor::{predict, Predictor};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        apply_gate, predict, ConfidenceThreshold, InferError, Predictor,
        DEFAULT_CONFIDENCE_THRESHOLD,
    };
}
