//! Training pipeline for the foodlens image classifier.
//!
//! One [`Trainer::train`] call takes a folder of labeled images to a
//! saved, versioned model bundle and reports held-out accuracy:
//!
//! # Pipeline
//!
//! - [`Trainer`] - Load, shuffle, encode, preprocess, split, fit,
//!   evaluate, and bundle
//! - [`TrainerConfig`] - Geometry, test fraction, and seeds
//!
//! # Metrics
//!
//! - [`ConfusionMatrix`] - Actual-by-predicted counts over the label-key
//!   space
//! - [`EvaluationReport`] - Macro and micro accuracy with a printable
//!   summary
//!
//! # Example
//!
//! ```ignore
//! use vision_models::{FitOptions, SoftmaxClassifier};
//! use vision_training::{Trainer, TrainerConfig};
//!
//! let config = TrainerConfig::default();
//! let backend = SoftmaxClassifier::new(config.geometry, FitOptions::default());
//! let trainer = Trainer::new(backend, config)?;
//! let report = trainer.train("data/food".as_ref(), "models/food".as_ref())?;
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod error;
mod metrics;
mod trainer;

pub use config::TrainerConfig;
pub use error::{Result, TrainError};
pub use metrics::{ConfusionMatrix, EvaluationReport};
pub use trainer::Trainer;

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{ConfusionMatrix, EvaluationReport, TrainError, Trainer, TrainerConfig};
}
