//! Classifier backends and model persistence for the foodlens pipeline.
//!
//! This crate owns everything between a decoded image and a score
//! vector:
//!
//! # Preprocessing
//!
//! - [`ImagePreprocessor`] - Decode, resize, and normalize images to a
//!   fixed CHW buffer
//!
//! # Backends
//!
//! - [`ClassifierBackend`] - The seam the trainer and predictor are
//!   written against
//! - [`SoftmaxClassifier`] - Burn-based feedforward network trained with
//!   cross-entropy
//! - [`FitOptions`] - Fitting hyperparameters
//!
//! # Bundles
//!
//! - [`save_bundle`] / [`load_bundle`] - Atomic, versioned persistence
//!   of weights, encoder, and geometry
//! - [`BundleManifest`] - What a bundle declares about itself
//!
//! # Example
//!
//! ```ignore
//! use vision_models::{FitOptions, SoftmaxClassifier, save_bundle};
//! use vision_types::ImageGeometry;
//!
//! let backend = SoftmaxClassifier::new(ImageGeometry::square(64), FitOptions::default());
//! let fitted = backend.fit(&train, &validation, encoder.len())?;
//! save_bundle(&backend, &fitted, backend.geometry(), &encoder, path)?;
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod backend;
mod bundle;
mod error;
mod preprocess;
mod softmax;

pub use backend::{ClassifierBackend, FitOptions};
pub use bundle::{
    load_bundle, load_manifest, save_bundle, BundleManifest, SchemaVersion, MANIFEST_FILE,
};
pub use error::{ModelError, Result};
pub use preprocess::ImagePreprocessor;
pub use softmax::{
    FittedSoftmax, InferenceBackend, NetworkShape, SoftmaxClassifier, SoftmaxModel, TrainBackend,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        load_bundle, load_manifest, save_bundle, BundleManifest, ClassifierBackend, FitOptions,
        ImagePreprocessor, ModelError, SoftmaxClassifier,
    };
}
