//! Dataset loading and splitting for the foodlens pipeline.
//!
//! This crate turns a folder of labeled images into training data:
//!
//! # Loading
//!
//! - [`load_examples`] - Scan a root directory whose immediate
//!   subdirectories are class labels
//! - [`ClassBreakdown`] - Per-class example counts for validation and
//!   logging
//!
//! # Splitting
//!
//! - [`TestFraction`] - Validated held-out fraction in `(0, 1)`
//! - [`split_dataset`] - Seeded, deterministic train/test partition
//!
//! # Example
//!
//! ```
//! use vision_dataset::{split_dataset, TestFraction, DEFAULT_SPLIT_SEED};
//!
//! let samples: Vec<u32> = (0..10).collect();
//! let (train, test) = split_dataset(&samples, TestFraction::default(), DEFAULT_SPLIT_SEED);
//!
//! assert_eq!(train.len(), 8);
//! assert_eq!(test.len(), 2);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod loader;
mod splits;
mod summary;

pub use error::{DatasetError, Result};
pub use loader::load_examples;
pub use splits::{split_dataset, TestFraction, DEFAULT_SPLIT_SEED};
pub use summary::ClassBreakdown;

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        load_examples, split_dataset, ClassBreakdown, DatasetError, TestFraction,
        DEFAULT_SPLIT_SEED,
    };
}
