//! Evaluation metrics: confusion matrix and accuracy summary.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// A square confusion matrix over the label-key space.
///
/// Rows are actual classes, columns are predicted classes, both indexed
/// by label key.
///
/// # Example
///
/// ```
/// use vision_training::ConfusionMatrix;
///
/// let mut matrix = ConfusionMatrix::new(vec!["hotdog".into(), "pizza".into()]);
/// matrix.record(0, 0);
/// matrix.record(0, 1);
/// matrix.record(1, 1);
///
/// assert_eq!(matrix.count(0, 0), 1);
/// assert_eq!(matrix.correct(), 2);
/// assert_eq!(matrix.total(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    cells: Vec<usize>,
}

impl ConfusionMatrix {
    /// Creates an empty matrix over the given labels in key order.
    #[must_use]
    pub fn new(labels: Vec<String>) -> Self {
        let size = labels.len();
        Self {
            labels,
            cells: vec![0; size * size],
        }
    }

    /// Returns the number of classes.
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// Returns the labels in key order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Records one prediction.
    ///
    /// Out-of-range keys are ignored; with scores indexed by the encoder
    /// that fits the matrix, they cannot occur.
    pub fn record(&mut self, actual: usize, predicted: usize) {
        let size = self.labels.len();
        if actual < size && predicted < size {
            self.cells[actual * size + predicted] += 1;
        }
    }

    /// Returns the count for one cell.
    #[must_use]
    pub fn count(&self, actual: usize, predicted: usize) -> usize {
        let size = self.labels.len();
        if actual < size && predicted < size {
            self.cells[actual * size + predicted]
        } else {
            0
        }
    }

    /// Returns the number of test examples of class `actual`.
    #[must_use]
    pub fn row_total(&self, actual: usize) -> usize {
        let size = self.labels.len();
        if actual >= size {
            return 0;
        }
        self.cells[actual * size..(actual + 1) * size].iter().sum()
    }

    /// Returns the total number of correct predictions.
    #[must_use]
    pub fn correct(&self) -> usize {
        (0..self.labels.len()).map(|i| self.count(i, i)).sum()
    }

    /// Returns the total number of recorded predictions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.cells.iter().sum()
    }

    /// Returns per-class accuracy in key order.
    ///
    /// Classes with no test examples yield `None` rather than a
    /// misleading zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn per_class_accuracy(&self) -> Vec<Option<f32>> {
        (0..self.labels.len())
            .map(|i| {
                let row = self.row_total(i);
                (row > 0).then(|| self.count(i, i) as f32 / row as f32)
            })
            .collect()
    }

    /// Returns the unweighted mean of per-class accuracies.
    ///
    /// Classes with no test examples are skipped rather than dragging
    /// the mean to zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn macro_accuracy(&self) -> f32 {
        let per_class: Vec<f32> = self.per_class_accuracy().into_iter().flatten().collect();
        if per_class.is_empty() {
            0.0
        } else {
            per_class.iter().sum::<f32>() / per_class.len() as f32
        }
    }

    /// Returns the overall fraction of correct predictions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn micro_accuracy(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.correct() as f32 / total as f32
        }
    }
}

/// The evaluation half of a finished training run.
///
/// # Example
///
/// ```
/// use vision_training::{ConfusionMatrix, EvaluationReport};
///
/// let mut matrix = ConfusionMatrix::new(vec!["hotdog".into(), "pizza".into()]);
/// matrix.record(0, 0);
/// matrix.record(1, 1);
///
/// let report = EvaluationReport::from_confusion(matrix, 2);
/// assert!((report.micro_accuracy - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Unweighted mean of per-class accuracies.
    pub macro_accuracy: f32,

    /// Overall fraction of correct predictions.
    pub micro_accuracy: f32,

    /// Full confusion matrix.
    pub confusion: ConfusionMatrix,

    /// Number of held-out examples evaluated.
    pub test_samples: usize,
}

impl EvaluationReport {
    /// Builds a report from a populated confusion matrix.
    #[must_use]
    pub fn from_confusion(confusion: ConfusionMatrix, test_samples: usize) -> Self {
        Self {
            macro_accuracy: confusion.macro_accuracy(),
            micro_accuracy: confusion.micro_accuracy(),
            confusion,
            test_samples,
        }
    }

    /// Renders a human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "evaluated {} test samples", self.test_samples);
        let _ = writeln!(out, "macro accuracy: {:.3}", self.macro_accuracy);
        let _ = writeln!(out, "micro accuracy: {:.3}", self.micro_accuracy);
        let _ = writeln!(out, "per-class accuracy:");

        let accuracies = self.confusion.per_class_accuracy();
        for (label, accuracy) in self.confusion.labels().iter().zip(accuracies) {
            match accuracy {
                Some(value) => {
                    let _ = writeln!(out, "  {label}: {value:.3}");
                }
                None => {
                    let _ = writeln!(out, "  {label}: no test examples");
                }
            }
        }
        out
    }
}
