//! Score vector and prediction result types.

use serde::{Deserialize, Serialize};

/// Ordered per-class scores produced by a classifier backend for one image.
///
/// Indices are consistent with the label-key space fixed at training
/// time: entry `i` is the score for the label that decodes from key `i`.
/// The provided backend emits softmax probabilities, so entries fall in
/// `[0, 1]` and compare meaningfully against a confidence threshold.
///
/// # Example
///
/// ```
/// use vision_types::ScoreVector;
///
/// let scores = ScoreVector::new(vec![0.1, 0.7, 0.2]);
/// assert_eq!(scores.argmax(), Some((1, 0.7)));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreVector(Vec<f32>);

impl ScoreVector {
    /// Creates a score vector.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(scores: Vec<f32>) -> Self {
        Self(scores)
    }

    /// Returns the scores as a slice.
    #[must_use]
    pub fn scores(&self) -> &[f32] {
        &self.0
    }

    /// Returns the number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no scores.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the index and value of the maximum score.
    ///
    /// Ties break toward the lowest index, so the result is fully
    /// deterministic. NaN entries never win. Returns `None` for an empty
    /// vector (or one containing only NaN).
    #[must_use]
    pub fn argmax(&self) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (index, &score) in self.0.iter().enumerate() {
            match best {
                None if !score.is_nan() => best = Some((index, score)),
                Some((_, top)) if score > top => best = Some((index, score)),
                _ => {}
            }
        }
        best
    }
}

impl From<Vec<f32>> for ScoreVector {
    fn from(scores: Vec<f32>) -> Self {
        Self::new(scores)
    }
}

/// Why a prediction was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The best score fell below the confidence threshold.
    BelowThreshold,

    /// No model was loaded when the prediction was requested.
    ModelUnavailable,
}

impl RejectionReason {
    /// Returns the reason name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BelowThreshold => "below_threshold",
            Self::ModelUnavailable => "model_unavailable",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Outcome of one confidence-gated prediction.
///
/// Rejection is a first-class result, never an error: a caller may
/// reasonably proceed without a confident answer (or without a model at
/// all) and prompt the user instead.
///
/// # Example
///
/// ```
/// use vision_types::{PredictionResult, RejectionReason};
///
/// let accepted = PredictionResult::accepted("pizza", 0.91);
/// assert!(accepted.accepted);
/// assert_eq!(accepted.predicted_label.as_deref(), Some("pizza"));
///
/// let rejected = PredictionResult::below_threshold();
/// assert!(!rejected.accepted);
/// assert_eq!(rejected.confidence, 0.0);
/// assert_eq!(rejected.reason, Some(RejectionReason::BelowThreshold));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted label, present only when accepted.
    pub predicted_label: Option<String>,

    /// Winning score when accepted, `0.0` otherwise.
    pub confidence: f32,

    /// Whether the prediction cleared the confidence threshold.
    pub accepted: bool,

    /// Why the prediction was rejected, `None` when accepted.
    pub reason: Option<RejectionReason>,
}

impl PredictionResult {
    /// Creates an accepted prediction.
    #[must_use]
    pub fn accepted(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            predicted_label: Some(label.into()),
            confidence,
            accepted: true,
            reason: None,
        }
    }

    /// Creates a low-confidence rejection.
    #[must_use]
    pub const fn below_threshold() -> Self {
        Self {
            predicted_label: None,
            confidence: 0.0,
            accepted: false,
            reason: Some(RejectionReason::BelowThreshold),
        }
    }

    /// Creates the model-unavailable result.
    #[must_use]
    pub const fn model_unavailable() -> Self {
        Self {
            predicted_label: None,
            confidence: 0.0,
            accepted: false,
            reason: Some(RejectionReason::ModelUnavailable),
        }
    }

    /// Returns `true` if this is the model-unavailable result.
    #[must_use]
    pub fn is_model_unavailable(&self) -> bool {
        self.reason == Some(RejectionReason::ModelUnavailable)
    }
}
