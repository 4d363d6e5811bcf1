//! Confidence gating of raw score vectors.

use vision_types::{LabelEncoder, PredictionResult, ScoreVector};

/// Default confidence threshold for accepting a prediction.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.75;

/// A validated confidence threshold in `[0, 1]`.
///
/// # Example
///
/// ```
/// use vision_infer::ConfidenceThreshold;
///
/// let threshold = ConfidenceThreshold::try_new(0.9).unwrap();
/// assert!((threshold.value() - 0.9).abs() < 1e-6);
/// assert!(ConfidenceThreshold::try_new(1.2).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceThreshold {
    value: f32,
}

impl ConfidenceThreshold {
    /// Creates a threshold, returning `None` for NaN or out-of-range
    /// values.
    #[must_use]
    pub fn try_new(value: f32) -> Option<Self> {
        (value.is_finite() && (0.0..=1.0).contains(&value)).then_some(Self { value })
    }

    /// Returns the threshold value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }
}

impl Default for ConfidenceThreshold {
    fn default() -> Self {
        Self {
            value: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Gates a score vector into an accept-or-reject prediction.
///
/// The winning class (lowest index on ties) is accepted only when its
/// score meets the threshold. A score exactly at the threshold is
/// accepted, so a threshold of `1.0` still accepts a fully confident
/// model. Rejection is a result, not an error.
///
/// An empty score vector, or a winning index the encoder cannot decode,
/// yields a below-threshold rejection; neither occurs when scores come
/// from a backend loaded out of the same bundle as the encoder.
///
/// # Example
///
/// ```
/// use vision_infer::{apply_gate, ConfidenceThreshold};
/// use vision_types::{LabelEncoder, LabeledImage, ScoreVector};
///
/// let encoder = LabelEncoder::fit(&[
///     LabeledImage::new("a.png", "hotdog"),
///     LabeledImage::new("b.png", "pizza"),
/// ]);
/// let threshold = ConfidenceThreshold::try_new(0.75).unwrap();
///
/// let result = apply_gate(&ScoreVector::new(vec![0.1, 0.9]), &encoder, threshold);
/// assert!(result.accepted);
/// assert_eq!(result.predicted_label.as_deref(), Some("pizza"));
///
/// let result = apply_gate(&ScoreVector::new(vec![0.6, 0.4]), &encoder, threshold);
/// assert!(!result.accepted);
/// ```
#[must_use]
pub fn apply_gate(
    scores: &ScoreVector,
    encoder: &LabelEncoder,
    threshold: ConfidenceThreshold,
) -> PredictionResult {
    let Some((index, confidence)) = scores.argmax() else {
        return PredictionResult::below_threshold();
    };
    if confidence < threshold.value() {
        return PredictionResult::below_threshold();
    }
    match encoder.decode(index) {
        Some(label) => PredictionResult::accepted(label, confidence),
        None => PredictionResult::below_threshold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vision_types::{LabeledImage, RejectionReason};

    fn encoder() -> LabelEncoder {
        LabelEncoder::fit(&[
            LabeledImage::new("a.png", "hotdog"),
            LabeledImage::new("b.png", "pizza"),
            LabeledImage::new("c.png", "sushi"),
        ])
    }

    fn threshold(value: f32) -> ConfidenceThreshold {
        ConfidenceThreshold::try_new(value).unwrap()
    }

    #[test]
    fn threshold_validation() {
        assert!(ConfidenceThreshold::try_new(0.0).is_some());
        assert!(ConfidenceThreshold::try_new(1.0).is_some());
        assert!(ConfidenceThreshold::try_new(-0.1).is_none());
        assert!(ConfidenceThreshold::try_new(1.1).is_none());
        assert!(ConfidenceThreshold::try_new(f32::NAN).is_none());
    }

    #[test]
    fn threshold_default() {
        let t = ConfidenceThreshold::default();
        assert!((t.value() - DEFAULT_CONFIDENCE_THRESHOLD).abs() < 1e-6);
    }

    #[test]
    fn gate_accepts_confident_winner() {
        let scores = ScoreVector::new(vec![0.1, 0.8, 0.1]);
        let result = apply_gate(&scores, &encoder(), threshold(0.75));

        assert!(result.accepted);
        assert_eq!(result.predicted_label.as_deref(), Some("pizza"));
        assert!((result.confidence - 0.8).abs() < 1e-6);
        assert!(result.reason.is_none());
    }

    #[test]
    fn gate_rejects_below_threshold() {
        let scores = ScoreVector::new(vec![0.1, 0.8, 0.1]);
        let result = apply_gate(&scores, &encoder(), threshold(0.95));

        assert!(!result.accepted);
        assert!(result.predicted_label.is_none());
        assert!(result.confidence.abs() < 1e-6);
        assert_eq!(result.reason, Some(RejectionReason::BelowThreshold));
    }

    #[test]
    fn gate_accepts_exactly_at_threshold() {
        let scores = ScoreVector::new(vec![0.25, 0.75]);
        let result = apply_gate(&scores, &encoder(), threshold(0.75));
        assert!(result.accepted);
    }

    #[test]
    fn gate_threshold_one_accepts_full_confidence() {
        let scores = ScoreVector::new(vec![0.0, 1.0, 0.0]);
        let result = apply_gate(&scores, &encoder(), threshold(1.0));
        assert!(result.accepted);
        assert_eq!(result.predicted_label.as_deref(), Some("pizza"));
    }

    #[test]
    fn gate_tie_breaks_to_lowest_index() {
        let scores = ScoreVector::new(vec![0.5, 0.5, 0.0]);
        let result = apply_gate(&scores, &encoder(), threshold(0.5));

        assert!(result.accepted);
        assert_eq!(result.predicted_label.as_deref(), Some("hotdog"));
    }

    #[test]
    fn gate_rejects_empty_scores() {
        let result = apply_gate(&ScoreVector::default(), &encoder(), threshold(0.0));
        assert!(!result.accepted);
        assert_eq!(result.reason, Some(RejectionReason::BelowThreshold));
    }

    #[test]
    fn gate_rejects_undecodable_winner() {
        // Four scores against a three-label encoder.
        let scores = ScoreVector::new(vec![0.0, 0.0, 0.0, 0.9]);
        let result = apply_gate(&scores, &encoder(), threshold(0.5));
        assert!(!result.accepted);
    }
}
