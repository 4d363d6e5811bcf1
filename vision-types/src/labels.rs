//! Label encoding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::example::{EncodedImage, LabeledImage};

/// Maps label strings to dense integer keys and back.
///
/// Keys are assigned by sorting the distinct labels, so the mapping is
/// deterministic for a given label set and stable for the lifetime of
/// one training run. The encoder is persisted inside the model bundle so
/// inference always decodes with the exact mapping used at training
/// time; two encoders fitted in separate runs are not required to agree
/// with each other.
///
/// # Example
///
/// ```
/// use vision_types::{LabelEncoder, LabeledImage};
///
/// let examples = vec![
///     LabeledImage::new("a/1.png", "sushi"),
///     LabeledImage::new("b/1.png", "hotdog"),
///     LabeledImage::new("b/2.png", "hotdog"),
/// ];
///
/// let encoder = LabelEncoder::fit(&examples);
/// assert_eq!(encoder.len(), 2);
/// assert_eq!(encoder.encode("hotdog"), Some(0));
/// assert_eq!(encoder.decode(1), Some("sushi"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelEncoder {
    labels: Vec<String>,
}

impl LabelEncoder {
    /// Fits an encoder over the distinct labels in a set of examples.
    ///
    /// Empty labels are ignored; every example fed to training carries a
    /// non-empty label by construction of the dataset loader.
    #[must_use]
    pub fn fit(examples: &[LabeledImage]) -> Self {
        let distinct: BTreeSet<&str> = examples
            .iter()
            .filter(|e| e.has_label())
            .map(|e| e.label.as_str())
            .collect();

        Self {
            labels: distinct.into_iter().map(String::from).collect(),
        }
    }

    /// Returns the dense key for a label, if the label was seen at fit time.
    #[must_use]
    pub fn encode(&self, label: &str) -> Option<usize> {
        // Labels are kept sorted, so binary search is exact.
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    /// Returns the label string for a key, if the key is in range.
    #[must_use]
    pub fn decode(&self, key: usize) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Returns the number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no labels were seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns all known labels in key order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Attaches keys to a batch of examples.
    ///
    /// Examples whose label was not seen at fit time are dropped; when
    /// the encoder was fitted over the same example list this never
    /// removes anything.
    #[must_use]
    pub fn encode_examples(&self, examples: Vec<LabeledImage>) -> Vec<EncodedImage> {
        examples
            .into_iter()
            .filter_map(|e| self.encode(&e.label).map(|key| EncodedImage::new(e, key)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn examples() -> Vec<LabeledImage> {
        vec![
            LabeledImage::new("data/pizza/1.png", "pizza"),
            LabeledImage::new("data/hotdog/1.png", "hotdog"),
            LabeledImage::new("data/sushi/1.png", "sushi"),
            LabeledImage::new("data/pizza/2.png", "pizza"),
        ]
    }

    #[test]
    fn encoder_fit_distinct_sorted() {
        let encoder = LabelEncoder::fit(&examples());
        assert_eq!(encoder.len(), 3);
        assert_eq!(encoder.labels(), ["hotdog", "pizza", "sushi"]);
    }

    #[test]
    fn encoder_round_trip_every_label() {
        let encoder = LabelEncoder::fit(&examples());
        for label in ["hotdog", "pizza", "sushi"] {
            let key = encoder.encode(label).unwrap();
            assert_eq!(encoder.decode(key), Some(label));
        }
    }

    #[test]
    fn encoder_unknown_label() {
        let encoder = LabelEncoder::fit(&examples());
        assert_eq!(encoder.encode("ramen"), None);
        assert_eq!(encoder.decode(3), None);
    }

    #[test]
    fn encoder_ignores_empty_labels() {
        let mut with_empty = examples();
        with_empty.push(LabeledImage::new("data/x.png", ""));

        let encoder = LabelEncoder::fit(&with_empty);
        assert_eq!(encoder.len(), 3);
    }

    #[test]
    fn encoder_deterministic_within_run() {
        let a = LabelEncoder::fit(&examples());
        let b = LabelEncoder::fit(&examples());
        assert_eq!(a, b);
    }

    #[test]
    fn encoder_encode_examples() {
        let encoder = LabelEncoder::fit(&examples());
        let encoded = encoder.encode_examples(examples());

        assert_eq!(encoded.len(), 4);
        for e in &encoded {
            assert_eq!(encoder.decode(e.label_key), Some(e.label.as_str()));
        }
    }

    #[test]
    fn encoder_empty() {
        let encoder = LabelEncoder::fit(&[]);
        assert!(encoder.is_empty());
        assert_eq!(encoder.encode("anything"), None);
    }

    #[test]
    fn encoder_serialization() {
        let encoder = LabelEncoder::fit(&examples());
        let json = serde_json::to_string(&encoder);
        assert!(json.is_ok());

        let parsed: std::result::Result<LabelEncoder, _> =
            serde_json::from_str(&json.unwrap_or_default());
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap_or_default(), encoder);
    }
}
