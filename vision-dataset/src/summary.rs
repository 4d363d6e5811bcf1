//! Per-class dataset statistics.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};
use vision_types::LabeledImage;

/// Per-class example counts for a labeled dataset.
///
/// Built once after loading, the breakdown drives validation (enough
/// classes, no class silently emptied downstream) and progress logging.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use vision_dataset::ClassBreakdown;
/// use vision_types::LabeledImage;
///
/// let examples = vec![
///     LabeledImage::new(PathBuf::from("a.png"), "pizza"),
///     LabeledImage::new(PathBuf::from("b.png"), "pizza"),
///     LabeledImage::new(PathBuf::from("c.png"), "sushi"),
/// ];
/// let breakdown = ClassBreakdown::from_examples(&examples);
///
/// assert_eq!(breakdown.num_classes(), 2);
/// assert_eq!(breakdown.count("pizza"), 2);
/// assert_eq!(breakdown.total_examples(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassBreakdown {
    counts: BTreeMap<String, usize>,
}

impl ClassBreakdown {
    /// Builds a breakdown from labeled examples.
    #[must_use]
    pub fn from_examples(examples: &[LabeledImage]) -> Self {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for example in examples {
            *counts.entry(example.label.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Returns the number of examples for `label`, zero if absent.
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Returns the number of distinct classes.
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.counts.len()
    }

    /// Returns the total number of examples.
    #[must_use]
    pub fn total_examples(&self) -> usize {
        self.counts.values().sum()
    }

    /// Returns the label with the fewest examples, if any.
    #[must_use]
    pub fn smallest_class(&self) -> Option<(&str, usize)> {
        self.counts
            .iter()
            .min_by_key(|(_, &count)| count)
            .map(|(label, &count)| (label.as_str(), count))
    }

    /// Returns labels present here but absent from `other`.
    ///
    /// Used to detect classes that lost every example to decode-time
    /// skipping between loading and training.
    #[must_use]
    pub fn missing_from(&self, other: &Self) -> Vec<&str> {
        self.counts
            .keys()
            .filter(|label| !other.counts.contains_key(label.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Iterates over `(label, count)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(label, &count)| (label.as_str(), count))
    }

    /// Renders a one-line-per-class report.
    #[must_use]
    pub fn to_report(&self) -> String {
        let mut report = String::new();
        let _ = writeln!(
            report,
            "{} classes, {} examples",
            self.num_classes(),
            self.total_examples()
        );
        for (label, count) in &self.counts {
            let _ = writeln!(report, "  {label}: {count}");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn examples(labels: &[&str]) -> Vec<LabeledImage> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| LabeledImage::new(PathBuf::from(format!("{i}.png")), *label))
            .collect()
    }

    #[test]
    fn breakdown_counts_per_class() {
        let breakdown =
            ClassBreakdown::from_examples(&examples(&["pizza", "sushi", "pizza", "pizza"]));
        assert_eq!(breakdown.count("pizza"), 3);
        assert_eq!(breakdown.count("sushi"), 1);
        assert_eq!(breakdown.count("hotdog"), 0);
        assert_eq!(breakdown.num_classes(), 2);
        assert_eq!(breakdown.total_examples(), 4);
    }

    #[test]
    fn breakdown_empty() {
        let breakdown = ClassBreakdown::from_examples(&[]);
        assert_eq!(breakdown.num_classes(), 0);
        assert_eq!(breakdown.total_examples(), 0);
        assert!(breakdown.smallest_class().is_none());
    }

    #[test]
    fn breakdown_smallest_class() {
        let breakdown =
            ClassBreakdown::from_examples(&examples(&["pizza", "pizza", "sushi", "hotdog", "hotdog"]));
        assert_eq!(breakdown.smallest_class(), Some(("sushi", 1)));
    }

    #[test]
    fn breakdown_missing_from() {
        let before = ClassBreakdown::from_examples(&examples(&["pizza", "sushi", "hotdog"]));
        let after = ClassBreakdown::from_examples(&examples(&["pizza", "hotdog"]));

        assert_eq!(before.missing_from(&after), vec!["sushi"]);
        assert!(after.missing_from(&before).is_empty());
    }

    #[test]
    fn breakdown_report_lists_classes() {
        let breakdown = ClassBreakdown::from_examples(&examples(&["pizza", "sushi"]));
        let report = breakdown.to_report();
        assert!(report.contains("2 classes"));
        assert!(report.contains("pizza: 1"));
        assert!(report.contains("sushi: 1"));
    }

    #[test]
    fn breakdown_serialization() {
        let breakdown = ClassBreakdown::from_examples(&examples(&["pizza", "sushi"]));
        let json = serde_json::to_string(&breakdown);
        assert!(json.is_ok());

        let parsed: std::result::Result<ClassBreakdown, _> =
            serde_json::from_str(&json.unwrap_or_default());
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap_or_default(), breakdown);
    }
}
