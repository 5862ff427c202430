//! Execution results and measurement counts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Histogram of measurement outcomes.
///
/// Keys are classical bitstrings with the rightmost character holding
/// classical bit 0, so a Bell pair measured into bits 0 and 1 produces
/// keys `"00"` and `"11"`. Backed by an ordered map: iteration, display,
/// and serialization all list outcomes in lexicographic key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram from (bitstring, count) pairs.
    ///
    /// Counts for repeated bitstrings are summed.
    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, u64)>) -> Self {
        let mut counts = Self::new();
        for (bitstring, count) in pairs {
            *counts.counts.entry(bitstring.into()).or_insert(0) += count;
        }
        counts
    }

    /// Record one occurrence of an outcome.
    pub fn record(&mut self, bitstring: impl Into<String>) {
        *self.counts.entry(bitstring.into()).or_insert(0) += 1;
    }

    /// Get the count for a bitstring (zero if never observed).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over (bitstring, count) pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Iterate over counts in key order.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.counts.values().copied()
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check whether no outcome was observed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of recorded shots.
    pub fn total_shots(&self) -> u64 {
        self.values().sum()
    }

    /// The most frequent outcome, if any.
    ///
    /// Ties resolve to the lexicographically smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, &v)| (k.as_str(), v))
    }

    /// Outcomes sorted by descending count, ties in key order.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Observed relative frequency of a bitstring.
    ///
    /// Returns 0.0 for an empty histogram.
    #[allow(clippy::cast_precision_loss)]
    pub fn probability(&self, bitstring: &str) -> f64 {
        let total = self.total_shots();
        if total == 0 {
            return 0.0;
        }
        self.get(bitstring) as f64 / total as f64
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (bitstring, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{bitstring}\": {count}")?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Counts {
    fn from_iter<T: IntoIterator<Item = (K, u64)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

/// The outcome of one executed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measurement counts.
    pub counts: Counts,
    /// Number of shots that produced the counts.
    pub shots: u32,
    /// Wall-clock execution time, if the backend reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
    /// Backend-specific extra information.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl ExecutionResult {
    /// Create a result from counts and the requested shot count.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// Attach the execution time in milliseconds.
    #[must_use]
    pub fn with_execution_time(mut self, millis: u64) -> Self {
        self.execution_time_ms = Some(millis);
        self
    }

    /// Attach backend-specific metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut counts = Counts::new();
        counts.record("00");
        counts.record("11");
        counts.record("00");

        assert_eq!(counts.get("00"), 2);
        assert_eq!(counts.get("11"), 1);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.total_shots(), 3);
        assert_eq!(counts.values().collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_from_pairs_merges_duplicates() {
        let counts = Counts::from_pairs([("00", 10), ("11", 5), ("00", 2)]);
        assert_eq!(counts.get("00"), 12);
        assert_eq!(counts.total_shots(), 17);
    }

    #[test]
    fn test_most_frequent() {
        assert_eq!(Counts::new().most_frequent(), None);

        let counts = Counts::from_pairs([("00", 40), ("01", 10), ("11", 50)]);
        assert_eq!(counts.most_frequent(), Some(("11", 50)));

        // Ties resolve to the smallest bitstring.
        let tied = Counts::from_pairs([("11", 7), ("00", 7)]);
        assert_eq!(tied.most_frequent(), Some(("00", 7)));
    }

    #[test]
    fn test_sorted_is_descending() {
        let counts = Counts::from_pairs([("10", 3), ("00", 9), ("11", 3), ("01", 5)]);
        let sorted = counts.sorted();
        assert_eq!(
            sorted,
            vec![("00", 9), ("01", 5), ("10", 3), ("11", 3)]
        );
    }

    #[test]
    fn test_probability() {
        let counts = Counts::from_pairs([("0", 25), ("1", 75)]);
        assert!((counts.probability("1") - 0.75).abs() < f64::EPSILON);
        assert!((counts.probability("0") - 0.25).abs() < f64::EPSILON);
        assert_eq!(Counts::new().probability("0"), 0.0);
    }

    #[test]
    fn test_display_single_line() {
        let counts = Counts::from_pairs([("11", 4988), ("00", 5012)]);
        assert_eq!(counts.to_string(), "{\"00\": 5012, \"11\": 4988}");
        assert_eq!(Counts::new().to_string(), "{}");
    }

    #[test]
    fn test_result_builders() {
        let counts = Counts::from_pairs([("00", 600), ("11", 400)]);
        let result = ExecutionResult::new(counts, 1000).with_execution_time(42);

        assert_eq!(result.shots, 1000);
        assert_eq!(result.execution_time_ms, Some(42));
        assert_eq!(result.counts.total_shots(), 1000);
        assert!(result.metadata.is_null());
    }

    #[test]
    fn test_result_serde_roundtrip() {
        let counts = Counts::from_pairs([("00", 1), ("11", 3)]);
        let result = ExecutionResult::new(counts, 4)
            .with_metadata(serde_json::json!({ "backend": "statevector" }));

        let json = serde_json::to_string(&result).unwrap();
        let back: ExecutionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.counts.get("11"), 3);
    }
}
