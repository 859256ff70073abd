//! Result types reported by the transform pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One partition directory written by a [`DatasetStore`](crate::storage::DatasetStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSummary {
    /// Partition key value as it appears in the data.
    pub value: String,
    /// Directory holding the partition's files.
    pub path: PathBuf,
    /// Rows written to the partition.
    pub rows: usize,
}

/// Row and schema accounting for one pipeline run.
///
/// Row counts are recorded after each step so that the effect of every
/// transformation can be read back from the job output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformSummary {
    /// Rows read from the input.
    pub rows_read: usize,
    /// Columns read from the input.
    pub columns: usize,
    /// Rows removed because they contained a null.
    pub null_rows_removed: usize,
    /// Rows removed as exact duplicates.
    pub duplicates_removed: usize,
    /// `(original, normalized)` names of columns that were renamed.
    pub renamed_columns: Vec<(String, String)>,
    /// Values that failed to cast, per column.
    pub cast_failures: BTreeMap<String, usize>,
    /// Rows removed after coercion because a cast failed.
    pub cast_rows_removed: usize,
    /// Null partition keys replaced with the unknown category.
    pub categories_defaulted: usize,
    /// Rows in the final dataset.
    pub rows_written: usize,
    /// Partitions written, sorted by value.
    pub partitions: Vec<PartitionSummary>,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
}

impl TransformSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows removed by any step.
    pub fn rows_removed(&self) -> usize {
        self.rows_read.saturating_sub(self.rows_written)
    }

    /// Percentage of input rows that did not make it to the output.
    pub fn rows_removed_percentage(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.rows_removed() as f64 / self.rows_read as f64) * 100.0
        }
    }

    /// Rows per partition value.
    pub fn partition_counts(&self) -> BTreeMap<&str, usize> {
        self.partitions
            .iter()
            .map(|p| (p.value.as_str(), p.rows))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_removed_percentage() {
        let summary = TransformSummary {
            rows_read: 10,
            rows_written: 7,
            ..TransformSummary::new()
        };
        assert_eq!(summary.rows_removed(), 3);
        assert!((summary.rows_removed_percentage() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rows_removed_percentage_empty_input() {
        let summary = TransformSummary::new();
        assert_eq!(summary.rows_removed_percentage(), 0.0);
    }

    #[test]
    fn test_partition_counts() {
        let summary = TransformSummary {
            partitions: vec![
                PartitionSummary {
                    value: "breast".to_string(),
                    path: PathBuf::from("out/cancer_type=breast"),
                    rows: 2,
                },
                PartitionSummary {
                    value: "lung".to_string(),
                    path: PathBuf::from("out/cancer_type=lung"),
                    rows: 1,
                },
            ],
            ..TransformSummary::new()
        };
        let counts = summary.partition_counts();
        assert_eq!(counts.get("breast"), Some(&2));
        assert_eq!(counts.get("lung"), Some(&1));
    }

    #[test]
    fn test_summary_serializes() {
        let summary = TransformSummary {
            rows_read: 3,
            ..TransformSummary::new()
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"rows_read\":3"));
        assert!(json.contains("\"partitions\":[]"));
    }
}
