//! Type coercion for the explicitly typed columns.

use super::converters::cast_series;
use crate::config::{CastFailurePolicy, ColumnCast};
use crate::error::{Result, TransformError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Outcome of a coercion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercionReport {
    /// Values that were present but could not be parsed, per column.
    pub cast_failures: BTreeMap<String, usize>,
    /// Rows removed because of a failed cast (`DropRows` policy only).
    pub rows_dropped: usize,
}

impl CoercionReport {
    /// Total failed values across all columns.
    pub fn total_failures(&self) -> usize {
        self.cast_failures.values().sum()
    }
}

/// Applies the configured column casts.
pub struct TypeCoercer {
    casts: Vec<ColumnCast>,
    policy: CastFailurePolicy,
}

impl TypeCoercer {
    pub fn new(casts: Vec<ColumnCast>, policy: CastFailurePolicy) -> Self {
        Self { casts, policy }
    }

    /// Cast every configured column, then apply the failure policy.
    ///
    /// A configured column missing from `df` is a [`TransformError::ColumnNotFound`].
    pub fn coerce(&self, mut df: DataFrame) -> Result<(DataFrame, CoercionReport)> {
        let mut report = CoercionReport::default();
        let mut failed_rows = BooleanChunked::full("cast_failed".into(), false, df.height());

        for cast in &self.casts {
            let original = df
                .column(&cast.column)
                .map_err(|_| TransformError::ColumnNotFound(cast.column.clone()))?
                .as_materialized_series()
                .clone();

            let converted = cast_series(&original, cast.target)?;
            let failed = &original.is_not_null() & &converted.is_null();
            let failures = failed.num_trues();

            debug!(
                "Cast '{}' to {} ({} failed values)",
                cast.column, cast.target, failures
            );

            if failures > 0 {
                if self.policy == CastFailurePolicy::Fail {
                    return Err(TransformError::CastFailed {
                        column: cast.column.clone(),
                        target_type: cast.target.to_string(),
                        count: failures,
                    });
                }
                warn!(
                    "{} value(s) in '{}' could not be cast to {}",
                    failures, cast.column, cast.target
                );
                report.cast_failures.insert(cast.column.clone(), failures);
                failed_rows = &failed_rows | &failed;
            }

            df.replace(&cast.column, converted)?;
        }

        if self.policy == CastFailurePolicy::DropRows && report.total_failures() > 0 {
            let before = df.height();
            df = df.filter(&!&failed_rows)?;
            report.rows_dropped = before - df.height();
            warn!(
                "Dropped {} row(s) with values that failed to cast",
                report.rows_dropped
            );
        }

        Ok((df, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CastTarget, default_column_casts};

    fn genomic_frame() -> DataFrame {
        df! {
            "cancer_type" => ["breast", "lung", "skin"],
            "gene_expression" => ["3.14", "n/a", "0.5"],
            "mutation_id" => ["42", "7", "x9"],
            "date" => ["2023-01-05", "2023-02-01", "2023-03-01"],
        }
        .unwrap()
    }

    #[test]
    fn test_coerce_sets_types() {
        let coercer = TypeCoercer::new(default_column_casts(), CastFailurePolicy::Keep);
        let (df, _) = coercer.coerce(genomic_frame()).unwrap();

        assert_eq!(df.column("gene_expression").unwrap().dtype(), &DataType::Float32);
        assert_eq!(df.column("mutation_id").unwrap().dtype(), &DataType::Int32);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("cancer_type").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_coerce_keep_policy_leaves_nulls() {
        let coercer = TypeCoercer::new(default_column_casts(), CastFailurePolicy::Keep);
        let (df, report) = coercer.coerce(genomic_frame()).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(report.cast_failures.get("gene_expression"), Some(&1));
        assert_eq!(report.cast_failures.get("mutation_id"), Some(&1));
        assert_eq!(report.cast_failures.get("date"), None);
        assert_eq!(report.rows_dropped, 0);
        assert_eq!(df.column("gene_expression").unwrap().null_count(), 1);
    }

    #[test]
    fn test_coerce_drop_rows_policy() {
        let coercer = TypeCoercer::new(default_column_casts(), CastFailurePolicy::DropRows);
        let (df, report) = coercer.coerce(genomic_frame()).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(report.rows_dropped, 2);
        assert_eq!(report.total_failures(), 2);
        for col in df.get_columns() {
            assert_eq!(col.null_count(), 0);
        }
    }

    #[test]
    fn test_coerce_drop_rows_ignores_preexisting_nulls() {
        let df = df! {
            "gene_expression" => [None, Some("1.5")],
        }
        .unwrap();
        let coercer = TypeCoercer::new(
            vec![ColumnCast::new("gene_expression", CastTarget::Float)],
            CastFailurePolicy::DropRows,
        );
        let (df, report) = coercer.coerce(df).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(report.total_failures(), 0);
    }

    #[test]
    fn test_coerce_fail_policy() {
        let coercer = TypeCoercer::new(default_column_casts(), CastFailurePolicy::Fail);
        let err = coercer.coerce(genomic_frame()).unwrap_err();
        assert!(matches!(
            err,
            TransformError::CastFailed { ref column, count: 1, .. } if column == "gene_expression"
        ));
    }

    #[test]
    fn test_coerce_missing_column() {
        let df = df! { "cancer_type" => ["breast"] }.unwrap();
        let coercer = TypeCoercer::new(default_column_casts(), CastFailurePolicy::Keep);
        let err = coercer.coerce(df).unwrap_err();
        assert!(matches!(err, TransformError::ColumnNotFound(ref c) if c == "gene_expression"));
    }
}
