//! Categorical column normalization.

use crate::error::{Result, TransformError};
use polars::prelude::*;
use tracing::debug;

/// Lower-case `column` and replace its nulls with `default`.
///
/// Returns the updated frame and the number of nulls that were replaced.
pub fn normalize_categorical(
    mut df: DataFrame,
    column: &str,
    default: &str,
) -> Result<(DataFrame, usize)> {
    let series = df
        .column(column)
        .map_err(|_| TransformError::ColumnNotFound(column.to_string()))?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let str_series = series.str()?;
    let mut defaulted = 0usize;
    let values: Vec<String> = str_series
        .into_iter()
        .map(|opt_val| match opt_val {
            Some(val) => val.to_lowercase(),
            None => {
                defaulted += 1;
                default.to_string()
            }
        })
        .collect();

    df.replace(column, Series::new(column.into(), values))?;

    if defaulted > 0 {
        debug!(
            "Replaced {} null value(s) in '{}' with '{}'",
            defaulted, column, default
        );
    }

    Ok((df, defaulted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_categorical_lowercases() {
        let df = df! { "cancer_type" => ["Breast", "LUNG", "skin"] }.unwrap();
        let (df, defaulted) = normalize_categorical(df, "cancer_type", "unknown").unwrap();
        let values: Vec<Option<&str>> = df
            .column("cancer_type")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some("breast"), Some("lung"), Some("skin")]);
        assert_eq!(defaulted, 0);
    }

    #[test]
    fn test_normalize_categorical_defaults_nulls() {
        let df = df! { "cancer_type" => [None, Some("Breast")] }.unwrap();
        let (df, defaulted) = normalize_categorical(df, "cancer_type", "unknown").unwrap();
        let col = df.column("cancer_type").unwrap().as_materialized_series();
        assert_eq!(col.null_count(), 0);
        assert_eq!(col.str().unwrap().get(0), Some("unknown"));
        assert_eq!(defaulted, 1);
    }

    #[test]
    fn test_normalize_categorical_missing_column() {
        let df = df! { "tissue" => ["skin"] }.unwrap();
        let err = normalize_categorical(df, "cancer_type", "unknown").unwrap_err();
        assert!(matches!(err, TransformError::ColumnNotFound(_)));
    }
}
