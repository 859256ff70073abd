//! Row and schema cleaning for the genomic dataset.
//!
//! This module provides the individual transformation steps:
//! - Dropping rows that contain a null in any column
//! - Removing exact duplicate rows
//! - Normalizing column names
//! - Casting the typed columns
//! - Normalizing the categorical partition column

mod categorical;
mod converters;
mod naming;
mod type_corrector;

pub use categorical::normalize_categorical;
pub use converters::{parse_date, parse_float, parse_integer};
pub use naming::{normalize_column_name, normalize_column_names};
pub use type_corrector::{CoercionReport, TypeCoercer};

use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// Row-level cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Drop every row that has a null in at least one column.
    ///
    /// Returns the filtered frame and the number of rows removed. A frame in
    /// which every row has a null comes back empty.
    pub fn drop_null_rows(&self, df: DataFrame) -> Result<(DataFrame, usize)> {
        let before = df.height();
        if before == 0 || df.width() == 0 {
            return Ok((df, 0));
        }

        let df = df.filter(&non_null_mask(&df))?;
        let removed = before - df.height();
        debug!("Dropped {} of {} rows containing nulls", removed, before);
        Ok((df, removed))
    }

    /// Remove rows that are exact duplicates of an earlier row.
    ///
    /// Returns the deduplicated frame and the number of rows removed.
    pub fn remove_duplicates(&self, df: DataFrame) -> Result<(DataFrame, usize)> {
        let before = df.height();
        if before == 0 || df.width() == 0 {
            return Ok((df, 0));
        }

        let df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let removed = before - df.height();
        debug!("Removed {} duplicate rows", removed);
        Ok((df, removed))
    }
}

/// Boolean mask that is true for rows without any null.
pub(crate) fn non_null_mask(df: &DataFrame) -> BooleanChunked {
    let mut mask = BooleanChunked::full("non_null".into(), true, df.height());
    for col in df.get_columns() {
        let present = col.as_materialized_series().is_not_null();
        mask = &mask & &present;
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        df! {
            "cancer_type" => [Some("Breast"), Some("Lung"), None, Some("Breast")],
            "gene_expression" => [Some("3.14"), None, Some("1.0"), Some("3.14")],
        }
        .unwrap()
    }

    #[test]
    fn test_drop_null_rows_removes_any_null() {
        let (df, removed) = DataCleaner.drop_null_rows(sample_frame()).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(df.height(), 2);
        for col in df.get_columns() {
            assert_eq!(col.null_count(), 0);
        }
    }

    #[test]
    fn test_drop_null_rows_all_null_gives_empty_frame() {
        let df = df! {
            "a" => [None::<&str>, Some("x")],
            "b" => [Some("y"), None::<&str>],
        }
        .unwrap();
        let (df, removed) = DataCleaner.drop_null_rows(df).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_drop_null_rows_no_nulls() {
        let df = df! { "a" => ["x", "y"] }.unwrap();
        let (df, removed) = DataCleaner.drop_null_rows(df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_remove_duplicates_keeps_one_representative() {
        let (df, _) = DataCleaner.drop_null_rows(sample_frame()).unwrap();
        let (df, removed) = DataCleaner.remove_duplicates(df).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn test_remove_duplicates_requires_all_fields_equal() {
        let df = df! {
            "a" => ["x", "x", "x"],
            "b" => ["1", "2", "1"],
        }
        .unwrap();
        let (df, removed) = DataCleaner.remove_duplicates(df).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence_order() {
        let df = df! {
            "a" => ["b", "a", "b", "c", "a"],
            "b" => ["1", "2", "1", "3", "2"],
        }
        .unwrap();
        let (df, removed) = DataCleaner.remove_duplicates(df).unwrap();
        assert_eq!(removed, 2);

        let values: Vec<Option<&str>> = df
            .column("a")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some("b"), Some("a"), Some("c")]);
    }

    #[test]
    fn test_remove_duplicates_empty_frame() {
        let df = DataFrame::empty();
        let (df, removed) = DataCleaner.remove_duplicates(df).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(df.height(), 0);
    }
}
