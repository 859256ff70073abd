//! Column name normalization.

use crate::error::{Result, TransformError};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Normalize a single column name: trim, lower-case, spaces to underscores.
///
/// The mapping is idempotent, so an already normalized name is unchanged.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Rename every column of `df` to its normalized form.
///
/// Returns the renamed frame and the `(old, new)` pairs of the columns whose
/// name actually changed. Fails with [`TransformError::SchemaConflict`] when
/// two distinct source names normalize to the same target.
pub fn normalize_column_names(mut df: DataFrame) -> Result<(DataFrame, Vec<(String, String)>)> {
    let originals: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut targets: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in &originals {
        targets
            .entry(normalize_column_name(name))
            .or_default()
            .push(name.clone());
    }

    if let Some((normalized, sources)) = targets.into_iter().find(|(_, s)| s.len() > 1) {
        return Err(TransformError::SchemaConflict {
            normalized,
            sources,
        });
    }

    let mut renamed = Vec::new();
    for old in originals {
        let new = normalize_column_name(&old);
        if new != old {
            df.rename(&old, new.as_str().into())?;
            debug!("Renamed column '{}' -> '{}'", old, new);
            renamed.push((old, new));
        }
    }

    Ok((df, renamed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("Cancer Type"), "cancer_type");
        assert_eq!(normalize_column_name("  Gene Expression  "), "gene_expression");
        assert_eq!(normalize_column_name("mutation_id"), "mutation_id");
        assert_eq!(normalize_column_name("DATE"), "date");
    }

    #[test]
    fn test_normalize_column_name_internal_spaces_each_replaced() {
        assert_eq!(normalize_column_name("Sample  ID"), "sample__id");
    }

    #[test]
    fn test_normalize_column_name_is_idempotent() {
        for name in ["Cancer Type", " Patient Barcode ", "x y z"] {
            let once = normalize_column_name(name);
            assert_eq!(normalize_column_name(&once), once);
        }
    }

    #[test]
    fn test_normalize_column_names_renames_frame() {
        let df = df! {
            "Cancer Type" => ["Breast"],
            " Gene Expression" => ["3.14"],
            "date" => ["2023-01-05"],
        }
        .unwrap();

        let (df, renamed) = normalize_column_names(df).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["cancer_type", "gene_expression", "date"]);
        assert_eq!(renamed.len(), 2);
        assert_eq!(
            renamed[0],
            ("Cancer Type".to_string(), "cancer_type".to_string())
        );
    }

    #[test]
    fn test_normalize_column_names_conflict() {
        let df = df! {
            "Cancer Type" => ["Breast"],
            "cancer_type" => ["Lung"],
        }
        .unwrap();

        let err = normalize_column_names(df).unwrap_err();
        match err {
            TransformError::SchemaConflict {
                normalized,
                sources,
            } => {
                assert_eq!(normalized, "cancer_type");
                assert_eq!(sources, vec!["Cancer Type", "cancer_type"]);
            }
            other => panic!("expected SchemaConflict, got {other:?}"),
        }
    }
}
