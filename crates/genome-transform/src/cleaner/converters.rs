//! Value parsers used by type coercion.
//!
//! Each parser returns `None` for a value it cannot interpret; the caller
//! decides whether that null is kept, dropped, or an error.

use crate::config::CastTarget;
use crate::error::Result;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

static STRICT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid regex: YYYY-MM-DD"));

static DECIMAL_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?\d+)(?:\.\d*)?$").expect("Invalid regex: decimal literal"));

/// Parse a floating point value.
pub fn parse_float(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok()
}

/// Parse a 32-bit integer.
///
/// A decimal literal is truncated toward zero (`"42.9"` is `42`). Exponent
/// notation, non-numeric text and out-of-range values give `None`.
pub fn parse_integer(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    if let Ok(v) = trimmed.parse::<i32>() {
        return Some(v);
    }
    let caps = DECIMAL_LITERAL.captures(trimmed)?;
    caps.get(1)?.as_str().parse::<i32>().ok()
}

/// Parse a calendar date written exactly as `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if !STRICT_DATE.is_match(trimmed) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Cast a column to `target`, turning unparseable values into nulls.
pub(crate) fn cast_series(series: &Series, target: CastTarget) -> Result<Series> {
    let strings = if series.dtype() == &DataType::String {
        series.clone()
    } else {
        series.cast(&DataType::String)?
    };
    let str_series = strings.str()?;
    let name = series.name().clone();

    let converted = match target {
        CastTarget::Float => {
            let values: Vec<Option<f32>> = str_series
                .into_iter()
                .map(|v| v.and_then(parse_float))
                .collect();
            Series::new(name, values)
        }
        CastTarget::Integer => {
            let values: Vec<Option<i32>> = str_series
                .into_iter()
                .map(|v| v.and_then(parse_integer))
                .collect();
            Series::new(name, values)
        }
        CastTarget::Date => {
            let days: Vec<Option<i32>> = str_series
                .into_iter()
                .map(|v| v.and_then(parse_date).map(days_since_epoch))
                .collect();
            Series::new(name, days).cast(&DataType::Date)?
        }
    };

    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("3.14"), Some(3.14));
        assert_eq!(parse_float(" -0.5 "), Some(-0.5));
        assert_eq!(parse_float("1e3"), Some(1000.0));
        assert_eq!(parse_float("high"), None);
        assert_eq!(parse_float(""), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer(" +7 "), Some(7));
        assert_eq!(parse_integer("-3"), Some(-3));
        assert_eq!(parse_integer("42.9"), Some(42));
        assert_eq!(parse_integer("-42.9"), Some(-42));
        assert_eq!(parse_integer("1e3"), None);
        assert_eq!(parse_integer("MUT-42"), None);
        assert_eq!(parse_integer("2147483648"), None);
    }

    #[test]
    fn test_parse_date_strict() {
        assert_eq!(parse_date("2023-01-05"), NaiveDate::from_ymd_opt(2023, 1, 5));
        assert_eq!(parse_date(" 2023-01-05 "), NaiveDate::from_ymd_opt(2023, 1, 5));
        assert_eq!(parse_date("2023-1-5"), None);
        assert_eq!(parse_date("05/01/2023"), None);
        assert_eq!(parse_date("2023-02-30"), None);
        assert_eq!(parse_date("2023-01-05T10:00:00"), None);
    }

    #[test]
    fn test_days_since_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(days_since_epoch(epoch), 0);
        let day = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(days_since_epoch(day), 19362);
    }

    #[test]
    fn test_cast_series_float() {
        let series = Series::new("gene_expression".into(), &["3.14", "bad", "2"]);
        let cast = cast_series(&series, CastTarget::Float).unwrap();
        assert_eq!(cast.dtype(), &DataType::Float32);
        assert_eq!(cast.null_count(), 1);
        let values: Vec<Option<f32>> = cast.f32().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(3.14), None, Some(2.0)]);
    }

    #[test]
    fn test_cast_series_date() {
        let series = Series::new("date".into(), &[Some("2023-01-05"), Some("Jan 5"), None]);
        let cast = cast_series(&series, CastTarget::Date).unwrap();
        assert_eq!(cast.dtype(), &DataType::Date);
        assert_eq!(cast.null_count(), 2);
        let physical = cast.to_physical_repr();
        let days: Vec<Option<i32>> = physical.i32().unwrap().into_iter().collect();
        assert_eq!(days, vec![Some(19362), None, None]);
    }

    #[test]
    fn test_cast_series_integer_keeps_name() {
        let series = Series::new("mutation_id".into(), &["42", "43"]);
        let cast = cast_series(&series, CastTarget::Integer).unwrap();
        assert_eq!(cast.name().as_str(), "mutation_id");
        assert_eq!(cast.dtype(), &DataType::Int32);
    }
}
