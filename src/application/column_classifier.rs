// Column classifier - Partitions columns into numeric/categorical/datetime roles

use crate::domain::dataset::{Column, ColumnPartition, ColumnRole, Dataset};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// How many leading non-null values the datetime probe inspects. A false
/// positive requires every sampled value to parse, so larger samples only
/// make the probe stricter.
const DATE_PROBE_SAMPLE: usize = 100;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Strict date parse shared by the classifier, the time-series chart and the
/// daterange filter. Returns the calendar date, discarding any time part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    None
}

fn classify_column(column: &Column) -> ColumnRole {
    if column.is_numeric() {
        return ColumnRole::Numeric;
    }

    // Probe the first values of a text column for dates. An empty sample
    // (all-null column) stays Categorical rather than trivially "passing".
    let sample: Vec<String> = column
        .non_null()
        .take(DATE_PROBE_SAMPLE)
        .filter_map(|v| v.as_text())
        .collect();
    if !sample.is_empty() && sample.iter().all(|s| parse_date(s).is_some()) {
        ColumnRole::Datetime
    } else {
        ColumnRole::Categorical
    }
}

/// Assign every column exactly one role, preserving original column order
/// within each role list.
pub fn classify(dataset: &Dataset) -> ColumnPartition {
    let mut partition = ColumnPartition::default();
    for column in dataset.columns() {
        match classify_column(column) {
            ColumnRole::Numeric => partition.numeric.push(column.name.clone()),
            ColumnRole::Categorical => partition.categorical.push(column.name.clone()),
            ColumnRole::Datetime => partition.datetime.push(column.name.clone()),
        }
    }
    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::Value;

    fn dataset(columns: Vec<(&str, Vec<Value>)>) -> Dataset {
        Dataset::from_columns(
            columns
                .into_iter()
                .map(|(name, values)| Column::new(name.to_string(), values))
                .collect(),
        )
        .unwrap()
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_partition_covers_every_column_once() {
        let ds = dataset(vec![
            ("amount", vec![Value::Float(1.5), Value::Int(2)]),
            ("region", vec![text("north"), text("south")]),
            ("day", vec![text("2024-01-01"), text("2024-02-01")]),
        ]);
        let partition = classify(&ds);
        assert_eq!(partition.numeric, vec!["amount"]);
        assert_eq!(partition.categorical, vec!["region"]);
        assert_eq!(partition.datetime, vec!["day"]);

        let mut all: Vec<&String> = partition
            .numeric
            .iter()
            .chain(&partition.categorical)
            .chain(&partition.datetime)
            .collect();
        all.sort();
        let mut names = ds.column_names();
        names.sort();
        assert_eq!(all.len(), names.len());
        assert!(all.iter().zip(&names).all(|(a, b)| **a == *b));
    }

    #[test]
    fn test_mixed_sample_is_categorical() {
        // One non-date value in the sample blocks the Datetime role
        let ds = dataset(vec![(
            "when",
            vec![text("2024-01-01"), text("not a date"), text("2024-03-01")],
        )]);
        assert_eq!(classify(&ds).categorical, vec!["when"]);
        assert!(classify(&ds).datetime.is_empty());
    }

    #[test]
    fn test_all_null_text_column_is_categorical() {
        let ds = dataset(vec![
            ("notes", vec![Value::Null, Value::Null]),
            ("n", vec![Value::Int(1), Value::Int(2)]),
        ]);
        let partition = classify(&ds);
        assert_eq!(partition.categorical, vec!["notes"]);
        assert!(partition.datetime.is_empty());
    }

    #[test]
    fn test_date_column_with_nulls_is_datetime() {
        let ds = dataset(vec![(
            "day",
            vec![text("2024-01-01"), Value::Null, text("01/15/2024")],
        )]);
        assert_eq!(classify(&ds).datetime, vec!["day"]);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_date("2024-03-05 10:30:00"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_date("2024-03-05T10:30:00+02:00"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(parse_date("yesterday"), None);
    }
}
