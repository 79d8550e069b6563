// Summary service - Dataset overview and per-column statistics

use crate::domain::dashboard::{
    CategoricalStats, ColumnTypeCounts, DataQuality, DataSummary, NamedCategoricalStats,
    NamedNumericStats, NumericStats, Overview, ValueCount,
};
use crate::domain::dataset::{ColumnPartition, Dataset};
use std::collections::BTreeMap;

const MAX_NUMERIC_STAT_COLUMNS: usize = 5;
const MAX_CATEGORICAL_STAT_COLUMNS: usize = 3;
const TOP_VALUE_COUNT: usize = 5;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn numeric_stats(values: &[f64]) -> Option<NumericStats> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    // Sample standard deviation; undefined for a single observation
    let std = if values.len() > 1 {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(round2(var.sqrt()))
    } else {
        None
    };

    Some(NumericStats {
        mean: round2(mean),
        median: round2(median),
        std,
        min: round2(min),
        max: round2(max),
    })
}

fn categorical_stats(dataset: &Dataset, name: &str) -> Option<CategoricalStats> {
    let column = dataset.column(name)?;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in column.non_null() {
        if let Some(text) = value.as_text() {
            *counts.entry(text).or_insert(0) += 1;
        }
    }
    let unique_count = counts.len();
    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let most_frequent = pairs.first().map(|(v, _)| v.clone());
    Some(CategoricalStats {
        unique_count,
        top_values: pairs
            .into_iter()
            .take(TOP_VALUE_COUNT)
            .map(|(value, count)| ValueCount { value, count })
            .collect(),
        most_frequent,
    })
}

pub fn summarize(dataset: &Dataset, partition: &ColumnPartition) -> DataSummary {
    let rows = dataset.row_count();
    let cols = dataset.column_count();
    let cells = rows * cols;
    let missing = dataset.total_null_count();
    let duplicates = dataset.duplicate_row_count();

    let completeness = if cells == 0 {
        100.0
    } else {
        (cells - missing) as f64 / cells as f64 * 100.0
    };
    let uniqueness = if rows == 0 {
        100.0
    } else {
        (rows - duplicates) as f64 / rows as f64 * 100.0
    };

    DataSummary {
        overview: Overview {
            total_rows: rows,
            total_columns: cols,
            missing_values: missing,
            duplicate_rows: duplicates,
        },
        column_types: ColumnTypeCounts {
            numeric: partition.numeric.len(),
            categorical: partition.categorical.len(),
            datetime: partition.datetime.len(),
        },
        data_quality: DataQuality {
            completeness: format!("{completeness:.1}%"),
            uniqueness: format!("{uniqueness:.1}%"),
        },
        numeric_stats: partition
            .numeric
            .iter()
            .take(MAX_NUMERIC_STAT_COLUMNS)
            .filter_map(|name| {
                let column = dataset.column(name)?;
                let stats = numeric_stats(&column.numeric_values())?;
                Some(NamedNumericStats {
                    column: name.clone(),
                    stats,
                })
            })
            .collect(),
        categorical_stats: partition
            .categorical
            .iter()
            .take(MAX_CATEGORICAL_STAT_COLUMNS)
            .filter_map(|name| {
                Some(NamedCategoricalStats {
                    column: name.clone(),
                    stats: categorical_stats(dataset, name)?,
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::column_classifier;
    use crate::domain::dataset::{Column, Value};

    fn dataset(columns: Vec<(&str, Vec<Value>)>) -> Dataset {
        Dataset::from_columns(
            columns
                .into_iter()
                .map(|(name, values)| Column::new(name.to_string(), values))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_completeness_and_uniqueness() {
        let ds = dataset(vec![
            (
                "a",
                vec![Value::Int(1), Value::Int(1), Value::Null, Value::Int(2)],
            ),
            (
                "b",
                vec![
                    Value::Text("x".into()),
                    Value::Text("x".into()),
                    Value::Text("y".into()),
                    Value::Text("z".into()),
                ],
            ),
        ]);
        let summary = summarize(&ds, &column_classifier::classify(&ds));
        // 1 null out of 8 cells, 1 duplicate row out of 4
        assert_eq!(summary.overview.missing_values, 1);
        assert_eq!(summary.overview.duplicate_rows, 1);
        assert_eq!(summary.data_quality.completeness, "87.5%");
        assert_eq!(summary.data_quality.uniqueness, "75.0%");
    }

    #[test]
    fn test_numeric_stats_values() {
        let ds = dataset(vec![(
            "n",
            vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)],
        )]);
        let summary = summarize(&ds, &column_classifier::classify(&ds));
        let stats = &summary.numeric_stats[0];
        assert_eq!(stats.column, "n");
        assert_eq!(stats.stats.mean, 2.5);
        assert_eq!(stats.stats.median, 2.5);
        assert_eq!(stats.stats.min, 1.0);
        assert_eq!(stats.stats.max, 4.0);
        assert_eq!(stats.stats.std, Some(1.29));
    }

    #[test]
    fn test_categorical_stats_top_values() {
        let ds = dataset(vec![(
            "c",
            vec![
                Value::Text("a".into()),
                Value::Text("a".into()),
                Value::Text("b".into()),
            ],
        )]);
        let summary = summarize(&ds, &column_classifier::classify(&ds));
        let stats = &summary.categorical_stats[0].stats;
        assert_eq!(stats.unique_count, 2);
        assert_eq!(stats.most_frequent.as_deref(), Some("a"));
        assert_eq!(stats.top_values[0].count, 2);
    }

    #[test]
    fn test_column_type_counts() {
        let ds = dataset(vec![
            ("n", vec![Value::Int(1)]),
            ("c", vec![Value::Text("x".into())]),
            ("d", vec![Value::Text("2024-01-01".into())]),
        ]);
        let summary = summarize(&ds, &column_classifier::classify(&ds));
        assert_eq!(summary.column_types.numeric, 1);
        assert_eq!(summary.column_types.categorical, 1);
        assert_eq!(summary.column_types.datetime, 1);
    }
}
