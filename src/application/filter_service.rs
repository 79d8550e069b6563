// Filter service - Derives user-facing filter widgets from classified columns

use crate::application::column_classifier::parse_date;
use crate::domain::dashboard::{Filter, FilterControl, FilterOption};
use crate::domain::dataset::{ColumnPartition, Dataset};
use std::collections::BTreeSet;

const MAX_CATEGORICAL_FILTERS: usize = 3;
const MAX_RANGE_FILTERS: usize = 2;
const MAX_DATE_FILTERS: usize = 1;
const MAX_MULTISELECT_OPTIONS: usize = 50;

/// Build up to 3 multiselect + 2 range + 1 daterange filters, taking the
/// first columns of each role in original order.
pub fn generate(dataset: &Dataset, partition: &ColumnPartition) -> Vec<Filter> {
    let mut filters = Vec::new();

    for name in partition.categorical.iter().take(MAX_CATEGORICAL_FILTERS) {
        let Some(column) = dataset.column(name) else {
            continue;
        };
        let distinct: BTreeSet<String> = column.non_null().filter_map(|v| v.as_text()).collect();
        // Too many options makes the widget unusable
        if distinct.is_empty() || distinct.len() > MAX_MULTISELECT_OPTIONS {
            continue;
        }
        filters.push(Filter {
            id: format!("filter_{name}"),
            column: name.clone(),
            label: format!("Filter by {name}"),
            control: FilterControl::Multiselect {
                options: distinct
                    .into_iter()
                    .map(|value| FilterOption {
                        label: value.clone(),
                        value,
                    })
                    .collect(),
                default: Vec::new(),
            },
        });
    }

    for name in partition.numeric.iter().take(MAX_RANGE_FILTERS) {
        let Some(column) = dataset.column(name) else {
            continue;
        };
        let values = column.numeric_values();
        if values.is_empty() {
            continue;
        }
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        filters.push(Filter {
            id: format!("range_{name}"),
            column: name.clone(),
            label: format!("{name} Range"),
            control: FilterControl::Range {
                min,
                max,
                step: (max - min) / 100.0,
                default: [min, max],
            },
        });
    }

    for name in partition.datetime.iter().take(MAX_DATE_FILTERS) {
        let Some(column) = dataset.column(name) else {
            continue;
        };
        let dates: Vec<chrono::NaiveDate> = column
            .non_null()
            .filter_map(|v| v.as_text())
            .filter_map(|s| parse_date(&s))
            .collect();
        // Zero parseable rows: skip silently, no filter and no error
        let (Some(min), Some(max)) = (dates.iter().min(), dates.iter().max()) else {
            continue;
        };
        let min = min.format("%Y-%m-%d").to_string();
        let max = max.format("%Y-%m-%d").to_string();
        filters.push(Filter {
            id: format!("date_{name}"),
            column: name.clone(),
            label: format!("Date Range - {name}"),
            control: FilterControl::Daterange {
                min: min.clone(),
                max: max.clone(),
                default: [min, max],
            },
        });
    }

    filters
}
