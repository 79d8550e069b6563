// KPI service - Derives ordered headline metrics from classified columns

use crate::domain::dashboard::{Kpi, KpiFormat};
use crate::domain::dataset::{ColumnPartition, Dataset};

const CURRENCY_HINTS: &[&str] = &["price", "cost", "revenue", "sales"];

fn format_for(column_name: &str) -> KpiFormat {
    let lower = column_name.to_lowercase();
    if CURRENCY_HINTS.iter().any(|hint| lower.contains(hint)) {
        KpiFormat::Currency
    } else {
        KpiFormat::Number
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build the KPI list. Never fails: a dataset without numeric columns gets
/// the record count alone. Order is significant and the numeric KPIs gate
/// the categorical one, anchoring everything on the headline metric.
pub fn generate(dataset: &Dataset, partition: &ColumnPartition) -> Vec<Kpi> {
    let mut kpis = vec![Kpi {
        id: "total_records".to_string(),
        title: "Total Records".to_string(),
        value: serde_json::json!(dataset.row_count()),
        format: KpiFormat::Number,
        icon: "database".to_string(),
        color: "blue".to_string(),
    }];

    if let Some(main_numeric) = partition.first_numeric() {
        if let Some(column) = dataset.column(main_numeric) {
            let values = column.numeric_values();
            let total: f64 = values.iter().sum();
            kpis.push(Kpi {
                id: "main_metric".to_string(),
                title: format!("Total {main_numeric}"),
                value: serde_json::json!(total),
                format: format_for(main_numeric),
                icon: "trending-up".to_string(),
                color: "green".to_string(),
            });

            let mean = if values.is_empty() {
                0.0
            } else {
                total / values.len() as f64
            };
            kpis.push(Kpi {
                id: "avg_metric".to_string(),
                title: format!("Average {main_numeric}"),
                value: serde_json::json!(round2(mean)),
                format: format_for(main_numeric),
                icon: "bar-chart".to_string(),
                color: "purple".to_string(),
            });
        }

        if let Some(main_categorical) = partition.first_categorical() {
            if let Some(column) = dataset.column(main_categorical) {
                let unique: std::collections::HashSet<String> =
                    column.non_null().filter_map(|v| v.as_text()).collect();
                kpis.push(Kpi {
                    id: "unique_categories".to_string(),
                    title: format!("Unique {main_categorical}"),
                    value: serde_json::json!(unique.len()),
                    format: KpiFormat::Number,
                    icon: "tag".to_string(),
                    color: "orange".to_string(),
                });
            }
        }
    }

    kpis
}
