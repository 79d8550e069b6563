// Chart service - Deterministic chart selection and plot payload generation

use crate::application::column_classifier::parse_date;
use crate::domain::dashboard::{Chart, ChartKind, GridPosition};
use crate::domain::dataset::{Column, ColumnPartition, Dataset, Value};
use std::collections::BTreeMap;
use thiserror::Error;

const HISTOGRAM_BINS: usize = 20;
const TOP_CATEGORIES: usize = 10;
const MAX_HEATMAP_COLUMNS: usize = 5;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("column {0} not found")]
    MissingColumn(String),
    #[error("column {0} has no numeric values")]
    NoNumericValues(String),
    #[error("column {0} has no values")]
    NoValues(String),
    #[error("no rows in column {0} parsed as dates")]
    NoParsableDates(String),
}

fn lookup_column<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Column, ChartError> {
    dataset
        .column(name)
        .ok_or_else(|| ChartError::MissingColumn(name.to_string()))
}

/// Distinct values with their frequencies, most frequent first. Ties break
/// on the value itself so repeated runs produce identical charts.
fn value_counts(column: &Column) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in column.non_null() {
        if let Some(text) = value.as_text() {
            *counts.entry(text).or_insert(0) += 1;
        }
    }
    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs
}

/// Linear-interpolated quantile over a sorted slice, q in [0, 1].
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Pearson correlation over rows where both columns are non-null.
/// None when either side has no variance.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| x.zip(*y))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}

pub fn build_histogram(
    dataset: &Dataset,
    name: &str,
    bins: usize,
) -> Result<serde_json::Value, ChartError> {
    let values = lookup_column(dataset, name)?.numeric_values();
    if values.is_empty() {
        return Err(ChartError::NoNumericValues(name.to_string()));
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    // Degenerate range collapses to a single bin
    let bins = if max > min { bins } else { 1 };
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };
    let mut counts = vec![0usize; bins];
    for v in &values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let bin_payload: Vec<serde_json::Value> = counts
        .iter()
        .enumerate()
        .map(|(i, count)| {
            serde_json::json!({
                "start": min + width * i as f64,
                "end": min + width * (i + 1) as f64,
                "count": count,
            })
        })
        .collect();
    Ok(serde_json::json!({
        "x_column": name,
        "bins": bin_payload,
    }))
}

pub fn build_bar(dataset: &Dataset, name: &str) -> Result<serde_json::Value, ChartError> {
    let column = lookup_column(dataset, name)?;
    let counts = value_counts(column);
    if counts.is_empty() {
        return Err(ChartError::NoValues(name.to_string()));
    }
    let top: Vec<&(String, usize)> = counts.iter().take(TOP_CATEGORIES).collect();
    Ok(serde_json::json!({
        "x": top.iter().map(|(v, _)| v.clone()).collect::<Vec<_>>(),
        "y": top.iter().map(|(_, c)| *c).collect::<Vec<_>>(),
        "x_column": name,
        "y_label": "Count",
    }))
}

pub fn build_heatmap(dataset: &Dataset, names: &[String]) -> Result<serde_json::Value, ChartError> {
    let columns: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| {
            lookup_column(dataset, name)
                .map(|c| c.values.iter().map(Value::as_f64).collect::<Vec<_>>())
        })
        .collect::<Result<_, _>>()?;

    let matrix: Vec<Vec<serde_json::Value>> = columns
        .iter()
        .map(|xs| {
            columns
                .iter()
                .map(|ys| match pearson(xs, ys) {
                    Some(r) => serde_json::json!((r * 1000.0).round() / 1000.0),
                    None => serde_json::Value::Null,
                })
                .collect()
        })
        .collect();

    Ok(serde_json::json!({
        "columns": names,
        "matrix": matrix,
    }))
}

pub fn build_scatter(
    dataset: &Dataset,
    x_name: &str,
    y_name: &str,
    color_name: Option<&str>,
) -> Result<serde_json::Value, ChartError> {
    let x_col = lookup_column(dataset, x_name)?;
    let y_col = lookup_column(dataset, y_name)?;
    let color_col = match color_name {
        Some(name) => Some(lookup_column(dataset, name)?),
        None => None,
    };

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut colors = Vec::new();
    for row in 0..dataset.row_count() {
        let (Some(x), Some(y)) = (x_col.values[row].as_f64(), y_col.values[row].as_f64()) else {
            continue;
        };
        xs.push(x);
        ys.push(y);
        if let Some(col) = color_col {
            colors.push(match col.values[row].as_text() {
                Some(text) => serde_json::json!(text),
                None => serde_json::Value::Null,
            });
        }
    }
    if xs.is_empty() {
        return Err(ChartError::NoNumericValues(x_name.to_string()));
    }

    let mut payload = serde_json::json!({
        "x": xs,
        "y": ys,
        "x_column": x_name,
        "y_column": y_name,
    });
    if let Some(name) = color_name {
        payload["color_column"] = serde_json::json!(name);
        payload["color"] = serde_json::json!(colors);
    }
    Ok(payload)
}

pub fn build_monthly_line(
    dataset: &Dataset,
    date_name: &str,
    numeric_name: &str,
) -> Result<serde_json::Value, ChartError> {
    let date_col = lookup_column(dataset, date_name)?;
    let num_col = lookup_column(dataset, numeric_name)?;

    // Rows that fail the date parse are dropped before grouping
    let mut monthly: BTreeMap<String, f64> = BTreeMap::new();
    let mut parsed_any = false;
    for row in 0..dataset.row_count() {
        let Some(date) = date_col.values[row].as_text().and_then(|s| parse_date(&s)) else {
            continue;
        };
        parsed_any = true;
        let month = date.format("%Y-%m").to_string();
        let entry = monthly.entry(month).or_insert(0.0);
        if let Some(v) = num_col.values[row].as_f64() {
            *entry += v;
        }
    }
    if !parsed_any {
        return Err(ChartError::NoParsableDates(date_name.to_string()));
    }

    Ok(serde_json::json!({
        "x": monthly.keys().collect::<Vec<_>>(),
        "y": monthly.values().collect::<Vec<_>>(),
        "x_column": date_name,
        "y_column": numeric_name,
    }))
}

pub fn build_box(dataset: &Dataset, name: &str) -> Result<serde_json::Value, ChartError> {
    let mut values = lookup_column(dataset, name)?.numeric_values();
    if values.is_empty() {
        return Err(ChartError::NoNumericValues(name.to_string()));
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q1 = quantile(&values, 0.25);
    let median = quantile(&values, 0.5);
    let q3 = quantile(&values, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;
    let outliers: Vec<f64> = values
        .iter()
        .cloned()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();
    let whisker_low = values
        .iter()
        .cloned()
        .find(|v| *v >= low_fence)
        .unwrap_or(q1);
    let whisker_high = values
        .iter()
        .rev()
        .cloned()
        .find(|v| *v <= high_fence)
        .unwrap_or(q3);

    Ok(serde_json::json!({
        "y_column": name,
        "q1": q1,
        "median": median,
        "q3": q3,
        "whisker_low": whisker_low,
        "whisker_high": whisker_high,
        "outliers": outliers,
    }))
}

/// Dashboard mode: attempt the six fixed candidates in order, skipping any
/// whose column-type precondition is unmet. A candidate that fails during
/// generation is logged and skipped; the rest of the dashboard survives.
pub fn dashboard_charts(dataset: &Dataset, partition: &ColumnPartition) -> Vec<Chart> {
    type Candidate = (
        &'static str,
        String,
        ChartKind,
        GridPosition,
        Result<serde_json::Value, ChartError>,
    );
    let mut candidates: Vec<Candidate> = Vec::new();

    if let Some(col) = partition.first_numeric() {
        candidates.push((
            "distribution_chart",
            format!("Distribution of {col}"),
            ChartKind::Histogram,
            GridPosition { row: 1, col: 1 },
            build_histogram(dataset, col, HISTOGRAM_BINS),
        ));
    }
    if let Some(col) = partition.first_categorical() {
        candidates.push((
            "top_categories",
            format!("Top 10 {col}"),
            ChartKind::Bar,
            GridPosition { row: 1, col: 2 },
            build_bar(dataset, col),
        ));
    }
    if partition.numeric.len() >= 2 {
        let cols: Vec<String> = partition
            .numeric
            .iter()
            .take(MAX_HEATMAP_COLUMNS)
            .cloned()
            .collect();
        candidates.push((
            "correlation_matrix",
            "Correlation Matrix".to_string(),
            ChartKind::Heatmap,
            GridPosition { row: 2, col: 1 },
            build_heatmap(dataset, &cols),
        ));

        let (x, y) = (&partition.numeric[0], &partition.numeric[1]);
        candidates.push((
            "scatter_plot",
            format!("{x} vs {y}"),
            ChartKind::Scatter,
            GridPosition { row: 2, col: 2 },
            build_scatter(dataset, x, y, partition.first_categorical()),
        ));
    }
    if let (Some(date_col), Some(num_col)) =
        (partition.first_datetime(), partition.first_numeric())
    {
        candidates.push((
            "time_series",
            format!("{num_col} Over Time"),
            ChartKind::Line,
            GridPosition { row: 3, col: 1 },
            build_monthly_line(dataset, date_col, num_col),
        ));
    }
    if let Some(col) = partition.first_numeric() {
        candidates.push((
            "box_plot",
            format!("Box Plot - {col}"),
            ChartKind::Box,
            GridPosition { row: 3, col: 2 },
            build_box(dataset, col),
        ));
    }

    let mut charts = Vec::new();
    for (id, title, kind, position, result) in candidates {
        match result {
            Ok(data) => charts.push(Chart {
                id: id.to_string(),
                title,
                kind,
                data,
                position,
            }),
            Err(e) => {
                tracing::warn!("Skipping chart {}: {}", id, e);
            }
        }
    }
    charts
}

/// Single-chart mode: pick exactly one plot from the free-text query,
/// first keyword match wins. None is an explicit empty result.
pub fn single_chart(
    dataset: &Dataset,
    partition: &ColumnPartition,
    query: &str,
) -> Option<serde_json::Value> {
    let query = query.to_lowercase();

    let result = if query.contains("correlation") && partition.numeric.len() >= 2 {
        build_heatmap(dataset, &partition.numeric)
    } else if query.contains("distribution") && !partition.numeric.is_empty() {
        build_histogram(dataset, &partition.numeric[0], HISTOGRAM_BINS)
    } else if partition.numeric.len() >= 2 {
        build_scatter(dataset, &partition.numeric[0], &partition.numeric[1], None)
    } else if let Some(col) = partition.first_categorical() {
        build_bar(dataset, col)
    } else {
        return None;
    };

    match result {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!("Single-chart generation failed: {}", e);
            None
        }
    }
}
