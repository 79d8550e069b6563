// Dashboard domain model - the engine's serializable output

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiFormat {
    Number,
    Currency,
}

#[derive(Debug, Clone, Serialize)]
pub struct Kpi {
    pub id: String,
    pub title: String,
    pub value: serde_json::Value,
    pub format: KpiFormat,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Histogram,
    Bar,
    Heatmap,
    Scatter,
    Line,
    Box,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridPosition {
    pub row: u8,
    pub col: u8,
}

/// A chart ready for the frontend. `data` is an opaque plot description;
/// the engine never interprets it after generation.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: serde_json::Value,
    pub position: GridPosition,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterControl {
    Multiselect {
        options: Vec<FilterOption>,
        default: Vec<String>,
    },
    Range {
        min: f64,
        max: f64,
        step: f64,
        default: [f64; 2],
    },
    Daterange {
        min: String,
        max: String,
        default: [String; 2],
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Filter {
    pub id: String,
    pub column: String,
    pub label: String,
    #[serde(flatten)]
    pub control: FilterControl,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Overview {
    pub total_rows: usize,
    pub total_columns: usize,
    pub missing_values: usize,
    pub duplicate_rows: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ColumnTypeCounts {
    pub numeric: usize,
    pub categorical: usize,
    pub datetime: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DataQuality {
    pub completeness: String,
    pub uniqueness: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NumericStats {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; None for a single observation.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoricalStats {
    pub unique_count: usize,
    pub top_values: Vec<ValueCount>,
    pub most_frequent: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedNumericStats {
    pub column: String,
    #[serde(flatten)]
    pub stats: NumericStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedCategoricalStats {
    pub column: String,
    #[serde(flatten)]
    pub stats: CategoricalStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DataSummary {
    pub overview: Overview,
    pub column_types: ColumnTypeCounts,
    pub data_quality: DataQuality,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub numeric_stats: Vec<NamedNumericStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categorical_stats: Vec<NamedCategoricalStats>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardMetadata {
    pub total_rows: usize,
    pub total_columns: usize,
    pub numeric_columns: usize,
    pub categorical_columns: usize,
    pub date_columns: usize,
}

/// The full structured output of one dashboard request. Immutable once
/// assembled; never cached across requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    pub kpis: Vec<Kpi>,
    pub charts: Vec<Chart>,
    pub filters: Vec<Filter>,
    pub summary: DataSummary,
    pub metadata: DashboardMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Dashboard {
    /// Fallback payload when assembly itself fails: empty collections plus
    /// an error description, never an unhandled fault.
    pub fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}
