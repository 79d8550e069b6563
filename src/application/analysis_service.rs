// Analysis service - Use case for chat-driven analysis of an uploaded dataset

use crate::application::column_classifier;
use crate::application::chart_service;
use crate::application::narrative_client::NarrativeClient;
use crate::application::summary_service;
use crate::domain::dataset::{ColumnPartition, Dataset};
use serde::Serialize;
use std::sync::Arc;

const SAMPLE_ROWS: usize = 5;
const TABLE_ROWS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Dashboard,
    Chart,
    Table,
    Explanation,
}

impl RequestType {
    /// Parse a form field; anything unrecognized falls back to Explanation.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "dashboard" => Self::Dashboard,
            "chart" => Self::Chart,
            "table" => Self::Table,
            _ => Self::Explanation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub text: String,
    pub visualization: Option<serde_json::Value>,
    pub chart_config: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct AnalysisService {
    narrative: Arc<dyn NarrativeClient>,
}

impl AnalysisService {
    pub fn new(narrative: Arc<dyn NarrativeClient>) -> Self {
        Self { narrative }
    }

    /// Run the narrative call and the visualization dispatch for one chat
    /// message. A narrative failure degrades to a substitute error string;
    /// the visualization pipeline still runs either way.
    pub async fn analyze(
        &self,
        dataset: &Dataset,
        query: &str,
        request_type: RequestType,
    ) -> AnalysisResponse {
        let partition = column_classifier::classify(dataset);

        let prompt = build_prompt(query, &dataset_digest(dataset, &partition), request_type);
        let text = match self.narrative.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Narrative call failed: {}", e);
                format!("Sorry, an error occurred during analysis: {e}")
            }
        };

        let (visualization, chart_config) = match request_type {
            RequestType::Dashboard => {
                let data = compact_dashboard(dataset, &partition);
                (Some(data), Some(serde_json::json!({"type": "dashboard"})))
            }
            RequestType::Chart => match chart_service::single_chart(dataset, &partition, query) {
                Some(data) => (Some(data), Some(serde_json::json!({"type": "single_chart"}))),
                None => (None, None),
            },
            RequestType::Table => (
                Some(table_payload(dataset, &partition)),
                Some(serde_json::json!({"type": "table"})),
            ),
            RequestType::Explanation => (None, None),
        };

        AnalysisResponse {
            text,
            visualization,
            chart_config,
        }
    }
}

/// Compact dashboard payload for chat responses: headline counts plus the
/// two cheapest charts.
fn compact_dashboard(dataset: &Dataset, partition: &ColumnPartition) -> serde_json::Value {
    let mut charts = Vec::new();
    if let Some(col) = partition.first_numeric() {
        if let Ok(data) = chart_service::build_histogram(dataset, col, 20) {
            charts.push(serde_json::json!({
                "type": "histogram",
                "title": format!("Distribution of {col}"),
                "data": data,
            }));
        }
    }
    if let Some(col) = partition.first_categorical() {
        if let Ok(data) = chart_service::build_bar(dataset, col) {
            charts.push(serde_json::json!({
                "type": "bar",
                "title": format!("Top 10 - {col}"),
                "data": data,
            }));
        }
    }
    serde_json::json!({
        "summary_stats": {
            "total_rows": dataset.row_count(),
            "total_columns": dataset.column_count(),
            "numeric_columns": partition.numeric.len(),
            "categorical_columns": partition.categorical.len(),
        },
        "charts": charts,
    })
}

/// First rows as records plus column metadata, the tabular answer shape.
fn table_payload(dataset: &Dataset, partition: &ColumnPartition) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = (0..dataset.row_count().min(TABLE_ROWS))
        .map(|row| {
            let record: serde_json::Map<String, serde_json::Value> = dataset
                .columns()
                .iter()
                .map(|c| (c.name.clone(), c.values[row].to_json()))
                .collect();
            serde_json::Value::Object(record)
        })
        .collect();
    serde_json::json!({
        "data": rows,
        "columns": dataset.column_names(),
        "total_rows": dataset.row_count(),
        "column_roles": {
            "numeric": partition.numeric,
            "categorical": partition.categorical,
            "datetime": partition.datetime,
        },
    })
}

/// Textual digest handed to the narrative collaborator. Best-effort; the
/// collaborator sees shape, roles, missing counts, a small sample and the
/// numeric statistics block.
fn dataset_digest(dataset: &Dataset, partition: &ColumnPartition) -> String {
    use std::fmt::Write;

    let summary = summary_service::summarize(dataset, partition);
    let mut digest = String::new();

    let _ = writeln!(digest, "DATASET INFORMATION:");
    let _ = writeln!(
        digest,
        "- Shape: {} rows, {} columns",
        dataset.row_count(),
        dataset.column_count()
    );
    let _ = writeln!(digest, "- Columns: {}", dataset.column_names().join(", "));
    let _ = writeln!(
        digest,
        "- Roles: numeric [{}], categorical [{}], datetime [{}]",
        partition.numeric.join(", "),
        partition.categorical.join(", "),
        partition.datetime.join(", ")
    );
    let missing: Vec<String> = dataset
        .columns()
        .iter()
        .map(|c| format!("{}: {}", c.name, c.null_count()))
        .collect();
    let _ = writeln!(digest, "- Missing values: {}", missing.join(", "));

    let _ = writeln!(digest, "\nSAMPLE (first {SAMPLE_ROWS} rows):");
    let _ = writeln!(digest, "{}", dataset.column_names().join(" | "));
    for row in 0..dataset.row_count().min(SAMPLE_ROWS) {
        let cells: Vec<String> = dataset
            .columns()
            .iter()
            .map(|c| c.values[row].as_text().unwrap_or_else(|| "null".to_string()))
            .collect();
        let _ = writeln!(digest, "{}", cells.join(" | "));
    }

    if summary.numeric_stats.is_empty() {
        let _ = writeln!(digest, "\nNo numeric columns");
    } else {
        let _ = writeln!(digest, "\nNUMERIC STATISTICS:");
        for entry in &summary.numeric_stats {
            let _ = writeln!(
                digest,
                "{}: mean={}, median={}, std={}, min={}, max={}",
                entry.column,
                entry.stats.mean,
                entry.stats.median,
                entry
                    .stats
                    .std
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "n/a".to_string()),
                entry.stats.min,
                entry.stats.max
            );
        }
    }

    digest
}

fn build_prompt(query: &str, digest: &str, request_type: RequestType) -> String {
    let instructions = match request_type {
        RequestType::Dashboard => {
            "The user wants a DASHBOARD. Respond with:\n\
             1. A complete analysis of the main data\n\
             2. The most important insights\n\
             3. Recommendations for multiple visualizations\n\
             4. Key metrics to monitor\n\
             Be thorough and provide a complete overview of the data."
        }
        RequestType::Chart => {
            "The user wants a specific CHART. Respond with:\n\
             1. A focused analysis of the requested aspect\n\
             2. The most appropriate chart type\n\
             3. Which columns to use for the X and Y axes\n\
             4. Insights into what the chart reveals\n\
             Focus on the best way to visualize the requested information."
        }
        RequestType::Table => {
            "The user wants a TABLE. Respond with:\n\
             1. An analysis of the tabular data\n\
             2. Which columns matter most\n\
             3. Suggestions for sorting or filtering\n\
             4. Patterns in the data\n\
             Focus on organizing and presenting the data in tabular form."
        }
        RequestType::Explanation => {
            "The user wants an EXPLANATION. Respond with:\n\
             1. A clear, approachable explanation\n\
             2. Context and interpretation\n\
             3. Connections between different elements of the data\n\
             4. Recommended actions\n\
             Be didactic and accessible."
        }
    };

    format!(
        "You are an expert data analyst. The user uploaded a CSV file and \
         is asking for an analysis.\n\n{digest}\n\nUSER REQUEST: {query}\n\n{instructions}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::{Column, Value};
    use async_trait::async_trait;

    struct StubNarrative {
        reply: anyhow::Result<String>,
    }

    #[async_trait]
    impl NarrativeClient for StubNarrative {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!(e.to_string())),
            }
        }
    }

    fn sample_dataset() -> Dataset {
        Dataset::from_columns(vec![
            Column::new(
                "revenue".to_string(),
                vec![Value::Int(10), Value::Int(20), Value::Int(30)],
            ),
            Column::new(
                "region".to_string(),
                vec![
                    Value::Text("north".into()),
                    Value::Text("south".into()),
                    Value::Text("north".into()),
                ],
            ),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_narrative_failure_degrades_to_substitute_text() {
        let service = AnalysisService::new(Arc::new(StubNarrative {
            reply: Err(anyhow::anyhow!("connection refused")),
        }));
        let response = service
            .analyze(&sample_dataset(), "what stands out?", RequestType::Table)
            .await;
        assert!(response.text.contains("connection refused"));
        // The visualization pipeline is unaffected by the narrative failure
        assert!(response.visualization.is_some());
        assert_eq!(
            response.chart_config,
            Some(serde_json::json!({"type": "table"}))
        );
    }

    #[tokio::test]
    async fn test_explanation_has_no_visualization() {
        let service = AnalysisService::new(Arc::new(StubNarrative {
            reply: Ok("looks fine".to_string()),
        }));
        let response = service
            .analyze(&sample_dataset(), "explain", RequestType::Explanation)
            .await;
        assert_eq!(response.text, "looks fine");
        assert!(response.visualization.is_none());
        assert!(response.chart_config.is_none());
    }

    #[tokio::test]
    async fn test_table_payload_shape() {
        let service = AnalysisService::new(Arc::new(StubNarrative {
            reply: Ok("ok".to_string()),
        }));
        let response = service
            .analyze(&sample_dataset(), "table please", RequestType::Table)
            .await;
        let payload = response.visualization.unwrap();
        assert_eq!(payload["total_rows"], serde_json::json!(3));
        assert_eq!(payload["data"].as_array().unwrap().len(), 3);
        assert_eq!(payload["data"][0]["region"], serde_json::json!("north"));
    }

    #[tokio::test]
    async fn test_compact_dashboard_payload() {
        let service = AnalysisService::new(Arc::new(StubNarrative {
            reply: Ok("ok".to_string()),
        }));
        let response = service
            .analyze(&sample_dataset(), "dashboard", RequestType::Dashboard)
            .await;
        let payload = response.visualization.unwrap();
        assert_eq!(payload["summary_stats"]["total_rows"], serde_json::json!(3));
        assert_eq!(payload["charts"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_request_type_parse_defaults_to_explanation() {
        assert_eq!(RequestType::parse("chart"), RequestType::Chart);
        assert_eq!(RequestType::parse("Dashboard"), RequestType::Dashboard);
        assert_eq!(RequestType::parse("nonsense"), RequestType::Explanation);
        assert_eq!(RequestType::parse(""), RequestType::Explanation);
    }
}
