// Dashboard service - Use case for assembling the full dashboard payload

use crate::application::{
    chart_service, column_classifier, filter_service, kpi_service, summary_service,
};
use crate::domain::dashboard::{Dashboard, DashboardMetadata};
use crate::domain::dataset::Dataset;

#[derive(Clone)]
pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        Self
    }

    /// Classify once, then derive KPIs, charts, filters and the summary.
    /// Any unexpected failure is caught here and surfaced as a dashboard
    /// with empty collections and an error field, never propagated.
    pub fn build(&self, dataset: &Dataset) -> Dashboard {
        match self.assemble(dataset) {
            Ok(dashboard) => dashboard,
            Err(e) => {
                tracing::error!("Dashboard assembly failed: {}", e);
                Dashboard::failed(e.to_string())
            }
        }
    }

    fn assemble(&self, dataset: &Dataset) -> anyhow::Result<Dashboard> {
        let partition = column_classifier::classify(dataset);

        let kpis = kpi_service::generate(dataset, &partition);
        let charts = chart_service::dashboard_charts(dataset, &partition);
        let filters = filter_service::generate(dataset, &partition);
        let summary = summary_service::summarize(dataset, &partition);

        Ok(Dashboard {
            kpis,
            charts,
            filters,
            summary,
            metadata: DashboardMetadata {
                total_rows: dataset.row_count(),
                total_columns: dataset.column_count(),
                numeric_columns: partition.numeric.len(),
                categorical_columns: partition.categorical.len(),
                date_columns: partition.datetime.len(),
            },
            error: None,
        })
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}
