// End-to-end dashboard assembly over a CSV upload

use csv_insight::application::dashboard_service::DashboardService;
use csv_insight::domain::dashboard::{FilterControl, KpiFormat};
use csv_insight::infrastructure::csv_loader::load_csv;

fn monthly_sales_csv() -> String {
    let regions = ["north", "south", "east"];
    let mut csv = String::from("date,region,revenue\n");
    for month in 1..=12 {
        csv.push_str(&format!(
            "2024-{month:02}-15,{},{}\n",
            regions[(month - 1) % 3],
            month * 100
        ));
    }
    csv
}

#[test]
fn full_dashboard_for_monthly_sales() {
    let dataset = load_csv(monthly_sales_csv().as_bytes()).unwrap();
    let dashboard = DashboardService::new().build(&dataset);

    assert!(dashboard.error.is_none());

    // KPIs in fixed order, currency format from the "revenue" column name
    let kpi_ids: Vec<&str> = dashboard.kpis.iter().map(|k| k.id.as_str()).collect();
    assert_eq!(
        kpi_ids,
        vec!["total_records", "main_metric", "avg_metric", "unique_categories"]
    );
    assert_eq!(dashboard.kpis[0].value, serde_json::json!(12));
    assert_eq!(dashboard.kpis[1].title, "Total revenue");
    assert_eq!(dashboard.kpis[1].value, serde_json::json!(7800.0));
    assert_eq!(dashboard.kpis[1].format, KpiFormat::Currency);
    assert_eq!(dashboard.kpis[2].value, serde_json::json!(650.0));
    assert_eq!(dashboard.kpis[3].title, "Unique region");
    assert_eq!(dashboard.kpis[3].value, serde_json::json!(3));

    // One numeric column: histogram, bar, time series and box plot, but
    // no heatmap or scatter
    let chart_ids: Vec<&str> = dashboard.charts.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(
        chart_ids,
        vec!["distribution_chart", "top_categories", "time_series", "box_plot"]
    );

    let bar = &dashboard.charts[1];
    assert_eq!(bar.data["x"].as_array().unwrap().len(), 3);

    let line = &dashboard.charts[2];
    assert_eq!(line.data["x"].as_array().unwrap().len(), 12);
    assert_eq!(line.data["x"][0], serde_json::json!("2024-01"));

    // Filters: one multiselect, one range, one daterange
    assert_eq!(dashboard.filters.len(), 3);
    match &dashboard.filters[0].control {
        FilterControl::Multiselect { options, .. } => assert_eq!(options.len(), 3),
        other => panic!("expected multiselect, got {other:?}"),
    }
    match &dashboard.filters[2].control {
        FilterControl::Daterange { min, max, .. } => {
            assert_eq!(min, "2024-01-15");
            assert_eq!(max, "2024-12-15");
        }
        other => panic!("expected daterange, got {other:?}"),
    }

    // Summary reflects a fully populated, fully distinct dataset
    assert_eq!(dashboard.summary.overview.total_rows, 12);
    assert_eq!(dashboard.summary.data_quality.completeness, "100.0%");
    assert_eq!(dashboard.summary.data_quality.uniqueness, "100.0%");
    assert_eq!(dashboard.metadata.date_columns, 1);
}

#[test]
fn assembly_is_deterministic() {
    let dataset = load_csv(monthly_sales_csv().as_bytes()).unwrap();
    let service = DashboardService::new();
    let first = serde_json::to_value(service.build(&dataset)).unwrap();
    let second = serde_json::to_value(service.build(&dataset)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn header_only_csv_is_rejected_before_assembly() {
    assert!(load_csv(b"date,region,revenue\n").is_err());
}
