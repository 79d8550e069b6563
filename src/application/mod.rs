// Application layer - Use cases and the external collaborator seam
pub mod analysis_service;
pub mod chart_service;
pub mod column_classifier;
pub mod dashboard_service;
pub mod filter_service;
pub mod kpi_service;
pub mod narrative_client;
pub mod summary_service;
