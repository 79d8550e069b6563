// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use csv_insight::application::analysis_service::AnalysisService;
use csv_insight::application::dashboard_service::DashboardService;
use csv_insight::infrastructure::anthropic_client::AnthropicClient;
use csv_insight::infrastructure::config::load_app_config;
use csv_insight::presentation::app_state::AppState;
use csv_insight::presentation::handlers::{analyze, build_dashboard, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_app_config()?;

    // Create the narrative collaborator (infrastructure layer)
    let narrative = Arc::new(AnthropicClient::new(config.anthropic)?);

    // Create services (application layer)
    let dashboard_service = DashboardService::new();
    let analysis_service = AnalysisService::new(narrative);

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        analysis_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", post(build_dashboard))
        .route("/analyze", post(analyze))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting csv-insight service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
