// HTTP request handlers
use crate::application::analysis_service::{AnalysisResponse, RequestType};
use crate::domain::dashboard::Dashboard;
use crate::infrastructure::csv_loader::load_csv;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use std::sync::Arc;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(message: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message.to_string() })),
    )
}

#[derive(Default)]
struct UploadForm {
    file: Option<Vec<u8>>,
    query: Option<String>,
    request_type: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("invalid multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("failed to read file field: {e}")))?;
                form.file = Some(bytes.to_vec());
            }
            "query" => {
                form.query = Some(field.text().await.map_err(bad_request)?);
            }
            "request_type" => {
                form.request_type = Some(field.text().await.map_err(bad_request)?);
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field {}", other);
            }
        }
    }
    Ok(form)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Build the full dashboard for an uploaded CSV
pub async fn build_dashboard(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Dashboard>, ApiError> {
    let form = read_upload(multipart).await?;
    let bytes = form
        .file
        .ok_or_else(|| bad_request("missing 'file' field"))?;
    let dataset = load_csv(&bytes).map_err(bad_request)?;
    Ok(Json(state.dashboard_service.build(&dataset)))
}

/// Analyze an uploaded CSV against a free-text query
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let form = read_upload(multipart).await?;
    let bytes = form
        .file
        .ok_or_else(|| bad_request("missing 'file' field"))?;
    let dataset = load_csv(&bytes).map_err(bad_request)?;

    let query = form.query.unwrap_or_default();
    let request_type = RequestType::parse(form.request_type.as_deref().unwrap_or(""));

    let response = state
        .analysis_service
        .analyze(&dataset, &query, request_type)
        .await;
    Ok(Json(response))
}
