//! Spreadsheet export.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use pickbook_core::ExportColumn;

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub records: Vec<Value>,
    /// Overrides the configured column set.
    #[serde(default)]
    pub columns: Option<Vec<ExportColumn>>,
}

/// POST /api/v1/export/catalog
///
/// Returns the records as CSV, ordered by catalog number.
pub async fn export_catalog(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let mut options = state.export_options();
    if let Some(columns) = request.columns {
        options.columns = columns;
    }

    match pickbook_core::export_catalog(&request.records, &options) {
        Ok(table) => Ok((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"catalog.csv\"",
                ),
            ],
            table.to_csv(),
        )),
        Err(e) => {
            warn!(error = %e, "Rejected export request");
            Err(ErrorResponse::with_status(
                StatusCode::BAD_REQUEST,
                e.to_string(),
            ))
        }
    }
}
