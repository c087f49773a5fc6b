//! Country metadata, saved preferences and derived catalog views.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{debug, warn};

use pickbook_core::{
    CatalogEngine, CatalogView, CountryMetadata, EngineOptions, FilterPatch, FilterableItem,
    UserFilterPreference,
};

use super::handlers::ErrorResponse;
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ViewRequest {
    /// Whose saved preference seeds the filters. Omit for defaults.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Records to filter, sort and group.
    #[serde(default)]
    pub items: Vec<FilterableItem>,
    /// Changes applied on top of the loaded filters.
    #[serde(default)]
    pub filters: Option<FilterPatch>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/countries/{country_id}/metadata
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Path(country_id): Path<String>,
) -> Result<Json<CountryMetadata>, ApiError> {
    state
        .metadata()
        .country_metadata(&country_id)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(country_id = %country_id, error = %e, "Failed to load country metadata");
            ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}

/// GET /api/v1/countries/{country_id}/preferences/{user_id}
pub async fn get_preference(
    State(state): State<Arc<AppState>>,
    Path((country_id, user_id)): Path<(String, String)>,
) -> Result<Json<UserFilterPreference>, ApiError> {
    match state.preferences().get(&user_id, &country_id).await {
        Ok(Some(preference)) => Ok(Json(preference)),
        Ok(None) => Err(ErrorResponse::with_status(
            StatusCode::NOT_FOUND,
            format!("No saved filters for user {} in {}", user_id, country_id),
        )),
        Err(e) => {
            warn!(user_id = %user_id, country_id = %country_id, error = %e, "Failed to load preference");
            Err(ErrorResponse::with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            ))
        }
    }
}

/// POST /api/v1/countries/{country_id}/view
///
/// Runs one engine load for the country and user, applies the requested
/// filter changes and returns the derived view.
pub async fn derive_view(
    State(state): State<Arc<AppState>>,
    Path(country_id): Path<String>,
    Json(request): Json<ViewRequest>,
) -> Json<CatalogView> {
    let mut options =
        EngineOptions::new(country_id).with_config(state.config().engine.clone());
    if let Some(user_id) = request.user_id {
        options = options.with_user(user_id);
    }

    let engine = CatalogEngine::new(state.metadata(), state.preferences(), options);
    engine.set_items(request.items);
    engine.load().await;

    if let Some(filters) = request.filters {
        let outcome = engine.update_filters(filters);
        debug!(?outcome, "Applied requested filters");
    }

    let view = engine.view();
    engine.shutdown();
    Json(CatalogView::clone(&view))
}
