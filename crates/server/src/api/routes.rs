use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{catalog, export, handlers, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Country metadata and saved filters
        .route(
            "/countries/{country_id}/metadata",
            get(catalog::get_metadata),
        )
        .route(
            "/countries/{country_id}/preferences/{user_id}",
            get(catalog::get_preference),
        )
        // Derived views
        .route("/countries/{country_id}/view", post(catalog::derive_view))
        // Spreadsheet export
        .route("/export/catalog", post(export::export_catalog))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
