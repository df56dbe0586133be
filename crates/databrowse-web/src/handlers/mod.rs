pub mod citations;
pub mod data;
pub mod fragments;
pub mod index;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/data_categories", get(fragments::categories))
        .route("/data_contexts/{category_id}", get(fragments::contexts))
        .route(
            "/data_sets/{category_id}/{context_id}",
            get(fragments::datasets),
        )
        .route("/data", post(data::data))
        .route("/citations/{dataset_id}", get(citations::citations))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
