use axum::extract::{Path, State};
use axum::response::Html;
use std::sync::Arc;

use databrowse_core::fragments::{
    CATEGORY_PROMPT, CONTEXT_PROMPT, render_dataset_checkboxes, render_options,
};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn categories(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let entries = state.store().categories()?;
    Ok(Html(render_options(CATEGORY_PROMPT, &entries)))
}

pub async fn contexts(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<i64>,
) -> Result<Html<String>, ApiError> {
    let entries = state.store().contexts(category_id)?;
    Ok(Html(render_options(CONTEXT_PROMPT, &entries)))
}

pub async fn datasets(
    State(state): State<Arc<AppState>>,
    Path((category_id, context_id)): Path<(i64, i64)>,
) -> Result<Html<String>, ApiError> {
    let entries = state.store().datasets(category_id, context_id)?;
    Ok(Html(render_dataset_checkboxes(&entries)))
}
