use axum::Json;
use axum::extract::{Path, State};
use std::sync::Arc;

use databrowse_core::CitationsResponse;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn citations(
    State(state): State<Arc<AppState>>,
    Path(dataset_id): Path<i64>,
) -> Result<Json<CitationsResponse>, ApiError> {
    let citations = state.store().citations(dataset_id)?;
    Ok(Json(CitationsResponse { citations }))
}
