use axum::Json;
use axum::extract::{Multipart, State};
use std::sync::Arc;

use databrowse_core::DataMatrix;

use crate::error::ApiError;
use crate::form;
use crate::state::AppState;

pub async fn data(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<DataMatrix>, ApiError> {
    let fields = form::parse_data_form(multipart)
        .await
        .map_err(ApiError::BadRequest)?;

    let matrix = state
        .store()
        .data_matrix(fields.context_id, &fields.dataset_ids)?;
    tracing::debug!(
        context_id = fields.context_id,
        datasets = fields.dataset_ids.len(),
        entities = matrix.len(),
        "data matrix served"
    );
    Ok(Json(matrix))
}
