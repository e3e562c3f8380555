use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// An absent status key means the run is unknown (never created, or
/// deleted), reported as the string `"unknown"` rather than an error.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = state.runs.status(&id).await?;
    Ok(Json(StatusResponse {
        status: status.unwrap_or_else(|| "unknown".to_string()),
    }))
}
