use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::error;

use ambience_store::Transcription;

use crate::{error::ApiError, extractors::MaybeUserId, state::AppState};

#[derive(Debug, Serialize)]
pub struct ArtifactsResponse {
    #[serde(rename = "audioUrl")]
    pub audio_url: Option<String>,
    pub transcription: Option<Transcription>,
    pub summary: Option<String>,
}

/// Combined read of every artifact; fields are null until their
/// producing step has written them.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArtifactsResponse>, ApiError> {
    let artifacts = state.runs.artifacts(&id).await?;
    Ok(Json(ArtifactsResponse {
        audio_url: artifacts.audio_url,
        transcription: artifacts.transcription,
        summary: artifacts.summary,
    }))
}

/// Remove all state for the run: its four keys plus every occurrence in
/// the caller's run list. Absent keys are not an error.
pub async fn delete(
    State(state): State<AppState>,
    MaybeUserId(user_id): MaybeUserId,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .runs
        .delete(&id, user_id.as_deref())
        .await
        .map_err(|e| {
            error!(run_id = %id, error = %e, "delete failed");
            ApiError::Internal("Could not delete workflow".to_string())
        })?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Rename: overwrite the summary. A non-string `summary` is a validation
/// error; a blank string is a no-op preserving the original.
pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(summary) = body.get("summary").and_then(|s| s.as_str()) else {
        return Err(ApiError::BadRequest("Invalid body".to_string()));
    };

    let renamed = state.runs.rename(&id, summary).await.map_err(|e| {
        error!(run_id = %id, error = %e, "rename failed");
        ApiError::Internal("Could not update summary".to_string())
    })?;
    Ok(Json(serde_json::json!({ "ok": renamed })))
}
