use axum::{Json, extract::State};
use serde::Serialize;

use ambience_store::Transcription;

use crate::{error::ApiError, extractors::UserId, state::AppState};

#[derive(Debug, Serialize)]
pub struct UserRun {
    #[serde(rename = "workflowId")]
    pub workflow_id: String,
    pub transcription: Option<Transcription>,
    pub summary: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserRunsResponse {
    #[serde(rename = "workflowData")]
    pub workflow_data: Vec<UserRun>,
}

/// Up to 33 most-recent runs for the calling user, each with whatever
/// transcription/summary exists. Dangling run ids (partial deletes)
/// simply come back with null fields.
pub async fn list(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<UserRunsResponse>, ApiError> {
    let ids = state.runs.list_runs(&user_id).await?;

    let lookups = ids.into_iter().map(|id| {
        let runs = state.runs.clone();
        async move {
            let (transcription, summary) =
                futures::join!(runs.transcription(&id), runs.summary(&id));
            Ok::<_, ApiError>(UserRun {
                workflow_id: id,
                transcription: transcription?,
                summary: summary?,
            })
        }
    });
    let workflow_data = futures::future::try_join_all(lookups).await?;

    Ok(Json(UserRunsResponse { workflow_data }))
}
