use axum::{
    Extension, Json,
    extract::{Multipart, State},
};
use serde::Serialize;
use tracing::info;

use crate::{error::ApiError, middleware::Identity, state::AppState};

#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    #[serde(rename = "workflowRunId")]
    pub workflow_run_id: String,
}

struct AudioPart {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Trigger a run from multipart audio: repeatable `file` fields plus an
/// optional `recording` field (appended after the files). Uploads each
/// part, then hands the URLs to the workflow engine. Uploads are not
/// rolled back if the trigger fails afterwards.
pub async fn create(
    State(state): State<AppState>,
    Extension(Identity(user_id)): Extension<Identity>,
    mut multipart: Multipart,
) -> Result<Json<TriggerResponse>, ApiError> {
    let mut files: Vec<AudioPart> = Vec::new();
    let mut recording: Option<AudioPart> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("audio.mp3").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("audio/mpeg")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
                files.push(AudioPart {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "recording" => {
                let content_type = field
                    .content_type()
                    .unwrap_or("audio/mpeg")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read recording: {}", e))
                })?;
                recording = Some(AudioPart {
                    filename: format!("{}.mp3", user_id),
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    if let Some(rec) = recording {
        files.push(rec);
    }

    // reject before touching any external service
    if files.is_empty() {
        return Err(ApiError::BadRequest("No audio provided".to_string()));
    }

    let mut urls = Vec::with_capacity(files.len());
    for part in files {
        let url = state
            .storage
            .upload(&part.filename, &part.content_type, part.bytes)
            .await?;
        urls.push(url);
    }

    let workflow_run_id = state.engine.trigger(&user_id, urls).await?;
    info!(run_id = %workflow_run_id, user_id = %user_id, "run triggered");

    Ok(Json(TriggerResponse { workflow_run_id }))
}
