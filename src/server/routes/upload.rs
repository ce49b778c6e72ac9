//! PDF upload and ingestion endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// Uploader attributed to requests that omit the `user_id` field
const DEFAULT_USER_ID: &str = "anonymous";

/// POST /api/v1/upload/pdf - upload and ingest one PDF
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();
    let mut user_id = DEFAULT_USER_ID.to_string();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Upload(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "user_id" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| Error::Upload(format!("Failed to read user_id: {}", e)))?;
                if !value.trim().is_empty() {
                    user_id = value.trim().to_string();
                }
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| Error::Upload("File field has no filename".to_string()))?;

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Upload(format!("Failed to read file: {}", e)))?;

                upload = Some((filename, data.to_vec()));
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field: {}", other);
            }
        }
    }

    let (filename, data) = upload.ok_or_else(|| Error::Upload("No file provided".to_string()))?;

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(Error::Upload(format!(
            "Only PDF files are supported, got: {}",
            filename
        )));
    }
    if data.is_empty() {
        return Err(Error::Upload("Uploaded file is empty".to_string()));
    }

    tracing::info!("Ingesting {} ({} bytes) for {}", filename, data.len(), user_id);

    let outcome = state.pipeline().ingest(&data, &filename, &user_id).await?;

    tracing::info!(
        "Ingested {} in {}ms ({} pages, {} chunks, {} captions)",
        filename,
        start.elapsed().as_millis(),
        outcome.pages,
        outcome.chunks_upserted,
        outcome.captions.len()
    );

    Ok(Json(UploadResponse::success(
        outcome.image_dir.display().to_string(),
        outcome.captions,
    )))
}
