//! Axum route handlers for the Annexe API: the caller's library and per-resume assignment.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::annexes::library::AnnexeFile;
use crate::auth::OwnerId;
use crate::errors::AppError;
use crate::models::annexe::Annexe;
use crate::models::resume::{AnnexeRef, Resume};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssignAnnexesRequest {
    pub annexes: Vec<AnnexeRef>,
}

/// PUT /api/v1/resumes/:id/annexes
///
/// Replaces the resume's annexe list wholesale.
pub async fn handle_assign(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<AssignAnnexesRequest>,
) -> Result<Json<Resume>, AppError> {
    let resume = state
        .assignments
        .assign_annexes(owner_id, resume_id, request.annexes)
        .await?;
    Ok(Json(resume))
}

/// POST /api/v1/annexes
///
/// Multipart form with a `title` text field and an `annexe` PDF file.
pub async fn handle_upload(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Annexe>), AppError> {
    let mut title = String::new();
    let mut file: Option<AnnexeFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidArgument(format!("Failed to process multipart: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => {
                title = field.text().await.map_err(|e| {
                    AppError::InvalidArgument(format!("Failed to read title: {e}"))
                })?;
            }
            "annexe" => {
                let file_name = field.file_name().unwrap_or("annexe.pdf").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidArgument(format!("Failed to read file: {e}"))
                })?;
                file = Some(AnnexeFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::InvalidArgument("No file provided".to_string()))?;
    let annexe = state.annexes.upload(owner_id, &title, file).await?;
    Ok((StatusCode::CREATED, Json(annexe)))
}

/// GET /api/v1/annexes
pub async fn handle_list(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<Vec<Annexe>>, AppError> {
    Ok(Json(state.annexes.list(owner_id).await?))
}

/// GET /api/v1/annexes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(annexe_id): Path<Uuid>,
) -> Result<Json<Annexe>, AppError> {
    Ok(Json(state.annexes.get(owner_id, annexe_id).await?))
}

/// DELETE /api/v1/annexes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(annexe_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.annexes.delete(owner_id, annexe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
