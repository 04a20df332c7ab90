//! Axum route handlers for the Resume API.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::OwnerId;
use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeWithAnnexes};
use crate::resumes::patch::ResumePatch;
use crate::resumes::service::ImageUpload;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignSlugRequest {
    /// Source text for the slug. Defaults to the resume title.
    pub text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Owner handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(request): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let resume = state.resumes.create(owner_id, &request.title).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.resumes.list_own(owner_id).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.get_own(owner_id, resume_id).await?))
}

/// GET /api/v1/resumes/:id/with-annexes
pub async fn handle_get_with_annexes(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeWithAnnexes>, AppError> {
    Ok(Json(
        state
            .resumes
            .get_own_with_annexes(owner_id, resume_id)
            .await?,
    ))
}

/// PUT /api/v1/resumes/:id
///
/// Multipart form:
/// - `resume_data`: JSON `ResumePatch`
/// - `image` / `signature`: optional image files
/// - `remove_background` / `remove_signature_background`: `"true"` to strip backgrounds
pub async fn handle_update(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(resume_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Resume>, AppError> {
    let mut patch = ResumePatch::default();
    let mut image: Option<ImageUpload> = None;
    let mut signature: Option<ImageUpload> = None;
    let mut remove_background = false;
    let mut remove_signature_background = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidArgument(format!("Failed to process multipart: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "resume_data" => {
                let text = read_text(field).await?;
                if !text.trim().is_empty() {
                    patch = serde_json::from_str(&text).map_err(|e| {
                        AppError::InvalidArgument(format!("Invalid resume_data: {e}"))
                    })?;
                }
            }
            "image" => image = read_image(field).await?,
            "signature" => signature = read_image(field).await?,
            "remove_background" => remove_background = read_flag(field).await?,
            "remove_signature_background" => {
                remove_signature_background = read_flag(field).await?
            }
            _ => {}
        }
    }

    if let Some(upload) = image.as_mut() {
        upload.remove_background = remove_background;
    }
    if let Some(upload) = signature.as_mut() {
        upload.remove_background = remove_signature_background;
    }

    let resume = state
        .resumes
        .update(owner_id, resume_id, patch, image, signature)
        .await?;
    Ok(Json(resume))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(resume_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.resumes.delete(owner_id, resume_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resumes/:id/clone
pub async fn handle_clone(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(resume_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let copy = state.resumes.clone_resume(owner_id, resume_id).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// POST /api/v1/resumes/:id/slug
pub async fn handle_assign_slug(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(resume_id): Path<Uuid>,
    request: Option<Json<AssignSlugRequest>>,
) -> Result<Json<Resume>, AppError> {
    let text = request.and_then(|Json(r)| r.text);
    let resume = state
        .resumes
        .assign_slug(owner_id, resume_id, text.as_deref())
        .await?;
    Ok(Json(resume))
}

// ────────────────────────────────────────────────────────────────────────────
// Public handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/public/resumes/:id
pub async fn handle_get_public(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.get_public(resume_id).await?))
}

/// GET /api/v1/public/resumes/:id/with-annexes
pub async fn handle_get_public_with_annexes(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeWithAnnexes>, AppError> {
    Ok(Json(state.resumes.get_public_with_annexes(resume_id).await?))
}

/// GET /api/v1/public/slugs/:slug
pub async fn handle_get_public_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(state.resumes.get_public_by_slug(&slug).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidArgument(format!("Failed to read form field: {e}")))
}

async fn read_flag(field: Field<'_>) -> Result<bool, AppError> {
    Ok(matches!(
        read_text(field).await?.trim(),
        "true" | "1" | "on"
    ))
}

/// Browsers send an empty part for an untouched file input; that counts as no upload.
async fn read_image(field: Field<'_>) -> Result<Option<ImageUpload>, AppError> {
    let file_name = field.file_name().unwrap_or("").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::InvalidArgument(format!("Failed to read file: {e}")))?;

    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(ImageUpload {
        data,
        file_name,
        content_type,
        remove_background: false,
    }))
}
