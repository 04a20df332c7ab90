//! PDF export endpoints.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::OwnerId;
use crate::errors::AppError;
use crate::render::render_resume_blocking;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// `#rrggbb`. Anything else falls back to the default accent.
    pub accent_color: Option<String>,
}

/// POST /api/v1/resumes/:id/pdf
pub async fn handle_render_own(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(resume_id): Path<Uuid>,
    request: Option<Json<RenderRequest>>,
) -> Result<Response, AppError> {
    let resume = state.resumes.get_own(owner_id, resume_id).await?;
    let accent_color = request.and_then(|Json(r)| r.accent_color);
    let bytes = render_resume_blocking(resume, accent_color).await?;
    Ok(pdf_response(bytes))
}

/// POST /api/v1/public/resumes/:id/pdf
pub async fn handle_render_public(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    request: Option<Json<RenderRequest>>,
) -> Result<Response, AppError> {
    let resume = state.resumes.get_public(resume_id).await?;
    let accent_color = request.and_then(|Json(r)| r.accent_color);
    let bytes = render_resume_blocking(resume, accent_color).await?;
    Ok(pdf_response(bytes))
}

fn pdf_response(bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "inline; filename=resume.pdf"),
        ],
        bytes,
    )
        .into_response()
}
