//! PDF export: template layout followed by PDF serialization.
//!
//! The whole document is built in memory before the response starts. A failure at any
//! point therefore still reaches the client as a structured error instead of a
//! truncated PDF.

pub mod handlers;
pub mod pdf;
pub mod template;

use tracing::info;

use crate::errors::AppError;
use crate::layout::{a4_page_config, parse_accent_color};
use crate::models::resume::Resume;

/// Renders a resume to PDF bytes. Unparsable accent colors fall back to the default blue.
pub fn render_resume(resume: &Resume, accent_color: Option<&str>) -> Result<Vec<u8>, AppError> {
    let accent = parse_accent_color(accent_color);
    let config = a4_page_config();
    let pages = template::layout_resume(resume, accent, config);
    let bytes = pdf::write_pdf(&pages, &config, &resume.title)?;
    info!(
        "Rendered resume {} ({} pages, {} bytes)",
        resume.id,
        pages.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Runs `render_resume` on the blocking pool so layout work never stalls the runtime.
pub async fn render_resume_blocking(
    resume: Resume,
    accent_color: Option<String>,
) -> Result<Vec<u8>, AppError> {
    tokio::task::spawn_blocking(move || render_resume(&resume, accent_color.as_deref()))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("render task failed: {e}")))?
}
