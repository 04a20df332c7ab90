//! Re-serves stored annexe PDFs from our own origin so browsers can embed them.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// GET /api/v1/proxy/pdf?url=…
///
/// Only URLs under the configured public storage URL are fetched.
pub async fn handle_proxy_pdf(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, AppError> {
    let url = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::InvalidArgument("url is required".to_string()))?;

    let url = storage_url(&url, &state.config.s3_public_url).ok_or_else(|| {
        AppError::InvalidArgument("url must point to stored documents".to_string())
    })?;

    debug!("Proxying PDF from {url}");
    let response = state
        .http
        .get(url.clone())
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("GET {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Upstream(format!("GET {url} returned {status}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Upstream(format!("reading {url} failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        bytes,
    )
        .into_response())
}

/// Parses `raw` and returns it when it names an object below `base`.
///
/// Both sides are compared after URL normalization, so dot segments (plain or
/// percent-encoded) and backslashes are resolved before the prefix check. Encoded
/// separators are refused because the storage backend may decode them.
fn storage_url(raw: &str, base: &str) -> Option<Url> {
    let base = Url::parse(base).ok()?;
    let url = Url::parse(raw).ok()?;

    if url.scheme() != base.scheme()
        || url.host_str() != base.host_str()
        || url.port_or_known_default() != base.port_or_known_default()
        || !url.username().is_empty()
        || url.password().is_some()
    {
        return None;
    }

    let prefix = format!("{}/", base.path().trim_end_matches('/'));
    let key = url.path().strip_prefix(prefix.as_str())?;
    let lowered = key.to_ascii_lowercase();
    if key.is_empty()
        || key.split('/').any(|segment| segment == "..")
        || lowered.contains("%2f")
        || lowered.contains("%5c")
        || lowered.contains("%2e")
    {
        return None;
    }
    Some(url)
}
