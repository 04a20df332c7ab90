pub mod health;
pub mod proxy;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::annexes::handlers as annexes;
use crate::render::handlers as render;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Multipart uploads carry PDFs of up to 10 MiB plus form overhead.
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Owner resume API
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create).get(resumes::handle_list),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get)
                .put(resumes::handle_update)
                .delete(resumes::handle_delete),
        )
        .route(
            "/api/v1/resumes/:id/with-annexes",
            get(resumes::handle_get_with_annexes),
        )
        .route("/api/v1/resumes/:id/clone", post(resumes::handle_clone))
        .route("/api/v1/resumes/:id/slug", post(resumes::handle_assign_slug))
        .route("/api/v1/resumes/:id/annexes", put(annexes::handle_assign))
        .route("/api/v1/resumes/:id/pdf", post(render::handle_render_own))
        // Public resume API
        .route(
            "/api/v1/public/resumes/:id",
            get(resumes::handle_get_public),
        )
        .route(
            "/api/v1/public/resumes/:id/with-annexes",
            get(resumes::handle_get_public_with_annexes),
        )
        .route(
            "/api/v1/public/resumes/:id/pdf",
            post(render::handle_render_public),
        )
        .route(
            "/api/v1/public/slugs/:slug",
            get(resumes::handle_get_public_by_slug),
        )
        // Annexe library
        .route(
            "/api/v1/annexes",
            post(annexes::handle_upload).get(annexes::handle_list),
        )
        .route(
            "/api/v1/annexes/:id",
            get(annexes::handle_get).delete(annexes::handle_delete),
        )
        .route("/api/v1/proxy/pdf", get(proxy::handle_proxy_pdf))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
