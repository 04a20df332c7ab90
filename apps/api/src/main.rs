mod annexes;
mod auth;
mod config;
mod db;
mod errors;
mod layout;
mod models;
mod render;
mod resumes;
mod routes;
mod slug;
mod state;
mod storage;
mod store;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::annexes::{AnnexeAssignmentService, AnnexeLibrary};
use crate::auth::request_span;
use crate::config::Config;
use crate::db::create_pool;
use crate::resumes::ResumeService;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStorage, S3FileStorage};
use crate::store::{AnnexeStore, PgAnnexeStore, PgResumeStore, ResumeStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_PKG_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let resume_store: Arc<dyn ResumeStore> = Arc::new(PgResumeStore::new(db.clone()));
    let annexe_store: Arc<dyn AnnexeStore> = Arc::new(PgAnnexeStore::new(db));
    let file_storage: Arc<dyn FileStorage> = Arc::new(S3FileStorage::new(
        s3,
        config.s3_bucket.clone(),
        config.s3_public_url.clone(),
    ));

    // Build app state
    let state = AppState {
        resumes: Arc::new(ResumeService::new(
            resume_store.clone(),
            annexe_store.clone(),
            file_storage.clone(),
        )),
        assignments: Arc::new(AnnexeAssignmentService::new(
            resume_store,
            annexe_store.clone(),
        )),
        annexes: Arc::new(AnnexeLibrary::new(annexe_store, file_storage)),
        http: reqwest::Client::new(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resume-api-static",
    );

    let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // Path-style addressing matches the default public URL layout and what MinIO serves.
    let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
