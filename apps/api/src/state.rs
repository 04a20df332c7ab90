use std::sync::Arc;

use crate::annexes::{AnnexeAssignmentService, AnnexeLibrary};
use crate::config::Config;
use crate::resumes::ResumeService;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Services own their collaborators (stores, file storage); nothing here is global.
#[derive(Clone)]
pub struct AppState {
    pub resumes: Arc<ResumeService>,
    pub assignments: Arc<AnnexeAssignmentService>,
    pub annexes: Arc<AnnexeLibrary>,
    /// Outbound client for the PDF proxy.
    pub http: reqwest::Client,
    pub config: Config,
}
