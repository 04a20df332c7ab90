//! Persistence seams for resumes and annexes.
//!
//! Services hold `Arc<dyn ResumeStore>` / `Arc<dyn AnnexeStore>`; production wires in the
//! Postgres implementations, tests use the in-memory ones.

use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annexe::Annexe;
use crate::models::resume::Resume;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::{PgAnnexeStore, PgResumeStore};

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError>;

    async fn find_owned(&self, owner_id: Uuid, resume_id: Uuid)
        -> Result<Option<Resume>, AppError>;

    /// Returns the resume only when it is public.
    async fn find_public(&self, resume_id: Uuid) -> Result<Option<Resume>, AppError>;

    async fn find_public_by_slug(&self, slug: &str) -> Result<Option<Resume>, AppError>;

    /// All resumes of an owner, most recently updated first.
    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError>;

    /// Overwrites every mutable column of an existing resume, scoped by owner.
    /// Returns `false` when no owned row matched.
    async fn save(&self, resume: &Resume) -> Result<bool, AppError>;

    async fn delete_owned(&self, owner_id: Uuid, resume_id: Uuid) -> Result<bool, AppError>;

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, AppError>;

    /// Slugs equal to `base` or of the form `base-*`, ignoring `exclude`.
    async fn slugs_with_prefix(
        &self,
        base: &str,
        exclude: Option<Uuid>,
    ) -> Result<HashSet<String>, AppError>;
}

#[async_trait]
pub trait AnnexeStore: Send + Sync {
    async fn insert(&self, annexe: &Annexe) -> Result<(), AppError>;

    async fn find_owned(&self, owner_id: Uuid, annexe_id: Uuid)
        -> Result<Option<Annexe>, AppError>;

    /// All annexes of an owner, newest first.
    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Annexe>, AppError>;

    /// The subset of `ids` that exists and belongs to `owner_id`. Also serves as the
    /// join that resolves a resume's annexe references.
    async fn find_owned_in(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<Vec<Annexe>, AppError>;

    async fn delete_owned(&self, owner_id: Uuid, annexe_id: Uuid) -> Result<bool, AppError>;
}
