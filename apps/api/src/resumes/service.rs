use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annexe::Annexe;
use crate::models::resume::{ResolvedAnnexe, Resume, ResumeWithAnnexes};
use crate::resumes::patch::ResumePatch;
use crate::slug::{generate_unique_slug, is_slug_unique};
use crate::storage::{FileStorage, ImageTransform, UploadRequest};
use crate::store::{AnnexeStore, ResumeStore};

/// Storage folder for profile pictures and signatures.
pub const RESUME_IMAGE_FOLDER: &str = "user-resumes";

/// An image part of an update request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Bytes,
    pub file_name: String,
    pub content_type: String,
    pub remove_background: bool,
}

/// Owner-scoped CRUD, clone and visibility gating for resumes.
///
/// Every owner operation looks the resume up by `(owner_id, resume_id)`; a resume that
/// exists but belongs to someone else is reported as `NotFound`, never `Forbidden`.
pub struct ResumeService {
    resumes: Arc<dyn ResumeStore>,
    annexes: Arc<dyn AnnexeStore>,
    storage: Arc<dyn FileStorage>,
}

impl ResumeService {
    pub fn new(
        resumes: Arc<dyn ResumeStore>,
        annexes: Arc<dyn AnnexeStore>,
        storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            resumes,
            annexes,
            storage,
        }
    }

    pub async fn create(&self, owner_id: Uuid, title: &str) -> Result<Resume, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidArgument("Title is required".to_string()));
        }

        let resume = Resume::new(owner_id, title.to_string());
        self.resumes.insert(&resume).await?;
        info!("Created resume {} for owner {owner_id}", resume.id);
        Ok(resume)
    }

    pub async fn list_own(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
        self.resumes.list_owned(owner_id).await
    }

    pub async fn get_own(&self, owner_id: Uuid, resume_id: Uuid) -> Result<Resume, AppError> {
        self.resumes
            .find_owned(owner_id, resume_id)
            .await?
            .ok_or_else(|| resume_not_found(resume_id))
    }

    pub async fn get_public(&self, resume_id: Uuid) -> Result<Resume, AppError> {
        self.resumes
            .find_public(resume_id)
            .await?
            .ok_or_else(|| resume_not_found(resume_id))
    }

    pub async fn get_public_by_slug(&self, slug: &str) -> Result<Resume, AppError> {
        self.resumes
            .find_public_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No public resume at '{slug}'")))
    }

    pub async fn get_own_with_annexes(
        &self,
        owner_id: Uuid,
        resume_id: Uuid,
    ) -> Result<ResumeWithAnnexes, AppError> {
        let resume = self.get_own(owner_id, resume_id).await?;
        self.resolve_annexes(resume).await
    }

    pub async fn get_public_with_annexes(
        &self,
        resume_id: Uuid,
    ) -> Result<ResumeWithAnnexes, AppError> {
        let resume = self.get_public(resume_id).await?;
        self.resolve_annexes(resume).await
    }

    /// Joins each reference to its metadata, keeping stored order. References to
    /// deleted annexes resolve to `None`.
    async fn resolve_annexes(&self, resume: Resume) -> Result<ResumeWithAnnexes, AppError> {
        let ids: Vec<Uuid> = resume.annexes.iter().map(|a| a.annexe_id).collect();
        let found: HashMap<Uuid, Annexe> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.annexes
                .find_owned_in(resume.owner_id, &ids)
                .await?
                .into_iter()
                .map(|a| (a.id, a))
                .collect()
        };

        let resolved_annexes = resume
            .annexes
            .iter()
            .map(|slot| ResolvedAnnexe {
                annexe_id: slot.annexe_id,
                order: slot.order,
                annexe: found.get(&slot.annexe_id).cloned(),
            })
            .collect();

        Ok(ResumeWithAnnexes {
            resume,
            resolved_annexes,
        })
    }

    /// Applies a partial update, uploading the optional images first.
    ///
    /// Nothing is uploaded and nothing is written unless the resume is owned by the
    /// caller and the patch is valid.
    pub async fn update(
        &self,
        owner_id: Uuid,
        resume_id: Uuid,
        patch: ResumePatch,
        image: Option<ImageUpload>,
        signature: Option<ImageUpload>,
    ) -> Result<Resume, AppError> {
        let mut resume = self.get_own(owner_id, resume_id).await?;

        patch.validate()?;
        if let Some(slug) = patch.requested_slug() {
            if !is_slug_unique(self.resumes.as_ref(), slug, Some(resume_id)).await? {
                return Err(AppError::InvalidArgument(format!(
                    "Slug '{slug}' is already in use"
                )));
            }
        }

        let image_url = match image {
            Some(upload) => Some(
                self.upload_image(upload, "profile.png", ImageTransform::profile_picture)
                    .await?,
            ),
            None => None,
        };
        let signature_url = match signature {
            Some(upload) => Some(
                self.upload_image(upload, "signature.png", ImageTransform::signature)
                    .await?,
            ),
            None => None,
        };

        patch.apply(&mut resume);
        if let Some(url) = image_url {
            resume.personal_info.image = Some(url);
        }
        if let Some(url) = signature_url {
            resume.signature.image = Some(url);
        }
        resume.updated_at = Utc::now();

        self.persist(&resume).await?;
        info!("Updated resume {resume_id}");
        Ok(resume)
    }

    async fn upload_image(
        &self,
        upload: ImageUpload,
        default_name: &str,
        transform: fn(bool) -> ImageTransform,
    ) -> Result<String, AppError> {
        if !upload.content_type.starts_with("image/") {
            return Err(AppError::InvalidArgument(format!(
                "Expected an image, got '{}'",
                upload.content_type
            )));
        }
        let file_name = if upload.file_name.trim().is_empty() {
            default_name.to_string()
        } else {
            upload.file_name
        };

        let stored = self
            .storage
            .upload(UploadRequest {
                folder: RESUME_IMAGE_FOLDER,
                file_name,
                content_type: upload.content_type,
                data: upload.data,
                transform: Some(transform(upload.remove_background)),
            })
            .await?;
        Ok(stored.url)
    }

    pub async fn delete(&self, owner_id: Uuid, resume_id: Uuid) -> Result<(), AppError> {
        if !self.resumes.delete_owned(owner_id, resume_id).await? {
            return Err(resume_not_found(resume_id));
        }
        info!("Deleted resume {resume_id}");
        Ok(())
    }

    /// Copies an owned resume. Annexe references are copied as they are, without
    /// re-validation.
    pub async fn clone_resume(&self, owner_id: Uuid, resume_id: Uuid) -> Result<Resume, AppError> {
        let source = self.get_own(owner_id, resume_id).await?;
        let copy = source.duplicate();
        self.resumes.insert(&copy).await?;
        info!("Cloned resume {resume_id} into {}", copy.id);
        Ok(copy)
    }

    /// Derives a unique slug from `text`, or from the title when `text` is absent or
    /// blank, and stores it.
    pub async fn assign_slug(
        &self,
        owner_id: Uuid,
        resume_id: Uuid,
        text: Option<&str>,
    ) -> Result<Resume, AppError> {
        let mut resume = self.get_own(owner_id, resume_id).await?;
        let source = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(resume.title.as_str())
            .to_string();

        let slug = generate_unique_slug(self.resumes.as_ref(), &source, Some(resume_id)).await?;
        resume.slug = Some(slug);
        resume.updated_at = Utc::now();

        self.persist(&resume).await?;
        Ok(resume)
    }

    /// Owner-scoped full-row write. A row that vanished in between is reported as
    /// `NotFound`.
    async fn persist(&self, resume: &Resume) -> Result<(), AppError> {
        if !self.resumes.save(resume).await? {
            warn!("Resume {} disappeared before it could be saved", resume.id);
            return Err(resume_not_found(resume.id));
        }
        Ok(())
    }
}

fn resume_not_found(resume_id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {resume_id} not found"))
}
