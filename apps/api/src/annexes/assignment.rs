use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{AnnexeRef, Resume, MAX_ANNEXES_PER_RESUME};
use crate::store::{AnnexeStore, ResumeStore};

/// Validates and stores the ordered annexe list of a resume.
pub struct AnnexeAssignmentService {
    resumes: Arc<dyn ResumeStore>,
    annexes: Arc<dyn AnnexeStore>,
}

impl AnnexeAssignmentService {
    pub fn new(resumes: Arc<dyn ResumeStore>, annexes: Arc<dyn AnnexeStore>) -> Self {
        Self { resumes, annexes }
    }

    /// Replaces the resume's annexe list with `requested`.
    ///
    /// Checks run in a fixed order: resume ownership (`NotFound`), annexe ownership
    /// (`Forbidden`), then list length (`InvalidArgument`). `order` values are stored
    /// verbatim. Nothing is written unless every check passes.
    pub async fn assign_annexes(
        &self,
        owner_id: Uuid,
        resume_id: Uuid,
        requested: Vec<AnnexeRef>,
    ) -> Result<Resume, AppError> {
        let mut resume = self
            .resumes
            .find_owned(owner_id, resume_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

        if !requested.is_empty() {
            let distinct: HashSet<Uuid> = requested.iter().map(|r| r.annexe_id).collect();
            let ids: Vec<Uuid> = distinct.into_iter().collect();
            let owned = self.annexes.find_owned_in(owner_id, &ids).await?;
            if owned.len() != ids.len() {
                warn!(
                    "Owner {owner_id} referenced {} annexes on resume {resume_id} but owns only {}",
                    ids.len(),
                    owned.len()
                );
                return Err(AppError::Forbidden(
                    "One or more annexes do not belong to you".to_string(),
                ));
            }
        }

        if requested.len() > MAX_ANNEXES_PER_RESUME {
            return Err(AppError::InvalidArgument(format!(
                "A resume can have at most {MAX_ANNEXES_PER_RESUME} annexes, got {}",
                requested.len()
            )));
        }

        resume.annexes = requested;
        resume.updated_at = Utc::now();
        if !self.resumes.save(&resume).await? {
            return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
        }

        info!(
            "Assigned {} annexes to resume {resume_id}",
            resume.annexes.len()
        );
        Ok(resume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annexe::Annexe;
    use crate::store::memory::{MemoryAnnexeStore, MemoryResumeStore};

    struct Fixture {
        service: AnnexeAssignmentService,
        resumes: Arc<MemoryResumeStore>,
        annexes: Arc<MemoryAnnexeStore>,
    }

    fn fixture() -> Fixture {
        let resumes = Arc::new(MemoryResumeStore::default());
        let annexes = Arc::new(MemoryAnnexeStore::default());
        Fixture {
            service: AnnexeAssignmentService::new(resumes.clone(), annexes.clone()),
            resumes,
            annexes,
        }
    }

    async fn stored_annexe(store: &MemoryAnnexeStore, owner_id: Uuid) -> Uuid {
        let now = Utc::now();
        let annexe = Annexe {
            id: Uuid::new_v4(),
            owner_id,
            title: "Certificate".to_string(),
            file_url: "https://cdn.test/annexes/cert.pdf".to_string(),
            file_id: "annexes/cert.pdf".to_string(),
            file_name: "cert.pdf".to_string(),
            file_size: 2048,
            page_count: 1,
            created_at: now,
            updated_at: now,
        };
        store.insert(&annexe).await.unwrap();
        annexe.id
    }

    async fn stored_resume(store: &MemoryResumeStore, owner_id: Uuid) -> Resume {
        let resume = Resume::new(owner_id, "CV".to_string());
        store.insert(&resume).await.unwrap();
        resume
    }

    #[tokio::test]
    async fn test_assigns_in_caller_order_with_duplicate_orders() {
        let f = fixture();
        let owner = Uuid::new_v4();
        let resume = stored_resume(&f.resumes, owner).await;
        let a = stored_annexe(&f.annexes, owner).await;
        let b = stored_annexe(&f.annexes, owner).await;

        let requested = vec![
            AnnexeRef {
                annexe_id: b,
                order: 3,
            },
            AnnexeRef {
                annexe_id: a,
                order: 3,
            },
        ];
        let updated = f
            .service
            .assign_annexes(owner, resume.id, requested.clone())
            .await
            .unwrap();

        assert_eq!(updated.annexes, requested);
        assert_eq!(f.resumes.get(resume.id).unwrap().annexes, requested);
    }

    #[tokio::test]
    async fn test_same_annexe_twice_counts_once() {
        let f = fixture();
        let owner = Uuid::new_v4();
        let resume = stored_resume(&f.resumes, owner).await;
        let a = stored_annexe(&f.annexes, owner).await;

        let requested = vec![
            AnnexeRef {
                annexe_id: a,
                order: 0,
            },
            AnnexeRef {
                annexe_id: a,
                order: 1,
            },
        ];
        let updated = f
            .service
            .assign_annexes(owner, resume.id, requested)
            .await
            .unwrap();
        assert_eq!(updated.annexes.len(), 2);
    }

    #[tokio::test]
    async fn test_sixteen_items_are_rejected() {
        let f = fixture();
        let owner = Uuid::new_v4();
        let resume = stored_resume(&f.resumes, owner).await;
        let a = stored_annexe(&f.annexes, owner).await;

        let requested: Vec<AnnexeRef> = (0..16)
            .map(|order| AnnexeRef {
                annexe_id: a,
                order,
            })
            .collect();
        let err = f
            .service
            .assign_annexes(owner, resume.id, requested)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert!(f.resumes.get(resume.id).unwrap().annexes.is_empty());
    }

    #[tokio::test]
    async fn test_fifteen_items_are_accepted() {
        let f = fixture();
        let owner = Uuid::new_v4();
        let resume = stored_resume(&f.resumes, owner).await;
        let a = stored_annexe(&f.annexes, owner).await;

        let requested: Vec<AnnexeRef> = (0..15)
            .map(|order| AnnexeRef {
                annexe_id: a,
                order,
            })
            .collect();
        let updated = f
            .service
            .assign_annexes(owner, resume.id, requested)
            .await
            .unwrap();
        assert_eq!(updated.annexes.len(), 15);
    }

    #[tokio::test]
    async fn test_foreign_annexe_is_forbidden_and_list_unchanged() {
        let f = fixture();
        let owner = Uuid::new_v4();
        let resume = stored_resume(&f.resumes, owner).await;
        let mine = stored_annexe(&f.annexes, owner).await;
        let theirs = stored_annexe(&f.annexes, Uuid::new_v4()).await;

        let initial = vec![AnnexeRef {
            annexe_id: mine,
            order: 0,
        }];
        f.service
            .assign_annexes(owner, resume.id, initial.clone())
            .await
            .unwrap();

        let err = f
            .service
            .assign_annexes(
                owner,
                resume.id,
                vec![
                    AnnexeRef {
                        annexe_id: mine,
                        order: 0,
                    },
                    AnnexeRef {
                        annexe_id: theirs,
                        order: 1,
                    },
                ],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(f.resumes.get(resume.id).unwrap().annexes, initial);
    }

    #[tokio::test]
    async fn test_ownership_is_checked_before_length() {
        let f = fixture();
        let owner = Uuid::new_v4();
        let resume = stored_resume(&f.resumes, owner).await;

        let requested: Vec<AnnexeRef> = (0..16)
            .map(|order| AnnexeRef {
                annexe_id: Uuid::new_v4(),
                order,
            })
            .collect();
        let err = f
            .service
            .assign_annexes(owner, resume.id, requested)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_foreign_resume_is_not_found() {
        let f = fixture();
        let resume = stored_resume(&f.resumes, Uuid::new_v4()).await;

        let err = f
            .service
            .assign_annexes(Uuid::new_v4(), resume.id, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_list_clears_assignments() {
        let f = fixture();
        let owner = Uuid::new_v4();
        let resume = stored_resume(&f.resumes, owner).await;
        let a = stored_annexe(&f.annexes, owner).await;
        f.service
            .assign_annexes(
                owner,
                resume.id,
                vec![AnnexeRef {
                    annexe_id: a,
                    order: 0,
                }],
            )
            .await
            .unwrap();

        let cleared = f
            .service
            .assign_annexes(owner, resume.id, Vec::new())
            .await
            .unwrap();
        assert!(cleared.annexes.is_empty());
    }
}
