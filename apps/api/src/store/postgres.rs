use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annexe::Annexe;
use crate::models::resume::{Resume, ResumeRow};
use crate::store::{AnnexeStore, ResumeStore};

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// The unique index on `slug` is the last line of defence against concurrent slug races.
fn map_write_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::InvalidArgument("Slug is already in use".to_string())
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, title, slug, public, personal_info, professional_summary,
                 experience, education, project, skills, signature, annexes,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(resume.id)
        .bind(resume.owner_id)
        .bind(&resume.title)
        .bind(&resume.slug)
        .bind(resume.public)
        .bind(Json(&resume.personal_info))
        .bind(&resume.professional_summary)
        .bind(Json(&resume.experience))
        .bind(Json(&resume.education))
        .bind(Json(&resume.project))
        .bind(&resume.skills)
        .bind(Json(&resume.signature))
        .bind(Json(&resume.annexes))
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn find_owned(
        &self,
        owner_id: Uuid,
        resume_id: Uuid,
    ) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE id = $1 AND user_id = $2",
        )
        .bind(resume_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Resume::from))
    }

    async fn find_public(&self, resume_id: Uuid) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE id = $1 AND public = TRUE",
        )
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Resume::from))
    }

    async fn find_public_by_slug(&self, slug: &str) -> Result<Option<Resume>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE slug = $1 AND public = TRUE",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Resume::from))
    }

    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn save(&self, resume: &Resume) -> Result<bool, AppError> {
        // user_id is never written: ownership is fixed at creation.
        let result = sqlx::query(
            r#"
            UPDATE resumes SET
                title = $3, slug = $4, public = $5, personal_info = $6,
                professional_summary = $7, experience = $8, education = $9,
                project = $10, skills = $11, signature = $12, annexes = $13,
                updated_at = $14
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(resume.id)
        .bind(resume.owner_id)
        .bind(&resume.title)
        .bind(&resume.slug)
        .bind(resume.public)
        .bind(Json(&resume.personal_info))
        .bind(&resume.professional_summary)
        .bind(Json(&resume.experience))
        .bind(Json(&resume.education))
        .bind(Json(&resume.project))
        .bind(&resume.skills)
        .bind(Json(&resume.signature))
        .bind(Json(&resume.annexes))
        .bind(resume.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_owned(&self, owner_id: Uuid, resume_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(resume_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM resumes WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn slugs_with_prefix(
        &self,
        base: &str,
        exclude: Option<Uuid>,
    ) -> Result<HashSet<String>, AppError> {
        // Slugs only contain [a-z0-9-], so `base` carries no LIKE wildcards.
        let slugs: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT slug FROM resumes
            WHERE (slug = $1 OR slug LIKE $2)
              AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(base)
        .bind(format!("{base}-%"))
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;
        Ok(slugs.into_iter().collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Annexes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgAnnexeStore {
    pool: PgPool,
}

impl PgAnnexeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnexeStore for PgAnnexeStore {
    async fn insert(&self, annexe: &Annexe) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO annexes
                (id, user_id, title, file_url, file_id, file_name, file_size, page_count,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(annexe.id)
        .bind(annexe.owner_id)
        .bind(&annexe.title)
        .bind(&annexe.file_url)
        .bind(&annexe.file_id)
        .bind(&annexe.file_name)
        .bind(annexe.file_size)
        .bind(annexe.page_count)
        .bind(annexe.created_at)
        .bind(annexe.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_owned(
        &self,
        owner_id: Uuid,
        annexe_id: Uuid,
    ) -> Result<Option<Annexe>, AppError> {
        Ok(
            sqlx::query_as::<_, Annexe>("SELECT * FROM annexes WHERE id = $1 AND user_id = $2")
                .bind(annexe_id)
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Annexe>, AppError> {
        Ok(sqlx::query_as::<_, Annexe>(
            "SELECT * FROM annexes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_owned_in(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<Vec<Annexe>, AppError> {
        Ok(sqlx::query_as::<_, Annexe>(
            "SELECT * FROM annexes WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(owner_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_owned(&self, owner_id: Uuid, annexe_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM annexes WHERE id = $1 AND user_id = $2")
            .bind(annexe_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
