//! In-memory stores used by service and handler tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annexe::Annexe;
use crate::models::resume::Resume;
use crate::store::{AnnexeStore, ResumeStore};

#[derive(Default)]
pub struct MemoryResumeStore {
    rows: Mutex<HashMap<Uuid, Resume>>,
}

impl MemoryResumeStore {
    pub fn get(&self, id: Uuid) -> Option<Resume> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn insert(&self, resume: &Resume) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(slug) = &resume.slug {
            if rows.values().any(|r| r.slug.as_ref() == Some(slug)) {
                return Err(AppError::InvalidArgument("Slug is already in use".into()));
            }
        }
        rows.insert(resume.id, resume.clone());
        Ok(())
    }

    async fn find_owned(
        &self,
        owner_id: Uuid,
        resume_id: Uuid,
    ) -> Result<Option<Resume>, AppError> {
        Ok(self.get(resume_id).filter(|r| r.owner_id == owner_id))
    }

    async fn find_public(&self, resume_id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self.get(resume_id).filter(|r| r.public))
    }

    async fn find_public_by_slug(&self, slug: &str) -> Result<Option<Resume>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|r| r.public && r.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let rows = self.rows.lock().unwrap();
        let mut owned: Vec<Resume> = rows
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn save(&self, resume: &Resume) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(slug) = &resume.slug {
            if rows
                .values()
                .any(|r| r.id != resume.id && r.slug.as_ref() == Some(slug))
            {
                return Err(AppError::InvalidArgument("Slug is already in use".into()));
            }
        }
        match rows.get_mut(&resume.id) {
            Some(existing) if existing.owner_id == resume.owner_id => {
                *existing = resume.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_owned(&self, owner_id: Uuid, resume_id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.get(&resume_id).map(|r| r.owner_id) == Some(owner_id) {
            rows.remove(&resume_id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .any(|r| Some(r.id) != exclude && r.slug.as_deref() == Some(slug)))
    }

    async fn slugs_with_prefix(
        &self,
        base: &str,
        exclude: Option<Uuid>,
    ) -> Result<HashSet<String>, AppError> {
        let prefix = format!("{base}-");
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .filter(|r| Some(r.id) != exclude)
            .filter_map(|r| r.slug.clone())
            .filter(|s| s == base || s.starts_with(&prefix))
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryAnnexeStore {
    rows: Mutex<HashMap<Uuid, Annexe>>,
}

impl MemoryAnnexeStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl AnnexeStore for MemoryAnnexeStore {
    async fn insert(&self, annexe: &Annexe) -> Result<(), AppError> {
        self.rows
            .lock()
            .unwrap()
            .insert(annexe.id, annexe.clone());
        Ok(())
    }

    async fn find_owned(
        &self,
        owner_id: Uuid,
        annexe_id: Uuid,
    ) -> Result<Option<Annexe>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .get(&annexe_id)
            .filter(|a| a.owner_id == owner_id)
            .cloned())
    }

    async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Annexe>, AppError> {
        let rows = self.rows.lock().unwrap();
        let mut owned: Vec<Annexe> = rows
            .values()
            .filter(|a| a.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_owned_in(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<Vec<Annexe>, AppError> {
        let wanted: HashSet<&Uuid> = ids.iter().collect();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .filter(|a| a.owner_id == owner_id && wanted.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn delete_owned(&self, owner_id: Uuid, annexe_id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.get(&annexe_id).map(|a| a.owner_id) == Some(owner_id) {
            rows.remove(&annexe_id);
            return Ok(true);
        }
        Ok(false)
    }
}
