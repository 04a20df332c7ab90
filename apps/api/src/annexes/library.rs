use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annexe::Annexe;
use crate::storage::{FileStorage, UploadRequest};
use crate::store::AnnexeStore;

pub const ANNEXE_FOLDER: &str = "annexes";
pub const MAX_ANNEXE_SIZE: usize = 10 * 1024 * 1024;
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A PDF file received from the client.
#[derive(Debug, Clone)]
pub struct AnnexeFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// The caller's library of uploaded supporting documents.
pub struct AnnexeLibrary {
    annexes: Arc<dyn AnnexeStore>,
    storage: Arc<dyn FileStorage>,
}

impl AnnexeLibrary {
    pub fn new(annexes: Arc<dyn AnnexeStore>, storage: Arc<dyn FileStorage>) -> Self {
        Self { annexes, storage }
    }

    pub async fn upload(
        &self,
        owner_id: Uuid,
        title: &str,
        file: AnnexeFile,
    ) -> Result<Annexe, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidArgument("Title is required".to_string()));
        }
        if file.content_type != PDF_CONTENT_TYPE {
            return Err(AppError::InvalidArgument(
                "Only PDF files are accepted".to_string(),
            ));
        }
        if file.data.is_empty() {
            return Err(AppError::InvalidArgument("File is empty".to_string()));
        }
        if file.data.len() > MAX_ANNEXE_SIZE {
            return Err(AppError::InvalidArgument(
                "File too large. Maximum size is 10MB".to_string(),
            ));
        }

        let page_count = page_count_blocking(file.data.clone()).await;
        let file_size = file.data.len() as i64;
        let stored = self
            .storage
            .upload(UploadRequest {
                folder: ANNEXE_FOLDER,
                file_name: file.file_name.clone(),
                content_type: file.content_type,
                data: file.data,
                transform: None,
            })
            .await?;

        let now = Utc::now();
        let annexe = Annexe {
            id: Uuid::new_v4(),
            owner_id,
            title: title.to_string(),
            file_url: stored.url,
            file_id: stored.file_id,
            file_name: file.file_name,
            file_size,
            page_count,
            created_at: now,
            updated_at: now,
        };
        self.annexes.insert(&annexe).await?;

        info!(
            "Stored annexe {} ({} pages, {} bytes) for owner {owner_id}",
            annexe.id, annexe.page_count, annexe.file_size
        );
        Ok(annexe)
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Annexe>, AppError> {
        self.annexes.list_owned(owner_id).await
    }

    pub async fn get(&self, owner_id: Uuid, annexe_id: Uuid) -> Result<Annexe, AppError> {
        self.annexes
            .find_owned(owner_id, annexe_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Annexe {annexe_id} not found")))
    }

    /// Removes the stored file, then the record. A storage failure does not keep the
    /// record alive. Resumes still referencing the annexe are left as they are.
    pub async fn delete(&self, owner_id: Uuid, annexe_id: Uuid) -> Result<(), AppError> {
        let annexe = self.get(owner_id, annexe_id).await?;

        if let Err(e) = self.storage.delete(&annexe.file_id).await {
            warn!("Failed to delete stored file {} for annexe {annexe_id}: {e}", annexe.file_id);
        }

        if !self.annexes.delete_owned(owner_id, annexe_id).await? {
            return Err(AppError::NotFound(format!("Annexe {annexe_id} not found")));
        }
        info!("Deleted annexe {annexe_id}");
        Ok(())
    }
}

/// Parses the document on the blocking pool. A panicked or cancelled parse counts as
/// one page, like an unreadable document.
async fn page_count_blocking(data: Bytes) -> i32 {
    tokio::task::spawn_blocking(move || count_pages(&data))
        .await
        .unwrap_or_else(|e| {
            warn!("PDF page count task failed, assuming 1: {e}");
            1
        })
}

/// Number of pages in a PDF. Unreadable documents count as one page.
fn count_pages(data: &[u8]) -> i32 {
    match lopdf::Document::load_mem(data) {
        Ok(doc) => doc.get_pages().len().max(1) as i32,
        Err(e) => {
            warn!("Could not read PDF page count, assuming 1: {e}");
            1
        }
    }
}
