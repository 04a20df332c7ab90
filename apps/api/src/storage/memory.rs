//! Recording storage fake used by service tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::storage::{FileStorage, ImageTransform, StoredFile, UploadRequest};

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub folder: &'static str,
    pub file_name: String,
    pub size: usize,
    pub transform: Option<ImageTransform>,
}

#[derive(Default)]
pub struct MemoryFileStorage {
    pub uploads: Mutex<Vec<RecordedUpload>>,
    pub deleted: Mutex<Vec<String>>,
    fail_deletes: AtomicBool,
}

impl MemoryFileStorage {
    pub fn failing_deletes() -> Self {
        let storage = Self::default();
        storage.fail_deletes.store(true, Ordering::SeqCst);
        storage
    }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    async fn upload(&self, request: UploadRequest) -> Result<StoredFile, AppError> {
        let mut uploads = self.uploads.lock().unwrap();
        let file_id = format!("{}/{}-{}", request.folder, uploads.len(), request.file_name);
        uploads.push(RecordedUpload {
            folder: request.folder,
            file_name: request.file_name,
            size: request.data.len(),
            transform: request.transform,
        });
        Ok(StoredFile {
            url: format!("https://cdn.test/{file_id}"),
            file_id,
        })
    }

    async fn delete(&self, file_id: &str) -> Result<(), AppError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Storage("storage offline".to_string()));
        }
        self.deleted.lock().unwrap().push(file_id.to_string());
        Ok(())
    }
}
