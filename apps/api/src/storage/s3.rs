use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::storage::{sanitize_file_name, FileStorage, StoredFile, UploadRequest};

/// S3 / MinIO backed storage. Objects are served from `public_url`, typically through an
/// image CDN that honours the `transform` metadata.
#[derive(Clone)]
pub struct S3FileStorage {
    client: S3Client,
    bucket: String,
    public_url: String,
}

impl S3FileStorage {
    pub fn new(client: S3Client, bucket: String, public_url: String) -> Self {
        Self {
            client,
            bucket,
            public_url,
        }
    }

    fn object_key(folder: &str, file_name: &str) -> String {
        format!("{}/{}-{}", folder, Uuid::new_v4(), sanitize_file_name(file_name))
    }
}

#[async_trait]
impl FileStorage for S3FileStorage {
    async fn upload(&self, request: UploadRequest) -> Result<StoredFile, AppError> {
        let key = Self::object_key(request.folder, &request.file_name);
        let size = request.data.len();

        let mut put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(request.data))
            .content_type(request.content_type);
        if let Some(transform) = request.transform {
            put = put.metadata("transform", transform.to_spec());
        }
        put.send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);

        Ok(StoredFile {
            url: format!("{}/{}", self.public_url, key),
            file_id: key,
        })
    }

    async fn delete(&self, file_id: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(file_id)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;

        info!("Deleted s3://{}/{}", self.bucket, file_id);
        Ok(())
    }
}
