use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata of an uploaded supporting document. The bytes live in file storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Annexe {
    pub id: Uuid,
    #[sqlx(rename = "user_id")]
    pub owner_id: Uuid,
    pub title: String,
    pub file_url: String,
    /// Opaque storage id used to delete the stored object.
    pub file_id: String,
    pub file_name: String,
    pub file_size: i64,
    pub page_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
