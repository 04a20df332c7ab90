//! File storage provider seam. Holds binaries; the database only keeps metadata.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;

#[cfg(test)]
pub mod memory;
pub mod s3;

pub use s3::S3FileStorage;

/// Image transformation requested from the image CDN sitting in front of storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTransform {
    pub width: u32,
    pub height: u32,
    /// Crop around the detected face, zoomed out to 75%.
    pub focus_face: bool,
    pub remove_background: bool,
}

impl ImageTransform {
    pub fn profile_picture(remove_background: bool) -> Self {
        ImageTransform {
            width: 300,
            height: 300,
            focus_face: true,
            remove_background,
        }
    }

    pub fn signature(remove_background: bool) -> Self {
        ImageTransform {
            width: 400,
            height: 200,
            focus_face: false,
            remove_background,
        }
    }

    /// Comma-separated transformation string, e.g. `w-300,h-300,fo-face,z-0.75`.
    pub fn to_spec(&self) -> String {
        let mut parts = vec![format!("w-{}", self.width), format!("h-{}", self.height)];
        if self.focus_face {
            parts.push("fo-face".to_string());
            parts.push("z-0.75".to_string());
        }
        if self.remove_background {
            parts.push("e-bgremove".to_string());
        }
        parts.join(",")
    }
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub folder: &'static str,
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
    pub transform: Option<ImageTransform>,
}

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub url: String,
    /// Opaque id, passed back to `delete`.
    pub file_id: String,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<StoredFile, AppError>;

    async fn delete(&self, file_id: &str) -> Result<(), AppError>;
}

/// Keeps object keys to a safe character set while preserving the extension.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_transform_spec() {
        assert_eq!(
            ImageTransform::profile_picture(false).to_spec(),
            "w-300,h-300,fo-face,z-0.75"
        );
        assert_eq!(
            ImageTransform::profile_picture(true).to_spec(),
            "w-300,h-300,fo-face,z-0.75,e-bgremove"
        );
    }

    #[test]
    fn test_signature_transform_spec() {
        assert_eq!(ImageTransform::signature(false).to_spec(), "w-400,h-200");
        assert_eq!(
            ImageTransform::signature(true).to_spec(),
            "w-400,h-200,e-bgremove"
        );
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("My CV (final).pdf"), "My_CV__final_.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name(""), "file");
    }
}
