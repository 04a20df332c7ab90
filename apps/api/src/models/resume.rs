use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::annexe::Annexe;

/// Maximum number of annexes that may be attached to a single resume.
pub const MAX_ANNEXES_PER_RESUME: usize = 15;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: Option<String>,
    pub profession: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    /// Public URL of the profile picture.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    /// `None` (or empty) means the position is current.
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signature {
    pub image: Option<String>,
}

/// One slot in a resume's ordered annexe list.
///
/// `order` is stored exactly as the client sent it; duplicates and gaps are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnexeRef {
    pub annexe_id: Uuid,
    pub order: i32,
}

/// The resume aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub slug: Option<String>,
    pub public: bool,
    pub personal_info: PersonalInfo,
    pub professional_summary: Option<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub project: Vec<ProjectEntry>,
    pub skills: Vec<String>,
    pub signature: Signature,
    pub annexes: Vec<AnnexeRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    /// A fresh, private resume with only a title set.
    pub fn new(owner_id: Uuid, title: String) -> Self {
        let now = Utc::now();
        Resume {
            id: Uuid::new_v4(),
            owner_id,
            title,
            slug: None,
            public: false,
            personal_info: PersonalInfo::default(),
            professional_summary: None,
            experience: Vec::new(),
            education: Vec::new(),
            project: Vec::new(),
            skills: Vec::new(),
            signature: Signature::default(),
            annexes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Deep copy with a new identity and fresh timestamps.
    ///
    /// `public` and `annexes` are carried over verbatim. The slug is dropped because
    /// slugs are unique across all resumes.
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Resume {
            id: Uuid::new_v4(),
            title: format!("Copy of {}", self.title),
            slug: None,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}

/// A resolved annexe slot. `annexe` is `None` when the referenced annexe was deleted.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedAnnexe {
    pub annexe_id: Uuid,
    pub order: i32,
    pub annexe: Option<Annexe>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeWithAnnexes {
    pub resume: Resume,
    /// Same length and order as `resume.annexes`.
    pub resolved_annexes: Vec<ResolvedAnnexe>,
}

// ────────────────────────────────────────────────────────────────────────────
// Database row
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: Option<String>,
    pub public: bool,
    pub personal_info: Json<PersonalInfo>,
    pub professional_summary: Option<String>,
    pub experience: Json<Vec<ExperienceEntry>>,
    pub education: Json<Vec<EducationEntry>>,
    pub project: Json<Vec<ProjectEntry>>,
    pub skills: Vec<String>,
    pub signature: Json<Signature>,
    pub annexes: Json<Vec<AnnexeRef>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for Resume {
    fn from(row: ResumeRow) -> Self {
        Resume {
            id: row.id,
            owner_id: row.user_id,
            title: row.title,
            slug: row.slug,
            public: row.public,
            personal_info: row.personal_info.0,
            professional_summary: row.professional_summary,
            experience: row.experience.0,
            education: row.education.0,
            project: row.project.0,
            skills: row.skills,
            signature: row.signature.0,
            annexes: row.annexes.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_resume_is_private_and_empty() {
        let resume = Resume::new(Uuid::new_v4(), "Backend".to_string());
        assert!(!resume.public);
        assert!(resume.slug.is_none());
        assert!(resume.experience.is_empty());
        assert!(resume.annexes.is_empty());
        assert_eq!(resume.personal_info, PersonalInfo::default());
    }

    #[test]
    fn test_duplicate_keeps_content_and_visibility() {
        let mut original = Resume::new(Uuid::new_v4(), "Backend".to_string());
        original.public = true;
        original.slug = Some("backend".to_string());
        original.skills = vec!["Rust".to_string()];
        original.annexes = vec![AnnexeRef {
            annexe_id: Uuid::new_v4(),
            order: 0,
        }];

        let copy = original.duplicate();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.owner_id, original.owner_id);
        assert_eq!(copy.title, "Copy of Backend");
        assert!(copy.public);
        assert!(copy.slug.is_none());
        assert_eq!(copy.skills, original.skills);
        assert_eq!(copy.annexes, original.annexes);
    }

    #[test]
    fn test_project_type_uses_type_key() {
        let json = serde_json::json!({ "name": "Lighthouse", "type": "Open source" });
        let project: ProjectEntry = serde_json::from_value(json).unwrap();
        assert_eq!(project.project_type.as_deref(), Some("Open source"));
        assert!(project.description.is_none());
    }

    #[test]
    fn test_entries_tolerate_missing_fields() {
        let entry: ExperienceEntry = serde_json::from_str("{}").unwrap();
        assert_eq!(entry, ExperienceEntry::default());
    }
}
