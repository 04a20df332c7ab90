//! Typed partial update of a resume.
//!
//! Every field is optional; `None` leaves the stored value alone. List sections are
//! replaced wholesale, personal info is merged field by field.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::{
    EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, Resume, Signature,
};
use crate::slug::is_valid_slug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonalInfoPatch {
    pub full_name: Option<String>,
    pub profession: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

impl PersonalInfoPatch {
    fn merge_into(self, info: &mut PersonalInfo) {
        merge_text(&mut info.full_name, self.full_name);
        merge_text(&mut info.profession, self.profession);
        merge_text(&mut info.email, self.email);
        merge_text(&mut info.phone, self.phone);
        merge_text(&mut info.location, self.location);
        merge_text(&mut info.image, self.image);
    }
}

/// Body of the `resume_data` part of an update request.
///
/// Unknown keys (`annexes`, `id`, timestamps, …) are ignored: annexes have their own
/// endpoint and identity fields are never client-writable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub public: Option<bool>,
    /// `Some("")` clears the slug.
    pub slug: Option<String>,
    pub personal_info: Option<PersonalInfoPatch>,
    pub professional_summary: Option<String>,
    pub experience: Option<Vec<ExperienceEntry>>,
    pub education: Option<Vec<EducationEntry>>,
    pub project: Option<Vec<ProjectEntry>>,
    pub skills: Option<Vec<String>>,
    pub signature: Option<Signature>,
}

impl ResumePatch {
    /// Checks everything that can be checked without the store. Slug uniqueness is
    /// the caller's job.
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(AppError::InvalidArgument("Title cannot be empty".to_string()));
            }
        }
        if let Some(slug) = self.requested_slug() {
            if !is_valid_slug(slug) {
                return Err(AppError::InvalidArgument(format!(
                    "'{slug}' is not a valid slug"
                )));
            }
        }
        Ok(())
    }

    /// The slug the patch wants to set, if any. Clearing is not a request.
    pub fn requested_slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }

    pub fn apply(self, resume: &mut Resume) {
        if let Some(title) = self.title {
            resume.title = title.trim().to_string();
        }
        if let Some(public) = self.public {
            resume.public = public;
        }
        if let Some(slug) = self.slug {
            resume.slug = if slug.is_empty() { None } else { Some(slug) };
        }
        if let Some(info) = self.personal_info {
            info.merge_into(&mut resume.personal_info);
        }
        merge_text(&mut resume.professional_summary, self.professional_summary);
        if let Some(experience) = self.experience {
            resume.experience = experience;
        }
        if let Some(education) = self.education {
            resume.education = education;
        }
        if let Some(project) = self.project {
            resume.project = project;
        }
        if let Some(skills) = self.skills {
            resume.skills = skills;
        }
        if let Some(signature) = self.signature {
            merge_text(&mut resume.signature.image, signature.image);
        }
    }
}

/// `None` keeps the current value, an empty string clears it.
fn merge_text(target: &mut Option<String>, incoming: Option<String>) {
    if let Some(value) = incoming {
        *target = if value.is_empty() { None } else { Some(value) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_resume() -> Resume {
        let mut resume = Resume::new(Uuid::new_v4(), "Backend CV".to_string());
        resume.personal_info.full_name = Some("Jane Doe".to_string());
        resume.personal_info.email = Some("jane@example.com".to_string());
        resume.professional_summary = Some("Engineer".to_string());
        resume.skills = vec!["Rust".to_string()];
        resume
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut resume = sample_resume();
        let before = resume.clone();
        ResumePatch::default().apply(&mut resume);
        assert_eq!(resume, before);
    }

    #[test]
    fn test_personal_info_merges_per_field() {
        let mut resume = sample_resume();
        let patch: ResumePatch =
            serde_json::from_str(r#"{"personal_info": {"phone": "+33 6 00 00 00 00"}}"#).unwrap();
        patch.apply(&mut resume);

        assert_eq!(resume.personal_info.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(resume.personal_info.email.as_deref(), Some("jane@example.com"));
        assert_eq!(
            resume.personal_info.phone.as_deref(),
            Some("+33 6 00 00 00 00")
        );
    }

    #[test]
    fn test_lists_are_replaced_and_empty_strings_clear() {
        let mut resume = sample_resume();
        let patch: ResumePatch = serde_json::from_str(
            r#"{
                "professional_summary": "",
                "skills": ["Go", "  ", " SQL "],
                "experience": [{"company": "Acme", "position": "Dev"}]
            }"#,
        )
        .unwrap();
        patch.apply(&mut resume);

        assert_eq!(resume.professional_summary, None);
        assert_eq!(
            resume.skills,
            vec!["Go".to_string(), "  ".to_string(), " SQL ".to_string()]
        );
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let patch: ResumePatch = serde_json::from_str(
            r#"{"title": "New", "annexes": [{"annexe_id": "x", "order": 1}], "id": "abc"}"#,
        )
        .unwrap();
        assert_eq!(patch.title.as_deref(), Some("New"));
    }

    #[test]
    fn test_validate_rejects_blank_title_and_bad_slug() {
        let blank = ResumePatch {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(blank.validate(), Err(AppError::InvalidArgument(_))));

        let bad_slug = ResumePatch {
            slug: Some("Not A Slug".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_slug.validate(),
            Err(AppError::InvalidArgument(_))
        ));

        let clearing = ResumePatch {
            slug: Some(String::new()),
            ..Default::default()
        };
        assert!(clearing.validate().is_ok());
        assert_eq!(clearing.requested_slug(), None);
    }

    #[test]
    fn test_empty_slug_clears() {
        let mut resume = sample_resume();
        resume.slug = Some("jane-doe".to_string());
        ResumePatch {
            slug: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut resume);
        assert_eq!(resume.slug, None);
    }
}
