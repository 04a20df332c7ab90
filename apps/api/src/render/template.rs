//! The single resume template: maps a `Resume` onto page-flow blocks.
//!
//! Section order is fixed. A section is only laid out when it has content, so an empty
//! section contributes no height at all.

use crate::layout::page_flow::line_height;
use crate::layout::{Align, Font, Page, PageConfig, PageFlow, Rgb, Span};
use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry, Resume};

const NAME_SIZE: f32 = 28.0;
const PROFESSION_SIZE: f32 = 14.0;
const HEADING_SIZE: f32 = 14.0;
const TITLE_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

const HEADER_RULE_PT: f32 = 2.0;
const SECTION_RULE_PT: f32 = 1.0;

pub const SUMMARY_HEADING: &str = "PROFESSIONAL SUMMARY";
pub const EXPERIENCE_HEADING: &str = "EXPERIENCE";
pub const EDUCATION_HEADING: &str = "EDUCATION";
pub const PROJECTS_HEADING: &str = "PROJECTS";
pub const SKILLS_HEADING: &str = "SKILLS";

/// Lays out the whole resume and returns the finished pages.
pub fn layout_resume(resume: &Resume, accent: Rgb, config: PageConfig) -> Vec<Page> {
    let mut flow = PageFlow::new(config);

    header(&mut flow, &resume.personal_info, accent);

    if let Some(summary) = non_empty(&resume.professional_summary) {
        section_heading(&mut flow, SUMMARY_HEADING, accent);
        flow.paragraph(summary, Font::Regular, BODY_SIZE, Rgb::BODY, Align::Justify);
        end_section(&mut flow);
    }

    if !resume.experience.is_empty() {
        section_heading(&mut flow, EXPERIENCE_HEADING, accent);
        entries(&mut flow, &resume.experience, experience_entry);
        end_section(&mut flow);
    }

    if !resume.education.is_empty() {
        section_heading(&mut flow, EDUCATION_HEADING, accent);
        entries(&mut flow, &resume.education, education_entry);
        end_section(&mut flow);
    }

    if !resume.project.is_empty() {
        section_heading(&mut flow, PROJECTS_HEADING, accent);
        entries(&mut flow, &resume.project, project_entry);
        end_section(&mut flow);
    }

    if !resume.skills.is_empty() {
        section_heading(&mut flow, SKILLS_HEADING, accent);
        flow.paragraph(
            &resume.skills.join(" • "),
            Font::Regular,
            BODY_SIZE,
            Rgb::BODY,
            Align::Left,
        );
    }

    flow.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn header(flow: &mut PageFlow, info: &PersonalInfo, accent: Rgb) {
    flow.line(&[Span::new(text(&info.full_name), Font::Regular, NAME_SIZE, accent)]);
    let mut last_size = NAME_SIZE;
    flow.move_down(0.3 * line_height(last_size));

    if let Some(profession) = non_empty(&info.profession) {
        flow.paragraph(profession, Font::Regular, PROFESSION_SIZE, Rgb::MUTED, Align::Left);
        last_size = PROFESSION_SIZE;
        flow.move_down(0.3 * line_height(last_size));
    }

    if let Some(contact) = contact_line(info) {
        flow.paragraph(&contact, Font::Regular, BODY_SIZE, Rgb::MUTED, Align::Left);
        last_size = BODY_SIZE;
    }

    flow.move_down(0.5 * line_height(last_size));
    flow.rule(HEADER_RULE_PT, accent);
    flow.move_down(line_height(last_size));
}

/// Email, phone and location joined with `" | "`; `None` when all are missing.
pub fn contact_line(info: &PersonalInfo) -> Option<String> {
    let parts: Vec<&str> = [&info.email, &info.phone, &info.location]
        .into_iter()
        .filter_map(non_empty)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

fn section_heading(flow: &mut PageFlow, title: &str, accent: Rgb) {
    // Keep the heading on the same page as the first line of its section.
    let gap = 0.5 * line_height(HEADING_SIZE);
    flow.reserve(line_height(HEADING_SIZE) + gap + line_height(TITLE_SIZE));

    flow.line(&[Span::new(title, Font::Bold, HEADING_SIZE, accent)]);
    flow.rule(SECTION_RULE_PT, accent);
    flow.move_down(gap);
}

fn end_section(flow: &mut PageFlow) {
    flow.move_down(line_height(BODY_SIZE));
}

fn entries<T>(flow: &mut PageFlow, items: &[T], draw: fn(&mut PageFlow, &T)) {
    for (index, item) in items.iter().enumerate() {
        draw(flow, item);
        if index + 1 < items.len() {
            flow.move_down(0.5 * line_height(BODY_SIZE));
        }
    }
}

fn experience_entry(flow: &mut PageFlow, exp: &ExperienceEntry) {
    let end = non_empty(&exp.end_date).unwrap_or("Present");
    title_line(
        flow,
        text(&exp.position),
        &format!("  |  {} - {}", text(&exp.start_date), end),
    );
    flow.paragraph(text(&exp.company), Font::Regular, BODY_SIZE, Rgb::MUTED, Align::Left);
    if let Some(description) = non_empty(&exp.description) {
        flow.paragraph(description, Font::Regular, BODY_SIZE, Rgb::BODY, Align::Justify);
    }
}

fn education_entry(flow: &mut PageFlow, edu: &EducationEntry) {
    title_line(
        flow,
        &education_title(edu),
        &format!("  |  {}", text(&edu.graduation_date)),
    );
    flow.paragraph(text(&edu.institution), Font::Regular, BODY_SIZE, Rgb::MUTED, Align::Left);
    if let Some(gpa) = non_empty(&edu.gpa) {
        flow.paragraph(&format!("GPA: {gpa}"), Font::Regular, BODY_SIZE, Rgb::BODY, Align::Left);
    }
}

/// `"{degree} in {field}"`, or `"{degree} "` when the field is missing.
pub fn education_title(edu: &EducationEntry) -> String {
    let field = non_empty(&edu.field)
        .map(|f| format!("in {f}"))
        .unwrap_or_default();
    format!("{} {}", text(&edu.degree), field)
}

fn project_entry(flow: &mut PageFlow, project: &ProjectEntry) {
    title_line(
        flow,
        text(&project.name),
        &format!("  |  {}", text(&project.project_type)),
    );
    if let Some(description) = non_empty(&project.description) {
        flow.paragraph(description, Font::Regular, BODY_SIZE, Rgb::BODY, Align::Justify);
    }
}

/// Primary text at title size followed by a muted suffix on the same line.
fn title_line(flow: &mut PageFlow, primary: &str, suffix: &str) {
    flow.line(&[
        Span::new(primary, Font::Regular, TITLE_SIZE, Rgb::BODY),
        Span::new(suffix, Font::Regular, BODY_SIZE, Rgb::MUTED),
    ]);
}

// ────────────────────────────────────────────────────────────────────────────
// Text helpers
// ────────────────────────────────────────────────────────────────────────────

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
