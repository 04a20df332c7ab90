//! URL-safe slugs for publicly shared resumes.

use uuid::Uuid;

use crate::errors::AppError;
use crate::store::ResumeStore;

/// Base used when the source text contains no slug-able character at all.
const FALLBACK_SLUG: &str = "resume";

/// Lowercases, turns whitespace runs into hyphens, drops everything outside `[a-z0-9-]`,
/// collapses hyphen runs and trims hyphens from both ends.
pub fn generate_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;

    for c in lowered.trim().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        match c {
            '-' => pending_hyphen = true,
            'a'..='z' | '0'..='9' => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c);
            }
            _ => {}
        }
    }
    slug
}

/// Matches `^[a-z0-9]+(-[a-z0-9]+)*$`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// True iff no resume other than `exclude` carries `slug`.
pub async fn is_slug_unique(
    store: &dyn ResumeStore,
    slug: &str,
    exclude: Option<Uuid>,
) -> Result<bool, AppError> {
    Ok(!store.slug_exists(slug, exclude).await?)
}

/// Returns `base`, or the first free `base-1`, `base-2`, ….
///
/// All colliding slugs are fetched in one query, so at most `taken.len() + 1` candidates
/// are tried and the search always terminates.
pub async fn generate_unique_slug(
    store: &dyn ResumeStore,
    text: &str,
    exclude: Option<Uuid>,
) -> Result<String, AppError> {
    let mut base = generate_slug(text);
    if base.is_empty() {
        base = FALLBACK_SLUG.to_string();
    }

    let taken = store.slugs_with_prefix(&base, exclude).await?;
    if !taken.contains(&base) {
        return Ok(base);
    }

    (1..=taken.len() + 1)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("no free slug for '{base}'")))
}
