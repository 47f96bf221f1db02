use deunicode::deunicode;

/// Lowercase, ASCII-alphanumeric, dash-separated form of `input`.
///
/// Non-ASCII text is transliterated first (`Zürich` -> `zurich`). Runs of
/// any other characters collapse into a single dash; leading and trailing
/// dashes are trimmed. Returns an empty string when nothing alphanumeric
/// remains.
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Slug of a job posting: `<title>-at-<company>`.
pub fn job_slug(title: &str, company_name: &str) -> String {
    slugify(&format!("{title} at {company_name}"))
}

/// `base` with a short suffix derived from `id`, used when `base` is taken
/// or empty.
pub fn disambiguate(base: &str, id: uuid::Uuid) -> String {
    let suffix = &id.simple().to_string()[..8];
    if base.is_empty() {
        suffix.to_string()
    } else {
        format!("{base}-{suffix}")
    }
}
