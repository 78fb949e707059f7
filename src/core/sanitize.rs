/// Trim surrounding whitespace and strip control characters from
/// user-supplied text before it reaches storage.
pub fn clean(value: &str) -> String {
    value.trim().chars().filter(|c| !c.is_control()).collect()
}

/// Reduce a value to a slug: lowercase alphanumerics separated by single
/// hyphens. Used for tax class identifiers and the class filter.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;

    for c in value.trim().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Escape LIKE metacharacters so a search term matches literally inside
/// a `LIKE '%…%'` pattern.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
