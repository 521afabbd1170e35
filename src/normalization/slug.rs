/// URL-safe identifier derived from a title or file stem.
///
/// Lower-cases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, and strips leading/trailing hyphens. `slugify(slugify(x)) ==
/// slugify(x)` for every input.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut pending_sep = false;
    for c in lower.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}
