//! HTML fragment helpers shared by the head tag builders.

/// Separator between rendered head tags.
///
/// Tags are joined with a newline plus the indentation of a typical `<head>` block.
pub const TAG_SEPARATOR: &str = "\n    ";

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render `<meta name="..." content="...">`.
#[must_use]
pub fn meta_name(name: &str, content: &str) -> String {
    format!(
        r#"<meta name="{}" content="{}">"#,
        escape_html(name),
        escape_html(content)
    )
}

/// Render `<meta property="..." content="...">`.
#[must_use]
pub fn meta_property(property: &str, content: &str) -> String {
    format!(
        r#"<meta property="{}" content="{}">"#,
        escape_html(property),
        escape_html(content)
    )
}

/// Join rendered tags, skipping empty fragments.
#[must_use]
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(AsRef::as_ref)
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR)
}

/// Insert or replace a keyed pair, keeping the original position on replace.
pub(crate) fn upsert_pair(pairs: &mut Vec<(String, String)>, key: String, value: String) {
    match pairs.iter_mut().find(|(k, _)| *k == key) {
        Some((_, existing)) => *existing = value,
        None => pairs.push((key, value)),
    }
}
