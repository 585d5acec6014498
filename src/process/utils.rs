/// Clean a header name or string value: surrounding whitespace goes first,
/// then a single enclosing quote pair.
pub fn clean_str(raw: &str) -> &str {
    strip_quotes(raw.trim())
}

/// Drop the enclosing `"` pair of an already trimmed token. Needs two quote
/// characters, so `"half` and a lone `"` come back as they went in.
pub fn strip_quotes(trimmed: &str) -> &str {
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}
