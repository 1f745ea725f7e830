// WHY: every offset in a detection result refers to this normalized form, so it is
// computed exactly once per call

/// Lowercase, collapse whitespace runs to a single space, trim both ends
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_text_into(text, &mut result);
    result
}

/// Normalize into a supplied buffer to avoid allocation in batch loops
pub fn normalize_text_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            // Leading whitespace never emits a space
            pending_space = !buffer.is_empty();
            continue;
        }
        if pending_space {
            buffer.push(' ');
            pending_space = false;
        }
        buffer.extend(ch.to_lowercase());
    }
}
