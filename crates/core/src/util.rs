/// First `max_chars` characters of `input` (not bytes).
pub(crate) fn truncate_to_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((cut_byte, _)) => &input[..cut_byte],
        None => input,
    }
}

pub(crate) fn exceeds_chars(input: &str, max_chars: usize) -> bool {
    input.chars().nth(max_chars).is_some()
}

pub(crate) fn hex_encode_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len().saturating_mul(2));
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Python-style `capitalize`: first character upper-cased, the rest lower-cased.
pub(crate) fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
