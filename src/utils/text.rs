//! Text helpers for printing snippet results
//!
//! Object bodies, Lambda payloads and model replies can be arbitrarily large;
//! text output shows a bounded preview of them.

/// Truncate a string to at most `max_chars` characters, on a char boundary
pub fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Render raw bytes as (lossy) UTF-8, cut to `max_chars` with a marker
/// saying how many bytes were left out.
///
/// The count is of input bytes: each invalid sequence shows as one U+FFFD
/// but accounts for the bytes it replaced.
pub fn preview_bytes(bytes: &[u8], max_chars: usize) -> String {
    // (displayed char, input bytes it stands for)
    let mut units = bytes.utf8_chunks().flat_map(|chunk| {
        let invalid = chunk.invalid();
        let replacement =
            (!invalid.is_empty()).then_some((char::REPLACEMENT_CHARACTER, invalid.len()));
        chunk
            .valid()
            .chars()
            .map(|c| (c, c.len_utf8()))
            .chain(replacement)
    });

    let mut shown = String::new();
    let mut consumed = 0;
    for (c, len) in units.by_ref().take(max_chars) {
        shown.push(c);
        consumed += len;
    }

    if units.next().is_none() {
        shown
    } else {
        format!("{}... ({} more bytes)", shown, bytes.len() - consumed)
    }
}

/// Keep the first `visible` characters of an identifier and mask the rest
///
/// # Example
/// ```
/// use aws_sdk_snippets::utils::mask;
///
/// assert_eq!(mask("ASIAEXAMPLEKEY", 4), "ASIA**********");
/// ```
pub fn mask(s: &str, visible: usize) -> String {
    let head = truncate_str(s, visible);
    let rest = s[head.len()..].chars().count();
    format!("{}{}", head, "*".repeat(rest))
}
