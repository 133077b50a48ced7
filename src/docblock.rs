//! Valadoc comment parsing.
//!
//! This module turns a raw `/** ... */` comment into the [`Documentation`]
//! attached to a declaration: the full cleaned text (`long`) and the first
//! sentence of its first paragraph (`short`), which is what completion
//! shows as a candidate's description.  Block tags (`@param`, `@return`,
//! `@throws`, `@since`, `@deprecated`, ...) end the description part of the
//! comment and never leak into `short`.

use crate::types::Documentation;

// ─── Public API ─────────────────────────────────────────────────────────────

/// Build the [`Documentation`] for a raw `/** ... */` comment.
///
/// Returns an empty `Documentation` when the comment holds no text.
pub fn parse_documentation(comment: &str) -> Documentation {
    let cleaned = clean_comment(comment);
    if cleaned.is_empty() {
        return Documentation::default();
    }

    let short = short_description(&cleaned);
    Documentation {
        short,
        long: Some(cleaned),
    }
}

/// Strip the comment delimiters and the leading `*` gutter of every line,
/// dropping leading and trailing blank lines.
pub fn clean_comment(comment: &str) -> String {
    let trimmed = comment.trim();
    let inner = trimmed
        .strip_prefix("/**")
        .or_else(|| trimmed.strip_prefix("/*"))
        .unwrap_or(trimmed);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);

    let lines: Vec<&str> = inner
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect();

    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// First sentence of the first paragraph, joined onto one line.
fn short_description(cleaned: &str) -> Option<String> {
    let paragraph: Vec<&str> = cleaned
        .lines()
        .take_while(|line| !line.is_empty() && !line.starts_with('@'))
        .collect();
    if paragraph.is_empty() {
        return None;
    }

    let joined = paragraph.join(" ");
    let sentence = match sentence_end(&joined) {
        Some(end) => &joined[..end],
        None => joined.as_str(),
    };
    let sentence = sentence.trim();
    (!sentence.is_empty()).then(|| sentence.to_string())
}

/// Byte offset just past the first `.` that is followed by whitespace or
/// the end of the text (so `GLib.List` and `1.5` do not end a sentence).
fn sentence_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().find_map(|(i, &b)| {
        let at_end = i + 1 == bytes.len();
        (b == b'.' && (at_end || bytes[i + 1].is_ascii_whitespace())).then_some(i + 1)
    })
}
