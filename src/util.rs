/// Utility functions for the Valhalla server.
///
/// This module contains helpers for cursor/line extraction, prefix
/// extraction, type-name shortening, and file-extension checks shared by
/// the server front-end and the completion engine.
use std::path::Path;

use tower_lsp::lsp_types::Position;

use crate::Backend;

impl Backend {
    /// Text of the cursor's line from column 0 up to the cursor.
    ///
    /// LSP columns are counted in UTF-16 code units; Vala sources are
    /// overwhelmingly ASCII so characters are treated as single units,
    /// which is exact for the BMP.
    pub(crate) fn line_before_cursor(content: &str, position: Position) -> Option<String> {
        let line = content.lines().nth(position.line as usize).or_else(|| {
            // A cursor on the empty final line after a trailing newline.
            let line_count = content.lines().count();
            (position.line as usize == line_count).then_some("")
        })?;
        let byte_col = line
            .char_indices()
            .nth(position.character as usize)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len());
        Some(line[..byte_col].to_string())
    }

    /// Every line of `content` above `row`, followed by `line_before`.
    pub(crate) fn text_before_cursor(content: &str, row: u32, line_before: &str) -> String {
        let mut text = String::new();
        for line in content.lines().take(row as usize) {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(line_before);
        text
    }

    /// Public helper for tests: the parsed usings of a unit, if present.
    pub fn usings_for_unit(&self, unit_id: &str) -> Option<Vec<String>> {
        self.registry
            .read()
            .unit(unit_id)
            .map(|unit| unit.usings.clone())
    }
}

/// Whether `c` can be part of a Vala identifier.
pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// The run of identifier characters immediately before the end of `line`.
///
/// `"  foo.ba"` gives `"ba"`, `"foo."` gives `""`, and `"new Po"` gives
/// `"Po"`.
pub fn extract_prefix(line: &str) -> &str {
    let start = line
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_ident_char(*c))
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(line.len());
    &line[start..]
}

/// The last dotted component of a (possibly qualified) name.
pub fn short_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name).trim()
}

/// The extension of `path` without the leading dot, if any.
pub(crate) fn path_extension(path: &str) -> Option<&str> {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    Path::new(file).extension().and_then(|ext| ext.to_str())
}

/// Whether the line contains `needle` as a whole word.
pub(crate) fn contains_word(line: &str, needle: &str) -> bool {
    line.match_indices(needle).any(|(idx, _)| {
        let before = line[..idx].chars().next_back();
        let after = line[idx + needle.len()..].chars().next();
        !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
    })
}
