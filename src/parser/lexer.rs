/// Line-oriented pre-scan of Vala source text.
///
/// The scope builder never sees raw source.  This module turns it into a
/// list of [`LogicalLine`]s in three steps:
///
/// 1. Comments are removed, string / verbatim-string / character literals
///    are collapsed to `""` / `''`, and preprocessor lines (`#if`, `#endif`)
///    are emptied, so braces, parentheses and semicolons left in the text
///    are all structural.
/// 2. Every `/** ... */` comment is attached to the first physical line
///    that carries code after it.
/// 3. Physical lines whose parentheses are left open (a parameter list
///    wrapped over several lines) are joined into one logical line.
///
/// Each logical line remembers which physical line every byte of its text
/// came from so that braces and declarations keep their exact line
/// numbers.
use std::ops::Range;

use memchr::memchr_iter;

/// How many physical lines a single wrapped header may span.
const MAX_JOINED_LINES: usize = 8;

/// A physical line after comment and literal stripping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CleanLine {
    pub text: String,
    /// Raw text of a `/** ... */` comment that precedes the first code on
    /// this line.
    pub doc: Option<String>,
}

/// One or more physical lines treated as a single unit of code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogicalLine {
    /// First physical line (zero-based).
    pub start: u32,
    /// Last physical line (inclusive).
    pub end: u32,
    pub text: String,
    /// `(byte offset into text, physical line)` for each joined line.
    line_starts: Vec<(usize, u32)>,
    pub doc: Option<String>,
}

impl LogicalLine {
    /// The physical line that produced the byte at `offset`.
    pub fn line_at(&self, offset: usize) -> u32 {
        self.line_starts
            .iter()
            .take_while(|(start, _)| *start <= offset)
            .last()
            .map(|(_, line)| *line)
            .unwrap_or(self.start)
    }
}

/// Number of lines in `source`; a trailing newline opens one more (empty)
/// line, matching what an editor shows.
pub(crate) fn line_count(source: &str) -> u32 {
    memchr_iter(b'\n', source.as_bytes()).count() as u32 + 1
}

/// Split `source` into logical lines, dropping lines that carry no code.
pub(crate) fn logical_lines(source: &str) -> Vec<LogicalLine> {
    join_lines(strip(source))
}

// ─── Stripping ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment { doc: bool },
    Str,
    Verbatim,
    Char,
}

/// Remove comments and literal contents, one [`CleanLine`] per physical
/// line.
pub(crate) fn strip(source: &str) -> Vec<CleanLine> {
    scan(source).0
}

/// Whether the end of `source` lies inside a comment, a string or
/// character literal, or a preprocessor line.
///
/// Called with the text up to a cursor to tell whether the cursor sits in
/// code.
pub(crate) fn ends_outside_code(source: &str) -> bool {
    scan(source).1 != State::Code
}

fn scan(source: &str) -> (Vec<CleanLine>, State) {
    let mut lines = Vec::new();
    let mut current = CleanLine::default();
    let mut state = State::Code;
    let mut doc_buf = String::new();
    let mut pending_doc: Option<String> = None;
    let mut at_line_start = true;

    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c == '\n' {
            if let State::BlockComment { doc: true } = state {
                doc_buf.push('\n');
            }
            if state == State::LineComment {
                state = State::Code;
            }
            // An unterminated ordinary string ends with its line.
            if matches!(state, State::Str | State::Char) {
                state = State::Code;
            }
            lines.push(std::mem::take(&mut current));
            at_line_start = true;
            i += 1;
            continue;
        }

        match state {
            State::Code => {
                if c == '/' && next == Some('/') {
                    state = State::LineComment;
                    i += 2;
                    continue;
                }
                if c == '/' && next == Some('*') {
                    let is_doc = chars.get(i + 2) == Some(&'*') && chars.get(i + 3) != Some(&'/');
                    state = State::BlockComment { doc: is_doc };
                    if is_doc {
                        doc_buf.clear();
                        doc_buf.push_str("/**");
                        i += 3;
                    } else {
                        i += 2;
                    }
                    current.text.push(' ');
                    continue;
                }
                if c == '#' && at_line_start {
                    state = State::LineComment;
                    i += 1;
                    continue;
                }
                if c == '"' {
                    current.text.push_str("\"\"");
                    if next == Some('"') && chars.get(i + 2) == Some(&'"') {
                        state = State::Verbatim;
                        i += 3;
                    } else {
                        state = State::Str;
                        i += 1;
                    }
                    at_line_start = false;
                    continue;
                }
                if c == '\'' {
                    current.text.push_str("''");
                    state = State::Char;
                    at_line_start = false;
                    i += 1;
                    continue;
                }
                if !c.is_whitespace() {
                    at_line_start = false;
                    if let Some(doc) = pending_doc.take() {
                        current.doc.get_or_insert(doc);
                    }
                }
                current.text.push(c);
                i += 1;
            }
            State::LineComment => i += 1,
            State::BlockComment { doc } => {
                if c == '*' && next == Some('/') {
                    if doc {
                        doc_buf.push_str("*/");
                        pending_doc = Some(std::mem::take(&mut doc_buf));
                    }
                    state = State::Code;
                    i += 2;
                } else {
                    if doc {
                        doc_buf.push(c);
                    }
                    i += 1;
                }
            }
            State::Str => {
                if c == '\\' && next != Some('\n') {
                    i += 2;
                } else {
                    if c == '"' {
                        state = State::Code;
                    }
                    i += 1;
                }
            }
            State::Verbatim => {
                if c == '"' && next == Some('"') && chars.get(i + 2) == Some(&'"') {
                    state = State::Code;
                    i += 3;
                } else {
                    i += 1;
                }
            }
            State::Char => {
                if c == '\\' && next != Some('\n') {
                    i += 2;
                } else {
                    if c == '\'' {
                        state = State::Code;
                    }
                    i += 1;
                }
            }
        }
    }
    lines.push(current);
    (lines, state)
}

// ─── Joining ────────────────────────────────────────────────────────────────

/// Net parenthesis depth change across `text`.
fn paren_balance(text: &str) -> i32 {
    text.chars().fold(0, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}

fn has_brace(text: &str) -> bool {
    text.contains(['{', '}'])
}

fn join_lines(lines: Vec<CleanLine>) -> Vec<LogicalLine> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let first = &lines[i];
        if first.text.trim().is_empty() {
            i += 1;
            continue;
        }

        let mut logical = LogicalLine {
            start: i as u32,
            end: i as u32,
            text: first.text.clone(),
            line_starts: vec![(0, i as u32)],
            doc: first.doc.clone(),
        };

        let mut depth = paren_balance(&first.text);
        let mut joined = 1;
        if !has_brace(&first.text) {
            while depth > 0 && joined < MAX_JOINED_LINES && i + joined < lines.len() {
                let next = &lines[i + joined];
                logical.text.push(' ');
                logical
                    .line_starts
                    .push((logical.text.len(), (i + joined) as u32));
                logical.text.push_str(&next.text);
                logical.end = (i + joined) as u32;
                if logical.doc.is_none() {
                    logical.doc = next.doc.clone();
                }
                depth += paren_balance(&next.text);
                joined += 1;
                if has_brace(&next.text) {
                    break;
                }
            }
        }

        out.push(logical);
        i += joined;
    }
    out
}

// ─── Splitting helpers ──────────────────────────────────────────────────────

/// Split `text` on `sep` at nesting depth zero.
///
/// Parentheses and brackets always nest; angle brackets nest only when
/// `angles` is set (generic argument lists in parameter and declarator
/// lists).  Returns `(piece, terminated)` pairs: every piece but the last
/// is terminated by `sep`; the last piece is terminated only if `text`
/// ends with `sep`, in which case an empty trailing piece is not returned.
pub(crate) fn split_top_level(text: &str, sep: char, angles: bool) -> Vec<(&str, bool)> {
    split_top_level_ranges(text, sep, angles)
        .into_iter()
        .map(|(range, terminated)| (&text[range], terminated))
        .collect()
}

/// Byte-range form of [`split_top_level`].
pub(crate) fn split_top_level_ranges(
    text: &str,
    sep: char,
    angles: bool,
) -> Vec<(Range<usize>, bool)> {
    let mut pieces = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            '<' if angles => depth += 1,
            '>' if angles => depth -= 1,
            _ if c == sep && depth <= 0 => {
                pieces.push((start..idx, true));
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    if !text[start..].trim().is_empty() {
        pieces.push((start..text.len(), false));
    }
    pieces
}

/// The text between the first `(` at or after `open` and its matching `)`.
/// An unclosed list runs to the end of `text`.
pub(crate) fn balanced_parens(text: &str, open: usize) -> Option<&str> {
    let start = open + text[open..].find('(')?;
    let mut depth = 0;
    for (idx, c) in text[start..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start + 1..start + idx]);
                }
            }
            _ => {}
        }
    }
    Some(&text[start + 1..])
}
