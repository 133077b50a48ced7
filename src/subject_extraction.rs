//! Member-access subject extraction.
//!
//! When the text before the cursor ends with `.` or `.prefix`, the
//! expression to the left of the dot (the "subject") is found by scanning
//! backwards to the nearest expression boundary.  Balanced `(...)` and
//! `[...]` groups are skipped as a whole, so call arguments never end the
//! subject.
//!
//! | Text before cursor              | Subject             | Prefix |
//! |---------------------------------|---------------------|--------|
//! | `p.`                            | `p`                 |        |
//! | `    int n = p.origin.x`        | `p.origin`          | `x`    |
//! | `foo (bar.`                     | `bar`               |        |
//! | `return get_point ().`          | `get_point ()`      |        |
//! | `var s = new Foo ().`           | `Foo ()` (new)      |        |
//! | `list[0].na`                    | `list[0]`           | `na`   |
//!
//! Boundaries are assignment and arithmetic operators, `,`, `;`, braces,
//! an unmatched `(` or `[`, whitespace not followed by an argument list,
//! and the start of the line.

use crate::resolution::erase_call_arguments;
use crate::util::{extract_prefix, is_ident_char};

/// A `subject.prefix` access at the end of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAccess {
    /// The subject exactly as written (`get_point ()`, `p.origin`).
    pub subject: String,
    /// Identifier characters typed after the final dot.
    pub prefix: String,
    /// The subject is the operand of a `new` expression.
    pub is_new: bool,
}

impl MemberAccess {
    /// The subject's identifier chain with call arguments removed:
    /// `p.get_origin (1).x` gives `["p", "get_origin", "x"]`.
    pub fn segments(&self) -> Vec<String> {
        erase_call_arguments(&self.subject)
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The first segment, looked up as a local or type.
    pub fn root(&self) -> Option<String> {
        self.segments().into_iter().next()
    }

    /// Every segment after the first, joined with dots.
    pub fn path(&self) -> String {
        self.segments().get(1..).unwrap_or_default().join(".")
    }
}

/// Skip backwards past a balanced group ending just before `pos`.
///
/// `chars[pos - 1]` must be the closing delimiter.  Returns the index of
/// the matching opener, or `None` if the group is unbalanced.
fn skip_balanced_group_back(chars: &[char], pos: usize) -> Option<usize> {
    let close = *chars.get(pos.checked_sub(1)?)?;
    let open = match close {
        ')' => '(',
        ']' => '[',
        _ => return None,
    };
    let mut depth: u32 = 0;
    let mut j = pos;
    while j > 0 {
        j -= 1;
        if chars[j] == close {
            depth += 1;
        } else if chars[j] == open {
            depth -= 1;
            if depth == 0 {
                return Some(j);
            }
        }
    }
    None
}

/// Whether the word ending at `end` (exclusive) is `new`, preceded by a
/// non-identifier character or the start of the line.
fn is_new_keyword_before(chars: &[char], end: usize) -> bool {
    let mut j = end;
    while j > 0 && chars[j - 1].is_whitespace() {
        j -= 1;
    }
    j >= 3
        && chars[j - 3..j] == ['n', 'e', 'w']
        && (j == 3 || !is_ident_char(chars[j - 4]))
}

/// Extract the member access at the end of `line`.
///
/// Returns `None` when the text does not end with `.` + identifier
/// characters, when the dot has nothing before it, or when it belongs to
/// a numeric literal (`1.5`).
pub fn extract_member_access(line: &str) -> Option<MemberAccess> {
    let prefix = extract_prefix(line);
    let before_prefix = &line[..line.len() - prefix.len()];
    let before_dot = before_prefix.strip_suffix('.')?;

    let chars: Vec<char> = before_dot.chars().collect();
    let end = chars.len();
    let start = subject_start(&chars);
    let subject: String = chars[start..end].iter().collect();
    let subject = subject.trim().to_string();
    if subject.is_empty() || subject.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    Some(MemberAccess {
        subject,
        prefix: prefix.to_string(),
        is_new: is_new_keyword_before(&chars, start),
    })
}

/// Index of the first character of the subject ending at `chars.len()`.
fn subject_start(chars: &[char]) -> usize {
    let mut i = chars.len();
    while i > 0 {
        let c = chars[i - 1];
        if c == ')' || c == ']' {
            match skip_balanced_group_back(chars, i) {
                Some(open) => {
                    i = open;
                    // `foo (args)`: a space between a callee and its
                    // argument list stays inside the subject.
                    while i > 0 && chars[i - 1] == ' ' {
                        i -= 1;
                    }
                    continue;
                }
                None => return i,
            }
        }
        if is_ident_char(c) || c == '.' {
            i -= 1;
            continue;
        }
        return i;
    }
    0
}

/// The dotted qualifier immediately before `.prefix` when it is a plain
/// name chain, e.g. `Color` for `x = Color.RE` or `GLib.Math` for
/// `GLib.Math.`.  Calls and indexing disqualify the access.
pub fn qualifier(line: &str) -> Option<String> {
    let access = extract_member_access(line)?;
    if access.is_new
        || !access
            .subject
            .chars()
            .all(|c| is_ident_char(c) || c == '.')
    {
        return None;
    }
    Some(access.subject)
}
