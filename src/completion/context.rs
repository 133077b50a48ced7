/// What the text before the cursor asks for.
///
/// A [`CompletionContext`] is computed once per request from the line
/// before the cursor and the prefix.  Every suggestion predicate reads
/// its flags instead of re-inspecting the line, so the predicates stay
/// pure functions of `(scope, context)`.
use std::sync::OnceLock;

use regex::Regex;

use crate::subject_extraction::{MemberAccess, extract_member_access, qualifier};
use crate::types::CompletionRequest;
use crate::util::{contains_word, short_name};

struct Patterns {
    /// `Type name = new Prefix` with the declared type in group 1.
    new_expression: Regex,
    /// `Type name = Prefix` with the declared type in group 1.
    assignment: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        new_expression: Regex::new(r"^([\w.]+(?:<[\w.,\s<>]*>)?\??)\s+\w+\s*=\s*new(?:\s+\w*)?$")
            .unwrap(),
        assignment: Regex::new(r"^([\w.]+(?:<[\w.,\s<>]*>)?\??)\s+\w+\s*=\s*\w*$").unwrap(),
    })
}

#[derive(Debug, Clone)]
pub struct CompletionContext<'r> {
    pub unit_id: &'r str,
    pub row: u32,
    /// The line before the cursor with surrounding whitespace removed.
    pub trimmed: &'r str,
    /// Identifier characters immediately before the cursor.
    pub prefix: &'r str,
    /// The line starts a `using` directive.
    pub using_path: Option<&'r str>,
    /// The trimmed line is exactly the prefix: a bare name at the start
    /// of a statement or declaration.
    pub is_bare_name: bool,
    /// The line is a class or interface header being given a base list.
    pub is_base_list: bool,
    /// Declared type of `Type name = ` when the right-hand side is being
    /// typed.
    pub assignment_type: Option<String>,
    /// Declared type of `Type name = new `.
    pub new_type: Option<String>,
    /// The line ends with `subject.prefix`.
    pub member_access: Option<MemberAccess>,
    /// Plain dotted name before `.prefix` (`Color` in `Color.RE`).
    pub qualifier: Option<String>,
}

impl<'r> CompletionContext<'r> {
    pub fn new(request: &'r CompletionRequest) -> Self {
        let line = request.line_before_cursor.as_str();
        let trimmed = line.trim();
        let prefix = request.prefix.as_str();

        let using_path = line
            .trim_start()
            .strip_prefix("using ")
            .map(|rest| rest.rsplit(',').next().unwrap_or(rest).trim());

        let new_type = patterns()
            .new_expression
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|ty| ty != "var");

        let assignment_type = if new_type.is_none() {
            patterns()
                .assignment
                .captures(trimmed)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .filter(|ty| ty != "var")
        } else {
            None
        };

        Self {
            unit_id: request.unit_id.as_str(),
            row: request.row,
            trimmed,
            prefix,
            using_path,
            is_bare_name: !trimmed.is_empty() && trimmed == prefix,
            is_base_list: (contains_word(trimmed, "class") || contains_word(trimmed, "interface"))
                && trimmed.contains(" : "),
            assignment_type,
            new_type,
            member_access: extract_member_access(line),
            qualifier: qualifier(line),
        }
    }

    /// Whether the cursor follows a `.`: plain-name predicates stay quiet.
    pub fn is_dotted(&self) -> bool {
        self.member_access.is_some()
    }

    pub fn is_using(&self) -> bool {
        self.using_path.is_some()
    }

    /// The line ends with `this.` or `this.prefix`.
    pub fn is_this_access(&self) -> bool {
        self.qualifier.as_deref() == Some("this")
    }

    /// Whether the last component of the qualifier is `name`.
    pub fn qualifier_is(&self, name: &str) -> bool {
        self.qualifier
            .as_deref()
            .is_some_and(|q| short_name(q) == name)
    }

    /// An empty prefix matches every name.
    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(line: &str) -> CompletionRequest {
        CompletionRequest {
            unit_id: "test.vala".to_string(),
            row: 0,
            column: line.len() as u32,
            line_before_cursor: line.to_string(),
            prefix: crate::util::extract_prefix(line).to_string(),
        }
    }

    #[test]
    fn new_expression_type() {
        let req = request("\t\tGee.List<string> l = new Ar");
        let ctx = CompletionContext::new(&req);
        assert_eq!(ctx.new_type.as_deref(), Some("Gee.List<string>"));
        assert_eq!(ctx.assignment_type, None);
        assert_eq!(ctx.prefix, "Ar");
    }

    #[test]
    fn assignment_type() {
        let req = request("Point p = ");
        let ctx = CompletionContext::new(&req);
        assert_eq!(ctx.assignment_type.as_deref(), Some("Point"));
        assert!(!ctx.is_bare_name);
    }

    #[test]
    fn base_list() {
        let req = request("public class Foo : Ob");
        assert!(CompletionContext::new(&req).is_base_list);
    }

    #[test]
    fn this_access() {
        let req = request("    this.na");
        let ctx = CompletionContext::new(&req);
        assert!(ctx.is_this_access());
        assert!(ctx.is_dotted());
        assert!(ctx.matches("name"));
        assert!(!ctx.matches("other"));
    }

    #[test]
    fn using_path() {
        let req = request("using GLib, Gee.Co");
        assert_eq!(CompletionContext::new(&req).using_path, Some("Gee.Co"));
    }
}
