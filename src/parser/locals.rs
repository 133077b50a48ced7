/// Local variable and parameter extraction.
///
/// Statements inside method, constructor, property and block bodies are
/// scanned for declarations of the form `Type name [= init]` (with any
/// number of comma-separated declarators) and `var name = init`, whose
/// type is read off the initializer when it names one.  Parameter lists
/// of methods and constructors are parsed here too.
use std::sync::OnceLock;

use regex::Regex;

use super::declarations::strip_attributes;
use super::lexer::split_top_level;
use crate::types::ParameterInfo;

/// Direction and ownership words that may precede a parameter type.
const PARAMETER_MODIFIERS: &[&str] = &["out", "ref", "owned", "unowned", "params", "weak"];

/// Statement-leading words that look like a type in `word name` position.
const STATEMENT_WORDS: &[&str] = &[
    "return", "new", "throw", "delete", "yield", "else", "case", "default", "using", "goto",
    "break", "continue", "get", "set", "construct", "lock", "unlock", "sizeof", "typeof", "is",
    "as", "in", "out", "ref", "if", "while", "for", "foreach", "switch", "do", "try", "catch",
];

struct Patterns {
    declaration: Regex,
    label: Regex,
    new_expr: Regex,
    cast: Regex,
    as_expr: Regex,
    int_literal: Regex,
    float_literal: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        declaration: Regex::new(
            r"^(?:(?:const|static|unowned|owned|weak|dynamic)\s+)*([A-Za-z_][\w.]*(?:\s*<.*>)?(?:\s*\[[,\s]*\])*\s*[?*]?)\s+([A-Za-z_]\w*\s*(?:[=,\[].*)?)$",
        )
        .unwrap(),
        label: Regex::new(r"^(?:case\s+[^:]+|default)\s*:\s*").unwrap(),
        new_expr: Regex::new(r"^new\s+([\w.]+(?:\s*<.*?>)?)").unwrap(),
        cast: Regex::new(r"^\(\s*((?:owned\s+)?[A-Za-z_][\w.]*(?:\s*<.*?>)?)\s*\)\s*[\w(]").unwrap(),
        as_expr: Regex::new(r"\bas\s+([A-Za-z_][\w.]*)\s*$").unwrap(),
        int_literal: Regex::new(r"^-?(?:0[xX][0-9a-fA-F]+|\d+)[uUlL]*$").unwrap(),
        float_literal: Regex::new(r"^-?\d+\.\d*(?:[eE][-+]?\d+)?([fF]?)$").unwrap(),
    })
}

/// A local declared by one statement, before line / doc information is
/// attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeclaredLocal {
    pub name: String,
    pub type_name: String,
}

/// Extract every local declared by a single statement (without its
/// trailing `;`).
pub(crate) fn parse_local_declarations(statement: &str) -> Vec<DeclaredLocal> {
    let p = patterns();
    let text = strip_attributes(statement).trim();
    let text = p.label.replace(text, "");
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if let Some(rest) = text.strip_prefix("var ") {
        return split_top_level(rest, ',', false)
            .into_iter()
            .filter_map(|(piece, _)| {
                let (name, init) = match piece.split_once('=') {
                    Some((name, init)) => (name.trim(), Some(init.trim())),
                    None => (piece.trim(), None),
                };
                is_identifier(name).then(|| DeclaredLocal {
                    name: name.to_string(),
                    type_name: init
                        .and_then(infer_type)
                        .unwrap_or_else(|| "var".to_string()),
                })
            })
            .collect();
    }

    let Some(caps) = p.declaration.captures(text) else {
        return Vec::new();
    };
    let type_name = normalize_spaces(&caps[1]);
    let head = type_name.split(['<', '[', '?', '*']).next().unwrap_or("");
    if STATEMENT_WORDS.contains(&head.trim()) {
        return Vec::new();
    }

    split_top_level(&caps[2], ',', true)
        .into_iter()
        .filter_map(|(piece, _)| {
            let name = piece
                .split(['=', '['])
                .next()
                .map(str::trim)
                .unwrap_or("");
            is_identifier(name).then(|| DeclaredLocal {
                name: name.to_string(),
                type_name: type_name.clone(),
            })
        })
        .collect()
}

/// Guess the type of a `var` initializer.
///
/// Recognises `new Type (...)`, `(Type) expr`, `expr as Type`, and
/// literals.  Anything else is left to the caller's `var` fallback.
pub(crate) fn infer_type(init: &str) -> Option<String> {
    let p = patterns();
    let init = init.trim();

    if let Some(caps) = p.new_expr.captures(init) {
        let raw = normalize_spaces(&caps[1]);
        return Some(strip_named_constructor(&raw));
    }
    if let Some(caps) = p.cast.captures(init) {
        return Some(normalize_spaces(&caps[1]));
    }
    if let Some(caps) = p.as_expr.captures(init) {
        return Some(caps[1].to_string());
    }

    let literal = match init {
        "\"\"" => "string",
        "''" => "char",
        "true" | "false" => "bool",
        _ if p.int_literal.is_match(init) => "int",
        _ => {
            let caps = p.float_literal.captures(init)?;
            if caps[1].is_empty() { "double" } else { "float" }
        }
    };
    Some(literal.to_string())
}

/// `Foo.with_name` names a constructor of `Foo`; Vala constructor names are
/// lowercase while type names are capitalised.
fn strip_named_constructor(name: &str) -> String {
    let (base, generics) = match name.find('<') {
        Some(idx) => (&name[..idx], &name[idx..]),
        None => (name, ""),
    };
    let base = base.trim_end();
    match base.rsplit_once('.') {
        Some((qualifier, last)) if last.starts_with(|c: char| c.is_lowercase()) => {
            format!("{}{}", qualifier, generics)
        }
        _ => format!("{}{}", base, generics),
    }
}

/// Parse the text between a method's parentheses into parameters.
pub(crate) fn parse_parameters(list: &str) -> Vec<ParameterInfo> {
    split_top_level(list, ',', true)
        .into_iter()
        .filter_map(|(piece, _)| parse_parameter(piece))
        .collect()
}

fn parse_parameter(text: &str) -> Option<ParameterInfo> {
    let text = strip_attributes(text);
    // Default values are not part of the signature we keep.
    let text = split_top_level(text, '=', true)
        .first()
        .map(|(piece, _)| piece.trim())
        .unwrap_or("");

    let mut words: Vec<&str> = text.split_whitespace().collect();
    let mut modifier = None;
    while let Some(first) = words.first() {
        if PARAMETER_MODIFIERS.contains(first) {
            modifier.get_or_insert_with(|| first.to_string());
            words.remove(0);
        } else {
            break;
        }
    }

    let name = words.pop()?;
    if words.is_empty() || !is_identifier(name) {
        return None;
    }
    Some(ParameterInfo {
        name: name.to_string(),
        type_name: words.join(" "),
        modifier,
    })
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locals(statement: &str) -> Vec<(String, String)> {
        parse_local_declarations(statement)
            .into_iter()
            .map(|l| (l.type_name, l.name))
            .collect()
    }

    fn pair(t: &str, n: &str) -> (String, String) {
        (t.to_string(), n.to_string())
    }

    #[test]
    fn typed_declarations() {
        assert_eq!(locals("Point p = new Point ()"), vec![pair("Point", "p")]);
        assert_eq!(locals("int a, b = 2, c"), vec![pair("int", "a"), pair("int", "b"), pair("int", "c")]);
        assert_eq!(
            locals("Gee.HashMap<string, int> map"),
            vec![pair("Gee.HashMap<string, int>", "map")]
        );
        assert_eq!(locals("unowned string? s = null"), vec![pair("string?", "s")]);
        assert_eq!(locals("int[] values = new int[3]"), vec![pair("int[]", "values")]);
    }

    #[test]
    fn statements_are_not_declarations() {
        assert!(locals("return x").is_empty());
        assert!(locals("p.x = 5").is_empty());
        assert!(locals("foo (a, b)").is_empty());
        assert!(locals("x = y").is_empty());
        assert!(locals("delete p").is_empty());
    }

    #[test]
    fn case_label_is_stripped() {
        assert_eq!(locals("case 1: int x = 2"), vec![pair("int", "x")]);
    }

    #[test]
    fn var_inference() {
        assert_eq!(locals("var p = new Point (1, 2)"), vec![pair("Point", "p")]);
        assert_eq!(locals("var b = (Button) widget"), vec![pair("Button", "b")]);
        assert_eq!(locals("var l = obj as Gtk.Label"), vec![pair("Gtk.Label", "l")]);
        assert_eq!(locals("var s = \"\""), vec![pair("string", "s")]);
        assert_eq!(locals("var n = 42"), vec![pair("int", "n")]);
        assert_eq!(locals("var d = 1.5"), vec![pair("double", "d")]);
        assert_eq!(locals("var f = 1.5f"), vec![pair("float", "f")]);
        assert_eq!(locals("var q = compute ()"), vec![pair("var", "q")]);
    }

    #[test]
    fn named_constructor_gives_class_type() {
        assert_eq!(infer_type("new Foo.with_name (\"\")").as_deref(), Some("Foo"));
        assert_eq!(infer_type("new Gee.ArrayList<int> ()").as_deref(), Some("Gee.ArrayList<int>"));
    }

    #[test]
    fn parameters_with_modifiers_and_defaults() {
        let params = parse_parameters("int a, out string b, Gee.Map<K, V> m = null, params string[] rest");
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "m", "rest"]);
        assert_eq!(params[1].modifier.as_deref(), Some("out"));
        assert_eq!(params[1].type_name, "string");
        assert_eq!(params[2].type_name, "Gee.Map<K, V>");
        assert_eq!(params[3].modifier.as_deref(), Some("params"));
        assert_eq!(params[3].type_name, "string[]");
    }

    #[test]
    fn varargs_and_empty_lists() {
        assert!(parse_parameters("").is_empty());
        assert_eq!(parse_parameters("string format, ...").len(), 1);
    }
}
