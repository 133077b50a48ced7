/// Declaration header classification.
///
/// Given the text of one statement or block header and the kind of scope
/// it appears in, decide what it declares: a namespace, a type, a method,
/// a constructor, a property (fields included), or a control block.  All
/// matching is regex-level and tolerant; text that matches nothing yields
/// `None` and is skipped by the builder.
use std::sync::OnceLock;

use regex::Regex;

use super::lexer::{balanced_parens, split_top_level};
use super::locals::parse_parameters;
use crate::types::{ParameterInfo, ScopeKind};

/// Words that may appear where a type is expected in a regex match but
/// can never start a declaration.
const NON_TYPE_WORDS: &[&str] = &[
    "return", "new", "throw", "delete", "yield", "else", "case", "using", "namespace", "class",
    "interface", "struct", "enum", "errordomain", "delegate", "if", "while", "for", "foreach",
    "switch", "lock", "try", "catch", "var", "get", "set", "construct",
];

/// What a header declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Header {
    Namespace(String),
    Type {
        kind: ScopeKind,
        name: String,
        modifiers: Vec<String>,
        inherits: Option<String>,
    },
    Method {
        name: String,
        modifiers: Vec<String>,
        return_type: String,
        parameters: Vec<ParameterInfo>,
    },
    Constructor {
        name: String,
        modifiers: Vec<String>,
        parameters: Vec<ParameterInfo>,
    },
    Property {
        name: String,
        modifiers: Vec<String>,
        value_type: String,
    },
    /// A statement block header (`if`, `foreach`, accessors, ...) and the
    /// `(type, name)` pairs it introduces into the block.
    Control { locals: Vec<(String, String)> },
}

impl Header {
    pub fn kind(&self) -> ScopeKind {
        match self {
            Header::Namespace(_) => ScopeKind::Namespace,
            Header::Type { kind, .. } => *kind,
            Header::Method { .. } => ScopeKind::Method,
            Header::Constructor { .. } => ScopeKind::Constructor,
            Header::Property { .. } => ScopeKind::Property,
            Header::Control { .. } => ScopeKind::Block,
        }
    }
}

/// The scope a header is classified in.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DeclContext<'a> {
    pub kind: ScopeKind,
    /// Name of the enclosing class or struct, used to recognise
    /// constructors.
    pub type_name: Option<&'a str>,
}

struct Patterns {
    namespace: Regex,
    type_decl: Regex,
    control: Regex,
    for_local: Regex,
    foreach_local: Regex,
    catch_local: Regex,
    constructor: Regex,
    method: Regex,
    property: Regex,
}

const MODIFIERS: &str = r"(?:(?:public|private|protected|internal|static|abstract|virtual|override|async|extern|inline|sealed|partial|const|signal|new|class)\s+)*";
const TYPE: &str = r"(?:(?:unowned|owned|weak|dynamic)\s+)?[A-Za-z_][\w.]*(?:\s*<.*?>)?(?:\s*\[[,\s]*\])*\s*[?*]?";

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        namespace: Regex::new(r"^namespace\s+([\w.]+)\s*$").unwrap(),
        type_decl: Regex::new(&format!(
            r"^({MODIFIERS})(class|interface|struct|enum|errordomain)\s+(\w+)\s*(?:<[^>]*>)?\s*(?::\s*(.*?))?\s*$"
        ))
        .unwrap(),
        control: Regex::new(
            r"^(?:(?:public|private|protected|internal|owned|unowned|static|class)\s+)*(?:if|else|for|foreach|while|do|switch|try|catch|finally|lock|get|set|construct|default|case)\b",
        )
        .unwrap(),
        for_local: Regex::new(&format!(r"^for\s*\(\s*({TYPE})\s+(\w+)\s*=")).unwrap(),
        foreach_local: Regex::new(&format!(r"^foreach\s*\(\s*({TYPE})\s+(\w+)\s+in\b")).unwrap(),
        catch_local: Regex::new(r"^catch\s*\(\s*([\w.]+)\s+(\w+)\s*\)").unwrap(),
        constructor: Regex::new(&format!(r"^({MODIFIERS})(\w+)(?:\.(\w+))?\s*\(")).unwrap(),
        method: Regex::new(&format!(
            r"^({MODIFIERS})({TYPE})\s+(\w+)\s*(?:<[^>()]*>)?\s*\("
        ))
        .unwrap(),
        property: Regex::new(&format!(r"^({MODIFIERS})({TYPE})\s+(\w+)\s*(?:=.*)?$")).unwrap(),
    })
}

/// Remove leading `[Attribute (...)]` blocks.
pub(crate) fn strip_attributes(text: &str) -> &str {
    let mut rest = text.trim_start();
    while rest.starts_with('[') {
        let mut depth = 0;
        let mut end = None;
        for (idx, c) in rest.char_indices() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(idx);
                        break;
                    }
                }
                _ => {}
            }
        }
        match end {
            Some(end) => rest = rest[end + 1..].trim_start(),
            None => return "",
        }
    }
    rest
}

fn split_modifiers(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

fn clean_type(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify a control-block header, collecting the locals it declares.
pub(crate) fn classify_control(text: &str) -> Option<Header> {
    let text = strip_attributes(text).trim();
    let p = patterns();
    if !p.control.is_match(text) {
        return None;
    }

    let mut locals = Vec::new();
    if let Some(caps) = p.for_local.captures(text) {
        locals.push((clean_type(&caps[1]), caps[2].to_string()));
    } else if let Some(caps) = p.foreach_local.captures(text) {
        locals.push((clean_type(&caps[1]), caps[2].to_string()));
    } else if let Some(caps) = p.catch_local.captures(text) {
        locals.push((caps[1].to_string(), caps[2].to_string()));
    }
    Some(Header::Control { locals })
}

/// Classify a declaration header in a declaration context (global,
/// namespace, type, or enum body).
pub(crate) fn classify_declaration(text: &str, ctx: DeclContext<'_>) -> Option<Header> {
    let text = strip_attributes(text).trim();
    if text.is_empty() {
        return None;
    }
    let p = patterns();

    if let Some(caps) = p.namespace.captures(text) {
        return Some(Header::Namespace(caps[1].to_string()));
    }

    if let Some(caps) = p.type_decl.captures(text) {
        let kind = match &caps[2] {
            "class" => ScopeKind::Class,
            "interface" => ScopeKind::Interface,
            "struct" => ScopeKind::Struct,
            _ => ScopeKind::Enum,
        };
        let inherits = caps
            .get(4)
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());
        return Some(Header::Type {
            kind,
            name: caps[3].to_string(),
            modifiers: split_modifiers(&caps[1]),
            inherits,
        });
    }

    if let Some(type_name) = ctx.type_name
        && let Some(caps) = p.constructor.captures(text)
        && &caps[2] == type_name
    {
        let name = match caps.get(3) {
            Some(sub) => format!("{}.{}", type_name, sub.as_str()),
            None => type_name.to_string(),
        };
        let open = caps.get(0).map_or(0, |m| m.end() - 1);
        let parameters = balanced_parens(text, open)
            .map(parse_parameters)
            .unwrap_or_default();
        return Some(Header::Constructor {
            name,
            modifiers: split_modifiers(&caps[1]),
            parameters,
        });
    }

    if let Some(caps) = p.method.captures(text) {
        let return_type = clean_type(&caps[2]);
        if !is_non_type_word(&return_type) {
            let open = caps.get(0).map_or(0, |m| m.end() - 1);
            let parameters = balanced_parens(text, open)
                .map(parse_parameters)
                .unwrap_or_default();
            return Some(Header::Method {
                name: caps[3].to_string(),
                modifiers: split_modifiers(&caps[1]),
                return_type,
                parameters,
            });
        }
    }

    if let Some(caps) = p.property.captures(text) {
        let value_type = clean_type(&caps[2]);
        if !is_non_type_word(&value_type) && !is_non_type_word(&caps[3]) {
            return Some(Header::Property {
                name: caps[3].to_string(),
                modifiers: split_modifiers(&caps[1]),
                value_type,
            });
        }
    }

    None
}

/// Classify a header in any context: control blocks first, then
/// declarations when the context holds declarations.
pub(crate) fn classify_header(text: &str, ctx: DeclContext<'_>) -> Option<Header> {
    if let Some(control) = classify_control(text) {
        return Some(control);
    }
    if ctx.kind.is_declaration_context() {
        return classify_declaration(text, ctx);
    }
    None
}

fn is_non_type_word(word: &str) -> bool {
    NON_TYPE_WORDS.contains(&word)
}

/// Names of the values declared by an enum member list fragment
/// (`RED = 1, GREEN` gives `RED`, `GREEN`).
pub(crate) fn enum_values(text: &str) -> Vec<String> {
    split_top_level(text, ',', false)
        .into_iter()
        .filter_map(|(item, _)| {
            let item = strip_attributes(item).trim();
            let end = item
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(item.len());
            let name = &item[..end];
            (!name.is_empty() && !name.starts_with(|c: char| c.is_ascii_digit()))
                .then(|| name.to_string())
        })
        .collect()
}
