/// Completion item building.
///
/// This module turns scopes into [`SuggestionCandidate`]s (methods and
/// constructors as call snippets, properties as plain names) and turns
/// candidates into LSP `CompletionItem`s.
use tower_lsp::lsp_types::*;

use crate::types::{CandidateKind, ScopeKind, ScopeRef, SuggestionCandidate};

/// Build the snippet for a call to `name`: one placeholder per parameter,
/// carrying the parameter's direction modifier (`out`, `ref`) so the
/// caller sees it must be repeated at the call site.
///
/// `(int a, out string b)` gives `name (${1:a}, ${2:out b});$0`.
pub(crate) fn build_call_snippet(name: &str, scope: ScopeRef<'_>) -> String {
    let params: Vec<String> = scope
        .attributes()
        .parameters
        .iter()
        .enumerate()
        .map(|(i, param)| match param.modifier.as_deref() {
            Some(modifier @ ("out" | "ref")) => format!("${{{}:{} {}}}", i + 1, modifier, param.name),
            _ => format!("${{{}:{}}}", i + 1, param.name),
        })
        .collect();
    format!("{} ({});$0", name, params.join(", "))
}

/// A method or constructor offered as a call snippet.
///
/// Methods show `[static ]ReturnType` on the left and their short doc (or
/// a generic sentence) as description.  Constructors are named after the
/// type they create.
pub fn suggest_method(scope: ScopeRef<'_>) -> SuggestionCandidate {
    let name = scope.name().unwrap_or_default();
    let attributes = scope.attributes();
    let short_doc = scope.documentation().short.clone();

    if scope.kind() == ScopeKind::Constructor {
        let parent = scope
            .parent()
            .and_then(|p| p.name())
            .unwrap_or(name.split('.').next().unwrap_or(name));
        return SuggestionCandidate::snippet(
            build_call_snippet(name, scope),
            name,
            CandidateKind::Constructor,
        )
        .with_left_label(Some(parent.to_string()))
        .with_description(
            short_doc.or_else(|| Some(format!("Creates a new instance of {}.", parent))),
        );
    }

    let return_type = attributes.return_type.as_deref().unwrap_or("void");
    let left_label = if attributes.is_static() {
        format!("static {}", return_type)
    } else {
        return_type.to_string()
    };
    SuggestionCandidate::snippet(build_call_snippet(name, scope), name, CandidateKind::Method)
        .with_left_label(Some(left_label))
        .with_description(short_doc.or_else(|| Some(format!("The {} method.", name))))
}

/// A property or field offered as a plain identifier.
pub fn suggest_property(scope: ScopeRef<'_>) -> SuggestionCandidate {
    let attributes = scope.attributes();
    let left_label = attributes.value_type.as_deref().map(|ty| {
        if attributes.is_static() {
            format!("static {}", ty)
        } else if attributes.is_const() {
            format!("const {}", ty)
        } else {
            ty.to_string()
        }
    });
    SuggestionCandidate::text(scope.name().unwrap_or_default(), CandidateKind::Property)
        .with_left_label(left_label)
        .with_description(scope.documentation().short.clone())
}

/// A member offered as a method snippet or a property name, by kind.
pub fn suggest_member(scope: ScopeRef<'_>) -> Option<SuggestionCandidate> {
    match scope.kind() {
        ScopeKind::Method | ScopeKind::Constructor => Some(suggest_method(scope)),
        ScopeKind::Property => Some(suggest_property(scope)),
        _ => None,
    }
}

fn completion_item_kind(kind: CandidateKind) -> CompletionItemKind {
    match kind {
        CandidateKind::Import | CandidateKind::Namespace => CompletionItemKind::MODULE,
        CandidateKind::Class => CompletionItemKind::CLASS,
        CandidateKind::Interface => CompletionItemKind::INTERFACE,
        CandidateKind::Struct => CompletionItemKind::STRUCT,
        CandidateKind::Enum => CompletionItemKind::ENUM,
        CandidateKind::Value => CompletionItemKind::ENUM_MEMBER,
        CandidateKind::Method => CompletionItemKind::METHOD,
        CandidateKind::Constructor => CompletionItemKind::CONSTRUCTOR,
        CandidateKind::Property => CompletionItemKind::PROPERTY,
        CandidateKind::Variable => CompletionItemKind::VARIABLE,
        CandidateKind::Keyword => CompletionItemKind::KEYWORD,
        CandidateKind::Block => CompletionItemKind::TEXT,
    }
}

/// Convert a candidate to the LSP representation.
pub fn to_completion_item(candidate: &SuggestionCandidate) -> CompletionItem {
    let insert_text_format = if candidate.insert.is_snippet() {
        InsertTextFormat::SNIPPET
    } else {
        InsertTextFormat::PLAIN_TEXT
    };
    CompletionItem {
        label: candidate.display_text.clone(),
        kind: Some(completion_item_kind(candidate.kind)),
        detail: candidate.left_label.clone(),
        documentation: candidate
            .description
            .clone()
            .map(Documentation::String),
        insert_text: Some(candidate.insert.as_str().to_string()),
        insert_text_format: Some(insert_text_format),
        filter_text: Some(candidate.display_text.clone()),
        sort_text: Some(candidate.sort_key.clone()),
        ..CompletionItem::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::build;

    #[test]
    fn constructor_snippet_has_one_placeholder_per_parameter() {
        let unit = build("class Foo {\n    public Foo (int a, out string b) {}\n}\n", "t.vala");
        let ctor = unit
            .iter()
            .find(|s| s.kind() == ScopeKind::Constructor)
            .unwrap();
        let candidate = suggest_method(ctor);
        assert_eq!(
            candidate.insert.as_str(),
            "Foo (${1:a}, ${2:out b});$0"
        );
        assert_eq!(candidate.kind, CandidateKind::Constructor);
        assert_eq!(
            candidate.description.as_deref(),
            Some("Creates a new instance of Foo.")
        );
    }

    #[test]
    fn method_label_includes_static() {
        let unit = build("class Foo {\n    public static int count () { return 0; }\n}\n", "t.vala");
        let method = unit.iter().find(|s| s.kind() == ScopeKind::Method).unwrap();
        let candidate = suggest_method(method);
        assert_eq!(candidate.left_label.as_deref(), Some("static int"));
        assert_eq!(candidate.description.as_deref(), Some("The count method."));
    }

    #[test]
    fn snippet_items_are_marked() {
        let candidate = SuggestionCandidate::snippet("if ($1) {}", "if", CandidateKind::Keyword);
        let item = to_completion_item(&candidate);
        assert_eq!(item.insert_text_format, Some(InsertTextFormat::SNIPPET));
        assert_eq!(item.kind, Some(CompletionItemKind::KEYWORD));
        assert_eq!(item.label, "if");
    }
}
