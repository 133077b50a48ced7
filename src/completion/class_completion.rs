/// Type-name completion.
///
/// Classes, interfaces and structs offered by name (at the start of a
/// statement, or in a base list), struct literals on the right of an
/// assignment, and constructors after `Type name = new `.
use super::context::CompletionContext;
use crate::completion::builder::suggest_method;
use crate::inheritance::base_type_names;
use crate::resolution::normalize_type_name;
use crate::types::{CandidateKind, ScopeKind, ScopeRef, SuggestionCandidate};
use crate::util::short_name;

/// Class and interface names, for a bare capitalised name or a base list.
pub fn suggest_type_name(scope: ScopeRef<'_>, ctx: &CompletionContext<'_>) -> Vec<SuggestionCandidate> {
    let kind = scope.kind();
    if !matches!(kind, ScopeKind::Class | ScopeKind::Interface) {
        return Vec::new();
    }
    let Some(name) = scope.name() else {
        return Vec::new();
    };

    let bare_type = ctx.is_bare_name && ctx.prefix.starts_with(|c: char| c.is_uppercase());
    if !(bare_type || ctx.is_base_list) || !ctx.matches(name) {
        return Vec::new();
    }

    vec![
        SuggestionCandidate::text(name, CandidateKind::from(kind))
            .with_description(Some(format!("The {} {}.", name, kind))),
    ]
}

/// Struct names at the start of a statement, and the `Name ($1);`
/// literal when the assignment's declared type is this struct.
pub fn suggest_struct(scope: ScopeRef<'_>, ctx: &CompletionContext<'_>) -> Vec<SuggestionCandidate> {
    if scope.kind() != ScopeKind::Struct {
        return Vec::new();
    }
    let Some(name) = scope.name() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    if ctx.is_bare_name && ctx.matches(name) {
        out.push(
            SuggestionCandidate::text(format!("{} ", name), CandidateKind::Struct)
                .with_display_text(name)
                .with_description(Some(format!("The {} struct.", name))),
        );
    }

    let literal_type = ctx.assignment_type.as_deref().map(normalize_type_name);
    if literal_type.as_deref().map(short_name) == Some(name) {
        out.push(
            SuggestionCandidate::snippet(format!("{} ($1);", name), name, CandidateKind::Struct)
                .with_description(Some(format!("The {} struct.", name))),
        );
    }
    out
}

/// Constructors of the classes that can initialise `Type name = new `:
/// the class named `Type` and every class listing `Type` as a base.
pub fn suggest_constructors(
    scope: ScopeRef<'_>,
    ctx: &CompletionContext<'_>,
) -> Vec<SuggestionCandidate> {
    if !matches!(scope.kind(), ScopeKind::Class | ScopeKind::Struct) {
        return Vec::new();
    }
    let Some(target) = ctx.new_type.as_deref().map(normalize_type_name) else {
        return Vec::new();
    };
    let target = short_name(&target);

    let is_target = scope.name() == Some(target)
        || base_type_names(scope)
            .into_iter()
            .any(|base| short_name(&normalize_type_name(base)) == target);
    if !is_target {
        return Vec::new();
    }

    scope
        .children()
        .filter(|child| child.kind() == ScopeKind::Constructor)
        .filter(|ctor| ctor.name().is_some_and(|name| ctx.matches(name)))
        .map(suggest_method)
        .collect()
}
