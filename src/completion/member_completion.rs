/// Member completion: `subject.`, `this.` and static `Type.` access, plus
/// free functions of the global scope and imported namespaces.
use super::builder::{suggest_member, suggest_method, suggest_property};
use super::context::CompletionContext;
use crate::inheritance::inherited_members;
use crate::registry::RegistrySnapshot;
use crate::types::{CandidateKind, ScopeKind, ScopeRef, SuggestionCandidate};

/// Methods and properties of a resolved subject type whose name starts
/// with the prefix: the type's own members first, then inherited ones.
pub fn suggest_members<'a>(
    snapshot: &'a RegistrySnapshot,
    type_scope: ScopeRef<'a>,
    ctx: &CompletionContext<'_>,
    usings: &[String],
) -> Vec<SuggestionCandidate> {
    let own = type_scope
        .children()
        .filter(|m| matches!(m.kind(), ScopeKind::Method | ScopeKind::Property));
    own.chain(inherited_members(snapshot, type_scope, usings))
        .filter(|m| m.name().is_some_and(|name| ctx.matches(name)))
        .filter_map(suggest_member)
        .collect()
}

/// A member of the enclosing type offered after `this.`.
pub fn suggest_this_member(
    scope: ScopeRef<'_>,
    ctx: &CompletionContext<'_>,
    enclosing: Option<ScopeRef<'_>>,
) -> Option<SuggestionCandidate> {
    if !ctx.is_this_access() || scope.kind() == ScopeKind::Constructor {
        return None;
    }
    let enclosing = enclosing?;
    let parent = scope.parent()?;
    if parent != enclosing {
        return None;
    }
    let name = scope.name().filter(|name| ctx.matches(name))?;
    Some(
        SuggestionCandidate::text(name, CandidateKind::from(scope.kind()))
            .with_left_label(scope.attributes().declared_type().map(str::to_string))
            .with_description(scope.documentation().short.clone()),
    )
}

/// Free functions and static members.
///
/// - a method of the global scope or of an imported namespace, by name;
/// - a method of a namespace addressed as `Namespace.prefix`;
/// - a static method, or a static or constant property, addressed as
///   `TypeName.prefix`.
pub fn suggest_static_member(
    scope: ScopeRef<'_>,
    ctx: &CompletionContext<'_>,
    usings: &[String],
) -> Option<SuggestionCandidate> {
    let kind = scope.kind();
    if !matches!(kind, ScopeKind::Method | ScopeKind::Property) {
        return None;
    }
    scope.name().filter(|name| ctx.matches(name))?;
    let parent = scope.parent()?;
    let attributes = scope.attributes();

    match parent.kind() {
        ScopeKind::Global if kind == ScopeKind::Method => {
            (!ctx.is_dotted() && !ctx.is_using()).then(|| suggest_method(scope))
        }
        ScopeKind::Namespace if kind == ScopeKind::Method => {
            let qualified = parent.qualified_name()?;
            let imported = !ctx.is_dotted() && !ctx.is_using() && usings.contains(&qualified);
            let addressed = ctx.qualifier.as_deref() == Some(qualified.as_str())
                || parent.name().is_some_and(|ns| ctx.qualifier_is(ns));
            (imported || addressed).then(|| suggest_method(scope))
        }
        parent_kind if parent_kind.is_type() => {
            let type_name = parent.name()?;
            if !ctx.qualifier_is(type_name) {
                return None;
            }
            match kind {
                ScopeKind::Method if attributes.is_static() => Some(suggest_method(scope)),
                ScopeKind::Property if attributes.is_static() || attributes.is_const() => {
                    Some(suggest_property(scope))
                }
                _ => None,
            }
        }
        _ => None,
    }
}
