/// Namespace completion on `using` lines.
use super::context::CompletionContext;
use crate::types::{CandidateKind, ScopeKind, ScopeRef, SuggestionCandidate};

/// A namespace, flattened to its dotted name, while a `using` directive
/// is being typed.
///
/// With a dotted path (`using Gee.Co`) the namespace must extend the
/// typed path and only the untyped tail is inserted.  Otherwise any
/// namespace containing the prefix is offered in full.
pub fn suggest_namespace(scope: ScopeRef<'_>, ctx: &CompletionContext<'_>) -> Option<SuggestionCandidate> {
    if scope.kind() != ScopeKind::Namespace {
        return None;
    }
    let typed = ctx.using_path?;
    let qualified = scope.qualified_name()?;

    let insert = if typed.contains('.') {
        if !qualified.starts_with(typed) {
            return None;
        }
        let typed_qualifier = typed.len() - ctx.prefix.len();
        format!("{};", &qualified[typed_qualifier..])
    } else {
        if !qualified.contains(ctx.prefix) {
            return None;
        }
        format!("{};", qualified)
    };

    let name = scope.name().unwrap_or_default();
    Some(
        SuggestionCandidate::text(insert, CandidateKind::Import)
            .with_display_text(qualified.clone())
            .with_description(Some(format!("The {} namespace.", name))),
    )
}
