/// Local variable completion.
///
/// Offered for every scope of the current unit that contains the cursor.
/// With a prefix, every local whose name starts with it matches.  With
/// an empty prefix only locals already declared at the cursor row are
/// offered, most recent declaration first.
use super::context::CompletionContext;
use crate::types::{CandidateKind, LocalVariable, ScopeRef, SuggestionCandidate};

pub fn suggest_locals(scope: ScopeRef<'_>, ctx: &CompletionContext<'_>) -> Vec<SuggestionCandidate> {
    if ctx.is_dotted() || ctx.is_using() {
        return Vec::new();
    }

    let locals = scope.locals();
    if ctx.prefix.is_empty() {
        locals
            .iter()
            .rev()
            .filter(|local| local.declared_at_line <= ctx.row)
            .map(local_candidate)
            .collect()
    } else {
        locals
            .iter()
            .filter(|local| ctx.matches(&local.name))
            .map(local_candidate)
            .collect()
    }
}

fn local_candidate(local: &LocalVariable) -> SuggestionCandidate {
    SuggestionCandidate::text(local.name.as_str(), CandidateKind::Variable)
        .with_left_label(Some(local.type_name.clone()))
        .with_description(local.short_doc.clone())
}
