/// Enum completion.
///
/// An enum is offered by name; once the line addresses `EnumName.` its
/// values are offered instead and the enum names themselves must be
/// dropped from the final list.
use super::context::CompletionContext;
use crate::types::{CandidateKind, ScopeKind, ScopeRef, SuggestionCandidate};

/// Candidates for one enum scope, and whether the line addresses it.
pub fn suggest_enum(scope: ScopeRef<'_>, ctx: &CompletionContext<'_>) -> (Vec<SuggestionCandidate>, bool) {
    if scope.kind() != ScopeKind::Enum {
        return (Vec::new(), false);
    }
    let Some(name) = scope.name() else {
        return (Vec::new(), false);
    };

    if ctx.qualifier_is(name) {
        let values = scope
            .attributes()
            .enum_values
            .iter()
            .filter(|value| ctx.matches(value))
            .map(|value| {
                SuggestionCandidate::text(value.as_str(), CandidateKind::Value)
                    .with_left_label(Some(name.to_string()))
            })
            .collect();
        return (values, true);
    }

    if ctx.is_dotted() || ctx.is_using() || !ctx.matches(name) {
        return (Vec::new(), false);
    }
    let candidate = SuggestionCandidate::text(name, CandidateKind::Enum)
        .with_description(Some(format!("The {} enum.", name)));
    (vec![candidate], false)
}
