/// Keyword completion for the scope kind at the cursor.
use super::context::CompletionContext;
use crate::keywords::Keyword;
use crate::types::{CandidateKind, ScopeKind, SuggestionCandidate};

/// Keywords applicable in `current` whose name starts with the prefix, in
/// table order.  Nothing is offered after a `.` or on a `using` line.
pub fn suggest_keywords(
    keywords: &[Keyword],
    current: ScopeKind,
    ctx: &CompletionContext<'_>,
) -> Vec<SuggestionCandidate> {
    if ctx.is_dotted() || ctx.is_using() {
        return Vec::new();
    }
    keywords
        .iter()
        .filter(|keyword| keyword.applies_to(current) && ctx.matches(&keyword.name))
        .map(|keyword| {
            SuggestionCandidate::snippet(keyword.snippet.as_str(), keyword.name.as_str(), CandidateKind::Keyword)
                .with_description(Some(format!("The {} keyword.", keyword.name)))
        })
        .collect()
}
