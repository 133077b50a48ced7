/// Candidate collection.
///
/// One completion request is one depth-first traversal over a registry
/// snapshot.  Every visited scope is handed to each suggestion predicate;
/// predicates are pure functions of `(scope, context)` and any number of
/// them may fire for the same scope.  Their results are threaded through
/// an explicit [`Accumulator`] that keeps three groups apart:
///
///   keywords > `this` members > everything else (in emission order)
///
/// After the traversal, enum type names are dropped when the line
/// addresses `EnumName.`, candidates whose display text equals the prefix
/// are moved to the front (stable), and sort keys are assigned.
use std::collections::HashSet;

use super::class_completion::{suggest_constructors, suggest_struct, suggest_type_name};
use super::context::CompletionContext;
use super::enum_completion::suggest_enum;
use super::keyword_completion::suggest_keywords;
use super::member_completion::{suggest_members, suggest_static_member, suggest_this_member};
use super::namespace_completion::suggest_namespace;
use super::variable_completion::suggest_locals;
use crate::keywords::Keyword;
use crate::registry::RegistrySnapshot;
use crate::resolution::{TypeRef, resolve_type};
use crate::types::{
    CandidateKind, CompletionRequest, LocalVariable, ResolvedType, ScopeKind, ScopeRef,
    SuggestionCandidate,
};

/// Candidates gathered during one traversal.
#[derive(Debug, Default)]
struct Accumulator<'a> {
    candidates: Vec<SuggestionCandidate>,
    this_members: Vec<SuggestionCandidate>,
    /// First class of the current unit containing the cursor.
    enclosing: Option<ScopeRef<'a>>,
    /// Every scope of the current unit containing the cursor, outermost
    /// first.
    cursor_chain: Vec<ScopeRef<'a>>,
    /// Qualified names of namespaces already offered.
    namespaces: HashSet<String>,
    remove_enums: bool,
}

impl<'a> Accumulator<'a> {
    fn visit(&mut self, scope: ScopeRef<'a>, ctx: &CompletionContext<'_>, usings: &[String]) {
        let in_current_unit = !scope.parsed_unit().is_external
            && scope.unit_id().as_str() == ctx.unit_id
            && scope.range().contains(ctx.row);
        if in_current_unit {
            if self.enclosing.is_none() && scope.kind() == ScopeKind::Class {
                self.enclosing = Some(scope);
            }
            self.cursor_chain.push(scope);
            self.candidates.extend(suggest_locals(scope, ctx));
        }

        if let Some(candidate) = suggest_namespace(scope, ctx)
            && let Some(qualified) = scope.qualified_name()
            && self.namespaces.insert(qualified)
        {
            self.candidates.push(candidate);
        }
        self.candidates.extend(suggest_type_name(scope, ctx));
        self.candidates.extend(suggest_struct(scope, ctx));
        self.candidates.extend(suggest_constructors(scope, ctx));
        if let Some(candidate) = suggest_this_member(scope, ctx, self.enclosing) {
            self.this_members.push(candidate);
        }
        self.candidates.extend(suggest_static_member(scope, ctx, usings));

        let (enums, addressed) = suggest_enum(scope, ctx);
        self.candidates.extend(enums);
        self.remove_enums |= addressed;
    }

    /// The innermost scope containing the cursor.
    fn current_scope(&self) -> Option<ScopeRef<'a>> {
        self.cursor_chain.last().copied()
    }
}

/// Collect the ordered candidates for `request`.
///
/// `usings` is the using/import set of the request's unit (including the
/// implicit default namespaces).  The caller is responsible for the empty
/// line check.
pub fn collect_candidates(
    snapshot: &RegistrySnapshot,
    request: &CompletionRequest,
    usings: &[String],
    keywords: &[Keyword],
) -> Vec<SuggestionCandidate> {
    let ctx = CompletionContext::new(request);
    let mut acc = Accumulator::default();

    // Depth-first, parents before children, siblings in declaration order.
    let mut stack: Vec<ScopeRef<'_>> = snapshot.all_scopes();
    stack.reverse();
    while let Some(scope) = stack.pop() {
        acc.visit(scope, &ctx, usings);
        let mut children: Vec<_> = scope.children().collect();
        children.reverse();
        stack.extend(children);
    }

    let members = member_access_type(snapshot, &acc, &ctx, usings)
        .map(|type_scope| suggest_members(snapshot, type_scope, &ctx, usings))
        .unwrap_or_default();
    let current_kind = acc
        .current_scope()
        .map(|scope| scope.kind())
        .unwrap_or(ScopeKind::Global);

    let mut candidates = acc.candidates;
    candidates.extend(members);
    let mut ordered = suggest_keywords(keywords, current_kind, &ctx);
    ordered.extend(acc.this_members);
    ordered.extend(candidates);

    if acc.remove_enums {
        ordered.retain(|candidate| candidate.kind != CandidateKind::Enum);
    }
    finalize(ordered, ctx.prefix)
}

/// Resolve the subject of a `subject.prefix` access to its type.
///
/// The first segment is looked up as a local of the scopes around the
/// cursor (innermost first), then as a field of the enclosing type; `this`
/// is the enclosing type itself and `new T ()` is `T`.  The remaining
/// segments are followed by the type resolver.  A bare `this.` is left to
/// the `this`-member predicate.
fn member_access_type<'a>(
    snapshot: &'a RegistrySnapshot,
    acc: &Accumulator<'a>,
    ctx: &CompletionContext<'_>,
    usings: &[String],
) -> Option<ScopeRef<'a>> {
    let access = ctx.member_access.as_ref()?;
    let segments = access.segments();
    let (root, rest) = segments.split_first()?;
    let path = rest.join(".");

    let resolved = if access.is_new {
        resolve_type(snapshot, TypeRef::Name(&segments.join(".")), "", usings)
    } else if root == "this" {
        if rest.is_empty() {
            return None;
        }
        resolve_type(snapshot, TypeRef::Scope(acc.enclosing?), &path, usings)
    } else if let Some(local) = find_local(acc, root, ctx.row) {
        resolve_type(snapshot, TypeRef::Name(&local.type_name), &path, usings)
    } else {
        let enclosing = acc.enclosing?;
        resolve_type(snapshot, TypeRef::Scope(enclosing), &segments.join("."), usings)
    };

    match resolved {
        ResolvedType::Scope(scope) => Some(scope),
        ResolvedType::Void => {
            tracing::debug!("Could not resolve the type of `{}`", access.subject);
            None
        }
    }
}

/// The nearest local named `name` visible at `row`.
fn find_local<'a>(acc: &Accumulator<'a>, name: &str, row: u32) -> Option<&'a LocalVariable> {
    acc.cursor_chain.iter().rev().find_map(|scope| {
        scope
            .locals()
            .iter()
            .rev()
            .find(|local| local.name == name && local.declared_at_line <= row)
    })
}

/// Move exact prefix matches to the front and assign sort keys.
fn finalize(mut candidates: Vec<SuggestionCandidate>, prefix: &str) -> Vec<SuggestionCandidate> {
    candidates.sort_by_key(|candidate| candidate.display_text != prefix);
    for (index, candidate) in candidates.iter_mut().enumerate() {
        candidate.sort_key = format!("{:05}", index);
    }
    candidates
}
