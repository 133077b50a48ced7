/// Member lookup through base types.
///
/// A class, interface or struct header keeps its base list raw
/// (`Object, Gee.Iterable<T>`).  This module resolves those names with the
/// regular type lookup and walks the resulting hierarchy, so that member
/// access sees inherited methods and properties:
///
///   own members > first base (and its bases) > later bases
///
/// Private members are never inherited.  A depth limit of 20 and a visited
/// set stop the walk on circular or pathological hierarchies.
use crate::parser::split_top_level;
use crate::registry::RegistrySnapshot;
use crate::resolution::find_type;
use crate::types::{ScopeKind, ScopeRef};

const MAX_DEPTH: u32 = 20;

/// The written names in a type's base list, in declaration order.
pub fn base_type_names<'a>(scope: ScopeRef<'a>) -> Vec<&'a str> {
    let Some(inherits) = scope.attributes().inherits.as_deref() else {
        return Vec::new();
    };
    split_top_level(inherits, ',', true)
        .into_iter()
        .map(|(name, _)| name.trim())
        .filter(|name| !name.is_empty())
        .collect()
}

/// The resolvable direct bases of a type scope.  A base that resolves to
/// the type itself is skipped.
pub fn base_types<'a>(
    snapshot: &'a RegistrySnapshot,
    scope: ScopeRef<'a>,
    usings: &[String],
) -> Vec<ScopeRef<'a>> {
    base_type_names(scope)
        .into_iter()
        .filter_map(|name| find_type(snapshot, name, usings))
        .filter(|base| *base != scope)
        .collect()
}

/// The member named `name` on `type_scope` or, failing that, on the first
/// base that has one.  Methods, properties and nested types count as
/// members; constructors do not.
pub fn find_member<'a>(
    snapshot: &'a RegistrySnapshot,
    type_scope: ScopeRef<'a>,
    name: &str,
    usings: &[String],
) -> Option<ScopeRef<'a>> {
    let mut found = None;
    walk_hierarchy(snapshot, type_scope, usings, |ty, inherited| {
        found = ty
            .children()
            .filter(|m| is_member(*m) && !(inherited && m.attributes().is_private()))
            .find(|m| m.name() == Some(name));
        found.is_some()
    });
    found
}

/// Methods and properties that `type_scope` inherits from its bases.
///
/// Members the type declares itself, and members hidden by a nearer base,
/// are left out, so the result never repeats a name.
pub fn inherited_members<'a>(
    snapshot: &'a RegistrySnapshot,
    type_scope: ScopeRef<'a>,
    usings: &[String],
) -> Vec<ScopeRef<'a>> {
    let mut seen: Vec<&str> = type_scope.children().filter_map(|m| m.name()).collect();
    let mut members = Vec::new();
    walk_hierarchy(snapshot, type_scope, usings, |ty, inherited| {
        if !inherited {
            return false;
        }
        for member in ty.children() {
            if !matches!(member.kind(), ScopeKind::Method | ScopeKind::Property)
                || member.attributes().is_private()
            {
                continue;
            }
            if let Some(name) = member.name()
                && !seen.contains(&name)
            {
                seen.push(name);
                members.push(member);
            }
        }
        false
    });
    members
}

fn is_member(scope: ScopeRef<'_>) -> bool {
    matches!(
        scope.kind(),
        ScopeKind::Method
            | ScopeKind::Property
            | ScopeKind::Class
            | ScopeKind::Interface
            | ScopeKind::Struct
            | ScopeKind::Enum
    )
}

/// Visit `root` and then its bases depth-first.  `visit` receives each
/// type and whether it is inherited (not `root`); returning `true` stops
/// the walk.
fn walk_hierarchy<'a>(
    snapshot: &'a RegistrySnapshot,
    root: ScopeRef<'a>,
    usings: &[String],
    mut visit: impl FnMut(ScopeRef<'a>, bool) -> bool,
) {
    let mut visited: Vec<ScopeRef<'a>> = Vec::new();
    let mut stack = vec![(root, 0u32)];
    while let Some((ty, depth)) = stack.pop() {
        if depth > MAX_DEPTH || visited.contains(&ty) {
            continue;
        }
        visited.push(ty);
        if visit(ty, depth > 0) {
            return;
        }
        let bases = base_types(snapshot, ty, usings);
        stack.extend(bases.into_iter().rev().map(|base| (base, depth + 1)));
    }
}
