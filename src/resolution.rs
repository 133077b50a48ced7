/// Type resolution over a registry snapshot.
///
/// This module maps a type name as written in source (`Point`,
/// `Gee.ArrayList<string>`, `unowned Foo?`) plus a dotted member path
/// (`origin.x`, `get_origin ().x`) to the scope of the resulting type.
///
/// # Resolution pipeline
///
/// ## Type lookup ([`find_type`])
///
///   1. **Restricted pass**: walk the global and namespace scopes of every
///      unit in registry order.  Global scopes are always searched; a
///      namespace is searched only when its qualified name equals the
///      written qualifier, or, for unqualified names, when it is one of
///      the `usings`.  The first class, interface or struct with the
///      short name wins.
///   2. **Exhaustive pass**: on a miss, the same walk with every namespace
///      searched, so a type that is merely out of scope is still found.
///
/// ## Member paths ([`resolve_type`])
///
///   Call arguments are erased first, so only identifier chains are
///   followed.  Each segment is looked up among the current type's members
///   (then its bases, see [`crate::inheritance`]) and the member's declared
///   type becomes the next type, looked up by short name.  A missing
///   member or type anywhere gives [`ResolvedType::Void`].
use crate::inheritance;
use crate::registry::RegistrySnapshot;
use crate::types::{ResolvedType, ScopeKind, ScopeRef};
use crate::util::short_name;

/// Ownership keywords that may precede a type and never name it.
const OWNERSHIP_WORDS: &[&str] = &["owned", "unowned", "weak", "ref", "out", "params"];

/// The starting point of a resolution.
#[derive(Debug, Clone, Copy)]
pub enum TypeRef<'n, 'a> {
    /// A type name as written in source.
    Name(&'n str),
    /// An already resolved type scope.
    Scope(ScopeRef<'a>),
}

/// Resolve `type_ref` and then every segment of `member_path`.
pub fn resolve_type<'a>(
    snapshot: &'a RegistrySnapshot,
    type_ref: TypeRef<'_, 'a>,
    member_path: &str,
    usings: &[String],
) -> ResolvedType<'a> {
    let start = match type_ref {
        TypeRef::Name(name) => find_type(snapshot, name, usings),
        TypeRef::Scope(scope) => Some(scope),
    };
    let Some(mut current) = start else {
        return ResolvedType::Void;
    };

    let path = erase_call_arguments(member_path);
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let Some(member) = inheritance::find_member(snapshot, current, segment, usings) else {
            return ResolvedType::Void;
        };
        let next = if member.kind().is_type() {
            Some(member)
        } else {
            member
                .attributes()
                .declared_type()
                .and_then(|declared| find_type(snapshot, short_name(&normalize_type_name(declared)), usings))
        };
        match next {
            Some(next) => current = next,
            None => return ResolvedType::Void,
        }
    }

    ResolvedType::Scope(current)
}

/// Find the class, interface or struct a written type name refers to.
///
/// Runs the restricted pass, then the exhaustive pass on a miss.  Returns
/// `None` for empty names and names of built-in value types that have no
/// declaration anywhere.
pub fn find_type<'a>(
    snapshot: &'a RegistrySnapshot,
    name: &str,
    usings: &[String],
) -> Option<ScopeRef<'a>> {
    let normalized = normalize_type_name(name);
    if normalized.is_empty() {
        return None;
    }
    let (qualifier, short) = match normalized.rsplit_once('.') {
        Some((qualifier, short)) => (Some(qualifier), short),
        None => (None, normalized.as_str()),
    };

    let restricted = Lookup {
        short,
        qualifier,
        usings,
        exhaustive: false,
    };
    if let Some(found) = snapshot.roots().find_map(|root| restricted.search(root)) {
        return Some(found);
    }

    let exhaustive = Lookup {
        exhaustive: true,
        ..restricted
    };
    let found = snapshot.roots().find_map(|root| exhaustive.search(root));
    if found.is_some() {
        tracing::trace!("Resolved {} through the exhaustive pass", name);
    }
    found
}

#[derive(Clone, Copy)]
struct Lookup<'q> {
    short: &'q str,
    qualifier: Option<&'q str>,
    usings: &'q [String],
    exhaustive: bool,
}

impl Lookup<'_> {
    /// Search `container` (a global or namespace scope) and every namespace
    /// nested in it, depth-first in declaration order.
    fn search<'a>(&self, container: ScopeRef<'a>) -> Option<ScopeRef<'a>> {
        let entered = self.enters(container);
        for child in container.children() {
            if entered && child.kind().is_type() && child.name() == Some(self.short) {
                return Some(child);
            }
            if child.kind() == ScopeKind::Namespace
                && let Some(found) = self.search(child)
            {
                return Some(found);
            }
        }
        None
    }

    fn enters(&self, container: ScopeRef<'_>) -> bool {
        if container.kind() == ScopeKind::Global || self.exhaustive {
            return true;
        }
        let Some(qualified) = container.qualified_name() else {
            return false;
        };
        match self.qualifier {
            Some(qualifier) => qualified == qualifier,
            None => self.usings.iter().any(|u| *u == qualified),
        }
    }
}

/// Reduce a written type to the dotted name it refers to.
///
/// Ownership keywords, generic arguments, nullable `?`, array `[]` and
/// pointer `*` suffixes are removed: `unowned Gee.List<string>?` gives
/// `Gee.List`.  `global::` prefixes are dropped.
pub fn normalize_type_name(type_name: &str) -> String {
    let mut rest = type_name.trim();
    while let Some((word, tail)) = rest.split_once(char::is_whitespace) {
        if !OWNERSHIP_WORDS.contains(&word) {
            break;
        }
        rest = tail.trim_start();
    }
    let rest = rest.strip_prefix("global::").unwrap_or(rest);

    let end = rest.find(['<', '?', '[', '*']).unwrap_or(rest.len());
    rest[..end]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Remove balanced `(...)` and `[...]` groups and all whitespace:
/// `get_origin (1, 2) .x` gives `get_origin.x`.  Unclosed groups run to
/// the end of the text.
pub fn erase_call_arguments(path: &str) -> String {
    let mut depth: u32 = 0;
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && !c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    out
}
