/// The scope registry: every parsed unit known to the server.
///
/// Units are keyed by `(unit id, is_external)`, so re-parsing an edited
/// file never touches a `.vapi` unit of the same name and vice versa.
/// Re-parsing replaces a unit in place, keeping its original insertion
/// position.  Iteration order is fixed: external declaration units first,
/// then live units, each group in insertion order.  Completion predicates
/// that take the *first* match (the enclosing class, type lookup) depend
/// on that order.
///
/// Readers never iterate the registry directly.  They take a
/// [`RegistrySnapshot`], an immutable list of `Arc<ParsedUnit>`, so a
/// re-parse arriving mid-completion cannot change what the traversal sees.
use std::sync::Arc;

use crate::types::{ParsedUnit, ScopeRef};

#[derive(Debug, Default)]
pub struct ScopeRegistry {
    units: Vec<Arc<ParsedUnit>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parsed unit, replacing any previous unit with the same id
    /// and external flag.
    pub fn upsert_unit(&mut self, parsed: ParsedUnit) {
        let parsed = Arc::new(parsed);
        match self
            .units
            .iter_mut()
            .find(|u| u.unit == parsed.unit && u.is_external == parsed.is_external)
        {
            Some(slot) => *slot = parsed,
            None => self.units.push(parsed),
        }
    }

    /// Drop every unit (live or external) with the given id.  Returns
    /// whether anything was removed.
    pub fn remove_unit(&mut self, unit_id: &str) -> bool {
        let before = self.units.len();
        self.units.retain(|u| u.unit.as_str() != unit_id);
        self.units.len() != before
    }

    /// The live unit with this id, falling back to an external one.
    pub fn unit(&self, unit_id: &str) -> Option<Arc<ParsedUnit>> {
        self.units
            .iter()
            .filter(|u| u.unit.as_str() == unit_id)
            .min_by_key(|u| u.is_external)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// An immutable view of every unit in iteration order.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let (external, live): (Vec<_>, Vec<_>) =
            self.units.iter().cloned().partition(|u| u.is_external);
        RegistrySnapshot {
            units: external.into_iter().chain(live).collect(),
        }
    }
}

/// A point-in-time view of the registry.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    units: Vec<Arc<ParsedUnit>>,
}

impl RegistrySnapshot {
    pub fn units(&self) -> &[Arc<ParsedUnit>] {
        &self.units
    }

    /// The global root scope of every unit, in iteration order.
    pub fn roots(&self) -> impl Iterator<Item = ScopeRef<'_>> {
        self.units.iter().map(|u| u.root())
    }

    /// Every top-level scope (direct children of each unit's root), in
    /// iteration order.
    pub fn all_scopes(&self) -> Vec<ScopeRef<'_>> {
        self.roots().flat_map(|root| root.children()).collect()
    }

    /// The live unit with this id, falling back to an external one.
    pub fn unit(&self, unit_id: &str) -> Option<&ParsedUnit> {
        self.units
            .iter()
            .filter(|u| u.unit.as_str() == unit_id)
            .min_by_key(|u| u.is_external)
            .map(|u| u.as_ref())
    }
}
