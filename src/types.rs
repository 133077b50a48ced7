//! Data types used throughout the Valhalla server.
//!
//! This module contains the scope model produced by the parser (scope
//! kinds, ranges, parameters, local variables, documentation), the parsed
//! unit arena that owns a tree of scopes, the borrowed [`ScopeRef`] handle
//! used to navigate that tree, and the completion candidate types handed
//! back to the editor.
use std::fmt;

use ustr::Ustr;

/// Identifier of a source unit (a file URI, a `.vapi` file name, or any
/// synthetic name chosen by the caller).  Interned so the completion
/// traversal can compare units cheaply.
pub type UnitId = Ustr;

/// Index of a scope inside its [`ParsedUnit`] arena.
pub type ScopeId = usize;

/// The kind of declaration a scope represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Namespace,
    Class,
    Interface,
    Struct,
    Enum,
    Method,
    Constructor,
    Property,
    Block,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Namespace => "namespace",
            ScopeKind::Class => "class",
            ScopeKind::Interface => "interface",
            ScopeKind::Struct => "struct",
            ScopeKind::Enum => "enum",
            ScopeKind::Method => "method",
            ScopeKind::Constructor => "constructor",
            ScopeKind::Property => "property",
            ScopeKind::Block => "block",
        }
    }

    /// Kinds that can be the target of a type name (`Foo x;`).
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            ScopeKind::Class | ScopeKind::Interface | ScopeKind::Struct
        )
    }

    /// Kinds that only hold declarations (no statements).
    pub fn is_declaration_context(&self) -> bool {
        matches!(
            self,
            ScopeKind::Global
                | ScopeKind::Namespace
                | ScopeKind::Class
                | ScopeKind::Interface
                | ScopeKind::Struct
                | ScopeKind::Enum
        )
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A half-open line range `[start, end)` inside the owning unit.
///
/// A declaration starts on its header line and ends one past the line of
/// its closing delimiter, so `contains` is true for every line from the
/// header up to and including the closing brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn contains(&self, row: u32) -> bool {
        self.start <= row && row < self.end
    }

    /// Whether `other` lies entirely within this range.
    pub fn encloses(&self, other: &LineRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges share at least one line.  Empty ranges
    /// never overlap anything.
    pub fn overlaps(&self, other: &LineRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Stores extracted parameter information from a method or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// The parameter name (e.g. "count").
    pub name: String,
    /// The declared type as written (e.g. "int", "Gee.List<string>").
    pub type_name: String,
    /// Optional direction / ownership modifier (`out`, `ref`, `owned`,
    /// `unowned`, `params`).
    pub modifier: Option<String>,
}

/// A local variable declared directly inside a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub name: String,
    /// Declared type, or the inferred type for `var` declarations when it
    /// can be read off the initializer (falls back to `"var"`).
    pub type_name: String,
    pub declared_at_line: u32,
    pub short_doc: Option<String>,
}

/// Documentation extracted from a declaration's leading `/** ... */`
/// comment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Documentation {
    /// First sentence of the first paragraph.
    pub short: Option<String>,
    /// The whole cleaned comment text.
    pub long: Option<String>,
}

/// Kind-specific declaration details.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeAttributes {
    /// Every modifier keyword in declaration order (`public`, `static`, ...).
    pub modifiers: Vec<String>,
    /// Method return type.
    pub return_type: Option<String>,
    /// Property / field type.
    pub value_type: Option<String>,
    /// Raw comma-separated base list of a class, interface or struct.
    pub inherits: Option<String>,
    pub parameters: Vec<ParameterInfo>,
    /// Enum or error-domain member names in declaration order.
    pub enum_values: Vec<String>,
}

/// Modifiers that only express visibility and carry no semantic weight
/// for completion.
const VISIBILITY_MODIFIERS: &[&str] = &["public", "private", "protected", "internal"];

impl ScopeAttributes {
    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }

    pub fn is_const(&self) -> bool {
        self.modifiers.iter().any(|m| m == "const")
    }

    pub fn is_private(&self) -> bool {
        self.modifiers.iter().any(|m| m == "private")
    }

    /// The primary non-visibility modifier.  `static` wins when present,
    /// otherwise the first remaining modifier.
    pub fn modifier(&self) -> Option<&str> {
        if self.is_static() {
            return Some("static");
        }
        self.modifiers
            .iter()
            .map(String::as_str)
            .find(|m| !VISIBILITY_MODIFIERS.contains(m))
    }

    /// The declared type of a member: the value type for properties and
    /// the return type for methods.
    pub fn declared_type(&self) -> Option<&str> {
        self.value_type
            .as_deref()
            .or(self.return_type.as_deref())
    }
}

/// One node of the symbol tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Declared identifier; `None` for the global root and blocks.
    pub name: Option<String>,
    pub unit: UnitId,
    pub is_external_declaration: bool,
    pub range: LineRange,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub attributes: ScopeAttributes,
    pub locals: Vec<LocalVariable>,
    pub documentation: Documentation,
}

impl Scope {
    pub fn new(kind: ScopeKind, name: Option<String>, unit: UnitId, is_external: bool) -> Self {
        Self {
            kind,
            name,
            unit,
            is_external_declaration: is_external,
            range: LineRange::default(),
            parent: None,
            children: Vec::new(),
            attributes: ScopeAttributes::default(),
            locals: Vec::new(),
            documentation: Documentation::default(),
        }
    }
}

/// The scope tree of one parsed unit.
///
/// Scopes live in an arena; index `0` is always the global root.  Parents
/// own their children through the `children` index lists and children
/// refer back through `parent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUnit {
    pub unit: UnitId,
    pub is_external: bool,
    pub scopes: Vec<Scope>,
    /// Namespaces named by `using` directives, top to bottom.
    pub usings: Vec<String>,
    pub line_count: u32,
}

impl ParsedUnit {
    pub fn root(&self) -> ScopeRef<'_> {
        ScopeRef { unit: self, id: 0 }
    }

    pub fn get(&self, id: ScopeId) -> Option<ScopeRef<'_>> {
        (id < self.scopes.len()).then_some(ScopeRef { unit: self, id })
    }

    /// Every scope of the unit in depth-first declaration order, root
    /// first.
    pub fn iter(&self) -> impl Iterator<Item = ScopeRef<'_>> {
        let mut stack = vec![0];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            let scope = &self.scopes[id];
            stack.extend(scope.children.iter().rev().copied());
            Some(ScopeRef { unit: self, id })
        })
    }
}

/// A borrowed handle to one scope inside a [`ParsedUnit`].
#[derive(Clone, Copy)]
pub struct ScopeRef<'a> {
    unit: &'a ParsedUnit,
    id: ScopeId,
}

impl<'a> ScopeRef<'a> {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn parsed_unit(&self) -> &'a ParsedUnit {
        self.unit
    }

    pub fn scope(&self) -> &'a Scope {
        &self.unit.scopes[self.id]
    }

    pub fn kind(&self) -> ScopeKind {
        self.scope().kind
    }

    pub fn name(&self) -> Option<&'a str> {
        self.scope().name.as_deref()
    }

    pub fn unit_id(&self) -> UnitId {
        self.unit.unit
    }

    pub fn range(&self) -> LineRange {
        self.scope().range
    }

    pub fn attributes(&self) -> &'a ScopeAttributes {
        &self.scope().attributes
    }

    pub fn locals(&self) -> &'a [LocalVariable] {
        &self.scope().locals
    }

    pub fn documentation(&self) -> &'a Documentation {
        &self.scope().documentation
    }

    pub fn parent(&self) -> Option<ScopeRef<'a>> {
        self.scope().parent.map(|id| ScopeRef {
            unit: self.unit,
            id,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = ScopeRef<'a>> + use<'a> {
        let unit = self.unit;
        self.unit.scopes[self.id]
            .children
            .iter()
            .map(move |&id| ScopeRef { unit, id })
    }

    /// Dotted name of a namespace including every enclosing namespace
    /// (`namespace Foo { namespace Bar {` gives `Foo.Bar`).  For other
    /// kinds this is just the scope's own name.
    pub fn qualified_name(&self) -> Option<String> {
        let own = self.name()?;
        if self.kind() != ScopeKind::Namespace {
            return Some(own.to_string());
        }
        let mut parts = vec![own];
        let mut current = self.parent();
        while let Some(scope) = current {
            if scope.kind() != ScopeKind::Namespace {
                break;
            }
            if let Some(name) = scope.name() {
                parts.push(name);
            }
            current = scope.parent();
        }
        parts.reverse();
        Some(parts.join("."))
    }
}

impl PartialEq for ScopeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.unit, other.unit) && self.id == other.id
    }
}

impl Eq for ScopeRef<'_> {}

impl fmt::Debug for ScopeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeRef")
            .field("unit", &self.unit.unit)
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

/// The outcome of type resolution: either a type scope or the `void`
/// sentinel used whenever a name cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedType<'a> {
    Scope(ScopeRef<'a>),
    Void,
}

impl<'a> ResolvedType<'a> {
    pub fn is_void(&self) -> bool {
        matches!(self, ResolvedType::Void)
    }

    pub fn scope(&self) -> Option<ScopeRef<'a>> {
        match self {
            ResolvedType::Scope(scope) => Some(*scope),
            ResolvedType::Void => None,
        }
    }
}

// ─── Completion candidates ──────────────────────────────────────────────────

/// How a candidate is inserted into the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    Text(String),
    /// An LSP / TextMate snippet with `${n:name}` placeholders.
    Snippet(String),
}

impl Insertion {
    pub fn as_str(&self) -> &str {
        match self {
            Insertion::Text(text) | Insertion::Snippet(text) => text,
        }
    }

    pub fn is_snippet(&self) -> bool {
        matches!(self, Insertion::Snippet(_))
    }
}

/// What a candidate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    Import,
    Namespace,
    Class,
    Interface,
    Struct,
    Enum,
    /// An enum member.
    Value,
    Method,
    Constructor,
    Property,
    Variable,
    Keyword,
    Block,
}

impl From<ScopeKind> for CandidateKind {
    fn from(kind: ScopeKind) -> Self {
        match kind {
            ScopeKind::Global | ScopeKind::Block => CandidateKind::Block,
            ScopeKind::Namespace => CandidateKind::Namespace,
            ScopeKind::Class => CandidateKind::Class,
            ScopeKind::Interface => CandidateKind::Interface,
            ScopeKind::Struct => CandidateKind::Struct,
            ScopeKind::Enum => CandidateKind::Enum,
            ScopeKind::Method => CandidateKind::Method,
            ScopeKind::Constructor => CandidateKind::Constructor,
            ScopeKind::Property => CandidateKind::Property,
        }
    }
}

/// One completion offer.  Created fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionCandidate {
    pub insert: Insertion,
    pub display_text: String,
    pub kind: CandidateKind,
    pub left_label: Option<String>,
    pub description: Option<String>,
    /// Assigned once the final order is known.
    pub sort_key: String,
}

impl SuggestionCandidate {
    /// A plain-text candidate whose display text is its insert text.
    pub fn text(text: impl Into<String>, kind: CandidateKind) -> Self {
        let text = text.into();
        Self {
            insert: Insertion::Text(text.clone()),
            display_text: text,
            kind,
            left_label: None,
            description: None,
            sort_key: String::new(),
        }
    }

    pub fn snippet(
        snippet: impl Into<String>,
        display_text: impl Into<String>,
        kind: CandidateKind,
    ) -> Self {
        Self {
            insert: Insertion::Snippet(snippet.into()),
            display_text: display_text.into(),
            kind,
            left_label: None,
            description: None,
            sort_key: String::new(),
        }
    }

    pub fn with_display_text(mut self, display_text: impl Into<String>) -> Self {
        self.display_text = display_text.into();
        self
    }

    pub fn with_left_label(mut self, label: Option<String>) -> Self {
        self.left_label = label.filter(|l| !l.is_empty());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }
}

/// A completion request as the core sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub unit_id: String,
    pub row: u32,
    pub column: u32,
    /// Text of the cursor's line from column 0 up to the cursor.
    pub line_before_cursor: String,
    /// Identifier characters immediately before the cursor (may be empty).
    pub prefix: String,
}
