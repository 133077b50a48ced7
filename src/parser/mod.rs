/// Vala parsing and scope tree construction.
///
/// This module turns the text of one unit into a [`ParsedUnit`]: a tree of
/// [`Scope`]s rooted at the unit's global scope, plus the namespaces named
/// by its `using` directives.  Parsing is line-oriented and regex-level; it
/// never fails.  Unrecognised constructs are skipped, stray closing braces
/// are ignored, and scopes left open at the end of the text extend to the
/// last line.
///
/// Sub-modules:
/// - [`lexer`]: comment / literal stripping, doc attachment, line joining
/// - [`declarations`]: header classification (namespaces, types, members,
///   control blocks)
/// - [`locals`]: local variable and parameter extraction
/// - [`use_statements`]: `using` directive extraction
/// - [`unit_update`]: the `update_unit` orchestrator feeding the registry
mod declarations;
mod lexer;
mod locals;
mod unit_update;
mod use_statements;

use ustr::Ustr;

use crate::docblock::parse_documentation;
use crate::types::*;

use declarations::{
    DeclContext, Header, classify_declaration, classify_header, enum_values, strip_attributes,
};
use lexer::{LogicalLine, split_top_level_ranges};
use locals::parse_local_declarations;
use use_statements::{merge_usings, parse_using};

pub(crate) use lexer::{ends_outside_code, split_top_level};

/// Parse `source` as a live (non-external) unit.
pub fn build(source: &str, unit_id: &str) -> ParsedUnit {
    build_unit(source, unit_id, false)
}

/// Parse `source` into the scope tree of unit `unit_id`.
///
/// Pure: the result depends only on the arguments, so parsing the same
/// text twice yields identical trees.
pub fn build_unit(source: &str, unit_id: &str, is_external: bool) -> ParsedUnit {
    let mut builder = ScopeBuilder::new(Ustr::from(unit_id), is_external, lexer::line_count(source));
    for line in lexer::logical_lines(source) {
        builder.feed(&line);
    }
    builder.finish()
}

// ─── Builder state ──────────────────────────────────────────────────────────

/// One entry of the brace stack.
#[derive(Debug, Clone, Copy)]
enum Frame {
    Scope {
        id: ScopeId,
        /// For enum scopes: whether the value list has been terminated by
        /// a `;`.
        values_done: bool,
    },
    /// Initializer braces (`= { 1, 2 }`): counted but never a scope.
    Opaque,
}

/// A header seen at the end of a line whose `{` may follow on the next.
#[derive(Debug)]
struct PendingHeader {
    header: Header,
    start: u32,
    end: u32,
    doc: Option<String>,
}

struct ScopeBuilder {
    unit: UnitId,
    is_external: bool,
    line_count: u32,
    scopes: Vec<Scope>,
    frames: Vec<Frame>,
    pending: Option<PendingHeader>,
    /// Doc comment of an attribute-only line, waiting for its declaration.
    attribute_doc: Option<String>,
    usings: Vec<String>,
}

/// Whether a block header is really the start of an initializer or an
/// argument list (`int[] a = {`, `foo ({`).
fn is_initializer(header: &str) -> bool {
    let header = header.trim_end();
    !header.ends_with("=>") && header.ends_with(['=', '(', ',', '['])
}

fn is_attribute_line(text: &str) -> bool {
    text.trim_start().starts_with('[')
        && !text.contains(['{', '}'])
        && strip_attributes(text).trim().is_empty()
}

fn leading_ws(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

impl ScopeBuilder {
    fn new(unit: UnitId, is_external: bool, line_count: u32) -> Self {
        let mut root = Scope::new(ScopeKind::Global, None, unit, is_external);
        root.range = LineRange::new(0, line_count);
        Self {
            unit,
            is_external,
            line_count,
            scopes: vec![root],
            frames: vec![Frame::Scope {
                id: 0,
                values_done: false,
            }],
            pending: None,
            attribute_doc: None,
            usings: Vec::new(),
        }
    }

    fn finish(mut self) -> ParsedUnit {
        self.flush_pending();
        ParsedUnit {
            unit: self.unit,
            is_external: self.is_external,
            scopes: self.scopes,
            usings: self.usings,
            line_count: self.line_count,
        }
    }

    fn in_opaque(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::Opaque))
    }

    /// The innermost open scope.
    fn context_id(&self) -> ScopeId {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Frame::Scope { id, .. } => Some(*id),
                Frame::Opaque => None,
            })
            .unwrap_or(0)
    }

    fn context(&self) -> DeclContext<'_> {
        let scope = &self.scopes[self.context_id()];
        let type_name = match scope.kind {
            ScopeKind::Class | ScopeKind::Struct => scope.name.as_deref(),
            _ => None,
        };
        DeclContext {
            kind: scope.kind,
            type_name,
        }
    }

    /// Whether the innermost scope frame has seen the end of its enum
    /// value list.
    fn enum_values_done(&self) -> bool {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| match frame {
                Frame::Scope { values_done, .. } => Some(*values_done),
                Frame::Opaque => None,
            })
            .unwrap_or(true)
    }

    fn values_done_mut(&mut self) -> Option<&mut bool> {
        self.frames.iter_mut().rev().find_map(|frame| match frame {
            Frame::Scope { values_done, .. } => Some(values_done),
            Frame::Opaque => None,
        })
    }

    // ─── Line processing ────────────────────────────────────────────────

    fn feed(&mut self, line: &LogicalLine) {
        let text = line.text.as_str();
        let carried = self.attribute_doc.take();
        let mut doc = line.doc.clone().or(carried);

        // `[Compact]` or `[CCode (...)]` on a line of its own.
        if !self.in_opaque() && is_attribute_line(text) {
            self.flush_pending();
            self.attribute_doc = doc;
            return;
        }
        let mut last = 0;
        for (idx, c) in text.char_indices() {
            if c != '{' && c != '}' {
                continue;
            }
            let piece = &text[last..idx];
            let brace_line = line.line_at(idx);
            if c == '{' {
                self.open_brace(line, last, piece, brace_line, &mut doc);
            } else {
                self.close_brace(line, last, piece, brace_line, &mut doc);
            }
            last = idx + 1;
        }

        if self.in_opaque() {
            return;
        }
        let tail = &text[last..];
        if let Some((offset, header)) = self.statements(line, last, tail, &mut doc) {
            let start = line.line_at(offset);
            let parsed = classify_header(header, self.context());
            match parsed {
                Some(parsed) => {
                    self.pending = Some(PendingHeader {
                        header: parsed,
                        start,
                        end: line.end,
                        doc: doc.take(),
                    });
                }
                None => self.statement(header, false, start, line.end, &mut doc),
            }
        }
    }

    /// Process the `;`-terminated statements of `piece` and return the
    /// unterminated remainder (trimmed) with its byte offset in the line.
    fn statements<'t>(
        &mut self,
        line: &LogicalLine,
        offset: usize,
        piece: &'t str,
        doc: &mut Option<String>,
    ) -> Option<(usize, &'t str)> {
        let mut remainder = None;
        for (range, terminated) in split_top_level_ranges(piece, ';', false) {
            let text = &piece[range.clone()];
            if text.trim().is_empty() {
                continue;
            }
            self.flush_pending();
            let abs = offset + range.start + leading_ws(text);
            if terminated {
                let start = line.line_at(abs);
                let end = line.line_at(offset + range.end);
                self.statement(text.trim(), true, start, end, doc);
            } else {
                remainder = Some((abs, text.trim()));
            }
        }
        remainder
    }

    fn open_brace(
        &mut self,
        line: &LogicalLine,
        offset: usize,
        piece: &str,
        brace_line: u32,
        doc: &mut Option<String>,
    ) {
        if self.in_opaque() {
            self.frames.push(Frame::Opaque);
            return;
        }

        let Some((header_offset, header)) = self.statements(line, offset, piece, doc) else {
            match self.pending.take() {
                Some(pending) => self.open(pending.header, pending.start, pending.doc),
                None => self.open(Header::Control { locals: Vec::new() }, brace_line, None),
            }
            return;
        };

        let start = line.line_at(header_offset);
        if is_initializer(header) {
            if let Some(declaration) = header.trim_end().strip_suffix('=') {
                self.statement(declaration.trim(), false, start, brace_line, doc);
            }
            self.frames.push(Frame::Opaque);
            return;
        }

        let parsed = classify_header(header, self.context())
            .unwrap_or(Header::Control { locals: Vec::new() });
        let doc = match parsed {
            Header::Control { .. } => None,
            _ => doc.take(),
        };
        self.open(parsed, start, doc);
    }

    fn close_brace(
        &mut self,
        line: &LogicalLine,
        offset: usize,
        piece: &str,
        brace_line: u32,
        doc: &mut Option<String>,
    ) {
        if self.in_opaque() {
            self.frames.pop();
            return;
        }

        if let Some((rest_offset, rest)) = self.statements(line, offset, piece, doc) {
            let start = line.line_at(rest_offset);
            self.statement(rest, false, start, brace_line, doc);
        }
        self.flush_pending();

        // The root frame is never popped; an unmatched `}` is ignored.
        if self.frames.len() > 1
            && let Some(Frame::Scope { id, .. }) = self.frames.pop()
        {
            let scope = &mut self.scopes[id];
            scope.range = LineRange::new(scope.range.start, brace_line + 1);
        }
    }

    /// Handle one statement of the current context.
    fn statement(
        &mut self,
        text: &str,
        terminated: bool,
        start: u32,
        end: u32,
        doc: &mut Option<String>,
    ) {
        if text.is_empty() {
            return;
        }
        self.flush_pending();

        let kind = self.scopes[self.context_id()].kind;
        match kind {
            ScopeKind::Enum if !self.enum_values_done() => {
                let values = enum_values(text);
                let id = self.context_id();
                self.scopes[id].attributes.enum_values.extend(values);
                if terminated && let Some(done) = self.values_done_mut() {
                    *done = true;
                }
            }
            kind if kind.is_declaration_context() => {
                if matches!(kind, ScopeKind::Global | ScopeKind::Namespace)
                    && let Some(names) = parse_using(text)
                {
                    merge_usings(&mut self.usings, names);
                    return;
                }
                let parsed = classify_declaration(text, self.context());
                if let Some(
                    header @ (Header::Method { .. }
                    | Header::Constructor { .. }
                    | Header::Property { .. }),
                ) = parsed
                {
                    let doc = doc.take();
                    self.add_leaf(header, start, end, doc);
                }
            }
            _ => {
                let declared = parse_local_declarations(text);
                if declared.is_empty() {
                    return;
                }
                let short_doc = doc
                    .take()
                    .and_then(|raw| parse_documentation(&raw).short);
                let id = self.context_id();
                self.scopes[id]
                    .locals
                    .extend(declared.into_iter().map(|local| LocalVariable {
                        name: local.name,
                        type_name: local.type_name,
                        declared_at_line: start,
                        short_doc: short_doc.clone(),
                    }));
            }
        }
    }

    /// A header whose `{` never came: member declarations become leaf
    /// scopes, anything else is dropped.
    fn flush_pending(&mut self) {
        if let Some(pending) = self.pending.take()
            && matches!(
                pending.header,
                Header::Method { .. } | Header::Constructor { .. } | Header::Property { .. }
            )
        {
            self.add_leaf(pending.header, pending.start, pending.end, pending.doc);
        }
    }

    // ─── Scope creation ─────────────────────────────────────────────────

    /// Open a scope with a body and push it on the brace stack.
    fn open(&mut self, header: Header, start: u32, doc: Option<String>) {
        let id = self.create(header, start, self.line_count, doc);
        self.frames.push(Frame::Scope {
            id,
            values_done: false,
        });
    }

    /// Add a body-less declaration spanning `start..=end`.
    fn add_leaf(&mut self, header: Header, start: u32, end: u32, doc: Option<String>) {
        self.create(header, start, end + 1, doc);
    }

    fn create(&mut self, header: Header, start: u32, end: u32, doc: Option<String>) -> ScopeId {
        let parent = self.context_id();
        let kind = header.kind();
        let mut scope = Scope::new(kind, None, self.unit, self.is_external);
        scope.parent = Some(parent);
        scope.range = LineRange::new(start, end.min(self.line_count).max(start));
        scope.documentation = doc
            .map(|raw| parse_documentation(&raw))
            .unwrap_or_default();

        match header {
            Header::Namespace(name) => scope.name = Some(name),
            Header::Type {
                name,
                modifiers,
                inherits,
                ..
            } => {
                scope.name = Some(name);
                scope.attributes.modifiers = modifiers;
                scope.attributes.inherits = inherits;
            }
            Header::Method {
                name,
                modifiers,
                return_type,
                parameters,
            } => {
                scope.name = Some(name);
                scope.attributes.modifiers = modifiers;
                scope.attributes.return_type = Some(return_type);
                scope.locals = parameter_locals(&parameters, start);
                scope.attributes.parameters = parameters;
            }
            Header::Constructor {
                name,
                modifiers,
                parameters,
            } => {
                scope.name = Some(name);
                scope.attributes.modifiers = modifiers;
                scope.locals = parameter_locals(&parameters, start);
                scope.attributes.parameters = parameters;
            }
            Header::Property {
                name,
                modifiers,
                value_type,
            } => {
                scope.name = Some(name);
                scope.attributes.modifiers = modifiers;
                scope.attributes.value_type = Some(value_type);
            }
            Header::Control { locals } => {
                scope.locals = locals
                    .into_iter()
                    .map(|(type_name, name)| LocalVariable {
                        name,
                        type_name,
                        declared_at_line: start,
                        short_doc: None,
                    })
                    .collect();
            }
        }

        self.clamp_previous_sibling(parent, scope.range.start);
        let id = self.scopes.len();
        self.scopes.push(scope);
        self.scopes[parent].children.push(id);
        id
    }

    /// Keep siblings disjoint: a closed sibling that ends on the line the
    /// new scope starts (`} else {`) is cut back to that line, together
    /// with its descendants.
    fn clamp_previous_sibling(&mut self, parent: ScopeId, start: u32) {
        let Some(&previous) = self.scopes[parent].children.last() else {
            return;
        };
        if self.scopes[previous].range.end <= start {
            return;
        }
        let mut stack = vec![previous];
        while let Some(id) = stack.pop() {
            let scope = &mut self.scopes[id];
            let end = scope.range.end.min(start);
            scope.range = LineRange::new(scope.range.start.min(end), end);
            stack.extend(scope.children.iter().copied());
        }
    }
}

fn parameter_locals(parameters: &[ParameterInfo], line: u32) -> Vec<LocalVariable> {
    parameters
        .iter()
        .map(|param| LocalVariable {
            name: param.name.clone(),
            type_name: param.type_name.clone(),
            declared_at_line: line,
            short_doc: None,
        })
        .collect()
}
