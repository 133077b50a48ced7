/// Completion request orchestration.
///
/// This module contains [`Backend::complete`], the asynchronous core entry
/// point, and `handle_completion`, the `textDocument/completion` adapter
/// called by `server.rs`.
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

use crate::Backend;
use crate::completion::builder::to_completion_item;
use crate::completion::engine::collect_candidates;
use crate::parser::ends_outside_code;
use crate::types::{CompletionRequest, SuggestionCandidate};
use crate::util::extract_prefix;

impl Backend {
    /// Compute the ordered candidates for `request`.
    ///
    /// Waits for a pending external-declaration load first.  When the
    /// trimmed line before the cursor is empty the returned future never
    /// resolves; the LSP adapter checks for that case itself.  A cursor
    /// inside a line comment or an unterminated literal gets nothing.
    pub async fn complete(&self, request: CompletionRequest) -> Vec<SuggestionCandidate> {
        if request.line_before_cursor.trim().is_empty() {
            return std::future::pending().await;
        }
        if ends_outside_code(&request.line_before_cursor) {
            return Vec::new();
        }

        self.wait_for_external_declarations().await;

        let snapshot = self.registry_snapshot();
        let usings = self.usings_in_scope(&request.unit_id);
        collect_candidates(&snapshot, &request, &usings, &self.keywords)
    }

    /// The using/import set of a unit: the configured default namespaces
    /// followed by the unit's own `using` names, without duplicates.
    pub fn usings_in_scope(&self, unit_id: &str) -> Vec<String> {
        let mut usings = self.config.read().default_namespaces.clone();
        for name in self.usings_for_unit(unit_id).unwrap_or_default() {
            if !usings.contains(&name) {
                usings.push(name);
            }
        }
        usings
    }

    /// Main completion handler, called by `LanguageServer::completion`.
    pub(crate) async fn handle_completion(
        &self,
        params: CompletionParams,
    ) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri.to_string();
        let position = params.text_document_position.position;

        let Some(content) = self.open_files.lock().get(&uri).cloned() else {
            return Ok(None);
        };
        let Some(line) = Self::line_before_cursor(&content, position) else {
            return Ok(None);
        };
        // An empty line has nothing to complete; answer now instead of
        // leaving the request pending.
        if line.trim().is_empty() {
            return Ok(None);
        }
        // Block comments may open on an earlier line.
        if ends_outside_code(&Self::text_before_cursor(&content, position.line, &line)) {
            return Ok(None);
        }

        let request = CompletionRequest {
            unit_id: uri,
            row: position.line,
            column: position.character,
            prefix: extract_prefix(&line).to_string(),
            line_before_cursor: line,
        };
        let candidates = self.complete(request).await;
        if candidates.is_empty() {
            return Ok(None);
        }

        let items = candidates.iter().map(to_completion_item).collect();
        Ok(Some(CompletionResponse::Array(items)))
    }
}
