#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;
use valhalla_lsp::{Backend, CompletionRequest, SuggestionCandidate};

/// Cursor marker used in test sources.
pub const CURSOR: &str = "<|>";

pub fn create_test_backend() -> Backend {
    Backend::new_test()
}

/// Split a source containing one `<|>` marker into the text without the
/// marker and the marker's position.
pub fn split_cursor(source: &str) -> (String, Position) {
    let offset = source.find(CURSOR).expect("source has no cursor marker");
    let before = &source[..offset];
    let line = before.matches('\n').count() as u32;
    let character = before
        .rsplit('\n')
        .next()
        .map_or(0, |l| l.chars().count()) as u32;
    let text = format!("{}{}", before, &source[offset + CURSOR.len()..]);
    (text, Position { line, character })
}

/// A core completion request for the cursor in `source` (which must have
/// already been fed to the backend without the marker).
pub fn request_at(unit_id: &str, source: &str) -> CompletionRequest {
    let (text, position) = split_cursor(source);
    let line = text.lines().nth(position.line as usize).unwrap_or("");
    let line_before_cursor: String = line.chars().take(position.character as usize).collect();
    CompletionRequest {
        unit_id: unit_id.to_string(),
        row: position.line,
        column: position.character,
        prefix: valhalla_lsp::util::extract_prefix(&line_before_cursor).to_string(),
        line_before_cursor,
    }
}

/// Parse `source` (with its cursor marker) into `unit_id` and run the
/// core completion engine at the marker.
pub async fn complete_source(
    backend: &Backend,
    unit_id: &str,
    source: &str,
) -> Vec<SuggestionCandidate> {
    let (text, _) = split_cursor(source);
    backend.update_unit(unit_id, &text);
    backend.complete(request_at(unit_id, source)).await
}

pub fn display_texts(candidates: &[SuggestionCandidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.display_text.as_str()).collect()
}

pub async fn open_document(backend: &Backend, uri: &Url, text: &str) {
    backend
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "vala".to_string(),
                version: 1,
                text: text.to_string(),
            },
        })
        .await;
}

pub async fn completion_at(
    backend: &Backend,
    uri: &Url,
    position: Position,
) -> Option<CompletionResponse> {
    backend
        .completion(CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
                position,
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: None,
        })
        .await
        .unwrap()
}

/// Open `source` (with its cursor marker) through the LSP surface and
/// return the completion item labels at the marker.
pub async fn lsp_labels(backend: &Backend, uri: &str, source: &str) -> Vec<String> {
    let uri = Url::parse(uri).unwrap();
    let (text, position) = split_cursor(source);
    open_document(backend, &uri, &text).await;
    match completion_at(backend, &uri, position).await {
        Some(CompletionResponse::Array(items)) => items.into_iter().map(|i| i.label).collect(),
        Some(CompletionResponse::List(list)) => list.items.into_iter().map(|i| i.label).collect(),
        None => Vec::new(),
    }
}

/// Write `files` into a fresh temporary directory.
pub fn create_dir_with(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for (rel_path, content) in files {
        write_file(dir.path(), rel_path, content);
    }
    dir
}

pub fn write_file(root: &Path, rel_path: &str, content: &str) {
    let full = root.join(rel_path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).expect("failed to create dirs");
    }
    fs::write(&full, content).expect("failed to write file");
}
