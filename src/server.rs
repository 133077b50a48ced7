/// LSP server trait implementation.
///
/// This module contains the `impl LanguageServer for Backend` block,
/// which handles the LSP protocol messages (initialize, didOpen,
/// didChange, didClose, completion, shutdown).
use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

use crate::Backend;
use crate::config::WORKSPACE_CONFIG_FILE;

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let workspace_root = params
            .root_uri
            .as_ref()
            .and_then(|uri| uri.to_file_path().ok());

        {
            let mut config = self.config.write();
            if let Some(root) = &workspace_root {
                let path = root.join(WORKSPACE_CONFIG_FILE);
                match config.merge_toml_file(&path) {
                    Ok(true) => tracing::info!("Loaded workspace configuration from {}", path.display()),
                    Ok(false) => {}
                    Err(e) => tracing::warn!("{}", e),
                }
            }
            if let Some(options) = &params.initialization_options
                && let Err(e) = config.merge_json(options)
            {
                tracing::warn!("{}", e);
            }
            // Command-line flags win over every file and client setting.
            config.apply(&self.cli_overrides);

            if config.vapi_dir.is_some() {
                self.expect_external_load();
            }
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![".".to_string()]),
                    all_commit_characters: None,
                    work_done_progress_options: WorkDoneProgressOptions {
                        work_done_progress: None,
                    },
                    ..CompletionOptions::default()
                }),
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: self.name.clone(),
                version: Some(self.version.clone()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let vapi_dir = self.config.read().vapi_dir.clone();
        match vapi_dir {
            Some(dir) => {
                self.spawn_external_load();
                self.log(
                    MessageType::INFO,
                    format!(
                        "Valhalla initialized! Loading declarations from {}",
                        dir.display()
                    ),
                )
                .await;
            }
            None => {
                self.log(MessageType::INFO, "Valhalla initialized!".to_string())
                    .await;
            }
        }
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let uri = doc.uri.to_string();
        let text = doc.text;

        self.open_files.lock().insert(uri.clone(), text.clone());

        if self.config.read().is_source_file(&uri) {
            self.update_unit(&uri, &text);
        }

        self.log(MessageType::INFO, format!("Opened file: {}", uri))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.to_string();

        if let Some(change) = params.content_changes.first() {
            let text = &change.text;
            self.open_files.lock().insert(uri.clone(), text.clone());

            if self.config.read().is_source_file(&uri) {
                self.update_unit(&uri, text);
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.to_string();

        // The unit's scopes stay in the registry for cross-file completion.
        self.open_files.lock().remove(&uri);
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        self.handle_completion(params).await
    }
}
