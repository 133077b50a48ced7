//! Valhalla: a Vala language server with scope-aware code completion.
//!
//! The crate is organised around a [`Backend`] that owns the shared state
//! of one analysis session:
//!
//! - the [`ScopeRegistry`](registry::ScopeRegistry) holding the scope tree
//!   of every parsed unit (open `.vala` files and preloaded `.vapi` files),
//! - the open buffers, the keyword table and the layered [`Config`],
//! - a readiness signal for the asynchronous external-declaration load.
//!
//! Parsing lives in [`parser`], type resolution in [`resolution`] and
//! [`inheritance`], candidate generation in [`completion`], and the LSP
//! protocol surface in `server`.
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower_lsp::Client;
use tower_lsp::lsp_types::MessageType;

pub mod completion;
pub mod config;
pub mod docblock;
pub mod inheritance;
pub mod keywords;
pub mod logging;
pub mod parser;
pub mod registry;
pub mod resolution;
mod server;
pub mod subject_extraction;
pub mod types;
pub mod util;
pub mod vapi;

pub use config::{Config, ConfigOverrides};
pub use keywords::Keyword;
pub use registry::{RegistrySnapshot, ScopeRegistry};
pub use types::*;

pub struct Backend {
    name: String,
    version: String,
    /// Text of every open buffer, keyed by URI.
    pub(crate) open_files: Arc<Mutex<HashMap<String, String>>>,
    pub(crate) registry: Arc<RwLock<ScopeRegistry>>,
    pub(crate) keywords: Arc<Vec<Keyword>>,
    pub(crate) config: Arc<RwLock<Config>>,
    /// Command-line settings, re-applied on top of every later layer.
    pub(crate) cli_overrides: ConfigOverrides,
    /// `true` once no external-declaration load is in flight.
    pub(crate) external_ready: Arc<watch::Sender<bool>>,
    client: Option<Client>,
}

impl Backend {
    pub fn new(client: Client, config: Config, cli_overrides: ConfigOverrides) -> Self {
        Self::build(Some(client), config, cli_overrides)
    }

    pub fn new_test() -> Self {
        Self::build(None, Config::default(), ConfigOverrides::default())
    }

    pub fn new_test_with_config(config: Config) -> Self {
        Self::build(None, config, ConfigOverrides::default())
    }

    fn build(client: Option<Client>, config: Config, cli_overrides: ConfigOverrides) -> Self {
        let (ready, _) = watch::channel(true);
        Self {
            name: "Valhalla".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            open_files: Arc::new(Mutex::new(HashMap::new())),
            registry: Arc::new(RwLock::new(ScopeRegistry::new())),
            keywords: Arc::new(keywords::default_keywords()),
            config: Arc::new(RwLock::new(config)),
            cli_overrides,
            external_ready: Arc::new(ready),
            client,
        }
    }

    /// Replace the keyword table.
    pub fn with_keywords(mut self, keywords: Vec<Keyword>) -> Self {
        self.keywords = Arc::new(keywords);
        self
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// An immutable view of the registry for one traversal.
    pub fn registry_snapshot(&self) -> RegistrySnapshot {
        self.registry.read().snapshot()
    }

    /// Number of units (live and external) in the registry.
    pub fn unit_count(&self) -> usize {
        self.registry.read().len()
    }

    // ─── External declarations ──────────────────────────────────────────

    /// Mark external declarations as pending so completions wait for the
    /// load started by [`spawn_external_load`](Self::spawn_external_load).
    pub(crate) fn expect_external_load(&self) {
        self.external_ready.send_replace(false);
    }

    /// Load the configured declaration directory in the background.
    ///
    /// Completion requests issued before the load finishes wait for it.
    /// Without a configured directory nothing is spawned and completions
    /// proceed immediately.
    pub fn spawn_external_load(&self) -> Option<JoinHandle<()>> {
        let config = self.config();
        let Some(dir) = config.vapi_dir.clone() else {
            self.external_ready.send_replace(true);
            return None;
        };

        self.expect_external_load();
        let registry = Arc::clone(&self.registry);
        let ready = Arc::clone(&self.external_ready);
        Some(tokio::spawn(async move {
            let loaded = tokio::task::spawn_blocking(move || {
                vapi::load_declaration_dir(
                    &dir,
                    &config.declaration_extension,
                    config.max_unit_bytes,
                )
            })
            .await;

            match loaded {
                Ok(Ok(units)) => {
                    let count = units.len();
                    let mut registry = registry.write();
                    for unit in units {
                        registry.upsert_unit(unit);
                    }
                    tracing::info!("Loaded {} external declaration unit(s)", count);
                }
                Ok(Err(e)) => tracing::warn!("{}", e),
                Err(e) => tracing::warn!("External declaration load failed: {}", e),
            }
            ready.send_replace(true);
        }))
    }

    /// Resolves once no external-declaration load is in flight.
    pub async fn wait_for_external_declarations(&self) {
        let mut ready = self.external_ready.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = ready.wait_for(|ready| *ready).await;
    }

    pub(crate) async fn log(&self, typ: MessageType, message: String) {
        tracing::info!("{}", message);
        if let Some(client) = &self.client {
            client.log_message(typ, message).await;
        }
    }
}
