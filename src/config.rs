//! Layered server configuration.
//!
//! Settings come from, in increasing priority: built-in defaults, the user
//! configuration file (`<config dir>/valhalla/config.toml`), an explicit
//! `--config` file, the workspace file (`<workspace>/.valhalla.toml`), the
//! LSP `initializationOptions`, and finally command-line flags.  Every layer
//! is a [`ConfigOverrides`] whose present keys replace the ones below it.
//!
//! Errors reading or decoding a layer are reported to the caller as
//! [`ConfigError`]; the server logs them and keeps the layers it already
//! has.
use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use serde::Deserialize;
use thiserror::Error;

use crate::util::path_extension;

/// Name of the per-workspace configuration file.
pub const WORKSPACE_CONFIG_FILE: &str = ".valhalla.toml";

/// Units larger than this are not parsed.
const DEFAULT_MAX_UNIT_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid initialization options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Effective settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory of `.vapi` files to load at startup.
    pub vapi_dir: Option<PathBuf>,
    /// Namespaces imported into every unit.
    pub default_namespaces: Vec<String>,
    /// Extensions of live source files.
    pub source_extensions: Vec<String>,
    /// Extension of external declaration files.
    pub declaration_extension: String,
    pub max_unit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vapi_dir: None,
            default_namespaces: vec!["GLib".to_string()],
            source_extensions: vec!["vala".to_string()],
            declaration_extension: "vapi".to_string(),
            max_unit_bytes: DEFAULT_MAX_UNIT_BYTES,
        }
    }
}

/// One configuration layer.  Absent keys leave the layer below untouched.
///
/// Keys are accepted in `snake_case` (TOML files) and `camelCase` (LSP
/// clients).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    #[serde(alias = "vapiDir")]
    pub vapi_dir: Option<PathBuf>,
    #[serde(alias = "defaultNamespaces")]
    pub default_namespaces: Option<Vec<String>>,
    #[serde(alias = "sourceExtensions")]
    pub source_extensions: Option<Vec<String>>,
    #[serde(alias = "declarationExtension")]
    pub declaration_extension: Option<String>,
    #[serde(alias = "maxUnitBytes")]
    pub max_unit_bytes: Option<usize>,
}

impl Config {
    /// Build the startup configuration: defaults, the user file, and an
    /// optional explicit file, then `cli` on top.  Layer errors are logged
    /// and skipped.
    pub fn load(explicit: Option<&Path>, cli: &ConfigOverrides) -> Self {
        let mut config = Config::default();

        if let Some(user) = user_config_path() {
            match config.merge_toml_file(&user) {
                Ok(true) => tracing::info!("Loaded user configuration from {}", user.display()),
                Ok(false) => {}
                Err(e) => tracing::warn!("{}", e),
            }
        }

        if let Some(path) = explicit {
            match config.merge_toml_file(path) {
                Ok(true) => tracing::info!("Loaded configuration from {}", path.display()),
                Ok(false) => tracing::warn!("Configuration file {} not found", path.display()),
                Err(e) => tracing::warn!("{}", e),
            }
        }

        config.apply(cli);
        config
    }

    /// Overlay the keys present in `overrides`.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(dir) = &overrides.vapi_dir {
            self.vapi_dir = Some(dir.clone());
        }
        if let Some(namespaces) = &overrides.default_namespaces {
            self.default_namespaces = namespaces.clone();
        }
        if let Some(extensions) = &overrides.source_extensions {
            self.source_extensions = extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect();
        }
        if let Some(extension) = &overrides.declaration_extension {
            self.declaration_extension = extension.trim_start_matches('.').to_string();
        }
        if let Some(max) = overrides.max_unit_bytes {
            self.max_unit_bytes = max;
        }
    }

    /// Overlay a TOML file.  Returns `Ok(false)` when the file does not
    /// exist.
    pub fn merge_toml_file(&mut self, path: &Path) -> Result<bool, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let overrides: ConfigOverrides =
            toml::from_str(&text).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?;
        self.apply(&overrides);
        Ok(true)
    }

    /// Overlay LSP `initializationOptions`.  `null` is a no-op.
    pub fn merge_json(&mut self, value: &serde_json::Value) -> Result<(), ConfigError> {
        if value.is_null() {
            return Ok(());
        }
        let overrides = ConfigOverrides::deserialize(value)?;
        self.apply(&overrides);
        Ok(())
    }

    /// Whether `path` (a file path or URI) names a live source file.
    pub fn is_source_file(&self, path: &str) -> bool {
        path_extension(path).is_some_and(|ext| self.source_extensions.iter().any(|e| e == ext))
    }

    /// Whether `path` names an external declaration file.
    pub fn is_declaration_file(&self, path: &str) -> bool {
        path_extension(path) == Some(self.declaration_extension.as_str())
    }
}

/// `<config dir>/valhalla/config.toml` for the current user, if a home
/// directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("valhalla").join("config.toml"))
}
