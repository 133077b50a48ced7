/// External declaration (`.vapi`) loading.
///
/// A declaration directory is enumerated once at startup.  Every file with
/// the declaration extension is parsed as an external unit whose id is its
/// file name, so two directories shipping the same `.vapi` collapse into
/// one unit.  Subdirectories are not searched and ignore files are not
/// honoured: a system `vapi` directory is flat and not a repository.
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

use crate::parser::build_unit;
use crate::types::ParsedUnit;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("declaration directory {0} does not exist")]
    Missing(PathBuf),
    #[error("declaration path {0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Parse every `*.{extension}` file directly inside `dir`.
///
/// Files larger than `max_bytes` and unreadable files are skipped with a
/// warning.  Units are returned sorted by file name.
pub fn load_declaration_dir(
    dir: &Path,
    extension: &str,
    max_bytes: usize,
) -> Result<Vec<ParsedUnit>, LoadError> {
    if !dir.exists() {
        return Err(LoadError::Missing(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }

    let units = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
        .filter_map(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping declaration entry: {}", e);
                    return None;
                }
            };
            let path = entry.path();
            let is_declaration = path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == extension);
            if !is_declaration {
                return None;
            }
            load_declaration_file(path, max_bytes)
        })
        .collect();

    Ok(units)
}

fn load_declaration_file(path: &Path, max_bytes: usize) -> Option<ParsedUnit> {
    let unit_id = path.file_name()?.to_string_lossy().into_owned();

    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if size > max_bytes as u64 {
        tracing::warn!(
            "Skipping {}: {} bytes exceeds the {} byte limit",
            path.display(),
            size,
            max_bytes
        );
        return None;
    }

    match std::fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!("Parsing declaration file {}", path.display());
            Some(build_unit(&text, &unit_id, true))
        }
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}
