/// Unit update orchestration.
///
/// This module contains the `update_unit` family of methods that parse a
/// unit's text and swap the result into the registry.  Parsing happens
/// outside the registry lock; the write lock is held only for the swap,
/// so a completion traversing an earlier snapshot is never blocked.
use std::panic;

use crate::Backend;

impl Backend {
    /// Re-parse a live unit and replace its scopes in the registry.
    ///
    /// Returns `false` when the text was not parsed (too large, or the
    /// builder panicked).  The previous scopes of the unit stay in place
    /// in that case.
    pub fn update_unit(&self, unit_id: &str, text: &str) -> bool {
        self.update_unit_inner(unit_id, text, false)
    }

    /// Parse an external declaration unit (a `.vapi` file) and replace
    /// the external unit of the same id.
    pub fn update_external_unit(&self, unit_id: &str, text: &str) -> bool {
        self.update_unit_inner(unit_id, text, true)
    }

    /// Forget every unit (live and external) with this id.
    pub fn remove_unit(&self, unit_id: &str) -> bool {
        self.registry.write().remove_unit(unit_id)
    }

    fn update_unit_inner(&self, unit_id: &str, text: &str, is_external: bool) -> bool {
        let max_bytes = self.config.read().max_unit_bytes;
        if text.len() > max_bytes {
            tracing::warn!(
                "Valhalla: {} is {} bytes, over the {} byte limit. Skipping.",
                unit_id,
                text.len(),
                max_bytes
            );
            return false;
        }

        // The builder never fails on malformed input, but a panic must not
        // take the server down with it.  On panic the unit keeps its
        // previous scopes.
        let parsed = panic::catch_unwind(|| super::build_unit(text, unit_id, is_external));
        match parsed {
            Ok(parsed) => {
                tracing::debug!(
                    "Parsed {} ({} scopes, {} usings)",
                    unit_id,
                    parsed.scopes.len(),
                    parsed.usings.len()
                );
                self.registry.write().upsert_unit(parsed);
                true
            }
            Err(_) => {
                tracing::error!(
                    "Valhalla: scope builder panicked while parsing {}. Skipping unit.",
                    unit_id
                );
                false
            }
        }
    }
}
