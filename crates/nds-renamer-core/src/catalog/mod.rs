/// Reference catalog mapping game codes to canonical release names.
///
/// Entries keep their source document order. Lookups return the first
/// entry whose identifier matches, so when several releases share a code
/// (typically regional variants) the earliest one in the catalog wins.
pub mod dat;

use crate::error::CatalogError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A single catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    /// Canonical display name, e.g. `"Mario Kart DS (USA, Australia)"`.
    pub name: String,
    /// 4-character game code as printed in the ROM header.
    #[serde(alias = "serial")]
    pub identifier: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
        }
    }
}

/// Ordered, immutable list of catalog entries.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load a catalog, picking the parser from the file extension.
    ///
    /// `.dat` and `.xml` are read as No-Intro / Logiqx DAT files, `.json` as
    /// an array of `{ "name", "serial" }` objects.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        let entries = match ext.as_str() {
            "dat" | "xml" => {
                dat::parse(&read_text(path)?).map_err(|source| CatalogError::Xml {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            "json" => serde_json::from_str::<Vec<CatalogEntry>>(&read_text(path)?).map_err(
                |source| CatalogError::Json {
                    path: path.to_path_buf(),
                    source,
                },
            )?,
            _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        };

        let catalog = Self::from_entries(entries);

        debug!(
            "Loaded {} catalog entries from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Canonical name of the first entry whose identifier equals
    /// `identifier` (case-sensitive), or `None`.
    pub fn lookup(&self, identifier: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.identifier == identifier)
            .map(|entry| entry.name.as_str())
    }

    /// Identifiers carried by more than one entry, in order of first
    /// appearance. Lookups for these resolve to the first entry only.
    pub fn shared_identifiers(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in &self.entries {
            *counts.entry(entry.identifier.as_str()).or_default() += 1;
        }

        let mut shared = Vec::new();
        for entry in &self.entries {
            let id = entry.identifier.as_str();
            if counts.get(id).copied().unwrap_or(0) > 1 && !shared.contains(&id) {
                shared.push(id);
            }
        }
        shared
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_text(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}
