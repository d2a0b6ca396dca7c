//! User-submitted translation suggestions.
//!
//! The store is loaded at startup and written back whole on every save. A
//! missing or unreadable file yields an empty store. The translation pipeline
//! does not read suggestions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub source: String,
    pub target: String,
    pub original: String,
    pub suggestion: String,
}

#[derive(Debug, Clone)]
pub struct SuggestionStore {
    path: PathBuf,
    /// User id → suggestions in submission order
    entries: BTreeMap<String, Vec<Suggestion>>,
}

impl SuggestionStore {
    /// Load from `path`, starting empty if the file is missing or corrupt
    pub fn load(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring corrupt suggestions file '{}': {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No suggestions file at '{}'", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Cannot read suggestions file '{}': {}", path.display(), e);
                BTreeMap::new()
            }
        };

        SuggestionStore {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn add(&mut self, user_id: &str, suggestion: Suggestion) {
        self.entries
            .entry(user_id.to_string())
            .or_default()
            .push(suggestion);
    }

    pub fn for_user(&self, user_id: &str) -> &[Suggestion] {
        self.entries
            .get(user_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn user_count(&self) -> usize {
        self.entries.len()
    }

    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Overwrite the file with the full store as pretty-printed JSON
    pub fn save(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(io::Error::other)?;
        fs::write(&self.path, json)
    }
}
