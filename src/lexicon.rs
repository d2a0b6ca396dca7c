//! Curated phrase dictionaries consulted before machine translation.
//!
//! Each category lives in its own JSON file shaped as
//! `source → target → phrase → translation`:
//!
//! ```json
//! {
//!     "it": { "es": { "gg": "bien jugado" } },
//!     "es": { "it": { "manco": "scarso" } }
//! }
//! ```
//!
//! Files are read once at startup. A missing or malformed file leaves that
//! category empty instead of failing, so the relay keeps working with no
//! curated entries at all.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Categories and their file names, in lookup order
pub const CATEGORIES: [(&str, &str); 3] = [
    ("gaming", "gaming_es_it.json"),
    ("sex", "sex_es_it.json"),
    ("colloquial", "colloquial_es_it.json"),
];

/// Lower-cased phrase → replacement
pub type PhraseMap = HashMap<String, String>;

/// One category's entries, keyed by source then target language
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon(pub HashMap<String, HashMap<String, PhraseMap>>);

impl Lexicon {
    pub fn new() -> Self {
        Lexicon(HashMap::new())
    }

    /// Placeholder used when a category file cannot be loaded
    pub fn empty_skeleton() -> Self {
        Lexicon(HashMap::from([
            ("es".to_string(), HashMap::new()),
            ("it".to_string(), HashMap::new()),
        ]))
    }

    pub fn with_entry(&mut self, source: &str, target: &str, phrase: &str, translation: &str) -> &mut Self {
        self.0
            .entry(source.to_string())
            .or_default()
            .entry(target.to_string())
            .or_default()
            .insert(phrase.to_lowercase(), translation.to_string());
        self
    }

    /// Exact match on the already lower-cased phrase
    pub fn get(&self, source: &str, target: &str, phrase_lower: &str) -> Option<&str> {
        self.0
            .get(source)?
            .get(target)?
            .get(phrase_lower)
            .map(String::as_str)
    }

    pub fn entry_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|targets| targets.values())
            .map(|phrases| phrases.len())
            .sum()
    }
}

/// Parse one category file's contents.
///
/// Non-string leaves are skipped with a warning; a root or language level
/// that is not an object is an error.
pub fn parse_lexicon(content: &str, origin: &Path) -> Result<Lexicon, String> {
    let json: Value = serde_json::from_str(content)
        .map_err(|e| format!("Failed to parse JSON from '{}': {}", origin.display(), e))?;

    let root = json.as_object().ok_or_else(|| {
        format!(
            "Invalid lexicon in '{}': root must be an object",
            origin.display()
        )
    })?;

    let mut lexicon = Lexicon::new();
    for (source, targets) in root {
        let targets = targets.as_object().ok_or_else(|| {
            format!(
                "Invalid lexicon in '{}': '{}' must map to an object",
                origin.display(),
                source
            )
        })?;
        // Keep the language level even when empty, like the skeleton does
        lexicon.0.entry(source.to_lowercase()).or_default();

        for (target, phrases) in targets {
            let phrases = phrases.as_object().ok_or_else(|| {
                format!(
                    "Invalid lexicon in '{}': '{}.{}' must map to an object",
                    origin.display(),
                    source,
                    target
                )
            })?;
            for (phrase, translation) in phrases {
                match translation.as_str() {
                    Some(translation) => {
                        lexicon.with_entry(
                            &source.to_lowercase(),
                            &target.to_lowercase(),
                            phrase,
                            translation,
                        );
                    }
                    None => warn!(
                        "Lexicon entry '{}' in '{}' is not a string, skipping",
                        phrase,
                        origin.display()
                    ),
                }
            }
        }
    }

    Ok(lexicon)
}

/// Read and parse one category file
pub fn load_lexicon_from_file(path: &Path) -> Result<Lexicon, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file '{}': {}", path.display(), e))?;
    parse_lexicon(&content, path)
}

/// Every curated category, in a stable lookup order. Read-only after load.
#[derive(Debug, Clone, Default)]
pub struct LexiconStore {
    categories: Vec<(String, Lexicon)>,
}

impl LexiconStore {
    /// Load all [`CATEGORIES`] from `dir`. Never fails.
    pub fn load(dir: &Path) -> Self {
        let mut categories = Vec::with_capacity(CATEGORIES.len());

        for (category, file_name) in CATEGORIES {
            let path = dir.join(file_name);
            let lexicon = match load_lexicon_from_file(&path) {
                Ok(lexicon) => {
                    debug!("Loaded {} entries for '{}'", lexicon.entry_count(), category);
                    lexicon
                }
                Err(e) => {
                    warn!("Lexicon '{}' unavailable, using empty entries: {}", category, e);
                    Lexicon::empty_skeleton()
                }
            };
            categories.push((category.to_string(), lexicon));
        }

        let store = LexiconStore { categories };
        info!(
            "Lexicon ready: {} categories, {} entries",
            store.categories.len(),
            store.entry_count()
        );
        store
    }

    /// Build a store from in-memory categories, keeping the given order
    pub fn from_categories(categories: Vec<(String, Lexicon)>) -> Self {
        LexiconStore { categories }
    }

    /// Case-insensitive exact match; the first category with a hit wins
    pub fn lookup(&self, source: &str, target: &str, phrase: &str) -> Option<&str> {
        let key = phrase.to_lowercase();
        self.categories
            .iter()
            .find_map(|(_, lexicon)| lexicon.get(source, target, &key))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|(_, l)| l.entry_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_missing_directory_degrades_to_empty() {
        let store = LexiconStore::load(&PathBuf::from("/nonexistent/lexicon/dir"));
        assert_eq!(store.entry_count(), 0);
        assert_eq!(
            store.categories().collect::<Vec<_>>(),
            vec!["gaming", "sex", "colloquial"]
        );
        assert_eq!(store.lookup("it", "es", "ciao"), None);
    }

    #[test]
    fn test_load_and_lookup_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "gaming_es_it.json",
            r#"{"it": {"es": {"GG": "bien jugado"}}, "es": {"it": {"manco": "scarso"}}}"#,
        );

        let store = LexiconStore::load(dir.path());
        assert_eq!(store.lookup("it", "es", "gg"), Some("bien jugado"));
        assert_eq!(store.lookup("it", "es", "Gg"), Some("bien jugado"));
        assert_eq!(store.lookup("es", "it", "MANCO"), Some("scarso"));
        // Wrong direction
        assert_eq!(store.lookup("es", "it", "gg"), None);
        assert_eq!(store.entry_count(), 2);
    }

    #[test]
    fn test_lookup_is_exact_not_fuzzy() {
        let mut gaming = Lexicon::new();
        gaming.with_entry("it", "es", "gg", "bien jugado");
        let store = LexiconStore::from_categories(vec![("gaming".to_string(), gaming)]);

        assert_eq!(store.lookup("it", "es", "gg wp"), None);
        assert_eq!(store.lookup("it", "es", " gg"), None);
    }

    #[test]
    fn test_corrupt_file_only_empties_its_category() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "gaming_es_it.json", "{ not json");
        write(
            dir.path(),
            "colloquial_es_it.json",
            r#"{"it": {"es": {"boh": "ni idea"}}}"#,
        );

        let store = LexiconStore::load(dir.path());
        assert_eq!(store.entry_count(), 1);
        assert_eq!(store.lookup("it", "es", "boh"), Some("ni idea"));
    }

    #[test]
    fn test_first_category_wins() {
        let mut gaming = Lexicon::new();
        gaming.with_entry("it", "es", "dai", "vamos");
        let mut colloquial = Lexicon::new();
        colloquial.with_entry("it", "es", "dai", "venga");

        let store = LexiconStore::from_categories(vec![
            ("gaming".to_string(), gaming),
            ("colloquial".to_string(), colloquial),
        ]);
        assert_eq!(store.lookup("it", "es", "dai"), Some("vamos"));
    }

    #[test]
    fn test_parse_skips_non_string_values() {
        let lexicon = parse_lexicon(
            r#"{"it": {"es": {"uno": "uno", "due": 2}}}"#,
            Path::new("inline.json"),
        )
        .unwrap();
        assert_eq!(lexicon.entry_count(), 1);
        assert_eq!(lexicon.get("it", "es", "uno"), Some("uno"));
    }

    #[test]
    fn test_parse_rejects_non_object_root() {
        let err = parse_lexicon("[1, 2]", Path::new("list.json")).unwrap_err();
        assert!(err.contains("root must be an object"));
    }

    #[test]
    fn test_empty_skeleton() {
        let skeleton = Lexicon::empty_skeleton();
        assert_eq!(skeleton.entry_count(), 0);
        assert!(skeleton.0.contains_key("es"));
        assert!(skeleton.0.contains_key("it"));
    }
}
