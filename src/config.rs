//! Runtime configuration
//!
//! Settings are read once at startup from environment variables (a `.env`
//! file is loaded by the binary first) into an immutable [`Config`] that the
//! pipeline components borrow. Bad values never abort startup: they are
//! logged and replaced by defaults.

use crate::language::LanguagePair;
use crate::mt::normalize_locale;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Platform hard limit on a single chat message
pub const PLATFORM_MESSAGE_LIMIT: usize = 2000;

pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1900;
pub const DEFAULT_MT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SUGGESTIONS_FILE: &str = "user_suggestions.json";

/// A setting that was present but could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Value did not parse as the expected type
    Invalid { key: String, value: String },
    /// Value parsed but is outside the accepted range
    OutOfRange { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value '{}'", key, value)
            }
            ConfigError::OutOfRange { key, value } => {
                write!(f, "{} is out of range: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Languages a message may be detected as to be translated
    pub source_languages: Vec<String>,
    /// One target per source language
    pub target_languages: HashMap<String, String>,
    /// Parsed for compatibility with existing deployments; the pipeline
    /// never consults it.
    pub learning_mode: bool,
    pub admin_user_ids: Vec<u64>,
    /// Directory holding the `<category>_es_it.json` lexicon files
    pub lexicon_dir: PathBuf,
    pub suggestions_file: PathBuf,
    /// Longest outbound message the formatter may emit
    pub max_message_length: usize,
    /// Budget for a single machine translation call
    pub mt_timeout: Duration,
    /// Identity the bot posts under; its own messages are ignored
    pub bot_user_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_languages: vec!["it".to_string(), "es".to_string()],
            target_languages: default_targets(),
            learning_mode: true,
            admin_user_ids: Vec::new(),
            lexicon_dir: PathBuf::from("."),
            suggestions_file: PathBuf::from(DEFAULT_SUGGESTIONS_FILE),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            mt_timeout: Duration::from_secs(DEFAULT_MT_TIMEOUT_SECS),
            bot_user_id: "bot".to_string(),
        }
    }
}

fn default_targets() -> HashMap<String, String> {
    HashMap::from([
        ("it".to_string(), "es".to_string()),
        ("es".to_string(), "it".to_string()),
    ])
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    ///
    /// Keys: `SOURCE_LANGUAGES`, `TARGET_LANGUAGE_<CODE>`, `LEARNING_MODE`,
    /// `ADMIN_USER_IDS`, `LEXICON_DIR`, `SUGGESTIONS_FILE`,
    /// `MAX_MESSAGE_LENGTH`, `MT_TIMEOUT_SECS`, `BOT_USER_ID`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let source_languages = match lookup("SOURCE_LANGUAGES") {
            Some(raw) => parse_language_list(&raw),
            None => defaults.source_languages.clone(),
        };

        let builtin_targets = default_targets();
        let mut target_languages = HashMap::new();
        for source in &source_languages {
            let key = format!("TARGET_LANGUAGE_{}", source.to_uppercase());
            let target = lookup(&key)
                .map(|t| normalize_locale(&t))
                .filter(|t| !t.is_empty())
                .or_else(|| builtin_targets.get(source).cloned());

            match target {
                Some(target) if &target == source => {
                    warn!("{} maps {} onto itself, ignoring it", key, source);
                }
                Some(target) => {
                    target_languages.insert(source.clone(), target);
                }
                None => {
                    warn!("No target language configured for {} (set {})", source, key);
                }
            }
        }

        let learning_mode = lookup("LEARNING_MODE")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.learning_mode);

        let admin_user_ids = lookup("ADMIN_USER_IDS")
            .map(|raw| parse_user_ids(&raw))
            .unwrap_or_default();

        let max_message_length = lookup("MAX_MESSAGE_LENGTH")
            .map(|raw| parse_max_length(&raw))
            .unwrap_or(Ok(DEFAULT_MAX_MESSAGE_LENGTH))
            .unwrap_or_else(|e| {
                warn!("{}, using {}", e, DEFAULT_MAX_MESSAGE_LENGTH);
                DEFAULT_MAX_MESSAGE_LENGTH
            });

        let mt_timeout_secs = lookup("MT_TIMEOUT_SECS")
            .map(|raw| parse_timeout(&raw))
            .unwrap_or(Ok(DEFAULT_MT_TIMEOUT_SECS))
            .unwrap_or_else(|e| {
                warn!("{}, using {}s", e, DEFAULT_MT_TIMEOUT_SECS);
                DEFAULT_MT_TIMEOUT_SECS
            });

        Config {
            source_languages,
            target_languages,
            learning_mode,
            admin_user_ids,
            lexicon_dir: lookup("LEXICON_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.lexicon_dir),
            suggestions_file: lookup("SUGGESTIONS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.suggestions_file),
            max_message_length,
            mt_timeout: Duration::from_secs(mt_timeout_secs),
            bot_user_id: lookup("BOT_USER_ID")
                .filter(|id| !id.trim().is_empty())
                .unwrap_or(defaults.bot_user_id),
        }
    }

    /// Resolve the configured pair for a detected source language
    pub fn language_pair(&self, source: &str) -> Option<LanguagePair> {
        self.target_languages
            .get(source)
            .map(|target| LanguagePair::new(source, target))
    }
}

/// Parse a comma separated language list, normalizing and de-duplicating codes
pub fn parse_language_list(raw: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for code in raw.split(',').map(normalize_locale) {
        if !code.is_empty() && !languages.contains(&code) {
            languages.push(code);
        }
    }
    languages
}

/// Parse a comma separated list of numeric user ids.
///
/// Each token is parsed on its own; a malformed token is dropped without
/// affecting the others.
pub fn parse_user_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Ignoring malformed admin user id '{}'", token);
                None
            }
        })
        .collect()
}

fn parse_max_length(raw: &str) -> Result<usize, ConfigError> {
    let value: usize = raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key: "MAX_MESSAGE_LENGTH".to_string(),
        value: raw.to_string(),
    })?;
    if value == 0 || value >= PLATFORM_MESSAGE_LIMIT {
        return Err(ConfigError::OutOfRange {
            key: "MAX_MESSAGE_LENGTH".to_string(),
            value: raw.to_string(),
        });
    }
    Ok(value)
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::OutOfRange {
            key: "MT_TIMEOUT_SECS".to_string(),
            value: raw.to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(_) => Err(ConfigError::Invalid {
            key: "MT_TIMEOUT_SECS".to_string(),
            value: raw.to_string(),
        }),
    }
}
