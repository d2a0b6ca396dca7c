//! Machine Translation trait and locale helpers
//!
//! This module defines the `MachineTranslator` trait that the segment
//! translator falls back to when no curated lexicon entry matches a line.
//! Backends (Google Translate, mock) implement it so the pipeline is never
//! coupled to a specific provider.
//!
//! # Example
//!
//! ```ignore
//! use parla_relay::mt::{MachineTranslator, GoogleTranslateProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleTranslateProvider::from_env()?;
//!     let result = provider.translate("ciao bel gatto", "it", "es").await?;
//!     println!("{}", result); // "hola bonito gato"
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;

/// Generic trait for machine translation providers
///
/// Implementations handle the actual translation work, whether through an
/// API (Google Translate) or deterministic logic (Mock). Callers treat every
/// error uniformly, so implementations should not retry internally.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate (one chat line)
    /// * `source_locale` - Source language code (e.g., "it")
    /// * `target_locale` - Target language code (e.g., "es")
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(MtError)` - If translation fails for any reason
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Get the name of this translation provider
    ///
    /// Used in logs to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}

/// Normalize a locale code by stripping region information
///
/// - `es-ES` → `es`
/// - `IT` → `it`
/// - `pt_BR` → `pt`
pub fn normalize_locale(locale: &str) -> String {
    locale
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_lowercase()
}

/// Validate that a locale code is in acceptable format
///
/// Only ASCII alphanumerics, hyphens and underscores are accepted.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
