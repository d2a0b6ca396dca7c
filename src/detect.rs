//! Language detection restricted to the configured source languages.

use tracing::debug;
use whatlang::Lang;

/// Minimum number of non-whitespace characters worth running detection on.
/// Shorter strings (greetings, emoji) produce unreliable guesses.
pub const MIN_DETECTABLE_CHARS: usize = 3;

/// A general-purpose language identification routine
pub trait LanguageIdentifier: Send + Sync {
    /// ISO 639-1 code of the dominant language, or `None` if nothing could be identified
    fn identify(&self, text: &str) -> Option<String>;
}

/// Trigram based identification backed by `whatlang`
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangIdentifier;

impl LanguageIdentifier for WhatlangIdentifier {
    fn identify(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        debug!(
            "whatlang: {:?} (confidence {:.2}, reliable: {})",
            info.lang(),
            info.confidence(),
            info.is_reliable()
        );
        lang_to_code(info.lang()).map(str::to_string)
    }
}

/// Map a `whatlang` language to its ISO 639-1 code
fn lang_to_code(lang: Lang) -> Option<&'static str> {
    let code = match lang {
        Lang::Afr => "af",
        Lang::Ara => "ar",
        Lang::Bul => "bg",
        Lang::Cat => "ca",
        Lang::Ces => "cs",
        Lang::Cmn => "zh",
        Lang::Dan => "da",
        Lang::Deu => "de",
        Lang::Ell => "el",
        Lang::Eng => "en",
        Lang::Epo => "eo",
        Lang::Est => "et",
        Lang::Fin => "fi",
        Lang::Fra => "fr",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Hrv => "hr",
        Lang::Hun => "hu",
        Lang::Ind => "id",
        Lang::Ita => "it",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Lat => "la",
        Lang::Lav => "lv",
        Lang::Lit => "lt",
        Lang::Nld => "nl",
        Lang::Nob => "nb",
        Lang::Pol => "pl",
        Lang::Por => "pt",
        Lang::Ron => "ro",
        Lang::Rus => "ru",
        Lang::Slk => "sk",
        Lang::Slv => "sl",
        Lang::Spa => "es",
        Lang::Swe => "sv",
        Lang::Tur => "tr",
        Lang::Ukr => "uk",
        Lang::Vie => "vi",
        _ => return None,
    };
    Some(code)
}

/// Decides whether an inbound message is a translation candidate
pub struct LanguageDetector {
    identifier: Box<dyn LanguageIdentifier>,
    allowed: Vec<String>,
}

impl LanguageDetector {
    pub fn new(allowed: Vec<String>) -> Self {
        Self::with_identifier(WhatlangIdentifier, allowed)
    }

    pub fn with_identifier(identifier: impl LanguageIdentifier + 'static, allowed: Vec<String>) -> Self {
        LanguageDetector {
            identifier: Box::new(identifier),
            allowed,
        }
    }

    /// Detected language of `text` if it is one of the allowed source languages.
    ///
    /// Never errors: short input, unidentifiable input and languages outside
    /// the allowed set all yield `None`.
    pub fn detect(&self, text: &str) -> Option<String> {
        let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
        if meaningful < MIN_DETECTABLE_CHARS {
            return None;
        }

        let code = self.identifier.identify(text)?;
        if self.allowed.iter().any(|allowed| *allowed == code) {
            Some(code)
        } else {
            debug!("Detected '{}', not a configured source language", code);
            None
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}
