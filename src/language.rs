use std::fmt;

/// Source and target language of one translation, as ISO 639-1 codes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: &str, target: &str) -> Self {
        LanguagePair {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    /// Indicator shown at the top of every relayed message, e.g. `🇮🇹→🇪🇸:`
    pub fn indicator(&self) -> String {
        format!("{}→{}:", flag(&self.source), flag(&self.target))
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.source, self.target)
    }
}

/// Flag marker for a language code.
///
/// Codes without a flag fall back to a bracketed upper-case label, so a
/// newly configured language still gets a readable indicator.
pub fn flag(code: &str) -> String {
    match code {
        "es" => "🇪🇸".to_string(),
        "it" => "🇮🇹".to_string(),
        other => format!("[{}]", other.to_uppercase()),
    }
}
