/// Error types for machine translation backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// Provider is misconfigured (missing key, rejected credentials)
    ConfigError(String),
    /// Transport failure talking to the provider
    NetworkError(String),
    /// Provider answered but the translation could not be produced
    TranslationError(String),
    /// Locale code is empty or malformed
    InvalidLocale(String),
    /// The call did not finish within the allotted time
    Timeout(u64),
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MtError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MtError::TranslationError(msg) => write!(f, "Translation error: {}", msg),
            MtError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
            MtError::Timeout(ms) => write!(f, "Translation timed out after {}ms", ms),
        }
    }
}

impl std::error::Error for MtError {}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            MtError::NetworkError(format!("request timed out: {}", err))
        } else {
            MtError::NetworkError(err.to_string())
        }
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
