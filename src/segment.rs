//! Single-line translation: curated lexicon first, machine translation second,
//! the original line when the backend fails.

use crate::lexicon::LexiconStore;
use crate::mt::{MachineTranslator, MtError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How one line of a message was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineResult {
    /// Empty or whitespace-only input, emitted as an empty line
    Blank,
    /// Curated lexicon hit
    Dictionary(String),
    /// Produced by the machine translation backend
    Machine(String),
    /// Backend failed or timed out; the original line is kept
    Passthrough(String),
}

impl LineResult {
    pub fn text(&self) -> &str {
        match self {
            LineResult::Blank => "",
            LineResult::Dictionary(text)
            | LineResult::Machine(text)
            | LineResult::Passthrough(text) => text.as_str(),
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, LineResult::Passthrough(_))
    }
}

pub struct SegmentTranslator {
    lexicon: Arc<LexiconStore>,
    backend: Arc<dyn MachineTranslator>,
    timeout: Duration,
}

impl SegmentTranslator {
    pub fn new(
        lexicon: Arc<LexiconStore>,
        backend: Arc<dyn MachineTranslator>,
        timeout: Duration,
    ) -> Self {
        SegmentTranslator {
            lexicon,
            backend,
            timeout,
        }
    }

    /// Resolve one line. The backend is called at most once and never retried.
    pub async fn translate_line(&self, line: &str, source: &str, target: &str) -> LineResult {
        if line.trim().is_empty() {
            return LineResult::Blank;
        }

        if let Some(curated) = self.lexicon.lookup(source, target, line) {
            debug!("Lexicon hit for '{}'", line);
            return LineResult::Dictionary(curated.to_string());
        }

        match self.call_backend(line, source, target).await {
            Ok(translated) => LineResult::Machine(translated),
            Err(e) => {
                warn!(
                    "{} failed for a line ({}→{}), keeping original: {}",
                    self.backend.provider_name(),
                    source,
                    target,
                    e
                );
                LineResult::Passthrough(line.to_string())
            }
        }
    }

    async fn call_backend(&self, line: &str, source: &str, target: &str) -> Result<String, MtError> {
        match tokio::time::timeout(self.timeout, self.backend.translate(line, source, target)).await
        {
            Ok(result) => result,
            Err(_) => Err(MtError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}
