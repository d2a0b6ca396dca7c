//! Detect → translate → format, as a function of the message text.
//!
//! The pipeline holds no connector state: given the same configuration,
//! lexicon and backend it maps a message to the outbound chunks to send.
//! Recoverable problems (no detection, backend failures) are absorbed by the
//! stages; only unexpected conditions come back as [`PipelineError`].

use crate::config::Config;
use crate::detect::LanguageDetector;
use crate::document::{DocumentTranslator, TranslatedDocument};
use crate::format::ResponseFormatter;
use crate::language::LanguagePair;
use crate::lexicon::LexiconStore;
use crate::mt::MachineTranslator;
use crate::segment::SegmentTranslator;
use std::sync::Arc;
use tracing::{debug, info};

/// A message that was recognized as a translation candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub pair: LanguagePair,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Not in a configured source language; nothing to send
    Skipped,
    Translated {
        request: TranslationRequest,
        document: TranslatedDocument,
        /// Outbound chunks, in send order
        messages: Vec<String>,
    },
}

impl PipelineOutcome {
    pub fn messages(&self) -> &[String] {
        match self {
            PipelineOutcome::Skipped => &[],
            PipelineOutcome::Translated { messages, .. } => messages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Detection accepted a language that has no configured target
    MissingTarget(String),
    /// Formatting produced nothing to send
    EmptyResponse,
    /// A response chunk is longer than the configured maximum
    ChunkTooLong { len: usize, max: usize },
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::MissingTarget(source) => {
                write!(f, "no target language configured for '{}'", source)
            }
            PipelineError::EmptyResponse => write!(f, "formatter produced no messages"),
            PipelineError::ChunkTooLong { len, max } => {
                write!(f, "response chunk of {} characters exceeds {}", len, max)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

pub struct TranslationPipeline {
    config: Arc<Config>,
    detector: LanguageDetector,
    documents: DocumentTranslator,
    formatter: ResponseFormatter,
}

impl TranslationPipeline {
    /// Pipeline with `whatlang` detection
    pub fn new(
        config: Arc<Config>,
        lexicon: Arc<LexiconStore>,
        backend: Arc<dyn MachineTranslator>,
    ) -> Self {
        let detector = LanguageDetector::new(config.source_languages.clone());
        Self::with_detector(config, lexicon, backend, detector)
    }

    pub fn with_detector(
        config: Arc<Config>,
        lexicon: Arc<LexiconStore>,
        backend: Arc<dyn MachineTranslator>,
        detector: LanguageDetector,
    ) -> Self {
        let segments = SegmentTranslator::new(lexicon, backend, config.mt_timeout);
        TranslationPipeline {
            formatter: ResponseFormatter::new(config.max_message_length),
            documents: DocumentTranslator::new(segments),
            detector,
            config,
        }
    }

    pub async fn process(&self, text: &str) -> Result<PipelineOutcome, PipelineError> {
        let Some(source) = self.detector.detect(text) else {
            return Ok(PipelineOutcome::Skipped);
        };

        let pair = self
            .config
            .language_pair(&source)
            .ok_or_else(|| PipelineError::MissingTarget(source.clone()))?;
        debug!("Translating {} line(s) {}", text.split('\n').count(), pair);

        let document = self
            .documents
            .translate_document(text, &pair.source, &pair.target)
            .await;

        let messages = self.formatter.format(&pair, &document.to_text());
        if messages.is_empty() {
            return Err(PipelineError::EmptyResponse);
        }
        let max = self.formatter.max_len();
        if let Some(chunk) = messages.iter().find(|m| m.chars().count() > max) {
            return Err(PipelineError::ChunkTooLong {
                len: chunk.chars().count(),
                max,
            });
        }

        info!(
            "Translated message {} ({} lines, {} untranslated, {} chunk(s))",
            pair,
            document.line_count(),
            document.passthrough_count(),
            messages.len()
        );

        Ok(PipelineOutcome::Translated {
            request: TranslationRequest {
                text: text.to_string(),
                pair,
            },
            document,
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::LanguageIdentifier;
    use crate::lexicon::Lexicon;
    use crate::mt::{MockMode, MockTranslator};
    use crate::segment::LineResult;

    /// Detects every message as the same language
    struct Always(&'static str);

    impl LanguageIdentifier for Always {
        fn identify(&self, _text: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn pipeline(config: Config, mock: &MockTranslator, lang: &'static str) -> TranslationPipeline {
        let detector = LanguageDetector::with_identifier(Always(lang), config.source_languages.clone());
        TranslationPipeline::with_detector(
            Arc::new(config),
            Arc::new(LexiconStore::default()),
            Arc::new(mock.clone()),
            detector,
        )
    }

    #[tokio::test]
    async fn test_single_line_end_to_end() {
        let mock = MockTranslator::with_mappings([("ciao bel gatto", "es", "hola bonito gato")]);
        let outcome = pipeline(Config::default(), &mock, "it")
            .process("ciao bel gatto")
            .await
            .unwrap();

        assert_eq!(outcome.messages(), ["🇮🇹→🇪🇸:\nhola bonito gato".to_string()]);
        match outcome {
            PipelineOutcome::Translated { request, .. } => {
                assert_eq!(request.pair, LanguagePair::new("it", "es"));
                assert_eq!(request.text, "ciao bel gatto");
            }
            PipelineOutcome::Skipped => panic!("expected a translation"),
        }
    }

    #[tokio::test]
    async fn test_blank_line_end_to_end() {
        let mock = MockTranslator::strict([("ciao", "es", "hola"), ("grazie", "es", "gracias")]);
        let outcome = pipeline(Config::default(), &mock, "it")
            .process("ciao\n\ngrazie")
            .await
            .unwrap();
        assert_eq!(outcome.messages(), ["🇮🇹→🇪🇸:\nhola\n\ngracias".to_string()]);
    }

    #[tokio::test]
    async fn test_spanish_goes_to_italian() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let outcome = pipeline(Config::default(), &mock, "es")
            .process("hola amigos")
            .await
            .unwrap();
        assert_eq!(outcome.messages(), ["🇪🇸→🇮🇹:\nhola amigos_it".to_string()]);
    }

    #[tokio::test]
    async fn test_unrecognized_language_is_skipped() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let outcome = pipeline(Config::default(), &mock, "en")
            .process("good morning everyone")
            .await
            .unwrap();
        assert_eq!(outcome, PipelineOutcome::Skipped);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_short_message_is_skipped() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let outcome = pipeline(Config::default(), &mock, "it").process("ok").await.unwrap();
        assert_eq!(outcome, PipelineOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_missing_target_is_an_error() {
        let mut config = Config::default();
        config.source_languages.push("fr".to_string());
        let mock = MockTranslator::new(MockMode::Suffix);

        let result = pipeline(config, &mock, "fr").process("bonjour à tous").await;
        assert_eq!(result, Err(PipelineError::MissingTarget("fr".to_string())));
    }

    #[tokio::test]
    async fn test_backend_failure_still_answers() {
        let mock = MockTranslator::new(MockMode::Error("503".to_string()));
        let outcome = pipeline(Config::default(), &mock, "it")
            .process("ciao a tutti")
            .await
            .unwrap();
        assert_eq!(outcome.messages(), ["🇮🇹→🇪🇸:\nciao a tutti".to_string()]);
    }

    #[tokio::test]
    async fn test_long_message_is_paginated() {
        let config = Config {
            max_message_length: 100,
            ..Config::default()
        };
        let mock = MockTranslator::new(MockMode::NoOp);
        let text = (0..30).map(|i| format!("riga numero {}", i)).collect::<Vec<_>>().join("\n");

        let outcome = pipeline(config, &mock, "it").process(&text).await.unwrap();
        let messages = outcome.messages();
        assert!(messages.len() > 1);
        assert!(messages.iter().all(|m| m.chars().count() <= 100));
        assert_eq!(messages.concat(), format!("🇮🇹→🇪🇸:\n{}", text));
    }

    #[tokio::test]
    async fn test_lexicon_entry_used_end_to_end() {
        let mut gaming = Lexicon::new();
        gaming.with_entry("it", "es", "gg", "bien jugado");
        let lexicon = LexiconStore::from_categories(vec![("gaming".to_string(), gaming)]);
        let mock = MockTranslator::new(MockMode::Suffix);
        let config = Config::default();
        let detector = LanguageDetector::with_identifier(Always("it"), config.source_languages.clone());
        let pipeline = TranslationPipeline::with_detector(
            Arc::new(config),
            Arc::new(lexicon),
            Arc::new(mock.clone()),
            detector,
        );

        let outcome = pipeline.process("GG\nbravi").await.unwrap();
        match outcome {
            PipelineOutcome::Translated { document, .. } => {
                assert_eq!(
                    document.lines,
                    vec![
                        LineResult::Dictionary("bien jugado".to_string()),
                        LineResult::Machine("bravi_es".to_string()),
                    ]
                );
            }
            PipelineOutcome::Skipped => panic!("expected a translation"),
        }
        assert_eq!(mock.call_count(), 1);
    }
}
