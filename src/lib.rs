//! Chat translation relay.
//!
//! Watches chat messages, detects whether they are written in one of the
//! configured source languages, and answers with a translation that prefers
//! curated lexicon entries over machine translation.
//!
//! ```text
//! inbound message → LanguageDetector → DocumentTranslator → ResponseFormatter → chunks
//!                                        └ SegmentTranslator (LexiconStore, MachineTranslator)
//! ```

pub mod bot;
pub mod config;
pub mod console;
pub mod detect;
pub mod document;
pub mod format;
pub mod language;
pub mod lexicon;
pub mod mt;
pub mod pipeline;
pub mod segment;
pub mod suggestions;


pub use bot::{ChatConnector, ConnectorError, HandleOutcome, InboundMessage, TranslatorBot};
pub use config::Config;
pub use detect::{LanguageDetector, LanguageIdentifier, WhatlangIdentifier};
pub use document::{DocumentTranslator, TranslatedDocument};
pub use format::ResponseFormatter;
pub use language::LanguagePair;
pub use lexicon::{Lexicon, LexiconStore};
pub use pipeline::{PipelineError, PipelineOutcome, TranslationPipeline, TranslationRequest};
pub use segment::{LineResult, SegmentTranslator};
pub use suggestions::{Suggestion, SuggestionStore};
