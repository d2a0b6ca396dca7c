//! Connector-facing message handler.
//!
//! A [`ChatConnector`] delivers inbound messages over a channel and accepts
//! outbound text. [`TranslatorBot`] decides what to do with each message:
//! ignore it, answer a command, or run it through the translation pipeline.
//! Every message gets its own task, so a slow translation never holds up the
//! next message.

use crate::pipeline::{PipelineError, PipelineOutcome, TranslationPipeline};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Generic notice sent when a message could not be processed
pub const APOLOGY: &str = "⚠️ Error al procesar la traducción";

pub const COMMAND_PREFIX: char = '!';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub author_id: String,
    pub channel: String,
    pub text: String,
}

impl InboundMessage {
    pub fn new(author_id: &str, channel: &str, text: &str) -> Self {
        InboundMessage {
            author_id: author_id.to_string(),
            channel: channel.to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorError(pub String);

impl std::fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "connector error: {}", self.0)
    }
}

impl std::error::Error for ConnectorError {}

/// Outbound side of a chat platform
#[async_trait]
pub trait ChatConnector: Send + Sync {
    async fn send(&self, channel: &str, text: &str) -> Result<(), ConnectorError>;

    /// Current round-trip latency to the platform
    fn latency(&self) -> Duration;
}

/// What the bot did with one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Authored by the bot itself
    Ignored,
    /// A command was answered
    Command(String),
    /// Not a translation candidate
    Skipped,
    /// Translation sent in this many chunks
    Translated(usize),
    /// Processing failed; the apology was sent (or attempted)
    Failed,
}

#[derive(Debug)]
enum HandleError {
    Pipeline(PipelineError),
    Connector(ConnectorError),
}

impl std::fmt::Display for HandleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandleError::Pipeline(e) => write!(f, "pipeline error: {}", e),
            HandleError::Connector(e) => write!(f, "{}", e),
        }
    }
}

impl From<PipelineError> for HandleError {
    fn from(err: PipelineError) -> Self {
        HandleError::Pipeline(err)
    }
}

impl From<ConnectorError> for HandleError {
    fn from(err: ConnectorError) -> Self {
        HandleError::Connector(err)
    }
}

pub struct TranslatorBot {
    pipeline: TranslationPipeline,
    bot_user_id: String,
}

impl TranslatorBot {
    pub fn new(pipeline: TranslationPipeline, bot_user_id: &str) -> Self {
        TranslatorBot {
            pipeline,
            bot_user_id: bot_user_id.to_string(),
        }
    }

    /// Handle one message. Errors are logged and turned into [`APOLOGY`];
    /// nothing propagates to the caller.
    pub async fn handle(&self, message: &InboundMessage, connector: &dyn ChatConnector) -> HandleOutcome {
        if message.author_id == self.bot_user_id {
            return HandleOutcome::Ignored;
        }

        match self.try_handle(message, connector).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to process message in '{}': {}", message.channel, e);
                if let Err(send_err) = connector.send(&message.channel, APOLOGY).await {
                    error!("Could not deliver error notice: {}", send_err);
                }
                HandleOutcome::Failed
            }
        }
    }

    async fn try_handle(
        &self,
        message: &InboundMessage,
        connector: &dyn ChatConnector,
    ) -> Result<HandleOutcome, HandleError> {
        if let Some(reply) = self.command_reply(&message.text, connector) {
            connector.send(&message.channel, &reply).await?;
            return Ok(HandleOutcome::Command(reply));
        }

        match self.pipeline.process(&message.text).await? {
            PipelineOutcome::Skipped => Ok(HandleOutcome::Skipped),
            PipelineOutcome::Translated { messages, .. } => {
                for chunk in &messages {
                    connector.send(&message.channel, chunk).await?;
                }
                Ok(HandleOutcome::Translated(messages.len()))
            }
        }
    }

    fn command_reply(&self, text: &str, connector: &dyn ChatConnector) -> Option<String> {
        let command = text.trim().strip_prefix(COMMAND_PREFIX)?;
        match command {
            "ping" => Some(ping_reply(connector.latency())),
            _ => {
                debug!("Unknown command '{}'", command);
                None
            }
        }
    }
}

/// `Pong! Latencia: 42.3ms`
pub fn ping_reply(latency: Duration) -> String {
    format!("Pong! Latencia: {:.1}ms", latency.as_secs_f64() * 1000.0)
}

/// Dispatch inbound messages until the sender side closes.
///
/// Each message runs in its own task; chunks of one answer are sent in
/// order, answers to different messages may interleave.
pub async fn run(
    bot: Arc<TranslatorBot>,
    connector: Arc<dyn ChatConnector>,
    mut inbound: mpsc::Receiver<InboundMessage>,
) {
    let mut tasks = tokio::task::JoinSet::new();

    while let Some(message) = inbound.recv().await {
        let bot = Arc::clone(&bot);
        let connector = Arc::clone(&connector);
        tasks.spawn(async move {
            let outcome = bot.handle(&message, connector.as_ref()).await;
            debug!("Message from {} handled: {:?}", message.author_id, outcome);
        });

        // Reap finished tasks so the set does not grow unbounded
        while let Some(joined) = tasks.try_join_next() {
            if let Err(e) = joined {
                error!("Message task panicked: {}", e);
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!("Message task panicked: {}", e);
        }
    }
    info!("Inbound channel closed, stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::detect::{LanguageDetector, LanguageIdentifier};
    use crate::lexicon::LexiconStore;
    use crate::mt::{MockMode, MockTranslator};
    use std::sync::Mutex;

    struct Always(&'static str);

    impl LanguageIdentifier for Always {
        fn identify(&self, _text: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    /// Records everything sent; optionally fails after `fail_after` sends
    #[derive(Default)]
    struct RecordingConnector {
        sent: Mutex<Vec<(String, String)>>,
        fail_after: Option<usize>,
    }

    impl RecordingConnector {
        fn failing_after(n: usize) -> Self {
            RecordingConnector {
                fail_after: Some(n),
                ..Default::default()
            }
        }

        fn texts(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
        }
    }

    #[async_trait]
    impl ChatConnector for RecordingConnector {
        async fn send(&self, channel: &str, text: &str) -> Result<(), ConnectorError> {
            let mut sent = self.sent.lock().unwrap();
            if let Some(limit) = self.fail_after {
                if sent.len() >= limit {
                    return Err(ConnectorError("channel unavailable".to_string()));
                }
            }
            sent.push((channel.to_string(), text.to_string()));
            Ok(())
        }

        fn latency(&self) -> Duration {
            Duration::from_micros(42_340)
        }
    }

    fn bot_with(config: Config, mock: &MockTranslator, lang: &'static str) -> TranslatorBot {
        let detector = LanguageDetector::with_identifier(Always(lang), config.source_languages.clone());
        let pipeline = TranslationPipeline::with_detector(
            Arc::new(config),
            Arc::new(LexiconStore::default()),
            Arc::new(mock.clone()),
            detector,
        );
        TranslatorBot::new(pipeline, "bot")
    }

    fn bot(mock: &MockTranslator) -> TranslatorBot {
        bot_with(Config::default(), mock, "it")
    }

    #[test]
    fn test_ping_reply_format() {
        assert_eq!(ping_reply(Duration::from_micros(42_340)), "Pong! Latencia: 42.3ms");
        assert_eq!(ping_reply(Duration::ZERO), "Pong! Latencia: 0.0ms");
    }

    #[tokio::test]
    async fn test_translation_is_sent_to_channel() {
        let mock = MockTranslator::with_mappings([("ciao bel gatto", "es", "hola bonito gato")]);
        let connector = RecordingConnector::default();

        let outcome = bot(&mock)
            .handle(&InboundMessage::new("17", "general", "ciao bel gatto"), &connector)
            .await;

        assert_eq!(outcome, HandleOutcome::Translated(1));
        assert_eq!(
            connector.sent.lock().unwrap().clone(),
            vec![("general".to_string(), "🇮🇹→🇪🇸:\nhola bonito gato".to_string())]
        );
    }

    #[tokio::test]
    async fn test_own_messages_are_ignored() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let connector = RecordingConnector::default();

        let outcome = bot(&mock)
            .handle(&InboundMessage::new("bot", "general", "ciao a tutti"), &connector)
            .await;

        assert_eq!(outcome, HandleOutcome::Ignored);
        assert!(connector.texts().is_empty());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ping_command() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let connector = RecordingConnector::default();

        let outcome = bot(&mock)
            .handle(&InboundMessage::new("17", "general", "!ping"), &connector)
            .await;

        assert_eq!(outcome, HandleOutcome::Command("Pong! Latencia: 42.3ms".to_string()));
        assert_eq!(connector.texts(), vec!["Pong! Latencia: 42.3ms"]);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_command_goes_through_pipeline() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let connector = RecordingConnector::default();

        let outcome = bot(&mock)
            .handle(&InboundMessage::new("17", "general", "!aiuto"), &connector)
            .await;
        assert_eq!(outcome, HandleOutcome::Translated(1));
    }

    #[tokio::test]
    async fn test_pipeline_error_sends_single_apology() {
        let mut config = Config::default();
        config.source_languages.push("fr".to_string());
        let mock = MockTranslator::new(MockMode::Suffix);
        let connector = RecordingConnector::default();

        let outcome = bot_with(config, &mock, "fr")
            .handle(&InboundMessage::new("17", "general", "bonjour tout le monde"), &connector)
            .await;

        assert_eq!(outcome, HandleOutcome::Failed);
        assert_eq!(connector.texts(), vec![APOLOGY]);
    }

    #[tokio::test]
    async fn test_send_failure_is_contained() {
        let config = Config {
            max_message_length: 20,
            ..Config::default()
        };
        let mock = MockTranslator::new(MockMode::NoOp);
        let connector = RecordingConnector::failing_after(1);
        let bot = bot_with(config, &mock, "it");

        let outcome = bot
            .handle(
                &InboundMessage::new("17", "general", "una frase abbastanza lunga da dividere"),
                &connector,
            )
            .await;
        assert_eq!(outcome, HandleOutcome::Failed);
        assert_eq!(connector.texts().len(), 1);

        // The bot keeps working afterwards
        let again = bot
            .handle(&InboundMessage::new("bot", "general", "ciao"), &connector)
            .await;
        assert_eq!(again, HandleOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_backend_failure_is_not_an_error() {
        let mock = MockTranslator::new(MockMode::Error("quota".to_string()));
        let connector = RecordingConnector::default();

        let outcome = bot(&mock)
            .handle(&InboundMessage::new("17", "general", "ciao\n\ngrazie"), &connector)
            .await;

        assert_eq!(outcome, HandleOutcome::Translated(1));
        assert_eq!(connector.texts(), vec!["🇮🇹→🇪🇸:\nciao\n\ngrazie"]);
    }

    #[tokio::test]
    async fn test_run_processes_all_messages() {
        let mock = MockTranslator::with_delay(MockMode::Suffix, 20);
        let connector = Arc::new(RecordingConnector::default());
        let (tx, rx) = mpsc::channel(8);

        for text in ["uno due tre", "quattro cinque", "!ping"] {
            tx.send(InboundMessage::new("17", "general", text)).await.unwrap();
        }
        tx.send(InboundMessage::new("bot", "general", "mio messaggio")).await.unwrap();
        drop(tx);

        run(Arc::new(bot(&mock)), connector.clone(), rx).await;

        let mut texts = connector.texts();
        texts.sort();
        assert_eq!(
            texts,
            vec![
                "Pong! Latencia: 42.3ms",
                "🇮🇹→🇪🇸:\nquattro cinque_es",
                "🇮🇹→🇪🇸:\nuno due tre_es",
            ]
        );
    }
}
