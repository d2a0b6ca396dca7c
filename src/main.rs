use clap::{Arg, ArgAction, Command};
use parla_relay::bot::{self, ChatConnector, TranslatorBot};
use parla_relay::console::{self, ConsoleConnector};
use parla_relay::mt::{GoogleTranslateProvider, MachineTranslator, MockMode, MockTranslator};
use parla_relay::{Config, LexiconStore, SuggestionStore, TranslationPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("parla-relay")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Relays Italian and Spanish chat messages with translations")
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use the mock translator instead of Google Translate")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("lexicon-dir")
                .long("lexicon-dir")
                .short('l')
                .help("Directory with the lexicon JSON files (overrides LEXICON_DIR)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .help("Author id for messages typed on stdin")
                .default_value("0"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // A missing .env file is normal in production
    let _ = dotenvy::dotenv();

    let default_level = if matches.get_flag("verbose") { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mut config = Config::from_env();
    if let Some(dir) = matches.get_one::<String>("lexicon-dir") {
        config.lexicon_dir = PathBuf::from(dir);
    }
    info!(
        "Source languages: {:?}, targets: {:?}, max message length: {}",
        config.source_languages, config.target_languages, config.max_message_length
    );
    info!("{} administrator id(s) configured", config.admin_user_ids.len());
    if config.learning_mode {
        info!("LEARNING_MODE is set; it is reserved and has no effect");
    }

    let lexicon = Arc::new(LexiconStore::load(&config.lexicon_dir));
    info!(
        "Lexicon categories in lookup order: {}",
        lexicon.categories().collect::<Vec<_>>().join(", ")
    );
    let suggestions = SuggestionStore::load(&config.suggestions_file);
    info!(
        "Loaded {} suggestion(s) from {} user(s)",
        suggestions.total(),
        suggestions.user_count()
    );

    let backend: Arc<dyn MachineTranslator> = if matches.get_flag("mock") {
        warn!("Using mock translator");
        Arc::new(MockTranslator::new(MockMode::Suffix))
    } else {
        let provider = GoogleTranslateProvider::from_env()
            .map_err(|e| format!("Failed to initialize translator: {}", e))?;
        Arc::new(provider)
    };
    info!("Machine translation backend: {}", backend.provider_name());

    let config = Arc::new(config);
    let pipeline = TranslationPipeline::new(Arc::clone(&config), lexicon, backend);
    let bot = Arc::new(TranslatorBot::new(pipeline, &config.bot_user_id));
    let connector: Arc<dyn ChatConnector> = Arc::new(ConsoleConnector::new());

    let (tx, rx) = mpsc::channel(64);
    let author = matches
        .get_one::<String>("user")
        .cloned()
        .unwrap_or_else(|| "0".to_string());
    tokio::spawn(async move { console::read_stdin(&author, tx).await });

    info!("Bot ready, reading messages from stdin");
    bot::run(bot, connector, rx).await;

    Ok(())
}
