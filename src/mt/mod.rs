/// Machine Translation Module
///
/// Backends the segment translator falls back to when a line has no curated
/// lexicon entry.
///
/// 1. **MT Trait** - `MachineTranslator`, the provider abstraction
/// 2. **Google Translate** - HTTP provider for the v2 REST API
/// 3. **Mock** - deterministic provider for tests and offline runs
///
/// # Example
///
/// ```ignore
/// use parla_relay::mt::{MachineTranslator, GoogleTranslateProvider};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = GoogleTranslateProvider::from_env()?;
///     let translated = provider.translate("grazie mille", "it", "es").await?;
///     println!("{}", translated);
///     Ok(())
/// }
/// ```
pub mod error;
pub mod google_translate;
pub mod mock;
pub mod translator;

pub use error::{MtError, MtResult};
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockMode, MockTranslator};
pub use translator::{MachineTranslator, normalize_locale, validate_locale};
