use clap::Args;
use mentorai_core::{Config, IntentExtractor, IntentVocabulary, Locale};

use super::CliResult;

#[derive(Args)]
pub struct IntentArgs {
    /// Message text, e.g. "tengo 20 min"
    pub text: String,
    /// Vocabulary to use instead of the configured one (es, en)
    #[arg(long)]
    pub locale: Option<Locale>,
}

pub fn run(args: IntentArgs) -> CliResult {
    let config = Config::load_or_default();
    let extractor = match args.locale {
        Some(locale) => {
            let mut vocab = IntentVocabulary::for_locale(locale);
            vocab.extend(&config.intent.extra);
            IntentExtractor::new(&vocab)?
        }
        None => config.intent_extractor()?,
    };

    let intent = extractor.parse(&args.text);
    println!("{}", serde_json::to_string_pretty(&intent)?);
    Ok(())
}
