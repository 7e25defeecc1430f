//! # Athena - desktop voice assistant core
//!
//! Turns recognized utterances into commands: lexical normalization,
//! synonym expansion, a two-pass intent classifier (exact patterns, then
//! weighted keyword/synonym scoring with conversational context) and a
//! command router that extracts parameters and dispatches to collaborators.

pub mod assistant;
pub mod collaborators;
pub mod config;
pub mod intent;
pub mod lexicon;
pub mod nlp;
pub mod router;
pub mod timekeeper;

#[cfg(test)]
mod assistant_tests;
#[cfg(test)]
mod classifier_tests;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

pub use assistant::{Assistant, AssistantError, StopOutcome};
pub use collaborators::{
    AppControl, ControlError, PowerAction, SpeechInput, SpeechOutput, SystemPower, VolumeControl,
    WebInformationProvider,
};
pub use config::{
    AthenaConfig, ConfigError, LexiconConfig, ListenerConfig, RegistryConfig, WebConfig,
};
pub use intent::{
    CategoryRegistry, CategorySpec, ClassificationResult, ClassifierConfig, ConversationContext,
    IntentClassifier, MatchMethod, SynonymWeighting, NONE_CATEGORY,
};
pub use lexicon::{
    LexicalDatabase, LexiconError, NullLexicon, StaticLexicon, SynonymExpander,
    UnavailableLexicon,
};
pub use router::{Collaborators, CommandRouter, RouteOutcome};
pub use timekeeper::{TimeEvent, TimeKeeper, TimeKeeperError, TokioTimeKeeper};

/// Main error type for Athena operations
#[derive(Debug, thiserror::Error)]
pub enum AthenaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] intent::RegistryError),

    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("Timer error: {0}")]
    TimeKeeper(#[from] TimeKeeperError),

    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),
}

pub type AthenaResult<T> = std::result::Result<T, AthenaError>;

/// Lexical database selected by configuration: a JSON thesaurus when a path
/// is configured, the built-in table otherwise.
pub fn load_lexicon(config: &LexiconConfig) -> AthenaResult<Arc<dyn LexicalDatabase>> {
    Ok(match &config.thesaurus_path {
        Some(path) => Arc::new(StaticLexicon::from_json_file(path)?),
        None => Arc::new(StaticLexicon::builtin()),
    })
}

/// Category registry selected by configuration: a JSON file when a path is
/// configured, the built-in categories otherwise.
pub fn load_registry(config: &RegistryConfig) -> AthenaResult<CategoryRegistry> {
    Ok(match &config.categories_path {
        Some(path) => CategoryRegistry::from_json_file(path)?,
        None => CategoryRegistry::builtin(),
    })
}

/// Classifier over the configured categories.
pub fn build_classifier(
    config: &AthenaConfig,
    lexicon: Arc<dyn LexicalDatabase>,
) -> AthenaResult<IntentClassifier> {
    Ok(IntentClassifier::new(
        Arc::new(load_registry(&config.registry)?),
        Arc::new(SynonymExpander::new(lexicon)),
        config.classifier.clone(),
    ))
}

/// Wire an assistant from configuration and collaborators.
pub fn initialize_assistant(
    config: &AthenaConfig,
    lexicon: Arc<dyn LexicalDatabase>,
    collaborators: Collaborators,
    input: Arc<dyn SpeechInput>,
    output: Arc<dyn SpeechOutput>,
) -> AthenaResult<Assistant> {
    tracing::info!("Initializing Athena assistant...");

    let classifier = build_classifier(config, lexicon)?;
    let router = CommandRouter::new(
        classifier.registry().clone(),
        collaborators,
        config.classifier.priority_categories.clone(),
    );
    let assistant = Assistant::new(classifier, router, input, output, config.listener.clone());

    tracing::info!("Athena initialized successfully");
    Ok(assistant)
}
