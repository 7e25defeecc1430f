//! Runtime configuration.
//!
//! Layered with the `config` crate: defaults, then an optional TOML file,
//! then `ATHENA_*` environment variables (`__` separates nested keys, e.g.
//! `ATHENA_CLASSIFIER__ACCEPTANCE_THRESHOLD=0.25`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::intent::ClassifierConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Listen loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Seconds to wait for speech to start
    pub listen_timeout_secs: u64,
    /// Longest phrase accepted, in seconds
    pub phrase_limit_secs: u64,
    /// How long `stop` waits for the worker to exit
    pub stop_grace_ms: u64,
    pub wake_word: String,
    /// Only act on utterances that contain the wake word
    pub require_wake_word: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            listen_timeout_secs: 1,
            phrase_limit_secs: 10,
            stop_grace_ms: 1000,
            wake_word: "hey athena".to_string(),
            require_wake_word: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// JSON thesaurus (word to list of synsets). The built-in table is used
    /// when unset.
    pub thesaurus_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON array of category records replacing the built-in set
    pub categories_path: Option<PathBuf>,
}

/// Web information provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Answers remembered per process
    pub cache_capacity: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.duckduckgo.com/".to_string(),
            timeout_secs: 10,
            cache_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AthenaConfig {
    pub classifier: ClassifierConfig,
    pub listener: ListenerConfig,
    pub lexicon: LexiconConfig,
    pub registry: RegistryConfig,
    pub web: WebConfig,
}

impl AthenaConfig {
    /// Load from `path` (if given and present) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("ATHENA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
