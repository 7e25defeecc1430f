//! Command category registry.
//!
//! Categories are authored as [`CategorySpec`] records (serde, so they can be
//! loaded from configuration) and compiled once into [`CommandCategory`]
//! values. Registration order is significant: the pattern matcher walks it
//! first to last and the scoring engine breaks ties in its favour.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{builtin, NONE_CATEGORY};
use crate::nlp::normalize;

/// Registry construction errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Category id must not be empty")]
    EmptyId,

    #[error("Category id '{0}' is reserved")]
    ReservedId(String),

    #[error("Duplicate category id '{0}'")]
    DuplicateId(String),

    #[error("Invalid pattern in category '{category}': {pattern}")]
    InvalidPattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read categories {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid categories format: {0}")]
    Format(#[from] serde_json::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Dedicated parameter-extraction handler for a category.
///
/// Categories without a handler fall through to the router's keyword-driven
/// default dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    OpenApp,
    CloseApp,
    SetTimer,
    SetAlarm,
    CancelTimers,
    CancelAlarms,
    ListTimers,
    ListAlarms,
}

/// Category-authored synonyms for one concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub concept: String,
    pub phrases: Vec<String>,
}

impl SynonymGroup {
    pub fn new(concept: &str, phrases: &[&str]) -> Self {
        Self {
            concept: concept.to_string(),
            phrases: phrases.iter().map(|phrase| phrase.to_string()).collect(),
        }
    }
}

/// Authoring form of a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub id: String,
    /// Case-insensitive regular expressions, checked in order.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Patterns that veto a pattern match for this category.
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<SynonymGroup>,
    #[serde(default)]
    pub handler: Option<HandlerKind>,
}

/// A compiled, immutable category
#[derive(Debug, Clone)]
pub struct CommandCategory {
    id: String,
    patterns: Vec<Regex>,
    excludes: Vec<Regex>,
    keywords: Vec<String>,
    synonym_groups: Vec<SynonymGroup>,
    handler: Option<HandlerKind>,
}

impl CommandCategory {
    fn compile(spec: &CategorySpec) -> RegistryResult<Self> {
        let compile_all = |sources: &[String]| -> RegistryResult<Vec<Regex>> {
            sources
                .iter()
                .map(|pattern| {
                    RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| RegistryError::InvalidPattern {
                            category: spec.id.clone(),
                            pattern: pattern.clone(),
                            source,
                        })
                })
                .collect()
        };

        let mut seen = HashSet::new();
        let keywords = spec
            .keywords
            .iter()
            .map(|keyword| normalize(keyword))
            .filter(|keyword| !keyword.is_empty() && seen.insert(keyword.clone()))
            .collect();

        let synonym_groups = spec
            .synonyms
            .iter()
            .map(|group| SynonymGroup {
                concept: group.concept.clone(),
                phrases: group
                    .phrases
                    .iter()
                    .map(|phrase| normalize(phrase))
                    .filter(|phrase| !phrase.is_empty())
                    .collect(),
            })
            .collect();

        Ok(Self {
            id: spec.id.clone(),
            patterns: compile_all(&spec.patterns)?,
            excludes: compile_all(&spec.excludes)?,
            keywords,
            synonym_groups,
            handler: spec.handler,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Normalized, deduplicated keywords
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Authored synonym groups with normalized phrases
    pub fn synonym_groups(&self) -> &[SynonymGroup] {
        &self.synonym_groups
    }

    pub fn handler(&self) -> Option<HandlerKind> {
        self.handler
    }

    fn is_vetoed(&self, text: &str) -> bool {
        self.excludes.iter().any(|exclude| exclude.is_match(text))
    }

    /// Index of the first pattern matching anywhere in `text`.
    pub fn first_match(&self, text: &str) -> Option<usize> {
        if self.is_vetoed(text) {
            return None;
        }
        self.patterns.iter().position(|pattern| pattern.is_match(text))
    }

    /// Capture groups of the first matching pattern (group 1 onwards).
    /// Groups that did not participate come back as empty strings.
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        let index = self.first_match(text)?;
        let caps = self.patterns[index].captures(text)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|group| {
                    group
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_default()
                })
                .collect(),
        )
    }
}

/// Ordered, immutable set of command categories
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<CommandCategory>,
}

impl CategoryRegistry {
    pub fn from_specs(specs: &[CategorySpec]) -> RegistryResult<Self> {
        let mut ids = HashSet::new();
        let mut categories = Vec::with_capacity(specs.len());

        for spec in specs {
            let id = spec.id.trim();
            if id.is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if id == NONE_CATEGORY {
                return Err(RegistryError::ReservedId(id.to_string()));
            }
            if !ids.insert(id.to_string()) {
                return Err(RegistryError::DuplicateId(id.to_string()));
            }
            categories.push(CommandCategory::compile(spec)?);
        }

        Ok(Self { categories })
    }

    /// Registry from a JSON array of [`CategorySpec`] records, in file order.
    pub fn from_json_str(json: &str) -> RegistryResult<Self> {
        let specs: Vec<CategorySpec> = serde_json::from_str(json)?;
        Self::from_specs(&specs)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json_str(&json)?;
        info!(
            "Loaded {} categories from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }

    /// The assistant's default command set.
    pub fn builtin() -> Self {
        Self::from_specs(&builtin::default_specs()).expect("built-in categories are valid")
    }

    pub fn get(&self, id: &str) -> Option<&CommandCategory> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Categories in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CommandCategory> {
        self.categories.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.categories.iter().map(|category| category.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
