//! Intent classification engine
//!
//! ```text
//! raw utterance ──► normalize ──► pattern matcher ──(hit)──► (category, 1.0)
//!                                   │
//!                                 (miss)
//!                                   ▼
//!                    scoring engine (keywords, lexicon synonyms,
//!                    authored phrases, context bonus) ──► (category, score) | none
//! ```
//!
//! The registry is immutable once built and can be shared between threads.
//! Conversation context is an explicit value owned by the caller.

pub mod builtin;
pub mod classifier;
pub mod context;
pub mod matcher;
pub mod registry;
pub mod scoring;

use serde::{Deserialize, Serialize};

pub use classifier::{ClassifierConfig, IntentClassifier, SynonymWeighting};
pub use context::ConversationContext;
pub use matcher::try_exact_match;
pub use registry::{
    CategoryRegistry, CategorySpec, CommandCategory, HandlerKind, RegistryError, RegistryResult,
    SynonymGroup,
};
pub use scoring::{CategoryScore, ScoringEngine};

/// Category id reported when nothing matched.
pub const NONE_CATEGORY: &str = "none";

/// How a classification was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// A registered pattern matched
    Pattern,
    /// Weighted keyword/synonym scoring cleared the acceptance threshold
    Scored,
    /// Nothing matched
    Unmatched,
}

/// Outcome of classifying one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: String,
    pub confidence: f64,
    pub method: MatchMethod,
}

impl ClassificationResult {
    pub fn none() -> Self {
        Self {
            category: NONE_CATEGORY.to_string(),
            confidence: 0.0,
            method: MatchMethod::Unmatched,
        }
    }

    pub fn exact(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            confidence: 1.0,
            method: MatchMethod::Pattern,
        }
    }

    pub fn scored(category: impl Into<String>, confidence: f64) -> Self {
        Self {
            category: category.into(),
            confidence,
            method: MatchMethod::Scored,
        }
    }

    pub fn is_none(&self) -> bool {
        self.category == NONE_CATEGORY
    }
}
